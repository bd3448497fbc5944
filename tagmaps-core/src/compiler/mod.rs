mod item_selection;
mod local_saturation;
mod output_compiler;
mod shape_compiler;
mod tagmaps_run;

pub use item_selection::{item_user_counts, rank_items, select_post_guids, ItemRanking};
pub use local_saturation::{LocalSaturationFilter, LOCAL_SATURATION_THRESHOLD};
pub use output_compiler::{compile_output, normalize_weights, OutputShape};
pub use shape_compiler::ClusterShapeCompiler;
pub use tagmaps_run::{TagMapsOutput, TagMapsRun};
