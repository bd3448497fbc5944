mod analysis_bounds;
mod cleaned_post;
mod cluster_shape;
mod cluster_weights;
mod item;
mod post_store;
mod run_summary;
mod shape_strategy;
mod tag_match_policy;
mod tagmaps_error;
mod zero_coordinate_policy;

pub use analysis_bounds::AnalysisBounds;
pub use cleaned_post::{CleanedPost, LatLng};
pub use cluster_shape::ClusterShape;
pub use cluster_weights::{ClusterWeights, SENTINEL_WEIGHT};
pub use item::{Item, ItemType, LOCATIONS_ITEM_NAME};
pub use post_store::PostStore;
pub use run_summary::RunSummary;
pub use shape_strategy::ShapeStrategy;
pub use tag_match_policy::TagMatchPolicy;
pub use tagmaps_error::TagMapsError;
pub use zero_coordinate_policy::ZeroCoordinatePolicy;
