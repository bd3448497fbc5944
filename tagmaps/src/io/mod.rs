mod cleaned_post_reader;
mod output_format;
mod shape_writer;

pub use cleaned_post_reader::{read_cleaned_posts, read_cleaned_posts_from, CleanedPostRow, SET_SEPARATOR};
pub use output_format::OutputFormat;
pub use shape_writer::{shape_feature_collection, write_output, write_shapes_csv, ShapeRow};
