mod alpha_shape_ops;
mod buffer_ops;
mod cluster_polygon;

pub use alpha_shape_ops::{alpha_shape, AlphaShape};
pub use buffer_ops::{buffer_point, buffer_polygon, buffered_hull, POINT_BUFFER_RESOLUTION};
pub use cluster_polygon::{buffer_radius, cluster_polygon, start_alpha};
