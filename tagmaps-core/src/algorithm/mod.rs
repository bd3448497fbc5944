pub mod alpha_shape;
pub mod clustering;
