pub mod algorithm;
pub mod compiler;
pub mod config;
pub mod model;
pub mod session;
pub mod util;

pub use model::TagMapsError;
