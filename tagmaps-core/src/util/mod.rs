pub mod geo_utils;
mod utm_projection;

pub use utm_projection::UtmProjection;
