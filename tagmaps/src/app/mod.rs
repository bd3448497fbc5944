mod tagmaps_app;

pub use tagmaps_app::{run, App, TagMapsAppArguments};
