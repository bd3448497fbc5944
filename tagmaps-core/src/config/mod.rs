mod tagmaps_configuration;

pub use tagmaps_configuration::TagMapsConfiguration;
