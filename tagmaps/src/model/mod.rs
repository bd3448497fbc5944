mod tagmaps_cli_error;

pub use tagmaps_cli_error::TagMapsCliError;
