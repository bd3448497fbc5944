use clap::Parser;
use tagmaps::app::{run, TagMapsAppArguments};

fn main() {
    env_logger::init();
    let args = TagMapsAppArguments::parse();
    if let Err(e) = run(&args.app) {
        log::error!("tagmaps failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
