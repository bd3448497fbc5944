use std::path::Path;

use clap::{Parser, Subcommand};
use itertools::Itertools;
use tagmaps_core::compiler::{rank_items, TagMapsRun};
use tagmaps_core::config::TagMapsConfiguration;
use tagmaps_core::model::{PostStore, RunSummary};

use crate::io::{read_cleaned_posts, write_output, OutputFormat};
use crate::model::TagMapsCliError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct TagMapsAppArguments {
    #[command(subcommand)]
    pub app: App,
}

#[derive(Subcommand)]
pub enum App {
    /// cluster every selected item and write the resulting shapes
    Run {
        #[arg(long, help = "path to the cleaned post CSV file")]
        input_file: String,
        #[arg(long, help = "path to a .toml or .json file with tagmaps run parameters")]
        configuration_file: Option<String>,
        #[arg(long, help = "output directory for shapes and run summary")]
        output_directory: String,
        #[arg(long, help = "cut distance in meters, overrides the configuration file")]
        cluster_distance: Option<f64>,
        #[arg(long, help = "output format, csv (WKT geometry) or geojson")]
        format: Option<String>,
    },
    /// list the ranked items that a run would cluster
    Items {
        #[arg(long, help = "path to the cleaned post CSV file")]
        input_file: String,
        #[arg(long, help = "path to a .toml or .json file with tagmaps run parameters")]
        configuration_file: Option<String>,
        #[arg(long, default_value_t = 20, help = "number of items to print per item type")]
        limit: usize,
    },
}

pub fn run(app: &App) -> Result<(), TagMapsCliError> {
    match app {
        App::Run {
            input_file,
            configuration_file,
            output_directory,
            cluster_distance,
            format,
        } => {
            let mut conf = read_configuration(configuration_file.as_ref())?;
            if cluster_distance.is_some() {
                conf.cluster_distance = *cluster_distance;
            }
            let format = match format {
                None => OutputFormat::default(),
                Some(f) => OutputFormat::try_from(f.as_str())
                    .map_err(TagMapsCliError::ConfigurationError)?,
            };
            let store = PostStore::new(read_cleaned_posts(Path::new(input_file))?);
            let output_wgs84 = conf.output_wgs84;
            let run = TagMapsRun::new(conf)?;
            let output = run.run(&store)?;
            write_output(&output, Path::new(output_directory), format, output_wgs84)?;
            eprintln!("finished.");
            Ok(())
        }
        App::Items {
            input_file,
            configuration_file,
            limit,
        } => {
            let conf = read_configuration(configuration_file.as_ref())?;
            let store = PostStore::new(read_cleaned_posts(Path::new(input_file))?);
            println!("{}", RunSummary::from_posts(&store));
            let ranking = conf.item_ranking();
            for item_type in conf.item_types() {
                let items = rank_items(&store, item_type, &ranking);
                let listed = items
                    .iter()
                    .take(*limit)
                    .map(|i| format!("{} ({})", i.name, i.user_count))
                    .join(", ");
                println!("{} {item_type}: {listed}", items.len());
            }
            Ok(())
        }
    }
}

fn read_configuration(file: Option<&String>) -> Result<TagMapsConfiguration, TagMapsCliError> {
    match file {
        None => Ok(TagMapsConfiguration::default()),
        Some(f) => {
            log::info!("reading tagmaps configuration from {f}");
            TagMapsConfiguration::try_from(f)
                .map_err(|e| TagMapsCliError::ConfigurationError(e.to_string()))
        }
    }
}
