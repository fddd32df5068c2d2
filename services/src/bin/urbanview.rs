use std::path::PathBuf;

use clap::{Parser, Subcommand};

use urbanview_services::cache::CachingPathDecoder;
use urbanview_services::config::{self, get_config_element};
use urbanview_services::datasets::{Dataset, DatasetStore};
use urbanview_services::error::Result;
use urbanview_services::views;

/// CLI for exporting result views as GeoJSON
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the serialized exports; defaults to the configured
    /// data path
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Lists the known datasets
    Datasets,

    /// Writes one dataset's geometry layer as GeoJSON to stdout
    Export {
        /// Dataset name, e.g. `astar_routes`
        dataset: String,

        /// Restrict client-scoped datasets to one pattern group
        #[arg(long)]
        pattern_type: Option<String>,

        /// Restrict client-scoped datasets to one client
        #[arg(long)]
        client_id: Option<String>,
    },
}

#[allow(clippy::print_stdout)]
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Datasets => {
            for dataset in Dataset::all() {
                println!("{dataset}");
            }
            Ok(())
        }
        Commands::Export {
            dataset,
            pattern_type,
            client_id,
        } => {
            let data_dir = match cli.data_dir {
                Some(dir) => dir,
                None => get_config_element::<config::Data>()?.path,
            };

            let dataset = Dataset::resolve(&dataset)?;
            let store = DatasetStore::preload(&data_dir);

            let filter = match pattern_type {
                Some(pattern_type) if dataset.is_client_scoped() => {
                    let groups =
                        views::PatternGroups::from_table(store.table(Dataset::UserPatterns))?;
                    Some(groups.filter_for(&pattern_type, client_id.as_deref())?)
                }
                _ => None,
            };

            let table = match &filter {
                Some(filter) => filter.apply(store.table(dataset))?,
                None => store.table(dataset).clone(),
            };

            let geo_json = match dataset {
                Dataset::AstarRoutes | Dataset::MapfRoutes => {
                    let decoder = CachingPathDecoder::new();
                    let layer = views::path_layer(&table, &decoder)?;
                    decoder.log_statistics();
                    layer.to_geo_json()
                }
                Dataset::ViewLatestClientTrajectories => {
                    views::trajectory_layer(&table)?.to_geo_json()
                }
                Dataset::Lines => {
                    // the lines export has no geometry; emit the flattened table
                    let flat = views::flatten_lines_content(&table)?;
                    let records: Vec<serde_json::Value> = (0..flat.len())
                        .map(|row| {
                            let mut record = serde_json::Map::new();
                            for name in flat.column_names() {
                                if let Ok(value) = flat.value(name, row) {
                                    record.insert(name.to_string(), value.into());
                                }
                            }
                            serde_json::Value::Object(record)
                        })
                        .collect();
                    serde_json::Value::Array(records).to_string()
                }
                _ => views::point_layer(&table)?.to_geo_json(),
            };

            println!("{geo_json}");
            Ok(())
        }
    }
}

#[allow(clippy::print_stderr)]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_error| {
                    let logging: config::Logging = get_config_element()?;
                    Ok::<_, urbanview_services::error::Error>(tracing_subscriber::EnvFilter::new(
                        logging.log_spec,
                    ))
                })
                .unwrap_or_else(|_error| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
