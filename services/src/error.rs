use std::path::PathBuf;

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))]
pub enum Error {
    DataType {
        source: urbanview_datatypes::error::Error,
    },

    #[snafu(display("Io error for {}: {}", path.display(), source))]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    SerdeJson {
        source: serde_json::Error,
    },

    Config {
        source: config::ConfigError,
    },

    ConfigLockFailed,

    MissingWorkingDirectory {
        source: std::io::Error,
    },

    MissingSettingsDirectory,

    #[snafu(display("Unknown dataset: \"{}\"", name))]
    UnknownDataset {
        name: String,
    },

    #[snafu(display("Dataset file {} is not a JSON array of records", path.display()))]
    DatasetNotAnArray {
        path: PathBuf,
    },

    #[snafu(display("Dataset {} has no column \"{}\"", dataset, column))]
    MissingColumn {
        dataset: String,
        column: String,
    },

    #[snafu(display("No pattern group \"{}\"", pattern_type))]
    UnknownPatternType {
        pattern_type: String,
    },
}
