use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use snafu::ResultExt;
use urbanview_datatypes::collections::DataTable;

use crate::datasets::Dataset;
use crate::error::{self, Result};

/// Reads one serialized export into a table.
///
/// # Errors
///
/// Fails if the file is unreadable, not JSON, not an array, or if a record
/// is not an object
///
pub fn load_table(path: &Path) -> Result<DataTable> {
    let content = std::fs::read_to_string(path).context(error::Io { path })?;
    let value: Value = serde_json::from_str(&content).context(error::SerdeJson)?;

    let records = value
        .as_array()
        .ok_or_else(|| error::Error::DatasetNotAnArray { path: path.into() })?;

    DataTable::from_json_records(records)
        .map_err(Into::into)
        .context(error::DataType)
}

/// All exports, loaded up front. A dataset that fails to load is kept as an
/// empty table so one broken file never takes the whole viewer down; missing
/// schema is still reported later, when a view asks for columns that are not
/// there.
#[derive(Debug)]
pub struct DatasetStore {
    tables: HashMap<Dataset, DataTable>,
}

impl DatasetStore {
    pub fn preload(data_dir: &Path) -> Self {
        let mut tables = HashMap::new();

        for dataset in Dataset::all() {
            let table = match load_table(&dataset.file_path(data_dir)) {
                Ok(table) => {
                    log::info!("loaded {} with {} rows", dataset, table.len());
                    table
                }
                Err(error) => {
                    log::warn!("loading {} failed: {}", dataset, error);
                    DataTable::empty()
                }
            };
            tables.insert(dataset, table);
        }

        Self { tables }
    }

    /// The preloaded table of `dataset`, empty if it failed to load
    pub fn table(&self, dataset: Dataset) -> &DataTable {
        self.tables
            .get(&dataset)
            .expect("preload inserts every dataset")
    }
}
