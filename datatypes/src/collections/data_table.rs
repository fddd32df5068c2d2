use serde_json::Value;
use snafu::ensure;

use crate::collections::error;
use crate::collections::FeatureCollectionError;
use crate::primitives::{FeatureData, FeatureDataValue};

/// A row-oriented table stored as named columns of equal length. The table is
/// immutable; every transformation copies into a new table.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DataTable {
    columns: Vec<(String, FeatureData)>,
    length: usize,
}

impl DataTable {
    /// Creates a table from named columns
    ///
    /// # Errors
    ///
    /// Fails if column names repeat or column lengths differ
    ///
    pub fn new(columns: Vec<(String, FeatureData)>) -> Result<Self, FeatureCollectionError> {
        let length = columns.first().map_or(0, |(_, data)| data.len());

        for (i, (name, data)) in columns.iter().enumerate() {
            ensure!(
                columns[..i].iter().all(|(other, _)| other != name),
                error::ColumnAlreadyExists { name: name.clone() }
            );
            ensure!(
                data.len() == length,
                error::UnmatchedLength {
                    a: length,
                    b: data.len()
                }
            );
        }

        Ok(Self { columns, length })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from an array of JSON records. Column order follows
    /// first appearance; keys missing from a record become nulls.
    ///
    /// # Errors
    ///
    /// Fails if any record is not a JSON object
    ///
    pub fn from_json_records(records: &[Value]) -> Result<Self, FeatureCollectionError> {
        let mut column_names: Vec<String> = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let object = record
                .as_object()
                .ok_or(FeatureCollectionError::RecordNotAnObject { index })?;

            for key in object.keys() {
                if !column_names.iter().any(|name| name == key) {
                    column_names.push(key.clone());
                }
            }
        }

        let columns = column_names
            .into_iter()
            .map(|name| {
                let cells = records
                    .iter()
                    .map(|record| record.get(&name).cloned().unwrap_or(Value::Null))
                    .collect();
                (name, FeatureData::from_json_column(cells))
            })
            .collect();

        let mut table = Self::new(columns)?;
        table.length = records.len(); // a table without columns still has rows
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(column, _)| column == name)
    }

    pub fn column(&self, name: &str) -> Option<&FeatureData> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, data)| data)
    }

    /// Retrieve column data
    ///
    /// # Errors
    ///
    /// This method fails if there is no `column` with that name
    ///
    pub fn data(&self, column: &str) -> Result<&FeatureData, FeatureCollectionError> {
        self.column(column)
            .ok_or(FeatureCollectionError::ColumnDoesNotExist {
                name: column.to_string(),
            })
    }

    /// The cell in `column` at `row`
    pub fn value(
        &self,
        column: &str,
        row: usize,
    ) -> Result<FeatureDataValue, FeatureCollectionError> {
        Ok(self.data(column)?.get_unchecked(row))
    }

    /// Numeric view of a column; ints widen to `f64`, nulls stay `None`
    ///
    /// # Errors
    ///
    /// Fails if the column is missing or not numeric
    ///
    pub fn float_column(&self, name: &str) -> Result<Vec<Option<f64>>, FeatureCollectionError> {
        let data = self.data(name)?;
        ensure!(
            data.data_type().is_numeric(),
            error::WrongDataType {
                name: name.to_string(),
                found: data.data_type(),
                expected: crate::primitives::FeatureDataType::Float
            }
        );

        Ok((0..data.len())
            .map(|i| data.get_unchecked(i).as_f64())
            .collect())
    }

    /// Text view of a column, nulls stay `None`
    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>, FeatureCollectionError> {
        let data = self.data(name)?;
        ensure!(
            data.data_type() == crate::primitives::FeatureDataType::Text,
            error::WrongDataType {
                name: name.to_string(),
                found: data.data_type(),
                expected: crate::primitives::FeatureDataType::Text
            }
        );

        Ok((0..data.len())
            .map(|i| data.get_unchecked(i).as_str().map(str::to_string))
            .collect())
    }

    /// Nested JSON view of a column, nulls stay `None`
    pub fn json_column(&self, name: &str) -> Result<Vec<Option<Value>>, FeatureCollectionError> {
        let data = self.data(name)?;
        ensure!(
            data.data_type() == crate::primitives::FeatureDataType::Json,
            error::WrongDataType {
                name: name.to_string(),
                found: data.data_type(),
                expected: crate::primitives::FeatureDataType::Json
            }
        );

        Ok((0..data.len())
            .map(|i| data.get_unchecked(i).as_json().cloned())
            .collect())
    }

    /// Copies the rows selected by `mask` into a new table
    ///
    /// # Errors
    ///
    /// This method fails if the `mask`'s length does not equal the length of the table
    ///
    pub fn filter(&self, mask: &[bool]) -> Result<Self, FeatureCollectionError> {
        ensure!(
            mask.len() == self.length,
            error::UnmatchedLength {
                a: self.length,
                b: mask.len()
            }
        );

        let columns = self
            .columns
            .iter()
            .map(|(name, data)| (name.clone(), data.filter(mask)))
            .collect();

        Ok(Self {
            columns,
            length: mask.iter().filter(|&&keep| keep).count(),
        })
    }

    /// Creates a copy of the table with an additional column
    ///
    /// # Errors
    ///
    /// Adding a column fails if the column does already exist or the length
    /// does not match the length of the table
    ///
    pub fn add_column(
        &self,
        new_column: &str,
        data: FeatureData,
    ) -> Result<Self, FeatureCollectionError> {
        ensure!(
            !self.has_column(new_column),
            error::ColumnAlreadyExists {
                name: new_column.to_string()
            }
        );
        ensure!(
            data.len() == self.length,
            error::UnmatchedLength {
                a: self.length,
                b: data.len()
            }
        );

        let mut columns = self.columns.clone();
        columns.push((new_column.to_string(), data));

        Ok(Self {
            columns,
            length: self.length,
        })
    }
}
