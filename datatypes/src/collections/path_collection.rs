use crate::collections::{DataTable, PathCollection};
use crate::operations::wkb;
use crate::primitives::Path;
use crate::util::Result;

impl PathCollection {
    /// Decodes a column of hex-encoded WKB line strings into a path
    /// collection. Rows whose blob does not decode are dropped silently;
    /// a bad row never fails the whole table.
    ///
    /// # Errors
    ///
    /// Fails if `column` is missing or not a text column
    ///
    pub fn from_wkb_hex_column(table: &DataTable, column: &str) -> Result<Self> {
        Self::from_wkb_hex_column_with(table, column, wkb::decode_path)
    }

    /// Like [`from_wkb_hex_column`](Self::from_wkb_hex_column), but decoding
    /// through `decode`, e.g. a memoizing decoder.
    pub fn from_wkb_hex_column_with<F>(table: &DataTable, column: &str, mut decode: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<Path>,
    {
        let blobs = table.text_column(column)?;

        let mut mask = Vec::with_capacity(table.len());
        let mut geometries = Vec::new();

        for blob in &blobs {
            match blob.as_deref().and_then(&mut decode) {
                Some(path) => {
                    mask.push(true);
                    geometries.push(path);
                }
                None => mask.push(false),
            }
        }

        Self::new(geometries, table.filter(&mask)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::PathAccess;
    use serde_json::json;

    fn line_string_hex(coordinates: &[(f64, f64)]) -> String {
        let mut bytes = vec![1u8]; // little endian
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&(coordinates.len() as u32).to_le_bytes());
        for &(x, y) in coordinates {
            bytes.extend_from_slice(&x.to_le_bytes());
            bytes.extend_from_slice(&y.to_le_bytes());
        }
        hex::encode(bytes)
    }

    #[test]
    fn decodes_rows_and_drops_failures() {
        let table = DataTable::from_json_records(&[
            json!({"client_id": "c1", "path": line_string_hex(&[(18.0, 59.3), (18.1, 59.4)])}),
            json!({"client_id": "c2", "path": "not-hex!!"}),
            json!({"client_id": "c3", "path": null}),
        ])
        .unwrap();

        let collection = PathCollection::from_wkb_hex_column(&table, "path").unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.geometries()[0].coordinates().len(), 2);
        assert_eq!(
            collection.table().text_column("client_id").unwrap(),
            vec![Some("c1".to_string())]
        );
    }

    #[test]
    fn missing_column_fails() {
        let table = DataTable::from_json_records(&[json!({"client_id": "c1"})]).unwrap();

        assert!(PathCollection::from_wkb_hex_column(&table, "path").is_err());
    }

    #[test]
    fn custom_decoder_is_used() {
        let table =
            DataTable::from_json_records(&[json!({"path": "whatever"}), json!({"path": "other"})])
                .unwrap();

        let mut calls = 0;
        let collection = PathCollection::from_wkb_hex_column_with(&table, "path", |_| {
            calls += 1;
            Some(Path::new_unchecked(vec![(0.0, 0.0).into()]))
        })
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(collection.len(), 2);
    }
}
