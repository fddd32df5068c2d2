use std::collections::{BTreeMap, HashSet};

use urbanview_datatypes::collections::DataTable;

use crate::error::{self, Result};

const CLIENT_ID_COLUMN: &str = "client_id";
const PATTERN_TYPE_COLUMN: &str = "pattern_type";

/// Client ids grouped by their movement pattern type, from the
/// `user_patterns` export. Rows lacking either value are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGroups {
    groups: BTreeMap<String, Vec<String>>,
}

impl PatternGroups {
    pub fn from_table(table: &DataTable) -> Result<Self> {
        let client_ids = table
            .text_column(CLIENT_ID_COLUMN)
            .map_err(|_error| error::Error::MissingColumn {
                dataset: "user_patterns".to_string(),
                column: CLIENT_ID_COLUMN.to_string(),
            })?;
        let pattern_types =
            table
                .text_column(PATTERN_TYPE_COLUMN)
                .map_err(|_error| error::Error::MissingColumn {
                    dataset: "user_patterns".to_string(),
                    column: PATTERN_TYPE_COLUMN.to_string(),
                })?;

        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (client_id, pattern_type) in client_ids.into_iter().zip(pattern_types) {
            if let (Some(client_id), Some(pattern_type)) = (client_id, pattern_type) {
                groups.entry(pattern_type).or_default().push(client_id);
            }
        }

        for client_ids in groups.values_mut() {
            client_ids.sort();
        }

        Ok(Self { groups })
    }

    /// Pattern types in lexicographic order
    pub fn pattern_types(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn client_ids(&self, pattern_type: &str) -> Option<&[String]> {
        self.groups.get(pattern_type).map(Vec::as_slice)
    }

    /// Resolves the UI selection "pattern type, optionally one client" into
    /// the filter predicate handed to the views.
    ///
    /// # Errors
    ///
    /// Fails if `pattern_type` names no group
    ///
    pub fn filter_for(
        &self,
        pattern_type: &str,
        client_id: Option<&str>,
    ) -> Result<ClientFilter> {
        let client_ids =
            self.client_ids(pattern_type)
                .ok_or_else(|| error::Error::UnknownPatternType {
                    pattern_type: pattern_type.to_string(),
                })?;

        Ok(match client_id {
            Some(client_id) => ClientFilter::new([client_id.to_string()]),
            None => ClientFilter::new(client_ids.iter().cloned()),
        })
    }
}

/// An already-resolved row predicate: the set of client ids a view may show.
/// The views never look at UI state; they only see this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFilter {
    allowed: HashSet<String>,
}

impl ClientFilter {
    pub fn new<I: IntoIterator<Item = String>>(allowed: I) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn allows(&self, client_id: &str) -> bool {
        self.allowed.contains(client_id)
    }

    /// Keeps the rows whose `client_id` is allowed. Tables without a
    /// `client_id` column pass through unfiltered.
    pub fn apply(&self, table: &DataTable) -> Result<DataTable> {
        let Ok(client_ids) = table.text_column(CLIENT_ID_COLUMN) else {
            return Ok(table.clone());
        };

        let mask: Vec<bool> = client_ids
            .iter()
            .map(|client_id| {
                client_id
                    .as_deref()
                    .map_or(false, |client_id| self.allows(client_id))
            })
            .collect();

        table
            .filter(&mask)
            .map_err(|source| error::Error::DataType {
                source: source.into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patterns_table() -> DataTable {
        DataTable::from_json_records(&[
            json!({"client_id": "c2", "pattern_type": "commuter", "lat": 59.3, "lon": 18.0}),
            json!({"client_id": "c1", "pattern_type": "commuter", "lat": 59.4, "lon": 18.1}),
            json!({"client_id": "c3", "pattern_type": "wanderer", "lat": 59.5, "lon": 18.2}),
            json!({"client_id": null, "pattern_type": "commuter", "lat": 59.6, "lon": 18.3}),
        ])
        .unwrap()
    }

    #[test]
    fn groups_by_pattern_type() {
        let groups = PatternGroups::from_table(&patterns_table()).unwrap();

        assert_eq!(
            groups.pattern_types().collect::<Vec<_>>(),
            vec!["commuter", "wanderer"]
        );
        // sorted, and the null client row is gone
        assert_eq!(
            groups.client_ids("commuter").unwrap(),
            ["c1".to_string(), "c2".to_string()]
        );
    }

    #[test]
    fn missing_columns_fail() {
        let table = DataTable::from_json_records(&[json!({"lat": 1.0})]).unwrap();

        assert!(PatternGroups::from_table(&table).is_err());
    }

    #[test]
    fn filter_for_selection() {
        let groups = PatternGroups::from_table(&patterns_table()).unwrap();

        let all = groups.filter_for("commuter", None).unwrap();
        assert!(all.allows("c1") && all.allows("c2") && !all.allows("c3"));

        let single = groups.filter_for("commuter", Some("c2")).unwrap();
        assert!(single.allows("c2") && !single.allows("c1"));

        assert!(groups.filter_for("unknown", None).is_err());
    }

    #[test]
    fn apply_filters_rows() {
        let filter = ClientFilter::new(["c1".to_string()]);
        let filtered = filter.apply(&patterns_table()).unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(
            filtered.text_column("client_id").unwrap(),
            vec![Some("c1".to_string())]
        );
    }

    #[test]
    fn apply_passes_tables_without_client_column() {
        let table = DataTable::from_json_records(&[json!({"name": "stop"})]).unwrap();
        let filter = ClientFilter::new(["c1".to_string()]);

        assert_eq!(filter.apply(&table).unwrap(), table);
    }
}
