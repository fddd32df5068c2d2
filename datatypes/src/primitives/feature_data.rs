use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The type of a table column
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureDataType {
    Int,
    Float,
    Text,
    Bool,
    Json,
}

impl FeatureDataType {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

/// One column of a table. Nested values (arrays, objects) stay `Json`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub enum FeatureData {
    Int(Vec<i64>),
    NullableInt(Vec<Option<i64>>),
    Float(Vec<f64>),
    NullableFloat(Vec<Option<f64>>),
    Text(Vec<String>),
    NullableText(Vec<Option<String>>),
    Bool(Vec<bool>),
    NullableBool(Vec<Option<bool>>),
    Json(Vec<Value>),
    NullableJson(Vec<Option<Value>>),
}

/// A single cell of a table
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub enum FeatureDataValue {
    Int(i64),
    NullableInt(Option<i64>),
    Float(f64),
    NullableFloat(Option<f64>),
    Text(String),
    NullableText(Option<String>),
    Bool(bool),
    NullableBool(Option<bool>),
    Json(Value),
    NullableJson(Option<Value>),
}

impl FeatureData {
    pub fn len(&self) -> usize {
        match self {
            FeatureData::Int(v) => v.len(),
            FeatureData::NullableInt(v) => v.len(),
            FeatureData::Float(v) => v.len(),
            FeatureData::NullableFloat(v) => v.len(),
            FeatureData::Text(v) => v.len(),
            FeatureData::NullableText(v) => v.len(),
            FeatureData::Bool(v) => v.len(),
            FeatureData::NullableBool(v) => v.len(),
            FeatureData::Json(v) => v.len(),
            FeatureData::NullableJson(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> FeatureDataType {
        match self {
            FeatureData::Int(_) | FeatureData::NullableInt(_) => FeatureDataType::Int,
            FeatureData::Float(_) | FeatureData::NullableFloat(_) => FeatureDataType::Float,
            FeatureData::Text(_) | FeatureData::NullableText(_) => FeatureDataType::Text,
            FeatureData::Bool(_) | FeatureData::NullableBool(_) => FeatureDataType::Bool,
            FeatureData::Json(_) | FeatureData::NullableJson(_) => FeatureDataType::Json,
        }
    }

    /// Computes a vector of null flags.
    pub fn nulls(&self) -> Vec<bool> {
        match self {
            FeatureData::NullableInt(v) => v.iter().map(Option::is_none).collect(),
            FeatureData::NullableFloat(v) => v.iter().map(Option::is_none).collect(),
            FeatureData::NullableText(v) => v.iter().map(Option::is_none).collect(),
            FeatureData::NullableBool(v) => v.iter().map(Option::is_none).collect(),
            FeatureData::NullableJson(v) => v.iter().map(Option::is_none).collect(),
            _ => vec![false; self.len()],
        }
    }

    pub fn has_nulls(&self) -> bool {
        self.nulls().into_iter().any(|is_null| is_null)
    }

    /// Get the `FeatureDataValue` value at position `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds
    ///
    pub fn get_unchecked(&self, i: usize) -> FeatureDataValue {
        match self {
            FeatureData::Int(v) => FeatureDataValue::Int(v[i]),
            FeatureData::NullableInt(v) => FeatureDataValue::NullableInt(v[i]),
            FeatureData::Float(v) => FeatureDataValue::Float(v[i]),
            FeatureData::NullableFloat(v) => FeatureDataValue::NullableFloat(v[i]),
            FeatureData::Text(v) => FeatureDataValue::Text(v[i].clone()),
            FeatureData::NullableText(v) => FeatureDataValue::NullableText(v[i].clone()),
            FeatureData::Bool(v) => FeatureDataValue::Bool(v[i]),
            FeatureData::NullableBool(v) => FeatureDataValue::NullableBool(v[i]),
            FeatureData::Json(v) => FeatureDataValue::Json(v[i].clone()),
            FeatureData::NullableJson(v) => FeatureDataValue::NullableJson(v[i].clone()),
        }
    }

    /// Copies the entries selected by `mask` into a new column.
    /// `mask` must be as long as the column.
    pub fn filter(&self, mask: &[bool]) -> FeatureData {
        fn masked<T: Clone>(values: &[T], mask: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(mask)
                .filter(|(_, &keep)| keep)
                .map(|(value, _)| value.clone())
                .collect()
        }

        match self {
            FeatureData::Int(v) => FeatureData::Int(masked(v, mask)),
            FeatureData::NullableInt(v) => FeatureData::NullableInt(masked(v, mask)),
            FeatureData::Float(v) => FeatureData::Float(masked(v, mask)),
            FeatureData::NullableFloat(v) => FeatureData::NullableFloat(masked(v, mask)),
            FeatureData::Text(v) => FeatureData::Text(masked(v, mask)),
            FeatureData::NullableText(v) => FeatureData::NullableText(masked(v, mask)),
            FeatureData::Bool(v) => FeatureData::Bool(masked(v, mask)),
            FeatureData::NullableBool(v) => FeatureData::NullableBool(masked(v, mask)),
            FeatureData::Json(v) => FeatureData::Json(masked(v, mask)),
            FeatureData::NullableJson(v) => FeatureData::NullableJson(masked(v, mask)),
        }
    }

    /// Computes JSON value lists for data elements
    pub fn json_values(&self) -> Vec<Value> {
        (0..self.len())
            .map(|i| self.get_unchecked(i).into())
            .collect()
    }

    /// Builds a column from raw JSON cells, picking the narrowest type that
    /// holds every non-null value. Mixed or nested cells end up as `Json`.
    pub fn from_json_column(cells: Vec<Value>) -> FeatureData {
        let has_nulls = cells.iter().any(Value::is_null);
        let non_null = || cells.iter().filter(|cell| !cell.is_null());

        if non_null().all(Value::is_i64) {
            return if has_nulls {
                FeatureData::NullableInt(cells.iter().map(Value::as_i64).collect())
            } else {
                FeatureData::Int(cells.iter().filter_map(Value::as_i64).collect())
            };
        }

        if non_null().all(Value::is_number) {
            return if has_nulls {
                FeatureData::NullableFloat(cells.iter().map(Value::as_f64).collect())
            } else {
                FeatureData::Float(cells.iter().filter_map(Value::as_f64).collect())
            };
        }

        if non_null().all(Value::is_string) {
            let strings = cells.iter().map(|cell| cell.as_str().map(str::to_string));
            return if has_nulls {
                FeatureData::NullableText(strings.collect())
            } else {
                FeatureData::Text(strings.flatten().collect())
            };
        }

        if non_null().all(Value::is_boolean) {
            return if has_nulls {
                FeatureData::NullableBool(cells.iter().map(Value::as_bool).collect())
            } else {
                FeatureData::Bool(cells.iter().filter_map(Value::as_bool).collect())
            };
        }

        if has_nulls {
            FeatureData::NullableJson(
                cells
                    .into_iter()
                    .map(|cell| if cell.is_null() { None } else { Some(cell) })
                    .collect(),
            )
        } else {
            FeatureData::Json(cells)
        }
    }
}

impl FeatureDataValue {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            FeatureDataValue::NullableInt(None)
                | FeatureDataValue::NullableFloat(None)
                | FeatureDataValue::NullableText(None)
                | FeatureDataValue::NullableBool(None)
                | FeatureDataValue::NullableJson(None)
        )
    }

    /// Numeric view of the cell; ints widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureDataValue::Int(v) => Some(*v as f64),
            FeatureDataValue::NullableInt(v) => v.map(|v| v as f64),
            FeatureDataValue::Float(v) => Some(*v),
            FeatureDataValue::NullableFloat(v) => *v,
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureDataValue::Text(v) => Some(v),
            FeatureDataValue::NullableText(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FeatureDataValue::Json(v) => Some(v),
            FeatureDataValue::NullableJson(v) => v.as_ref(),
            _ => None,
        }
    }
}

impl From<FeatureDataValue> for Value {
    fn from(value: FeatureDataValue) -> Value {
        match value {
            FeatureDataValue::Int(v) => v.into(),
            FeatureDataValue::NullableInt(v) => v.into(),
            FeatureDataValue::Float(v) => v.into(),
            FeatureDataValue::NullableFloat(v) => v.into(),
            FeatureDataValue::Text(v) => v.into(),
            FeatureDataValue::NullableText(v) => v.into(),
            FeatureDataValue::Bool(v) => v.into(),
            FeatureDataValue::NullableBool(v) => v.into(),
            FeatureDataValue::Json(v) => v,
            FeatureDataValue::NullableJson(v) => v.unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn infers_int_column() {
        let data = FeatureData::from_json_column(vec![json!(1), json!(2)]);
        assert_eq!(data, FeatureData::Int(vec![1, 2]));
        assert_eq!(data.data_type(), FeatureDataType::Int);
    }

    #[test]
    fn infers_nullable_float_column() {
        let data = FeatureData::from_json_column(vec![json!(59.3), Value::Null, json!(18)]);

        assert_eq!(
            data,
            FeatureData::NullableFloat(vec![Some(59.3), None, Some(18.0)])
        );
        assert_eq!(data.nulls(), vec![false, true, false]);
    }

    #[test]
    fn infers_text_and_json_columns() {
        let text = FeatureData::from_json_column(vec![json!("a"), json!("b")]);
        assert_eq!(text.data_type(), FeatureDataType::Text);

        let nested = FeatureData::from_json_column(vec![json!({"lat": 59.3}), Value::Null]);
        assert_eq!(nested.data_type(), FeatureDataType::Json);
        assert!(nested.has_nulls());
    }

    #[test]
    fn mixed_column_falls_back_to_json() {
        let data = FeatureData::from_json_column(vec![json!(1), json!("a")]);
        assert_eq!(data.data_type(), FeatureDataType::Json);
    }

    #[test]
    fn filter() {
        let data = FeatureData::NullableFloat(vec![Some(1.0), None, Some(3.0)]);
        let filtered = data.filter(&[true, false, true]);

        assert_eq!(filtered, FeatureData::NullableFloat(vec![Some(1.0), Some(3.0)]));
    }

    #[test]
    fn value_views() {
        assert_eq!(FeatureDataValue::Int(2).as_f64(), Some(2.0));
        assert_eq!(FeatureDataValue::NullableFloat(None).as_f64(), None);
        assert!(FeatureDataValue::NullableText(None).is_null());
        assert_eq!(FeatureDataValue::Text("x".into()).as_str(), Some("x"));
    }
}
