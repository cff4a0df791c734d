use crate::error::{DocexError, Result};

/// A single typed column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
        }
    }
}

impl From<rusqlite::types::ValueRef<'_>> for Value {
    fn from(value: rusqlite::types::ValueRef<'_>) -> Self {
        use rusqlite::types::ValueRef;
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

/// Column name to value mapping for one result row.
///
/// Lookups are case-insensitive. Asking for a column the query did not
/// select, or reading a column as the wrong kind, is an error; a NULL or
/// blank value is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRow {
    columns: Vec<(String, Value)>,
}

impl SourceRow {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self::new(pairs.into_iter().map(|(name, value)| (name.into(), value)).collect())
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
            .ok_or_else(|| DocexError::RowData(format!("column '{}' not in result set", name)))
    }

    /// Text view of a scalar column, trimmed. Numbers are formatted.
    pub fn text(&self, name: &str) -> Result<Option<String>> {
        let text = match self.get(name)? {
            Value::Null => return Ok(None),
            Value::Text(s) => s.trim().to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => r.to_string(),
            Value::Blob(_) => {
                return Err(DocexError::RowData(format!(
                    "column '{}' holds binary data, expected text",
                    name
                )))
            }
        };

        Ok(if text.is_empty() { None } else { Some(text) })
    }

    pub fn integer(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name)? {
            Value::Null => Ok(None),
            Value::Integer(i) => Ok(Some(*i)),
            Value::Text(s) if s.trim().is_empty() => Ok(None),
            Value::Text(s) => s.trim().parse().map(Some).map_err(|_| {
                DocexError::RowData(format!("column '{}' is not an integer: {}", name, s))
            }),
            other => Err(DocexError::RowData(format!(
                "column '{}' is {}, expected integer",
                name,
                other.type_name()
            ))),
        }
    }

    /// Moves a binary column out of the row. Empty blobs count as absent.
    pub fn take_blob(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let slot = self
            .columns
            .iter_mut()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
            .ok_or_else(|| DocexError::RowData(format!("column '{}' not in result set", name)))?;

        match std::mem::replace(slot, Value::Null) {
            Value::Null => Ok(None),
            Value::Blob(bytes) if bytes.is_empty() => Ok(None),
            Value::Blob(bytes) => Ok(Some(bytes)),
            other => {
                let kind = other.type_name();
                *slot = other;
                Err(DocexError::RowData(format!(
                    "column '{}' is {}, expected binary data",
                    name, kind
                )))
            }
        }
    }
}
