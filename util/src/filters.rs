//! Backend-neutral filter parameters.
//!
//! A `FilterParam` names a record field and the values it must (or must not) take.
//! The primary store turns it into a SQL condition; the fallback store evaluates it
//! against the JSON form of each record. A value list with more than one entry means
//! membership (`IN` / `NOT IN`).

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(Vec<String>),
    Int(Vec<i64>),
    Bool(Vec<bool>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterParam {
    pub column: String,
    pub operator: CompareOp,
    pub value: FilterValue,
}

// Implementations for single values
pub trait IntoFilterValue<T> {
    fn into_filter_value(self) -> FilterValue;
}

impl IntoFilterValue<String> for String {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::String(vec![self])
    }
}

impl IntoFilterValue<String> for &str {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::String(vec![self.to_string()])
    }
}

impl IntoFilterValue<i64> for i64 {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Int(vec![self])
    }
}

impl IntoFilterValue<bool> for bool {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Bool(vec![self])
    }
}

// Implementations for vectors
impl IntoFilterValue<String> for Vec<String> {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::String(self)
    }
}

impl IntoFilterValue<i64> for Vec<i64> {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Int(self)
    }
}

impl<const N: usize> IntoFilterValue<i64> for [i64; N] {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Int(self.to_vec())
    }
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        match self {
            FilterValue::String(v) => v.len(),
            FilterValue::Int(v) => v.len(),
            FilterValue::Bool(v) => v.len(),
        }
    }

    /// Whether a JSON scalar is one of the listed values.
    pub fn contains_json(&self, candidate: &serde_json::Value) -> bool {
        match self {
            FilterValue::String(v) => candidate
                .as_str()
                .is_some_and(|s| v.iter().any(|x| x == s)),
            FilterValue::Int(v) => candidate.as_i64().is_some_and(|n| v.contains(&n)),
            FilterValue::Bool(v) => candidate.as_bool().is_some_and(|b| v.contains(&b)),
        }
    }
}

impl FilterParam {
    pub fn eq<T>(column: &str, value: impl IntoFilterValue<T>) -> Self {
        Self {
            column: column.to_string(),
            operator: CompareOp::Eq,
            value: value.into_filter_value(),
        }
    }

    pub fn ne<T>(column: &str, value: impl IntoFilterValue<T>) -> Self {
        Self {
            column: column.to_string(),
            operator: CompareOp::Ne,
            value: value.into_filter_value(),
        }
    }

    /// Evaluates the filter against the JSON form of a record.
    ///
    /// A missing or `null` field never equals anything, so `Ne` matches it.
    pub fn matches_json(&self, record: &serde_json::Value) -> bool {
        let hit = record
            .get(&self.column)
            .is_some_and(|field| self.value.contains_json(field));
        match self.operator {
            CompareOp::Eq => hit,
            CompareOp::Ne => !hit,
        }
    }
}
