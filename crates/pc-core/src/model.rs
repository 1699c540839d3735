//! Records, dimensions and the loaded dataset

use std::fmt;
use std::sync::Arc;
use serde::{Serialize, Deserialize};

/// How a source field is interpreted at load time
///
/// The names follow the data files this chart was built for: "qualitative"
/// fields hold numeric codes, "quantitative" fields hold category labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Numeric code, parsed as a float
    Qualitative,
    /// Category label kept as an opaque token
    Quantitative,
    /// Timestamp, stored as a day offset from load time
    DateTime,
}

impl FieldKind {
    /// The axis family used to plot a field of this kind
    pub fn dimension_kind(self) -> DimensionKind {
        match self {
            FieldKind::Qualitative | FieldKind::DateTime => DimensionKind::NumericLike,
            FieldKind::Quantitative => DimensionKind::Categorical,
        }
    }
}

/// Axis family of a plotted dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionKind {
    /// Continuous values on a linear scale, brushed in domain space
    NumericLike,
    /// Discrete tokens on a point scale, brushed in pixel space
    Categorical,
}

/// Index of a dimension inside its dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DimensionId(pub usize);

impl DimensionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One plotted data field
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub id: DimensionId,
    pub name: Arc<str>,
    pub field: FieldKind,
}

impl Dimension {
    pub fn new(id: DimensionId, name: impl Into<Arc<str>>, field: FieldKind) -> Self {
        Self {
            id,
            name: name.into(),
            field,
        }
    }

    pub fn kind(&self) -> DimensionKind {
        self.field.dimension_kind()
    }
}

/// A single field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Category(Arc<str>),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            Value::Category(c) => Some(c),
            Value::Number(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Category(c) => f.write_str(c),
        }
    }
}

/// One row of the dataset
///
/// `values` is aligned with [`Dataset::dimensions`]; `label` carries the
/// category used for coloring, which need not be a plotted dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub values: Vec<Value>,
    pub label: Option<Arc<str>>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values, label: None }
    }

    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn value(&self, dimension: DimensionId) -> Option<&Value> {
        self.values.get(dimension.index())
    }
}

/// The finalized, immutable record set handed to the chart
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    dimensions: Vec<Dimension>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, assigning ids from the dimension order
    pub fn new(dimensions: Vec<(String, FieldKind)>, records: Vec<Record>) -> Self {
        let dimensions = dimensions
            .into_iter()
            .enumerate()
            .map(|(i, (name, field))| Dimension::new(DimensionId(i), name, field))
            .collect();

        Self { dimensions, records }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, id: DimensionId) -> Option<&Dimension> {
        self.dimensions.get(id.index())
    }

    /// Look up a dimension by name
    pub fn find(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| &*d.name == name)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_maps_to_axis_family() {
        assert_eq!(FieldKind::Qualitative.dimension_kind(), DimensionKind::NumericLike);
        assert_eq!(FieldKind::DateTime.dimension_kind(), DimensionKind::NumericLike);
        assert_eq!(FieldKind::Quantitative.dimension_kind(), DimensionKind::Categorical);
    }

    #[test]
    fn test_field_kind_serde_names() {
        let kind: FieldKind = serde_json::from_str("\"date_time\"").unwrap();
        assert_eq!(kind, FieldKind::DateTime);
        assert_eq!(serde_json::to_string(&FieldKind::Quantitative).unwrap(), "\"quantitative\"");
    }

    #[test]
    fn test_dataset_lookup() {
        let dataset = Dataset::new(
            vec![
                ("Route".to_string(), FieldKind::Quantitative),
                ("Delay".to_string(), FieldKind::Qualitative),
            ],
            vec![Record::new(vec![Value::Category("A".into()), Value::Number(-2.0)])],
        );

        let delay = dataset.find("Delay").unwrap();
        assert_eq!(delay.id, DimensionId(1));
        assert_eq!(delay.kind(), DimensionKind::NumericLike);
        assert_eq!(dataset.records()[0].value(delay.id), Some(&Value::Number(-2.0)));
        assert!(dataset.find("Missing").is_none());
    }
}
