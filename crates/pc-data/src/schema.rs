//! Matching file headers against the configured dimensions

use tracing::debug;

use pc_core::FieldKind;
use crate::config::ChartConfig;

/// A header that will become a dimension
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedColumn {
    /// Position of the column in each row
    pub index: usize,
    pub name: String,
    pub kind: FieldKind,
}

/// Which columns of a file are plotted and which one colors records
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnPlan {
    pub columns: Vec<PlannedColumn>,
    pub color_column: Option<usize>,
    /// Headers that matched nothing in the config
    pub skipped: Vec<String>,
}

impl ColumnPlan {
    /// Classify headers in file order. Duplicate headers keep their first
    /// occurrence.
    pub fn classify<'a>(headers: impl IntoIterator<Item = &'a str>, config: &ChartConfig) -> Self {
        let mut plan = ColumnPlan::default();

        for (index, header) in headers.into_iter().enumerate() {
            let name = header.trim();
            if config.color_by.as_deref() == Some(name) && plan.color_column.is_none() {
                plan.color_column = Some(index);
            }
            match config.field_kind(name) {
                Some(kind) if !plan.columns.iter().any(|c| c.name == name) => {
                    plan.columns.push(PlannedColumn {
                        index,
                        name: name.to_string(),
                        kind,
                    });
                }
                _ => plan.skipped.push(name.to_string()),
            }
        }

        if !plan.skipped.is_empty() {
            debug!(skipped = ?plan.skipped, "columns left out of the chart");
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn config() -> ChartConfig {
        ChartConfig {
            dimensions: IndexMap::from([
                ("Delay".to_string(), FieldKind::Qualitative),
                ("Route".to_string(), FieldKind::Quantitative),
            ]),
            color_by: Some("Kind".to_string()),
            ..ChartConfig::default()
        }
    }

    #[test]
    fn test_classify_keeps_file_order() {
        let plan = ColumnPlan::classify(["id", "Route", "Kind", " Delay "], &config());

        let names: Vec<_> = plan.columns.iter().map(|c| (c.index, c.name.as_str())).collect();
        assert_eq!(names, vec![(1, "Route"), (3, "Delay")]);
        assert_eq!(plan.columns[1].kind, FieldKind::Qualitative);
        assert_eq!(plan.color_column, Some(2));
        assert_eq!(plan.skipped, vec!["id", "Kind"]);
    }

    #[test]
    fn test_nothing_plottable() {
        let plan = ColumnPlan::classify(["a", "b"], &config());
        assert!(plan.is_empty());
        assert_eq!(plan.color_column, None);
    }

    #[test]
    fn test_duplicate_header_uses_first() {
        let plan = ColumnPlan::classify(["Delay", "Delay"], &config());
        assert_eq!(plan.columns.len(), 1);
        assert_eq!(plan.columns[0].index, 0);
    }
}
