//! Chart configuration file

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use indexmap::IndexMap;
use serde::{Serialize, Deserialize};
use tracing::info;

use pc_core::{ChartSettings, ColorTable, FieldKind};
use crate::DataError;

/// Columns plotted by default, with how each is read
const DEFAULT_DIMENSIONS: &[(&str, FieldKind)] = &[
    ("currentVariableCost", FieldKind::Qualitative),
    ("suggestionVariableCost", FieldKind::Qualitative),
    ("gcssVariableCost", FieldKind::Qualitative),
    ("numberOfFfes", FieldKind::Qualitative),
    ("currentNrOfTranshipments", FieldKind::Qualitative),
    ("sentToGcss", FieldKind::Quantitative),
    ("sentToTpm", FieldKind::Quantitative),
    ("scenarioSourceName", FieldKind::Quantitative),
    ("issueTypeName", FieldKind::Quantitative),
    ("locOrReg", FieldKind::Quantitative),
    ("gcssHasCapacityForShipment", FieldKind::Quantitative),
    ("suggestionShownInRerouter", FieldKind::Quantitative),
    ("suggestionUsedInRerouter", FieldKind::Quantitative),
    ("suggestionMatchGcssUpdate", FieldKind::Quantitative),
    ("deliveryPromise", FieldKind::Quantitative),
    ("loadPromise", FieldKind::Quantitative),
    ("gcssServiceDeliveryPerformance", FieldKind::Quantitative),
    ("lastModificationDateTime", FieldKind::DateTime),
];

/// Everything needed to turn a CSV file into a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Column name to field kind; columns not listed are not plotted
    pub dimensions: IndexMap<String, FieldKind>,

    /// Columns holding a JSON object, mapped to the key to pull out of it
    pub embedded_keys: HashMap<String, String>,

    /// Column whose value picks each record's color
    pub color_by: Option<String>,

    pub colors: ColorTable,

    pub chart: ChartSettings,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS
                .iter()
                .map(|(name, kind)| (name.to_string(), *kind))
                .collect(),
            embedded_keys: HashMap::from([(
                "gcssServiceDeliveryPerformance".to_string(),
                "isDelayed".to_string(),
            )]),
            color_by: Some("issueTypeName".to_string()),
            colors: ColorTable::default(),
            chart: ChartSettings::default(),
        }
    }
}

impl ChartConfig {
    /// Read a config from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), dimensions = config.dimensions.len(), "loaded chart config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, DataError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the chart cannot work with
    pub fn validate(&self) -> Result<(), DataError> {
        let render = &self.chart.render;
        if render.min_batch == 0 || render.min_batch > render.max_batch {
            return Err(DataError::Config(format!(
                "batch bounds must satisfy 0 < min_batch <= max_batch, got {}..{}",
                render.min_batch, render.max_batch
            )));
        }
        if !(render.target_batch_ms > 0.0) {
            return Err(DataError::Config(format!(
                "target_batch_ms must be positive, got {}",
                render.target_batch_ms
            )));
        }
        if self.chart.edge_margin < 0.0 {
            return Err(DataError::Config("edge_margin must not be negative".to_string()));
        }
        Ok(())
    }

    /// Field kind of a column, `None` for columns that are not plotted
    pub fn field_kind(&self, column: &str) -> Option<FieldKind> {
        self.dimensions.get(column).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_whitelist() {
        let config = ChartConfig::default();
        assert_eq!(config.dimensions.len(), 18);
        assert_eq!(config.field_kind("numberOfFfes"), Some(FieldKind::Qualitative));
        assert_eq!(config.field_kind("issueTypeName"), Some(FieldKind::Quantitative));
        assert_eq!(config.field_kind("lastModificationDateTime"), Some(FieldKind::DateTime));
        assert_eq!(config.field_kind("shipmentId"), None);
        assert_eq!(config.embedded_keys["gcssServiceDeliveryPerformance"], "isDelayed");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ChartConfig::from_json(
            r#"{
                "dimensions": { "Route": "quantitative", "Delay": "qualitative" },
                "chart": { "edge_margin": 20.0 }
            }"#,
        )
        .unwrap();

        let names: Vec<_> = config.dimensions.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Route", "Delay"]);
        assert_eq!(config.chart.edge_margin, 20.0);
        assert_eq!(config.chart.overshoot, 15.0);
        assert_eq!(config.chart.render.max_batch, 300);
        assert_eq!(config.color_by.as_deref(), Some("issueTypeName"));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = ChartConfig::default();
        let text = config.to_json().unwrap();
        assert_eq!(ChartConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_batch_bounds() {
        let err = ChartConfig::from_json(r#"{ "chart": { "render": { "min_batch": 400 } } }"#).unwrap_err();
        assert!(matches!(err, DataError::Config(_)));

        let err = ChartConfig::from_json(r#"{ "dimensions": 7 }"#).unwrap_err();
        assert!(matches!(err, DataError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        fs::write(&path, r#"{ "color_by": null }"#).unwrap();

        let config = ChartConfig::load(&path).unwrap();
        assert_eq!(config.color_by, None);
        assert!(ChartConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
