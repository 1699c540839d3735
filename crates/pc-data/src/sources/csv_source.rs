use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use tracing::{info, warn};

use pc_core::{Dataset, Record};
use crate::config::ChartConfig;
use crate::normalize::Normalizer;
use crate::schema::ColumnPlan;
use crate::sources::RecordSource;
use crate::DataError;

/// CSV file loaded whole into memory
pub struct CsvRecordSource {
    /// Path to the CSV file
    path: PathBuf,
    config: ChartConfig,
    name: String,
}

impl CsvRecordSource {
    pub fn new(path: PathBuf, config: ChartConfig) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, config, name }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl RecordSource for CsvRecordSource {
    async fn load(&self) -> Result<Dataset, DataError> {
        let path = self.path.clone();
        let config = self.config.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let file = File::open(&path)?;
            let dataset = read_dataset(BufReader::new(file), &config, now)?;
            info!(
                path = %path.display(),
                records = dataset.len(),
                dimensions = dataset.dimensions().len(),
                "loaded CSV"
            );
            Ok::<_, DataError>(dataset)
        })
        .await?
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Read a CSV stream into a dataset, normalizing against `now`
pub fn read_dataset<R: Read>(reader: R, config: &ChartConfig, now: DateTime<Utc>) -> Result<Dataset, DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let plan = ColumnPlan::classify(headers.iter(), config);
    if plan.is_empty() {
        return Err(DataError::NoDimensions(format!(
            "{} header(s), none configured",
            headers.len()
        )));
    }

    let normalizer = Normalizer::new(config.embedded_keys.clone(), now);
    let mut degraded = vec![0usize; plan.columns.len()];
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let values = plan
            .columns
            .iter()
            .zip(degraded.iter_mut())
            .map(|(column, count)| {
                let cell = normalizer.normalize(&column.name, column.kind, row.get(column.index).unwrap_or(""));
                if cell.degraded {
                    *count += 1;
                }
                cell.value
            })
            .collect();

        let mut record = Record::new(values);
        if let Some(label) = plan.color_column.and_then(|i| row.get(i)) {
            record = record.with_label(label.trim());
        }
        records.push(record);
    }

    for (column, count) in plan.columns.iter().zip(&degraded) {
        if *count > 0 {
            warn!(column = %column.name, count, "unreadable values replaced with 0");
        }
    }

    let dimensions = plan.columns.into_iter().map(|c| (c.name, c.kind)).collect();
    Ok(Dataset::new(dimensions, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use chrono::TimeZone;
    use indexmap::IndexMap;
    use pc_core::{DimensionId, FieldKind, Value};

    const SAMPLE: &str = "\
id,Route,Delay,perf,when,Kind
1,A,-2,\"{\"\"isDelayed\"\":true}\",2024-03-08T12:00:00Z,Load
2,B,0,\"{\"\"isDelayed\"\":false}\",bogus,Roll
3,C,5kg,\"{\"\"isDelayed\"\":false}\",2024-03-12,
";

    fn config() -> ChartConfig {
        ChartConfig {
            dimensions: IndexMap::from([
                ("Route".to_string(), FieldKind::Quantitative),
                ("Delay".to_string(), FieldKind::Qualitative),
                ("perf".to_string(), FieldKind::Quantitative),
                ("when".to_string(), FieldKind::DateTime),
            ]),
            embedded_keys: [("perf".to_string(), "isDelayed".to_string())].into(),
            color_by: Some("Kind".to_string()),
            ..ChartConfig::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_read_dataset() {
        let dataset = read_dataset(SAMPLE.as_bytes(), &config(), now()).unwrap();

        let names: Vec<_> = dataset.dimensions().iter().map(|d| d.name.to_string()).collect();
        assert_eq!(names, vec!["Route", "Delay", "perf", "when"]);
        assert_eq!(dataset.len(), 3);

        let delay = DimensionId(1);
        let values: Vec<_> = dataset.records().iter().map(|r| r.value(delay).cloned()).collect();
        assert_eq!(
            values,
            vec![Some(Value::Number(-2.0)), Some(Value::Number(0.0)), Some(Value::Number(5.0))]
        );

        let perf = dataset.records()[0].value(DimensionId(2)).cloned();
        assert_eq!(perf, Some(Value::Category("true".into())));

        let when: Vec<_> = dataset.records().iter().map(|r| r.value(DimensionId(3)).cloned()).collect();
        assert_eq!(
            when,
            vec![Some(Value::Number(-2.0)), Some(Value::Number(0.0)), Some(Value::Number(1.0))]
        );

        assert_eq!(dataset.records()[0].label.as_deref(), Some("Load"));
        assert_eq!(dataset.records()[2].label.as_deref(), Some(""));
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let text = "Route,Delay\nA\n";
        let dataset = read_dataset(text.as_bytes(), &config(), now()).unwrap();
        assert_eq!(dataset.records()[0].value(DimensionId(1)), Some(&Value::Number(0.0)));
    }

    #[test]
    fn test_no_plottable_columns() {
        let err = read_dataset("x,y\n1,2\n".as_bytes(), &config(), now()).unwrap_err();
        assert!(matches!(err, DataError::NoDimensions(_)));
    }

    #[tokio::test]
    async fn test_csv_source_loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let source = CsvRecordSource::new(file.path().to_path_buf(), config());
        let dataset = source.load().await.unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.dimensions().len(), 4);
        assert!(!source.source_name().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvRecordSource::new(dir.path().join("nope.csv"), config());
        assert!(matches!(source.load().await, Err(DataError::Io(_))));
    }
}
