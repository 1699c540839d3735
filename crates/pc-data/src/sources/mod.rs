pub mod csv_source;

use async_trait::async_trait;
use pc_core::Dataset;

use crate::DataError;

pub use csv_source::{read_dataset, CsvRecordSource};

/// Something that can produce a dataset for the chart
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load every record
    async fn load(&self) -> Result<Dataset, DataError>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}
