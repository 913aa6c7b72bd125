// 📤 Export - registration log as CSV or JSON

use crate::record::RegistrationRecord;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unknown export format {0:?} (expected csv or json)")]
    UnknownFormat(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Write records to `writer`; columns and keys follow the log's field names
pub fn export<W: Write>(
    records: &[RegistrationRecord],
    format: ExportFormat,
    writer: W,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(records, writer),
        ExportFormat::Json => write_json(records, writer),
    }
}

fn write_csv<W: Write>(records: &[RegistrationRecord], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json<W: Write>(records: &[RegistrationRecord], mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    Ok(())
}
