//! Export Engine
//!
//! Turns the currently loaded page of employees into a downloadable file.
//! Export never fetches: what is on screen is what gets written.
//!
//! - [`xlsx`]: one-sheet workbook
//! - [`pdf`]: landscape A4 table with title block and totals footer
//! - [`csv`]: semicolon-delimited, quoted, CRLF

pub mod csv;
pub mod pdf;
pub mod xlsx;

use chrono::NaiveDateTime;
use shared::error::ErrorCode;
use shared::models::Employee;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "Listado de empleados";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No hay empleados para exportar.")]
    Empty,

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid workbook: {0}")]
    InvalidWorkbook(String),
}

impl ExportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ExportError::Empty => ErrorCode::ExportEmpty,
            _ => ErrorCode::ExportFailed,
        }
    }

    /// Text for the notification channel
    pub fn user_message(&self) -> String {
        self.code().message().to_string()
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Xlsx,
    Pdf,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn default_file_name(&self) -> String {
        format!("empleados.{}", self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub title: String,
    /// Optional line under the title (pdf only)
    pub filter_summary: Option<String>,
    /// Defaults to `empleados.<ext>`
    pub file_name: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            filter_summary: None,
            file_name: None,
        }
    }
}

impl ExportOptions {
    pub fn with_filter_summary(mut self, summary: Option<String>) -> Self {
        self.filter_summary = summary;
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Render `rows`; an empty slice fails before anything is produced
pub fn export(
    rows: &[Employee],
    format: ExportFormat,
    options: &ExportOptions,
    now: NaiveDateTime,
) -> ExportResult<ExportArtifact> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let bytes = match format {
        ExportFormat::Xlsx => xlsx::write(rows)?,
        ExportFormat::Pdf => pdf::render(rows, options, now),
        ExportFormat::Csv => csv::write(rows),
    };
    let file_name = options
        .file_name
        .clone()
        .unwrap_or_else(|| format.default_file_name());

    tracing::info!(?format, rows = rows.len(), size = bytes.len(), %file_name, "Export rendered");
    Ok(ExportArtifact {
        file_name,
        mime: format.mime(),
        bytes,
    })
}

/// Write the artifact into `dir`, creating it if needed
pub fn save(artifact: &ExportArtifact, dir: &Path) -> ExportResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)?;
    tracing::info!(path = %path.display(), "Export saved");
    Ok(path)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use shared::models::Employee;

    pub fn employee(id: i64, nombres: &str, paterno: &str, activo: bool) -> Employee {
        Employee {
            id,
            num_empleado: format!("{:04}", id),
            nombres: nombres.into(),
            apellido_paterno: paterno.into(),
            apellido_materno: None,
            telefono: Some("5512345678".into()),
            email: Some(format!("{}@gv.mx", nombres.to_lowercase())),
            fecha_ingreso: NaiveDate::from_ymd_opt(2021, 3, 15).unwrap(),
            activo,
            foto_url: None,
            hr: Default::default(),
        }
    }

    pub fn roster(n: i64) -> Vec<Employee> {
        (1..=n)
            .map(|i| employee(i, "Ana", "García", i % 3 != 0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 31)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_rows_abort() {
        for format in [ExportFormat::Xlsx, ExportFormat::Pdf, ExportFormat::Csv] {
            let err = export(&[], format, &ExportOptions::default(), now()).unwrap_err();
            assert!(matches!(err, ExportError::Empty));
            assert_eq!(err.user_message(), "No hay empleados para exportar.");
        }
    }

    #[test]
    fn test_artifact_naming() {
        let rows = fixtures::roster(2);
        let pdf = export(&rows, ExportFormat::Pdf, &ExportOptions::default(), now()).unwrap();
        assert_eq!(pdf.file_name, "empleados.pdf");
        assert_eq!(pdf.mime, "application/pdf");

        let opts = ExportOptions::default().with_file_name("activos.csv");
        let csv = export(&rows, ExportFormat::Csv, &opts, now()).unwrap();
        assert_eq!(csv.file_name, "activos.csv");
    }

    #[test]
    fn test_save_creates_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let rows = fixtures::roster(1);
        let artifact = export(&rows, ExportFormat::Csv, &ExportOptions::default(), now()).unwrap();
        let path = save(&artifact, &dir.path().join("salidas")).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), artifact.bytes);
    }
}
