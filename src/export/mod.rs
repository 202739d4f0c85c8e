//! Downloadable renditions of the weekly report

pub mod csv;
pub mod pdf;

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// Output format requested by `?format=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "lifemon-laporan.csv",
            ExportFormat::Pdf => "lifemon-laporan.pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Pdf => write!(f, "pdf"),
        }
    }
}
