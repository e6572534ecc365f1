//! Report export port.

use crate::domain::{Device, Reading};

/// A rendered report ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct Report {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub trait ReportGenerator: Send + Sync {
    /// Render readings of `device`, in the order given.
    fn readings_report(&self, device: &Device, readings: &[Reading]) -> Result<Report, ReportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report rendering failed: {0}")]
    Render(String),
}
