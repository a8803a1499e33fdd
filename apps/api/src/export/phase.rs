use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ExportError;

/// Output formats offered by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Json,
    Text,
}

impl ExportFormat {
    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "my-resume.pdf",
            ExportFormat::Json => "resume-data.json",
            ExportFormat::Text => "resume.txt",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json => "application/json",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Text => "text",
        }
    }
}

/// Stage of a single export invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPhase {
    Idle,
    Extracting,
    LayingOut,
    Encoding,
    Done,
    Failed,
}

impl ExportPhase {
    fn rank(&self) -> u8 {
        match self {
            ExportPhase::Idle => 0,
            ExportPhase::Extracting => 1,
            ExportPhase::LayingOut => 2,
            ExportPhase::Encoding => 3,
            ExportPhase::Done | ExportPhase::Failed => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExportPhase::Done | ExportPhase::Failed)
    }
}

/// Tracks one export from `Idle` to `Done` or `Failed`.
///
/// Phases only move forward. JSON and text exports skip `LayingOut`.
#[derive(Debug)]
pub struct ExportRun {
    session_id: Uuid,
    format: ExportFormat,
    phase: ExportPhase,
    started: Instant,
}

impl ExportRun {
    pub fn new(session_id: Uuid, format: ExportFormat) -> Self {
        ExportRun {
            session_id,
            format,
            phase: ExportPhase::Idle,
            started: Instant::now(),
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Moves to `next`. Terminal phases and backwards moves are refused.
    pub fn advance(&mut self, next: ExportPhase) -> Result<(), ExportError> {
        if self.phase.is_terminal() || next.rank() <= self.phase.rank() {
            return Err(ExportError::Phase {
                from: self.phase,
                to: next,
            });
        }

        debug!(
            session_id = %self.session_id,
            format = self.format.as_str(),
            from = ?self.phase,
            to = ?next,
            "Export phase transition"
        );
        self.phase = next;

        if next == ExportPhase::Done {
            info!(
                session_id = %self.session_id,
                format = self.format.as_str(),
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "Export finished"
            );
        }
        Ok(())
    }

    /// Marks the run failed. A run that already finished is left as is.
    pub fn fail(&mut self, err: &ExportError) {
        if self.phase.is_terminal() {
            return;
        }
        warn!(
            session_id = %self.session_id,
            format = self.format.as_str(),
            phase = ?self.phase,
            error = %err,
            "Export failed"
        );
        self.phase = ExportPhase::Failed;
    }
}
