//! Editor sessions: one structured record, one rendered document and the
//! style settings, owned by the registry and mutated under a per-session lock.

pub mod handlers;
pub mod lifecycle;
pub mod registry;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::bridge::field_path::{self, FieldPathError};
use crate::bridge::header::{render_header_from_record, sync_record_from_header_markup};
use crate::bridge::photo::place_header_photo;
use crate::bridge::rules::HeaderField;
use crate::models::document::{RenderedDocument, Section, SectionKind};
use crate::models::record::ResumeRecord;
use crate::models::snapshot::{DocumentStyle, PersistedSnapshot};

pub use registry::SessionRegistry;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    FieldPath(#[from] FieldPathError),

    #[error("Section {0} not found")]
    SectionNotFound(Uuid),

    #[error("The document has no header section")]
    NoHeader,

    #[error("The document already has a header section")]
    DuplicateHeader,

    #[error("Invalid section order: {0}")]
    InvalidOrder(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Notices
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short passive message for the user, attached to a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Body of every session endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session: ResumeSession,
    pub notices: Vec<Notice>,
    /// Record paths changed by the request, for mirroring into form inputs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updated_fields: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

/// State of one résumé being edited.
///
/// Every fallible operation validates before it writes, so an `Err` leaves
/// the session unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSession {
    pub id: Uuid,
    pub record: ResumeRecord,
    pub document: RenderedDocument,
    pub style: DocumentStyle,
    /// Opaque rich-text editor state, stored and returned untouched.
    pub rich_editor_content: Option<Value>,
}

fn default_document() -> RenderedDocument {
    RenderedDocument {
        sections: vec![Section::from_template(SectionKind::Header)],
    }
}

impl ResumeSession {
    /// An empty record with a document holding only the header.
    pub fn new(id: Uuid) -> Self {
        ResumeSession {
            id,
            record: ResumeRecord::default(),
            document: default_document(),
            style: DocumentStyle::default(),
            rich_editor_content: None,
        }
    }

    /// Rebuilds a session from a persisted snapshot.
    ///
    /// The record adopts the snapshot-level photo when its own is empty. An
    /// empty `renderedHTML` yields a header rendered from the record.
    pub fn from_snapshot(id: Uuid, snapshot: PersistedSnapshot) -> Self {
        let mut record = snapshot.structured_data;
        if record.personal_info.photo().is_none() {
            if let Some(photo) = snapshot.photo.filter(|p| !p.trim().is_empty()) {
                record.personal_info.photo = Some(photo);
            }
        }

        let mut document = RenderedDocument::from_html(&snapshot.rendered_html);
        if document.sections.is_empty() {
            let mut header = Section::from_template(SectionKind::Header);
            header.markup = render_header_from_record(&record.personal_info);
            document.sections.push(header);
        }

        ResumeSession {
            id,
            record,
            document,
            style: snapshot.style,
            rich_editor_content: snapshot.rich_editor_content,
        }
    }

    pub fn to_snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            structured_data: self.record.clone(),
            rendered_html: self.document.to_html(),
            style: self.style.clone(),
            rich_editor_content: self.rich_editor_content.clone(),
            photo: self.record.personal_info.photo().map(str::to_string),
        }
    }

    /// Writes one structured field, then re-renders the header.
    pub fn apply_field_edit(&mut self, path: &str, value: &str) -> Result<(), SessionError> {
        field_path::apply_field_edit(&mut self.record, path, value)?;
        self.render_header();
        Ok(())
    }

    /// Replaces the header markup with a rendering of `personalInfo`.
    /// A document without a header is left alone.
    pub fn render_header(&mut self) {
        let markup = render_header_from_record(&self.record.personal_info);
        if let Some(header) = self.document.header_mut() {
            header.markup = markup;
        }
    }

    /// Stores edited header markup and pulls its values into the record.
    pub fn sync_header(&mut self, markup: &str) -> Result<Vec<HeaderField>, SessionError> {
        let header = self.document.header_mut().ok_or(SessionError::NoHeader)?;
        header.markup = markup.to_string();
        Ok(sync_record_from_header_markup(
            &mut self.record.personal_info,
            markup,
        ))
    }

    /// Sets or clears the photo in both the record and the header markup.
    pub fn set_photo(&mut self, photo: Option<String>) {
        if let Some(header) = self.document.header_mut() {
            header.markup = place_header_photo(&header.markup, photo.as_deref());
        }
        self.record.personal_info.photo = photo;
    }

    pub fn set_style(&mut self, font_family: Option<String>, font_size: Option<String>) {
        if let Some(family) = font_family {
            self.style.font_family = family;
        }
        if let Some(size) = font_size {
            self.style.font_size = size;
        }
    }

    /// Adds a section from its template. A header is rendered from the record
    /// and placed first; other kinds are appended.
    pub fn add_section(&mut self, kind: SectionKind) -> Result<&Section, SessionError> {
        if kind == SectionKind::Header {
            if self.document.header().is_some() {
                return Err(SessionError::DuplicateHeader);
            }
            let mut header = Section::from_template(kind);
            header.markup = render_header_from_record(&self.record.personal_info);
            self.document.sections.insert(0, header);
            return Ok(&self.document.sections[0]);
        }

        self.document.sections.push(Section::from_template(kind));
        let last = self.document.sections.len() - 1;
        Ok(&self.document.sections[last])
    }

    /// Replaces a section's markup. Header edits go through the sync and
    /// return the fields it changed.
    pub fn update_section(
        &mut self,
        section_id: Uuid,
        markup: &str,
    ) -> Result<Vec<HeaderField>, SessionError> {
        let section = self
            .document
            .section_mut(section_id)
            .ok_or(SessionError::SectionNotFound(section_id))?;
        if section.kind == SectionKind::Header {
            return self.sync_header(markup);
        }
        section.markup = markup.to_string();
        Ok(Vec::new())
    }

    pub fn remove_section(&mut self, section_id: Uuid) -> Result<Section, SessionError> {
        let index = self
            .document
            .sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or(SessionError::SectionNotFound(section_id))?;
        Ok(self.document.sections.remove(index))
    }

    /// Applies a finished drag: `order` must list every section id exactly once.
    pub fn reorder_sections(&mut self, order: &[Uuid]) -> Result<(), SessionError> {
        let current = &self.document.sections;
        if order.len() != current.len() {
            return Err(SessionError::InvalidOrder(format!(
                "expected {} section ids, got {}",
                current.len(),
                order.len()
            )));
        }

        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            if reordered.iter().any(|s: &Section| s.id == *id) {
                return Err(SessionError::InvalidOrder(format!("section {id} listed twice")));
            }
            let section = current
                .iter()
                .find(|s| s.id == *id)
                .ok_or_else(|| SessionError::InvalidOrder(format!("unknown section {id}")))?;
            reordered.push(section.clone());
        }

        self.document.sections = reordered;
        Ok(())
    }

    /// Back to an empty record, the default style and a header-only document.
    pub fn reset(&mut self) {
        *self = ResumeSession::new(self.id);
    }
}
