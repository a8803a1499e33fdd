use serde::{Deserialize, Serialize};
use scraper::{Html, Selector};
use tracing::warn;
use uuid::Uuid;

use crate::markup::escape_text;
use crate::templates::template_for;

/// The kind of a résumé section. The header is the only kind the bridge syncs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Projects,
    Certifications,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::Header,
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Languages,
        SectionKind::Projects,
        SectionKind::Certifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Languages => "languages",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
        }
    }

    pub fn parse(raw: &str) -> Option<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw.trim())
    }
}

/// One reorderable block of the rendered document.
///
/// `markup` is the rich-text body owned by the external editor; `title` is the
/// section heading shown above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub kind: SectionKind,
    pub title: String,
    pub markup: String,
}

impl Section {
    /// Builds a section from the registry template for `kind`.
    pub fn from_template(kind: SectionKind) -> Self {
        let template = template_for(kind);
        Section {
            id: Uuid::new_v4(),
            kind,
            title: template.title.to_string(),
            markup: template.markup.to_string(),
        }
    }
}

/// The visual, section-based document the user edits directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub sections: Vec<Section>,
}

impl RenderedDocument {
    pub fn header(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == SectionKind::Header)
    }

    pub fn header_mut(&mut self) -> Option<&mut Section> {
        self.sections
            .iter_mut()
            .find(|s| s.kind == SectionKind::Header)
    }

    pub fn section_mut(&mut self, id: Uuid) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Serializes the document to "resume paper" markup, the `renderedHTML`
    /// field of a persisted snapshot.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for section in &self.sections {
            let icon = template_for(section.kind).icon;
            html.push_str(&format!(
                r#"<div class="resume-section" data-type="{kind}" data-id="{id}"><div class="section-header"><i class="fas {icon}"></i><h3>{title}</h3></div><div class="section-content"><div class="rich-editor">{markup}</div></div></div>"#,
                kind = section.kind.as_str(),
                id = section.id,
                title = escape_text(&section.title),
                markup = section.markup,
            ));
        }
        html
    }

    /// Parses "resume paper" markup back into sections.
    ///
    /// Sections with an unknown `data-type` are skipped. A missing or malformed
    /// `data-id` gets a fresh id.
    pub fn from_html(html: &str) -> RenderedDocument {
        let (Ok(section_sel), Ok(title_sel), Ok(editor_sel), Ok(content_sel)) = (
            Selector::parse("div.resume-section"),
            Selector::parse(".section-header h3"),
            Selector::parse(".rich-editor"),
            Selector::parse(".section-content"),
        ) else {
            return RenderedDocument::default();
        };

        let fragment = Html::parse_fragment(html);
        let mut sections = Vec::new();

        for element in fragment.select(&section_sel) {
            let raw_kind = element.value().attr("data-type").unwrap_or_default();
            let Some(kind) = SectionKind::parse(raw_kind) else {
                warn!(data_type = raw_kind, "Skipping section with unknown kind");
                continue;
            };

            let id = element
                .value()
                .attr("data-id")
                .and_then(|raw| Uuid::parse_str(raw).ok())
                .unwrap_or_else(Uuid::new_v4);

            let title = element
                .select(&title_sel)
                .next()
                .map(|h| h.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            let markup = element
                .select(&editor_sel)
                .next()
                .or_else(|| element.select(&content_sel).next())
                .map(|body| body.inner_html().trim().to_string())
                .unwrap_or_default();

            sections.push(Section {
                id,
                kind,
                title,
                markup,
            });
        }

        RenderedDocument { sections }
    }
}
