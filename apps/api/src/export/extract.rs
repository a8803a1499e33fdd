use serde::Serialize;

use crate::markup::text_blocks;
use crate::models::document::{RenderedDocument, SectionKind};

/// Elements whose text becomes an exported item.
const ITEM_SELECTOR: &str = "h1, h2, h4, p, li";

const DEFAULT_SECTION_TITLE: &str = "Section";

/// Plain text pulled from one section of the rendered document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedSection {
    pub title: String,
    pub items: Vec<String>,
}

/// Extracts every non-header section, in document order.
///
/// Item text is trimmed; empty items and text that still starts with `<`
/// (unescaped markup) are skipped. Sections with no items are dropped.
pub fn extract_sections(document: &RenderedDocument) -> Vec<ExtractedSection> {
    document
        .sections
        .iter()
        .filter(|section| section.kind != SectionKind::Header)
        .filter_map(|section| {
            let items: Vec<String> = text_blocks(&section.markup, ITEM_SELECTOR)
                .into_iter()
                .map(|block| block.text.trim().to_string())
                .filter(|text| !text.is_empty() && !text.starts_with('<'))
                .collect();
            if items.is_empty() {
                return None;
            }

            let title = section.title.trim();
            Some(ExtractedSection {
                title: if title.is_empty() {
                    DEFAULT_SECTION_TITLE.to_string()
                } else {
                    title.to_string()
                },
                items,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::Section;
    use uuid::Uuid;

    fn section(kind: SectionKind, title: &str, markup: &str) -> Section {
        Section {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            markup: markup.to_string(),
        }
    }

    #[test]
    fn test_skips_header_and_empty_sections() {
        let document = RenderedDocument {
            sections: vec![
                Section::from_template(SectionKind::Header),
                section(SectionKind::Summary, "SUMMARY", "<p>Curious mathematician.</p>"),
                section(SectionKind::Skills, "SKILLS", "<ul><li>  </li></ul>"),
            ],
        };
        let extracted = extract_sections(&document);
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].title, "SUMMARY");
        assert_eq!(extracted[0].items, vec!["Curious mathematician."]);
    }

    #[test]
    fn test_items_follow_document_order() {
        let document = RenderedDocument {
            sections: vec![Section::from_template(SectionKind::Experience)],
        };
        let extracted = extract_sections(&document);
        assert_eq!(
            extracted[0].items,
            vec![
                "Position",
                "Company | Start Date - End Date",
                "Description of responsibilities",
                "Key achievements",
                "Technologies used",
            ]
        );
    }

    #[test]
    fn test_blank_title_defaults() {
        let document = RenderedDocument {
            sections: vec![section(SectionKind::Projects, "  ", "<h4>Engine</h4>")],
        };
        assert_eq!(extract_sections(&document)[0].title, "Section");
    }

    #[test]
    fn test_text_starting_with_angle_bracket_is_skipped() {
        let document = RenderedDocument {
            sections: vec![section(
                SectionKind::Summary,
                "SUMMARY",
                "<p>&lt;b&gt;leaked&lt;/b&gt;</p><p>kept</p><h3>not an item</h3>",
            )],
        };
        assert_eq!(extract_sections(&document)[0].items, vec!["kept"]);
    }
}
