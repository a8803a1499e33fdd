//! Page layout for the PDF export.
//!
//! Produces positioned draw operations only; nothing here touches the PDF
//! object model, so pagination can be tested without encoding.

use chrono::NaiveDate;
use tracing::warn;

use crate::bridge::photo::{decode_data_uri, DecodedPhoto};
use crate::export::extract::ExtractedSection;
use crate::models::record::PersonalInfo;

use super::page::PageConfig;
use super::wrap::wrap_text;

// ────────────────────────────────────────────────────────────────────────────
// Draw operations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

const TITLE_COLOR: Rgb = Rgb(0.2, 0.2, 0.4);
const CONTACT_COLOR: Rgb = Rgb(0.3, 0.3, 0.5);
const BODY_COLOR: Rgb = Rgb(0.0, 0.0, 0.0);
const FOOTER_COLOR: Rgb = Rgb(0.5, 0.5, 0.5);
pub const RULE_COLOR: Rgb = Rgb(0.8, 0.8, 0.8);

/// The three standard Type 1 faces the export uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfFont {
    Regular,
    Bold,
    Oblique,
}

impl PdfFont {
    pub const ALL: [PdfFont; 3] = [PdfFont::Regular, PdfFont::Bold, PdfFont::Oblique];

    /// Name under which the font is registered in page resources.
    pub fn resource_name(&self) -> &'static str {
        match self {
            PdfFont::Regular => "F1",
            PdfFont::Bold => "F2",
            PdfFont::Oblique => "F3",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            PdfFont::Regular => "Helvetica",
            PdfFont::Bold => "Helvetica-Bold",
            PdfFont::Oblique => "Helvetica-Oblique",
        }
    }
}

/// One positioned mark on a page. `y` is the PDF baseline (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: PdfFont,
        color: Rgb,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
    /// Square photo with a 1pt border; the image itself is `PdfLayout::photo`.
    Photo { x: f32, y: f32, size: f32 },
}

#[derive(Debug, Clone, Default)]
pub struct LaidOutPage {
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
impl LaidOutPage {
    /// Text of every text op on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PdfLayout {
    pub pages: Vec<LaidOutPage>,
    pub photo: Option<DecodedPhoto>,
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor
// ────────────────────────────────────────────────────────────────────────────

const PHOTO_DROP: f32 = 65.0;
const NAME_GAP: f32 = 30.0;
const CONTACT_LEADING: f32 = 15.0;
const BEFORE_SECTIONS: f32 = 20.0;
const HEADING_GAP: f32 = 20.0;
const RULE_RISE: f32 = 5.0;
const RULE_LENGTH: f32 = 100.0;
const RULE_THICKNESS: f32 = 2.0;
const AFTER_RULE: f32 = 15.0;
const ITEM_INDENT: f32 = 5.0;
const BODY_LEADING: f32 = 12.0;
const AFTER_ITEM: f32 = 5.0;
const AFTER_SECTION: f32 = 15.0;

struct Cursor<'a> {
    config: &'a PageConfig,
    done: Vec<LaidOutPage>,
    page: LaidOutPage,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Cursor {
            config,
            done: Vec::new(),
            page: LaidOutPage::default(),
            y: config.top(),
        }
    }

    /// Starts a new page when the cursor is below `floor`.
    fn break_below(&mut self, floor: f32) {
        if self.y < floor {
            self.done.push(std::mem::take(&mut self.page));
            self.y = self.config.top();
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, font: PdfFont, color: Rgb, text: String) {
        self.page.ops.push(DrawOp::Text {
            x,
            y,
            size,
            font,
            color,
            text,
        });
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        self.done.push(self.page);
        self.done
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Items made only of whitespace or of a dash rule (`---`) print nothing.
pub fn is_blank_item(item: &str) -> bool {
    let trimmed = item.trim();
    trimmed.is_empty() || (trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-'))
}

fn contact_lines(info: &PersonalInfo) -> Vec<String> {
    [
        ("Phone", &info.phone),
        ("Email", &info.email),
        ("Location", &info.location),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| format!("{label}: {value}"))
    .collect()
}

/// Lays out the whole résumé. The footer date is passed in so output is
/// reproducible.
pub fn layout_resume(
    info: &PersonalInfo,
    sections: &[ExtractedSection],
    generated_on: NaiveDate,
    config: &PageConfig,
) -> PdfLayout {
    let mut cursor = Cursor::new(config);
    let margin = config.margin;

    let name = if info.full_name.trim().is_empty() {
        "YOUR NAME"
    } else {
        info.full_name.as_str()
    };
    cursor.text(
        margin,
        cursor.y,
        config.name_size,
        PdfFont::Bold,
        TITLE_COLOR,
        name.to_uppercase(),
    );

    let photo = info.photo().and_then(|uri| match decode_data_uri(uri) {
        Ok(photo) => Some(photo),
        Err(e) => {
            warn!(error = %e, "Skipping unreadable profile photo");
            None
        }
    });
    if photo.is_some() {
        cursor.page.ops.push(DrawOp::Photo {
            x: config.width - margin - config.photo_size,
            y: cursor.y - PHOTO_DROP,
            size: config.photo_size,
        });
    }
    cursor.y -= NAME_GAP;

    for line in contact_lines(info) {
        if cursor.y < config.section_floor {
            break;
        }
        cursor.text(
            margin,
            cursor.y,
            config.contact_size,
            PdfFont::Regular,
            CONTACT_COLOR,
            line,
        );
        cursor.y -= CONTACT_LEADING;
    }
    cursor.y -= BEFORE_SECTIONS;

    for section in sections {
        cursor.break_below(config.section_floor);
        cursor.text(
            margin,
            cursor.y,
            config.heading_size,
            PdfFont::Bold,
            TITLE_COLOR,
            format!("{}:", section.title.to_uppercase()),
        );
        cursor.y -= HEADING_GAP;
        cursor.page.ops.push(DrawOp::Rule {
            x1: margin,
            x2: margin + RULE_LENGTH,
            y: cursor.y + RULE_RISE,
            thickness: RULE_THICKNESS,
            color: RULE_COLOR,
        });
        cursor.y -= AFTER_RULE;

        for item in &section.items {
            // The break check precedes the blank check.
            cursor.break_below(config.line_floor);
            if is_blank_item(item) {
                continue;
            }
            let lines = wrap_text(
                item,
                config.body_size,
                config.content_width(),
                config.char_width_ratio,
            );
            for line in lines {
                cursor.break_below(config.line_floor);
                cursor.text(
                    margin + ITEM_INDENT,
                    cursor.y,
                    config.body_size,
                    PdfFont::Regular,
                    BODY_COLOR,
                    line,
                );
                cursor.y -= BODY_LEADING;
            }
            cursor.y -= AFTER_ITEM;
        }
        cursor.y -= AFTER_SECTION;
    }

    cursor.text(
        margin,
        config.footer_y,
        config.footer_size,
        PdfFont::Oblique,
        FOOTER_COLOR,
        format!(
            "Generated on {} - EleganceCV Pro",
            generated_on.format("%-m/%-d/%Y")
        ),
    );

    PdfLayout {
        pages: cursor.finish(),
        photo,
    }
}
