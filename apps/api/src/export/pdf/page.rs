use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Geometry and type sizes for the exported résumé, in PDF points.
///
/// The cursor starts at `height - margin` and moves down. A new page is
/// started when the cursor falls below `section_floor` before a section
/// heading or contact line, or below `line_floor` before an item or line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub section_floor: f32,
    pub line_floor: f32,
    pub name_size: f32,
    pub contact_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub footer_size: f32,
    /// Estimated glyph width as a fraction of the font size.
    pub char_width_ratio: f32,
    pub photo_size: f32,
    pub footer_y: f32,
}

impl Default for PageConfig {
    /// A4 portrait with 50pt margins.
    fn default() -> Self {
        PageConfig {
            width: 595.0,
            height: 842.0,
            margin: 50.0,
            section_floor: 100.0,
            line_floor: 70.0,
            name_size: 22.0,
            contact_size: 11.0,
            heading_size: 14.0,
            body_size: 10.0,
            footer_size: 9.0,
            char_width_ratio: 0.5,
            photo_size: 100.0,
            footer_y: 30.0,
        }
    }
}

impl PageConfig {
    pub fn top(&self) -> f32 {
        self.height - self.margin
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}
