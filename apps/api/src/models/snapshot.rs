use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::record::ResumeRecord;

pub const DEFAULT_FONT_FAMILY: &str = "'Poppins', sans-serif";
pub const DEFAULT_FONT_SIZE: &str = "14px";

/// Presentation settings applied to the whole résumé paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentStyle {
    pub font_family: String,
    pub font_size: String,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        DocumentStyle {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
        }
    }
}

/// Everything written to the key-value store on each mutating action.
///
/// No schema version is stored. Missing fields default to empty, and the
/// browser-era key names (`html`, `quillContent`, `userPhoto`) are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSnapshot {
    pub structured_data: ResumeRecord,
    #[serde(rename = "renderedHTML", alias = "html")]
    pub rendered_html: String,
    pub style: DocumentStyle,
    /// Opaque state of the external rich-text editor.
    #[serde(alias = "quillContent")]
    pub rich_editor_content: Option<Value>,
    #[serde(alias = "userPhoto")]
    pub photo: Option<String>,
}
