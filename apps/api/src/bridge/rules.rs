//! Ordered classification rules for header paragraphs.
//!
//! This is a heuristic, not a grammar: a paragraph is tested against
//! `PARAGRAPH_RULES` in order and the first rule that matches wins, so text
//! that fits several rules is classified by position in the list.

use serde::{Deserialize, Serialize};

/// A `personalInfo` field mirrored by the header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderField {
    FullName,
    JobTitle,
    Phone,
    Email,
    Location,
}

impl HeaderField {
    /// Dotted record path of the field, as used by structured inputs.
    pub fn path(&self) -> &'static str {
        match self {
            HeaderField::FullName => "personalInfo.fullName",
            HeaderField::JobTitle => "personalInfo.jobTitle",
            HeaderField::Phone => "personalInfo.phone",
            HeaderField::Email => "personalInfo.email",
            HeaderField::Location => "personalInfo.location",
        }
    }

    /// Text rendered into the header when the field is empty.
    pub fn placeholder(&self) -> &'static str {
        match self {
            HeaderField::FullName => "YOUR NAME",
            HeaderField::JobTitle => "Professional Title",
            HeaderField::Phone => "Phone",
            HeaderField::Email => "Email",
            HeaderField::Location => "Address",
        }
    }
}

/// One paragraph classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRule {
    /// Contains `@`.
    Email,
    /// Contains `+` or an ASCII digit.
    Phone,
    /// Contains "Address", "Location" or "City".
    Location,
}

/// Evaluation order. Do not reorder without updating the header tests.
pub const PARAGRAPH_RULES: [HeaderRule; 3] =
    [HeaderRule::Email, HeaderRule::Phone, HeaderRule::Location];

const LOCATION_KEYWORDS: [&str; 3] = ["Address", "Location", "City"];

impl HeaderRule {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            HeaderRule::Email => text.contains('@'),
            HeaderRule::Phone => text.chars().any(|c| c == '+' || c.is_ascii_digit()),
            HeaderRule::Location => LOCATION_KEYWORDS.iter().any(|k| text.contains(k)),
        }
    }

    /// Label words removed (first occurrence each) before trimming.
    fn stripped_labels(&self) -> &'static [&'static str] {
        match self {
            HeaderRule::Email => &["Email"],
            HeaderRule::Phone => &["Phone"],
            // "City" selects the rule but usually belongs to the place name.
            HeaderRule::Location => &["Address", "Location"],
        }
    }

    pub fn field(&self) -> HeaderField {
        match self {
            HeaderRule::Email => HeaderField::Email,
            HeaderRule::Phone => HeaderField::Phone,
            HeaderRule::Location => HeaderField::Location,
        }
    }

    /// The field value carried by a matching paragraph.
    pub fn extract(&self, text: &str) -> String {
        let mut value = text.to_string();
        for label in self.stripped_labels() {
            value = value.replacen(label, "", 1);
        }
        value.trim().to_string()
    }
}

/// Classifies a header paragraph. Returns `None` when no rule matches.
pub fn classify_paragraph(text: &str) -> Option<(HeaderField, String)> {
    PARAGRAPH_RULES
        .iter()
        .find(|rule| rule.matches(text))
        .map(|rule| (rule.field(), rule.extract(text)))
}
