use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical structured résumé data for one editor session.
///
/// Field names serialize in camelCase (`personalInfo.fullName`) because the
/// JSON export and the persisted snapshot share this shape with the browser.
/// `extra` keeps keys created by dotted-path edits that have no typed field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experiences: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub languages: Vec<Value>,
    pub projects: Vec<Value>,
    pub certifications: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub job_title: String,
    pub phone: String,
    pub email: String,
    pub location: String,
    /// Profile photo as a `data:` URI.
    pub photo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PersonalInfo {
    /// The photo data URI, treating an empty string as "no photo".
    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref().filter(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub graduation_year: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
