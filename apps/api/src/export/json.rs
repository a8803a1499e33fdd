use serde::Serialize;
use serde_json::Value;

use crate::models::record::{EducationEntry, ExperienceEntry, PersonalInfo, ResumeRecord};

use super::ExportError;

/// The portable subset of the record, in a fixed key order.
/// Keys created by free-form path edits at the top level are not exported.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PortableResume<'a> {
    personal_info: &'a PersonalInfo,
    summary: &'a str,
    experiences: &'a [ExperienceEntry],
    education: &'a [EducationEntry],
    skills: &'a [String],
    languages: &'a [Value],
    projects: &'a [Value],
    certifications: &'a [Value],
}

/// Pretty-prints the record with 2-space indentation.
pub fn render_json(record: &ResumeRecord) -> Result<Vec<u8>, ExportError> {
    let portable = PortableResume {
        personal_info: &record.personal_info,
        summary: &record.summary,
        experiences: &record.experiences,
        education: &record.education,
        skills: &record.skills,
        languages: &record.languages,
        projects: &record.projects,
        certifications: &record.certifications,
    };
    Ok(serde_json::to_vec_pretty(&portable)?)
}
