//! Declarative registry of section templates, one per `SectionKind`.
//!
//! New sections start from these blocks; the bridge and exporter never embed
//! presentation markup of their own beyond the header placeholders.

use crate::models::document::SectionKind;

/// Starter content for a section kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionTemplate {
    pub kind: SectionKind,
    /// Heading shown in the section header (`h3`).
    pub title: &'static str,
    /// Font Awesome icon class shown next to the title.
    pub icon: &'static str,
    pub markup: &'static str,
}

static TEMPLATES: [SectionTemplate; 8] = [
    SectionTemplate {
        kind: SectionKind::Header,
        title: "HEADER",
        icon: "fa-user",
        markup: concat!(
            "<h1>YOUR NAME</h1>",
            "<h2>Professional Title</h2>",
            r#"<p><i class="fas fa-phone"></i> Phone</p>"#,
            r#"<p><i class="fas fa-envelope"></i> Email</p>"#,
            r#"<p><i class="fas fa-map-marker-alt"></i> Address</p>"#,
        ),
    },
    SectionTemplate {
        kind: SectionKind::Summary,
        title: "SUMMARY",
        icon: "fa-file-alt",
        markup: "<p>A professional summary highlighting your key skills and experiences.</p>",
    },
    SectionTemplate {
        kind: SectionKind::Experience,
        title: "WORK EXPERIENCE",
        icon: "fa-briefcase",
        markup: concat!(
            "<h4>Position</h4>",
            "<p><strong>Company</strong> | Start Date - End Date</p>",
            "<ul>",
            "<li>Description of responsibilities</li>",
            "<li>Key achievements</li>",
            "<li>Technologies used</li>",
            "</ul>",
        ),
    },
    SectionTemplate {
        kind: SectionKind::Education,
        title: "EDUCATION",
        icon: "fa-graduation-cap",
        markup: concat!(
            "<h4>Degree</h4>",
            "<p><strong>Institution</strong> | Graduation Year</p>",
            "<p>Description of program or skills acquired</p>",
        ),
    },
    SectionTemplate {
        kind: SectionKind::Skills,
        title: "SKILLS",
        icon: "fa-code",
        markup: "<ul><li>Skill 1</li><li>Skill 2</li><li>Skill 3</li></ul>",
    },
    SectionTemplate {
        kind: SectionKind::Languages,
        title: "LANGUAGES",
        icon: "fa-language",
        markup: "<ul><li>Language 1 - Level</li><li>Language 2 - Level</li></ul>",
    },
    SectionTemplate {
        kind: SectionKind::Projects,
        title: "PROJECTS",
        icon: "fa-project-diagram",
        markup: concat!(
            "<h4>Project Name</h4>",
            "<p><strong>Date</strong></p>",
            "<p>Project description and technologies used</p>",
            "<p>Project link if available</p>",
        ),
    },
    SectionTemplate {
        kind: SectionKind::Certifications,
        title: "CERTIFICATIONS",
        icon: "fa-certificate",
        markup: "<ul><li>Certification 1 - Date</li><li>Certification 2 - Date</li></ul>",
    },
];

/// Looks up the template for a section kind.
pub fn template_for(kind: SectionKind) -> &'static SectionTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.kind == kind)
        .unwrap_or(&TEMPLATES[0])
}
