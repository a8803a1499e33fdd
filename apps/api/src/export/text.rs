//! Plain-text transcript of the structured record.

use crate::models::record::ResumeRecord;

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Renders the fixed plain-text template. Empty blocks are omitted.
pub fn render_text(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::new();

    out.push_str(&format!("{}\n", or(&info.full_name, "FULL NAME")));
    out.push_str(&format!("{}\n\n", or(&info.job_title, "Professional Title")));

    for (label, value) in [
        ("Phone", &info.phone),
        ("Email", &info.email),
        ("Location", &info.location),
    ] {
        if !value.is_empty() {
            out.push_str(&format!("{label}: {value}\n"));
        }
    }
    out.push('\n');

    if !record.summary.is_empty() {
        out.push_str(&format!("SUMMARY\n{}\n\n", record.summary));
    }

    if !record.experiences.is_empty() {
        out.push_str("WORK EXPERIENCE\n");
        for exp in &record.experiences {
            out.push_str(&format!(
                "{} at {}\n",
                or(&exp.title, "Position"),
                or(&exp.company, "Company")
            ));
            if !exp.start_date.is_empty() || !exp.end_date.is_empty() {
                out.push_str(&format!(
                    "{} - {}\n",
                    or(&exp.start_date, "Start Date"),
                    or(&exp.end_date, "End Date")
                ));
            }
            if !exp.description.is_empty() {
                out.push_str(&exp.description);
                out.push('\n');
            }
            out.push('\n');
        }
    }

    if !record.education.is_empty() {
        out.push_str("EDUCATION\n");
        for edu in &record.education {
            out.push_str(&format!(
                "{} - {}\n",
                or(&edu.degree, "Degree"),
                or(&edu.institution, "Institution")
            ));
            if !edu.graduation_year.is_empty() {
                out.push_str(&format!("Graduated in {}\n", edu.graduation_year));
            }
            if !edu.description.is_empty() {
                out.push_str(&edu.description);
                out.push('\n');
            }
            out.push('\n');
        }
    }

    if !record.skills.is_empty() {
        out.push_str("SKILLS\n");
        for skill in &record.skills {
            out.push_str(&format!("- {skill}\n"));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{EducationEntry, ExperienceEntry};

    #[test]
    fn test_empty_record_uses_placeholders() {
        let text = render_text(&ResumeRecord::default());
        assert_eq!(text, "FULL NAME\nProfessional Title\n\n\n");
        assert!(!text.contains("WORK EXPERIENCE"));
        assert!(!text.contains("SKILLS"));
    }

    #[test]
    fn test_experience_without_dates_has_no_date_line() {
        let mut record = ResumeRecord::default();
        record.experiences.push(ExperienceEntry {
            title: "Engineer".into(),
            company: "Acme".into(),
            ..Default::default()
        });
        let text = render_text(&record);
        assert!(text.contains("WORK EXPERIENCE\nEngineer at Acme\n\n"));
        assert!(!text.contains(" - "));
    }

    #[test]
    fn test_full_template() {
        let mut record = ResumeRecord::default();
        record.personal_info.full_name = "Ada Lovelace".into();
        record.personal_info.email = "ada@example.com".into();
        record.summary = "First programmer.".into();
        record.experiences.push(ExperienceEntry {
            company: "Analytical Engine".into(),
            start_date: "1842".into(),
            description: "Notes on the engine.".into(),
            ..Default::default()
        });
        record.education.push(EducationEntry {
            degree: "Mathematics".into(),
            graduation_year: "1835".into(),
            ..Default::default()
        });
        record.skills = vec!["C++".into(), "Math".into()];

        let expected = "Ada Lovelace\n\
                        Professional Title\n\
                        \n\
                        Email: ada@example.com\n\
                        \n\
                        SUMMARY\n\
                        First programmer.\n\
                        \n\
                        WORK EXPERIENCE\n\
                        Position at Analytical Engine\n\
                        1842 - End Date\n\
                        Notes on the engine.\n\
                        \n\
                        EDUCATION\n\
                        Mathematics - Institution\n\
                        Graduated in 1835\n\
                        \n\
                        SKILLS\n\
                        - C++\n\
                        - Math\n\
                        \n";
        assert_eq!(render_text(&record), expected);
    }
}
