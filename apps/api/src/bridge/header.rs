//! Two-way mapping between `personalInfo` and the header block markup.
//!
//! Rendering always produces the template shape (photo, `h1`, `h2`, three
//! contact paragraphs). Syncing reads whatever the editor left behind: the
//! first `h1` and `h2`, then every paragraph run through
//! [`classify_paragraph`], with the last matching paragraph winning.

use std::collections::HashMap;

use crate::bridge::photo::photo_element;
use crate::bridge::rules::{classify_paragraph, HeaderField};
use crate::markup::{escape_text, text_blocks};
use crate::models::record::PersonalInfo;

const CONTACT_LINES: [(HeaderField, &str); 3] = [
    (HeaderField::Phone, "fa-phone"),
    (HeaderField::Email, "fa-envelope"),
    (HeaderField::Location, "fa-map-marker-alt"),
];

/// Renders the header block for `info`. Empty fields show their placeholder.
pub fn render_header_from_record(info: &PersonalInfo) -> String {
    let mut out = String::new();

    if let Some(photo) = info.photo() {
        out.push_str(&photo_element(photo));
    }

    out.push_str(&format!(
        "<h1>{}</h1>",
        escape_text(shown(&info.full_name, HeaderField::FullName))
    ));
    out.push_str(&format!(
        "<h2>{}</h2>",
        escape_text(shown(&info.job_title, HeaderField::JobTitle))
    ));

    for (field, icon) in CONTACT_LINES {
        out.push_str(&format!(
            r#"<p><i class="fas {icon}"></i> {}</p>"#,
            escape_text(shown(field_value(info, field), field))
        ));
    }

    out
}

/// Updates `info` from edited header markup and returns the fields whose
/// value changed, in a stable order.
///
/// Missing headings leave their field untouched. Text equal to a field's
/// placeholder clears that field.
pub fn sync_record_from_header_markup(info: &mut PersonalInfo, markup: &str) -> Vec<HeaderField> {
    let mut found: HashMap<HeaderField, String> = HashMap::new();
    let mut seen_h1 = false;
    let mut seen_h2 = false;

    for block in text_blocks(markup, "h1, h2, p") {
        let text = block.text.trim();
        match block.tag.as_str() {
            "h1" if !seen_h1 => {
                seen_h1 = true;
                found.insert(HeaderField::FullName, unplaceholder(text, HeaderField::FullName));
            }
            "h2" if !seen_h2 => {
                seen_h2 = true;
                found.insert(HeaderField::JobTitle, unplaceholder(text, HeaderField::JobTitle));
            }
            "p" => {
                if let Some((field, value)) = classify_paragraph(text) {
                    found.insert(field, value);
                } else if let Some((field, _)) =
                    CONTACT_LINES.iter().find(|(f, _)| f.placeholder() == text)
                {
                    found.insert(*field, String::new());
                }
            }
            _ => {}
        }
    }

    let mut changed = Vec::new();
    for field in [
        HeaderField::FullName,
        HeaderField::JobTitle,
        HeaderField::Phone,
        HeaderField::Email,
        HeaderField::Location,
    ] {
        let Some(value) = found.remove(&field) else {
            continue;
        };
        let slot = field_slot(info, field);
        if *slot != value {
            *slot = value;
            changed.push(field);
        }
    }
    changed
}

fn shown(value: &str, field: HeaderField) -> &str {
    if value.trim().is_empty() {
        field.placeholder()
    } else {
        value
    }
}

fn unplaceholder(text: &str, field: HeaderField) -> String {
    if text == field.placeholder() {
        String::new()
    } else {
        text.to_string()
    }
}

fn field_value(info: &PersonalInfo, field: HeaderField) -> &str {
    match field {
        HeaderField::FullName => &info.full_name,
        HeaderField::JobTitle => &info.job_title,
        HeaderField::Phone => &info.phone,
        HeaderField::Email => &info.email,
        HeaderField::Location => &info.location,
    }
}

fn field_slot(info: &mut PersonalInfo, field: HeaderField) -> &mut String {
    match field {
        HeaderField::FullName => &mut info.full_name,
        HeaderField::JobTitle => &mut info.job_title,
        HeaderField::Phone => &mut info.phone,
        HeaderField::Email => &mut info.email,
        HeaderField::Location => &mut info.location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::field_path::apply_field_edit;
    use crate::models::record::ResumeRecord;

    fn ada() -> PersonalInfo {
        PersonalInfo {
            full_name: "Ada Lovelace".into(),
            job_title: "Analyst".into(),
            phone: "+44 20 7946 0958".into(),
            email: "ada@example.com".into(),
            location: "City of London".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_fills_values() {
        let html = render_header_from_record(&ada());
        assert!(html.starts_with("<h1>Ada Lovelace</h1><h2>Analyst</h2>"));
        assert!(html.contains(r#"<i class="fas fa-envelope"></i> ada@example.com</p>"#));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_render_escapes_markup() {
        let info = PersonalInfo {
            full_name: "<script>x</script>".into(),
            ..Default::default()
        };
        let html = render_header_from_record(&info);
        assert!(html.contains("<h1>&lt;script&gt;x&lt;/script&gt;</h1>"));
    }

    #[test]
    fn test_render_leads_with_photo() {
        let info = PersonalInfo {
            photo: Some("data:image/png;base64,AAAA".into()),
            ..Default::default()
        };
        let html = render_header_from_record(&info);
        assert!(html.starts_with(r#"<img class="profile-photo""#));
        assert!(html.contains("<h1>YOUR NAME</h1>"));
    }

    #[test]
    fn test_render_then_sync_is_stable() {
        let original = ada();
        let html = render_header_from_record(&original);

        let mut synced = PersonalInfo::default();
        let changed = sync_record_from_header_markup(&mut synced, &html);

        assert_eq!(synced.full_name, original.full_name);
        assert_eq!(synced.job_title, original.job_title);
        assert_eq!(synced.phone, original.phone);
        assert_eq!(synced.email, original.email);
        assert_eq!(synced.location, original.location);
        assert_eq!(changed.len(), 5);

        let mut again = synced.clone();
        assert!(sync_record_from_header_markup(&mut again, &html).is_empty());
    }

    #[test]
    fn test_sync_of_placeholders_keeps_record_empty() {
        let html = render_header_from_record(&PersonalInfo::default());
        let mut info = PersonalInfo::default();
        assert!(sync_record_from_header_markup(&mut info, &html).is_empty());
        assert_eq!(info, PersonalInfo::default());
    }

    #[test]
    fn test_sync_restoring_placeholder_clears_field() {
        let mut info = ada();
        let html = r#"<h1>YOUR NAME</h1><p><i class="fas fa-phone"></i> Phone</p>"#;
        let changed = sync_record_from_header_markup(&mut info, html);
        assert_eq!(changed, vec![HeaderField::FullName, HeaderField::Phone]);
        assert_eq!(info.full_name, "");
        assert_eq!(info.phone, "");
        assert_eq!(info.email, "ada@example.com");
    }

    #[test]
    fn test_sync_last_matching_paragraph_wins() {
        let mut info = PersonalInfo::default();
        let html = "<p>first@example.com</p><p>second@example.com</p>";
        sync_record_from_header_markup(&mut info, html);
        assert_eq!(info.email, "second@example.com");
    }

    #[test]
    fn test_sync_uses_first_heading_only() {
        let mut info = PersonalInfo::default();
        sync_record_from_header_markup(&mut info, "<h1> Grace </h1><h1>Other</h1>");
        assert_eq!(info.full_name, "Grace");
    }

    #[test]
    fn test_sync_missing_headings_leave_fields() {
        let mut info = ada();
        let changed = sync_record_from_header_markup(&mut info, "<p>Paris</p>");
        assert!(changed.is_empty());
        assert_eq!(info, ada());
    }

    #[test]
    fn test_field_edit_shows_up_in_render() {
        let mut record = ResumeRecord::default();
        apply_field_edit(&mut record, "personalInfo.fullName", "Ada Lovelace").unwrap();
        apply_field_edit(&mut record, "personalInfo.email", "ada@example.com").unwrap();

        let html = render_header_from_record(&record.personal_info);
        assert!(html.contains("<h1>Ada Lovelace</h1>"));
        assert!(html.contains("ada@example.com"));
        assert!(html.contains("<h2>Professional Title</h2>"));
    }
}
