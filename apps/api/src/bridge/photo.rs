//! Profile photo intake and placement.
//!
//! Photos are held as `data:` URIs on `personalInfo.photo` and mirrored into
//! the header block as a leading `img.profile-photo`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::markup::{escape_text, has_class, retain_top_level};

/// Largest accepted upload, 5 MiB.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Please select a valid image")]
    NotAnImage(String),

    #[error("Image must not exceed 5MB")]
    TooLarge { size: usize },

    #[error("No image provided")]
    Empty,

    #[error("Photo is not a base64 data URI")]
    MalformedDataUri,

    #[error("Photo data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Validates an upload and encodes it as a data URI.
///
/// The media type is checked before the size.
pub fn accept_photo(content_type: &str, bytes: &[u8]) -> Result<String, PhotoError> {
    let mime = content_type.trim().to_ascii_lowercase();
    if !mime.starts_with("image/") {
        return Err(PhotoError::NotAnImage(content_type.to_string()));
    }
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge { size: bytes.len() });
    }
    if bytes.is_empty() {
        return Err(PhotoError::Empty);
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// The `img` element placed at the top of the header block.
pub fn photo_element(data_uri: &str) -> String {
    format!(
        r#"<img class="profile-photo" src="{}" alt="Profile photo">"#,
        escape_text(data_uri)
    )
}

/// Replaces any existing header photo with `photo`, or removes it on `None`.
/// The rest of the header markup is kept as edited.
pub fn place_header_photo(markup: &str, photo: Option<&str>) -> String {
    let rest = retain_top_level(markup, |el| {
        el.value().name() == "img" && has_class(el, "profile-photo")
    });
    match photo {
        Some(uri) => format!("{}{rest}", photo_element(uri)),
        None => rest,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Jpeg,
    Png,
}

#[derive(Debug, Clone)]
pub struct DecodedPhoto {
    pub format: PhotoFormat,
    pub bytes: Vec<u8>,
}

/// Splits a `data:<mime>;base64,<payload>` URI. Media types naming jpeg/jpg
/// decode as JPEG; everything else is treated as PNG.
pub fn decode_data_uri(uri: &str) -> Result<DecodedPhoto, PhotoError> {
    let (header, payload) = uri
        .trim()
        .split_once(',')
        .ok_or(PhotoError::MalformedDataUri)?;
    let header = header.to_ascii_lowercase();
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(PhotoError::MalformedDataUri);
    }

    let format = if header.contains("jpeg") || header.contains("jpg") {
        PhotoFormat::Jpeg
    } else {
        PhotoFormat::Png
    };
    let bytes = STANDARD.decode(payload.trim())?;
    Ok(DecodedPhoto { format, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_image_before_size() {
        let big = vec![0u8; 6 * 1024 * 1024];
        let err = accept_photo("application/pdf", &big).unwrap_err();
        assert!(matches!(err, PhotoError::NotAnImage(_)));
        assert_eq!(err.to_string(), "Please select a valid image");
    }

    #[test]
    fn test_rejects_six_megabyte_image() {
        let big = vec![0u8; 6 * 1024 * 1024];
        let err = accept_photo("image/png", &big).unwrap_err();
        assert!(matches!(err, PhotoError::TooLarge { size } if size == big.len()));
        assert_eq!(err.to_string(), "Image must not exceed 5MB");
    }

    #[test]
    fn test_accepts_two_megabyte_png() {
        let bytes = vec![7u8; 2 * 1024 * 1024];
        let uri = accept_photo("image/png", &bytes).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let decoded = decode_data_uri(&uri).unwrap();
        assert_eq!(decoded.format, PhotoFormat::Png);
        assert_eq!(decoded.bytes.len(), bytes.len());
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let bytes = vec![1u8; MAX_PHOTO_BYTES];
        assert!(accept_photo("image/jpeg", &bytes).is_ok());
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        assert!(matches!(accept_photo("image/png", &[]), Err(PhotoError::Empty)));
    }

    #[test]
    fn test_jpeg_detection_uses_media_type_only() {
        let jpg = decode_data_uri("data:image/jpg;base64,AAAA").unwrap();
        assert_eq!(jpg.format, PhotoFormat::Jpeg);
        // "jpeg" inside the payload must not switch the format.
        let png = decode_data_uri("data:image/png;base64,anBlZw==").unwrap();
        assert_eq!(png.format, PhotoFormat::Png);
    }

    #[test]
    fn test_malformed_data_uris() {
        assert!(matches!(
            decode_data_uri("https://example.com/a.png"),
            Err(PhotoError::MalformedDataUri)
        ));
        assert!(matches!(
            decode_data_uri("data:image/png,raw"),
            Err(PhotoError::MalformedDataUri)
        ));
        assert!(matches!(
            decode_data_uri("data:image/png;base64,@@@"),
            Err(PhotoError::Base64(_))
        ));
    }

    #[test]
    fn test_place_header_photo_replaces_and_removes() {
        let header = "<h1>Ada</h1><h2>Analyst</h2>";
        let with = place_header_photo(header, Some("data:image/png;base64,AAAA"));
        assert!(with.starts_with(r#"<img class="profile-photo""#));
        assert!(with.ends_with("<h1>Ada</h1><h2>Analyst</h2>"));

        let swapped = place_header_photo(&with, Some("data:image/png;base64,BBBB"));
        assert_eq!(swapped.matches("<img").count(), 1);
        assert!(swapped.contains("BBBB"));

        let without = place_header_photo(&swapped, None);
        assert!(!without.contains("<img"));
        assert!(without.contains("<h1>Ada</h1>"));
    }
}
