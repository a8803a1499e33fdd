//! Encodes a [`PdfLayout`] with `lopdf`.
//!
//! One shared resources dictionary holds the three Helvetica faces and, when
//! present, the photo as image `Im1`. Content streams are zlib-compressed.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::ImageFormat;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, warn};

use crate::bridge::photo::{DecodedPhoto, PhotoFormat};
use crate::export::ExportError;

use super::layout::{DrawOp, LaidOutPage, PdfFont, PdfLayout, Rgb, RULE_COLOR};
use super::page::PageConfig;

const PHOTO_RESOURCE: &str = "Im1";
const PHOTO_BORDER_WIDTH: f32 = 1.0;

fn deflate(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Maps text onto WinAnsiEncoding bytes. Unmappable characters become `?`.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

/// Decodes the photo into an RGB image XObject. Returns `None` (and logs)
/// when the bytes are not a readable image.
fn photo_xobject(photo: &DecodedPhoto) -> Result<Option<Stream>, ExportError> {
    let format = match photo.format {
        PhotoFormat::Jpeg => ImageFormat::Jpeg,
        PhotoFormat::Png => ImageFormat::Png,
    };
    let decoded = match image::load_from_memory_with_format(&photo.bytes, format) {
        Ok(img) => img.to_rgb8(),
        Err(e) => {
            warn!(error = %e, format = ?photo.format, "Profile photo could not be decoded, skipping");
            return Ok(None);
        }
    };

    let (width, height) = decoded.dimensions();
    let data = deflate(decoded.as_raw())?;
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    Ok(Some(Stream::new(dict, data)))
}

fn rgb_operands(color: Rgb) -> Vec<Object> {
    vec![color.0.into(), color.1.into(), color.2.into()]
}

fn page_content(page: &LaidOutPage, has_photo: bool) -> Content {
    let mut ops = Vec::new();

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                font,
                color,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![font.resource_name().into(), (*size).into()],
                ));
                ops.push(Operation::new("rg", rgb_operands(*color)));
                ops.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rule {
                x1,
                x2,
                y,
                thickness,
                color,
            } => {
                ops.push(Operation::new("w", vec![(*thickness).into()]));
                ops.push(Operation::new("RG", rgb_operands(*color)));
                ops.push(Operation::new("m", vec![(*x1).into(), (*y).into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), (*y).into()]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Photo { x, y, size } => {
                if !has_photo {
                    continue;
                }
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        (*size).into(),
                        0.into(),
                        0.into(),
                        (*size).into(),
                        (*x).into(),
                        (*y).into(),
                    ],
                ));
                ops.push(Operation::new("Do", vec![PHOTO_RESOURCE.into()]));
                ops.push(Operation::new("Q", vec![]));

                ops.push(Operation::new("w", vec![PHOTO_BORDER_WIDTH.into()]));
                ops.push(Operation::new("RG", rgb_operands(RULE_COLOR)));
                ops.push(Operation::new(
                    "re",
                    vec![(*x).into(), (*y).into(), (*size).into(), (*size).into()],
                ));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }

    Content { operations: ops }
}

/// Builds the PDF object graph for `layout` and serializes it.
pub fn encode_pdf(layout: &PdfLayout, config: &PageConfig) -> Result<Vec<u8>, ExportError> {
    let mut document = Document::with_version("1.7");
    let pages_id = document.new_object_id();

    let mut fonts = Dictionary::new();
    for font in PdfFont::ALL {
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }

    let mut resources = dictionary! { "Font" => fonts };
    let photo_stream = match &layout.photo {
        Some(photo) => photo_xobject(photo)?,
        None => None,
    };
    let has_photo = photo_stream.is_some();
    if let Some(stream) = photo_stream {
        let image_id = document.add_object(stream);
        resources.set("XObject", dictionary! { PHOTO_RESOURCE => image_id });
    }
    let resources_id = document.add_object(resources);

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = page_content(page, has_photo).encode()?;
        let stream = Stream::new(dictionary! { "Filter" => "FlateDecode" }, deflate(&content)?);
        let content_id = document.add_object(stream);

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), config.width.into(), config.height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    document.save_to(&mut bytes)?;
    debug!(pages = page_ids.len(), bytes = bytes.len(), has_photo, "PDF encoded");
    Ok(bytes)
}
