//! Keeps the structured record and the rendered header block in agreement.

pub mod field_path;
pub mod header;
pub mod photo;
pub mod rules;
