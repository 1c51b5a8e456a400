//! Field validators applied on the write path.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ValidationError;

/// Upload size limit shared by every file kind
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone regex"));

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^https?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|",
        r"localhost|",
        r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("url regex")
});

/// Kind of uploaded file, each with its own extension allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Video,
    Document,
}

impl FileKind {
    fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileKind::Image => &["jpg", "jpeg", "png", "gif"],
            FileKind::Video => &["mp4", "avi", "mov", "wmv"],
            FileKind::Document => &["pdf", "doc", "docx", "txt"],
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Video => "video",
            FileKind::Document => "document",
        }
    }

    fn allowed(&self) -> &'static str {
        match self {
            FileKind::Image => "JPG, JPEG, PNG, or GIF",
            FileKind::Video => "MP4, AVI, MOV, or WMV",
            FileKind::Document => "PDF, DOC, DOCX, or TXT",
        }
    }
}

pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::PhoneNumber)
    }
}

pub fn validate_website_url(value: &str) -> Result<(), ValidationError> {
    if URL_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::WebsiteUrl)
    }
}

pub fn validate_file_size(size: u64) -> Result<(), ValidationError> {
    if size > MAX_FILE_SIZE {
        return Err(ValidationError::FileTooLarge);
    }
    Ok(())
}

/// Check size first, then the extension (case-insensitive)
pub fn validate_file(kind: FileKind, file_name: &str, size: u64) -> Result<(), ValidationError> {
    validate_file_size(size)?;

    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if kind.extensions().contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedFormat {
            kind: kind.label(),
            allowed: kind.allowed(),
        })
    }
}

pub fn validate_price(price_cents: i64) -> Result<(), ValidationError> {
    if price_cents < 0 {
        return Err(ValidationError::NegativePrice);
    }
    Ok(())
}

pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::Rating)
    }
}

fn validate_name_length(
    what: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::NameLength { what, min, max });
    }
    Ok(())
}

pub fn validate_category_name(value: &str) -> Result<(), ValidationError> {
    validate_name_length("Category", value, 2, 50)
}

pub fn validate_collection_name(value: &str) -> Result<(), ValidationError> {
    validate_name_length("Collection", value, 2, 100)
}
