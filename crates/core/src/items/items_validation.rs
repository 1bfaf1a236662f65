//! Client-side, advisory validation of user input. The server stays authoritative.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use super::NewItem;

/// Longest item name the server accepts.
pub const MAX_NAME_CHARS: usize = 100;

/// Longest note the server accepts.
pub const MAX_NOTE_CHARS: usize = 500;

/// Reasons a draft is rejected before it reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("item name is required")]
    EmptyName,

    #[error("item name is longer than {max} characters")]
    NameTooLong { max: usize },

    #[error("item name contains unsupported characters: {0}")]
    InvalidCharacters(String),

    #[error("note is longer than {max} characters")]
    NoteTooLong { max: usize },
}

/// Any character other than a letter, a decimal digit, whitespace, `.`, `,` or `-`.
fn disallowed_name_char() -> &'static Regex {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    DISALLOWED.get_or_init(|| Regex::new(r"[^\p{L}\p{Nd}\s.,-]").expect("valid name pattern"))
}

/// Validates an item name, returning the trimmed form.
pub fn validate_item_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong {
            max: MAX_NAME_CHARS,
        });
    }
    let offending: String = disallowed_name_char()
        .find_iter(name)
        .map(|m| m.as_str())
        .collect();
    if !offending.is_empty() {
        return Err(ValidationError::InvalidCharacters(offending));
    }
    Ok(name.to_string())
}

/// Validates a note, returning `None` for blank input.
pub fn validate_note(note: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if note.chars().count() > MAX_NOTE_CHARS {
        return Err(ValidationError::NoteTooLong {
            max: MAX_NOTE_CHARS,
        });
    }
    Ok(Some(note.to_string()))
}

/// Validates raw add-form input and builds the draft to submit.
pub fn validate_new_item(name: &str, note: Option<&str>) -> Result<NewItem, ValidationError> {
    let name = validate_item_name(name)?;
    let note = validate_note(note)?;
    Ok(NewItem::new(name, note))
}
