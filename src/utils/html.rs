//! HTML utility functions.
//!
//! Provides common HTML processing functions:
//! - `escape()`, `escape_attr()` - HTML entity escaping
//! - `unescape()` - entity decoding for values read back from documents
//! - `is_void_element()` - Self-closing elements (meta, link, etc.)
//! - `is_raw_text_element()` - Raw text elements (script, style)

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Escape HTML attribute values.
///
/// Identical to `escape()` but semantically indicates attribute context.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape text placed inside a `<script type="application/ld+json">`.
///
/// JSON is left intact except for `</` which would close the script early.
pub fn escape_script(s: &str) -> Cow<'_, str> {
    if s.contains("</") {
        Cow::Owned(s.replace("</", "<\\/"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Unescape HTML entities back to characters.
///
/// Handles common named entities and numeric character references.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }

        // Collect entity
        let mut entity = String::new();
        let mut terminated = false;
        while let Some(&next) = chars.peek() {
            if next == ';' {
                chars.next();
                terminated = true;
                break;
            }
            if next.is_whitespace() || next == '&' || entity.len() > 10 {
                break;
            }
            entity.push(next);
            chars.next();
        }

        if !terminated {
            result.push('&');
            result.push_str(&entity);
            continue;
        }

        match decode_entity(&entity) {
            Some(decoded) => result.push(decoded),
            None => {
                result.push('&');
                result.push_str(&entity);
                result.push(';');
            }
        }
    }

    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s if s.starts_with("#x") || s.starts_with("#X") => {
            u32::from_str_radix(&s[2..], 16).ok().and_then(char::from_u32)
        }
        s if s.starts_with('#') => s[1..].parse().ok().and_then(char::from_u32),
        _ => None,
    }
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element (self-closing).
///
/// Void elements cannot have children and are rendered without a closing tag.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Check if tag is a raw text element (content should not be HTML-escaped).
///
/// Per HTML spec: script and style content is "raw text".
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

// =============================================================================
// Tests
// =============================================================================
