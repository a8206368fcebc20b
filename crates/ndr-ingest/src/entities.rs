//! Entity and character reference resolution.
//!
//! Besides the predefined XML entities and character references, general
//! entities declared in the document's internal DTD subset are expanded.
//! Parameter entities and external entities are never expanded; a
//! reference to one is reported as undefined.

use std::collections::HashMap;

use quick_xml::escape::resolve_predefined_entity;

use crate::error::{ExtractError, Result};

const ENTITY_DECL: &str = "<!ENTITY";

/// Nesting limit for entities that reference other entities.
const MAX_ENTITY_DEPTH: usize = 8;

/// Upper bound on the text produced by a single reference.
const MAX_EXPANSION_BYTES: usize = 1 << 20;

/// General entities declared in the internal DTD subset.
#[derive(Debug, Default)]
pub(crate) struct Entities {
    declared: HashMap<String, String>,
}

impl Entities {
    /// Record the internal entity declarations of a `<!DOCTYPE ...>` body.
    ///
    /// When an entity is declared twice the first declaration is binding.
    pub(crate) fn declare_from_doctype(&mut self, doctype: &str) {
        let mut rest = doctype;
        while let Some(index) = rest.find(ENTITY_DECL) {
            rest = &rest[index + ENTITY_DECL.len()..];
            if let Some((name, value, remainder)) = internal_entity_decl(rest) {
                self.declared
                    .entry(name.to_string())
                    .or_insert_with(|| value.to_string());
                rest = remainder;
            }
        }
    }

    /// Replacement text for `&name;`.
    pub(crate) fn resolve(&self, name: &str, position: u64) -> Result<String> {
        let mut out = String::new();
        self.expand(name, position, 0, &mut out)?;
        Ok(out)
    }

    fn expand(&self, name: &str, position: u64, depth: usize, out: &mut String) -> Result<()> {
        if let Some(code) = name.strip_prefix('#') {
            out.push(char_reference(code, position)?);
            return Ok(());
        }
        if let Some(value) = resolve_predefined_entity(name) {
            out.push_str(value);
            return Ok(());
        }
        let value = self
            .declared
            .get(name)
            .ok_or_else(|| ExtractError::UndefinedEntity {
                name: name.to_string(),
                position,
            })?;
        if depth >= MAX_ENTITY_DEPTH {
            return Err(malformed(position, format!("entity '&{name};' nests too deeply")));
        }
        if value.contains('<') {
            return Err(malformed(
                position,
                format!("entity '&{name};' contains markup"),
            ));
        }

        let mut rest = value.as_str();
        while let Some(start) = rest.find('&') {
            out.push_str(&rest[..start]);
            rest = &rest[start + 1..];
            let end = rest.find(';').ok_or_else(|| {
                malformed(position, format!("unterminated reference in entity '&{name};'"))
            })?;
            self.expand(&rest[..end], position, depth + 1, out)?;
            rest = &rest[end + 1..];
            if out.len() > MAX_EXPANSION_BYTES {
                return Err(malformed(
                    position,
                    format!("entity '&{name};' expands beyond {MAX_EXPANSION_BYTES} bytes"),
                ));
            }
        }
        out.push_str(rest);
        Ok(())
    }
}

/// Split `name "value">...` into name, literal value and the remainder.
///
/// Parameter entities and external (`SYSTEM`/`PUBLIC`) entities yield `None`.
fn internal_entity_decl(decl: &str) -> Option<(&str, &str, &str)> {
    let decl = decl.trim_start();
    if decl.starts_with('%') {
        return None;
    }
    let name_end = decl.find(char::is_whitespace)?;
    let (name, rest) = decl.split_at(name_end);
    let rest = rest.trim_start();
    let quote = rest.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    let body = &rest[quote.len_utf8()..];
    let end = body.find(quote)?;
    Some((name, &body[..end], &body[end + quote.len_utf8()..]))
}

/// Decode the code point of `&#...;` or `&#x...;`.
fn char_reference(code: &str, position: u64) -> Result<char> {
    let value = match code.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => code.parse::<u32>().ok(),
    };
    value
        .and_then(char::from_u32)
        .filter(|&c| is_xml_char(c))
        .ok_or_else(|| malformed(position, format!("invalid character reference '&#{code};'")))
}

/// The XML `Char` production.
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn malformed(position: u64, message: String) -> ExtractError {
    ExtractError::Malformed { position, message }
}
