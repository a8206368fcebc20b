//! Minimal element tree built from `quick-xml` events.
//!
//! Only what record extraction needs is kept: element names, the leading
//! text of each element (text before its first child) and child elements.
//! Attributes are checked for well-formedness and then dropped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

use crate::entities::{Entities, is_xml_char};
use crate::error::{ExtractError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified name as written in the document.
    pub name: String,
    /// Text content before the first child element.
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Direct children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// All elements below this one in document order, excluding itself.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First element below this one with the given name.
    pub fn find_descendant(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|element| element.name == name)
    }

    /// Every element below this one with the given name, in document order.
    pub fn find_all_descendants<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a XmlElement> {
        self.descendants().filter(move |element| element.name == name)
    }

    /// Text of the first element matching a child path such as
    /// `PrescribedRegimen/Code`.
    ///
    /// An element that exists but has no text yields `Some("")`.
    pub fn find_text(&self, path: &str) -> Option<&str> {
        let mut matches: Vec<&XmlElement> = vec![self];
        for segment in path.split('/') {
            matches = matches
                .into_iter()
                .flat_map(|element| element.children_named(segment))
                .collect();
        }
        matches.first().map(|element| element.text.as_str())
    }
}

/// Pre-order iterator over descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// Parse a complete document into its root element.
///
/// # Errors
///
/// Returns an [`ExtractError`] when the document is not well-formed.
pub fn parse_document(bytes: &[u8]) -> Result<XmlElement> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = Reader::from_reader(bytes);
    let config = reader.config_mut();
    config.check_end_names = true;
    config.check_comments = true;

    let mut entities = Entities::default();
    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();
    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|error| ExtractError::Malformed {
                position: reader.error_position(),
                message: error.to_string(),
            })?;
        match event {
            Event::Start(start) => builder.open(element_from(&start, position)?, position)?,
            Event::Empty(start) => {
                builder.open(element_from(&start, position)?, position)?;
                builder.close(position)?;
            }
            Event::End(_) => builder.close(position)?,
            Event::Text(text) => {
                let decoded = text
                    .decode()
                    .map_err(|error| encoding_error(position, &error))?;
                builder.text(&decoded, position)?;
            }
            Event::CData(cdata) => {
                let decoded = cdata
                    .decode()
                    .map_err(|error| encoding_error(position, &error))?;
                builder.text(&decoded, position)?;
            }
            Event::GeneralRef(reference) => {
                let name = reference
                    .decode()
                    .map_err(|error| encoding_error(position, &error))?;
                let resolved = entities.resolve(&name, position)?;
                builder.text(&resolved, position)?;
            }
            Event::DocType(doctype) => {
                let decoded = doctype
                    .decode()
                    .map_err(|error| encoding_error(position, &error))?;
                entities.declare_from_doctype(&decoded);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    builder.finish()
}

fn element_from(start: &BytesStart<'_>, position: u64) -> Result<XmlElement> {
    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref())
        .map_err(|error| encoding_error(position, &error))?;
    check_name(name, position)?;
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|error| ExtractError::Malformed {
            position,
            message: error.to_string(),
        })?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|error| encoding_error(position, &error))?;
        check_name(key, position)?;
    }
    Ok(XmlElement::new(name))
}

/// Reject element and attribute names outside the XML `Name` production.
fn check_name(name: &str, position: u64) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char);
    if valid {
        Ok(())
    } else {
        Err(ExtractError::Malformed {
            position,
            message: format!("invalid name '{name}'"),
        })
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(
        c,
        ':' | 'A'..='Z'
            | '_'
            | 'a'..='z'
            | '\u{C0}'..='\u{D6}'
            | '\u{D8}'..='\u{F6}'
            | '\u{F8}'..='\u{2FF}'
            | '\u{370}'..='\u{37D}'
            | '\u{37F}'..='\u{1FFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}'
            | '\u{2C00}'..='\u{2FEF}'
            | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}'
            | '\u{FDF0}'..='\u{FFFD}'
            | '\u{10000}'..='\u{EFFFF}'
    )
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(
            c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

fn encoding_error(position: u64, error: &dyn std::fmt::Display) -> ExtractError {
    ExtractError::Encoding {
        position,
        message: error.to_string(),
    }
}

#[derive(Default)]
struct TreeBuilder {
    open: Vec<XmlElement>,
    root: Option<XmlElement>,
}

impl TreeBuilder {
    fn open(&mut self, element: XmlElement, position: u64) -> Result<()> {
        if self.open.is_empty() && self.root.is_some() {
            return Err(ExtractError::StrayContent { position });
        }
        trace!(depth = self.open.len(), "open element");
        self.open.push(element);
        Ok(())
    }

    fn close(&mut self, position: u64) -> Result<()> {
        let element = self.open.pop().ok_or_else(|| ExtractError::Malformed {
            position,
            message: "end tag without matching start tag".to_string(),
        })?;
        match self.open.last_mut() {
            Some(parent) => parent.children.push(element),
            None => self.root = Some(element),
        }
        Ok(())
    }

    fn text(&mut self, text: &str, position: u64) -> Result<()> {
        if let Some(c) = text.chars().find(|&c| !is_xml_char(c)) {
            return Err(ExtractError::Malformed {
                position,
                message: format!("character U+{:04X} is not allowed in XML", u32::from(c)),
            });
        }
        match self.open.last_mut() {
            // Text after a child element is that child's tail, not ours.
            Some(current) => {
                if current.children.is_empty() {
                    current.text.push_str(text);
                }
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(ExtractError::StrayContent { position }),
        }
    }

    fn finish(self) -> Result<XmlElement> {
        if let Some(element) = self.open.last() {
            return Err(ExtractError::UnclosedElement {
                name: element.name.clone(),
            });
        }
        self.root.ok_or(ExtractError::NoRootElement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<XmlElement> {
        parse_document(xml.as_bytes())
    }

    #[test]
    fn builds_nested_tree() {
        let root = parse("<a><b>one</b><c><b>two</b></c></a>").expect("parse");
        assert_eq!(root.name, "a");
        assert_eq!(root.children.len(), 2);
        let names: Vec<&str> = root.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "b"]);
    }

    #[test]
    fn descendants_exclude_the_element_itself() {
        let root = parse("<Regimen><Regimen/></Regimen>").expect("parse");
        assert_eq!(root.find_all_descendants("Regimen").count(), 1);
    }

    #[test]
    fn text_is_leading_text_only() {
        let root = parse("<a>head<b>inner</b>tail</a>").expect("parse");
        assert_eq!(root.text, "head");
        assert_eq!(root.children[0].text, "inner");
    }

    #[test]
    fn find_text_follows_child_paths() {
        let root = parse(
            "<r><P><Other>x</Other></P><P><Code>TDF</Code></P><Code>top</Code></r>",
        )
        .expect("parse");
        assert_eq!(root.find_text("P/Code"), Some("TDF"));
        assert_eq!(root.find_text("Code"), Some("top"));
        assert_eq!(root.find_text("Missing"), None);
    }

    #[test]
    fn empty_element_has_empty_text() {
        let root = parse("<r><VisitDate/></r>").expect("parse");
        assert_eq!(root.find_text("VisitDate"), Some(""));
    }

    #[test]
    fn resolves_entities_and_cdata() {
        let root = parse("<r><a>A&amp;B &#65;&#x42;</a><b><![CDATA[<x>]]></b></r>").expect("parse");
        assert_eq!(root.find_text("a"), Some("A&B AB"));
        assert_eq!(root.find_text("b"), Some("<x>"));
    }

    #[test]
    fn skips_declaration_comments_and_bom() {
        let xml = "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- c -->\n<r>x</r>\n";
        let root = parse(xml).expect("parse");
        assert_eq!(root.text, "x");
    }

    #[test]
    fn rejects_mismatched_end_tag() {
        assert!(matches!(
            parse("<a><b></a></b>"),
            Err(ExtractError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_unclosed_element() {
        assert!(matches!(
            parse("<a><b></b>"),
            Err(ExtractError::UnclosedElement { .. } | ExtractError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_empty_document() {
        assert_eq!(parse(""), Err(ExtractError::NoRootElement));
        assert_eq!(parse("<?xml version=\"1.0\"?>"), Err(ExtractError::NoRootElement));
    }

    #[test]
    fn rejects_second_root_and_stray_text() {
        assert!(matches!(
            parse("<a/><b/>"),
            Err(ExtractError::StrayContent { .. })
        ));
        assert!(matches!(
            parse("<a/>junk"),
            Err(ExtractError::StrayContent { .. })
        ));
    }

    #[test]
    fn rejects_undefined_entity() {
        assert!(matches!(
            parse("<a>&nbsp;</a>"),
            Err(ExtractError::UndefinedEntity { .. })
        ));
    }

    #[test]
    fn rejects_illegal_characters() {
        for xml in ["<a>&#0;</a>", "<a>&#x1F;</a>", "<a>\u{1}</a>", "<a><![CDATA[\u{8}]]></a>"] {
            assert!(
                matches!(parse(xml), Err(ExtractError::Malformed { .. })),
                "{xml:?}"
            );
        }
    }

    #[test]
    fn rejects_invalid_names() {
        for xml in ["<1a/>", "<-a></-a>", "<a.b><c 9x=\"1\"/></a.b>"] {
            assert!(
                matches!(parse(xml), Err(ExtractError::Malformed { .. })),
                "{xml:?}"
            );
        }
        let root = parse("<ndr:Container xml:lang=\"en\"><_x-1.2/></ndr:Container>").expect("parse");
        assert_eq!(root.children[0].name, "_x-1.2");
    }

    #[test]
    fn rejects_double_hyphen_in_comment() {
        assert!(matches!(
            parse("<a><!-- x -- y --></a>"),
            Err(ExtractError::Malformed { .. })
        ));
    }

    #[test]
    fn expands_internal_dtd_entities() {
        let xml = "<?xml version=\"1.0\"?>\n\
                   <!DOCTYPE r [<!ENTITY e \"x\"><!ENTITY pair \"&e;&e;\">]>\n\
                   <r><a>&e;</a><b>[&pair;]</b></r>";
        let root = parse(xml).expect("parse");
        assert_eq!(root.find_text("a"), Some("x"));
        assert_eq!(root.find_text("b"), Some("[xx]"));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let bytes = b"<a>\xff\xfe</a>";
        assert!(parse_document(bytes).is_err());
    }
}
