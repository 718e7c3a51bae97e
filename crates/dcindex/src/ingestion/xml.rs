//! Namespace-agnostic Dublin Core field extraction

use std::collections::HashMap;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::{Error, Result};

/// Metadata elements extracted from XML sources, matched by local name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Title,
    Type,
    Contributor,
    Creator,
    Date,
    Publisher,
    Subject,
    Description,
    Identifier,
}

impl MetadataField {
    /// All fields, in slot order
    pub const ALL: [MetadataField; 9] = [
        Self::Title,
        Self::Type,
        Self::Contributor,
        Self::Creator,
        Self::Date,
        Self::Publisher,
        Self::Subject,
        Self::Description,
        Self::Identifier,
    ];

    /// Element local name this field is read from
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Type => "type",
            Self::Contributor => "contributor",
            Self::Creator => "creator",
            Self::Date => "date",
            Self::Publisher => "publisher",
            Self::Subject => "subject",
            Self::Description => "description",
            Self::Identifier => "identifier",
        }
    }

    /// Match an element local name (prefix already stripped)
    pub fn from_local_name(name: &[u8]) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.element_name().as_bytes() == name)
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

/// Text and metadata pulled out of one XML document
#[derive(Debug, Clone, Default)]
pub struct ExtractedXml {
    /// Every text node inside the root element, concatenated in document order
    pub raw_text: String,
    values: [Vec<String>; 9],
}

impl ExtractedXml {
    /// Trimmed, non-empty values found for a field, in document order
    pub fn values(&self, field: MetadataField) -> &[String] {
        &self.values[field.slot()]
    }

    /// Values for a field joined with single spaces; empty when none matched
    pub fn joined(&self, field: MetadataField) -> String {
        self.values(field).join(" ")
    }

    /// Content flattened to one line
    pub fn flattened_text(&self) -> String {
        flatten_xml_text(&self.raw_text)
    }
}

/// Split into lines, trim each, drop blank ones, join with single spaces
pub fn flatten_xml_text(raw: &str) -> String {
    super::split_lines(raw)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a document and extract its text and metadata.
///
/// Fails with `MalformedDocument` unless the input is a single well-formed,
/// namespace-well-formed element tree. Fields are read from descendants of the
/// root element only. A field value is the element's own leading text (up to
/// its first child element), as comments and processing instructions are
/// skipped. General entities declared in an internal DTD subset are expanded.
pub fn extract(filename: &str, xml: &str) -> Result<ExtractedXml> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = NsReader::from_str(xml);
    let config = reader.config_mut();
    config.expand_empty_elements = true;
    config.check_end_names = true;

    let mut out = ExtractedXml::default();
    let mut entities: HashMap<String, String> = HashMap::new();
    let mut capture: Option<(MetadataField, String)> = None;
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let position = reader.buffer_position();
        let (resolved, event) = reader.read_resolved_event().map_err(|e| {
            Error::malformed(filename, format!("{} (after byte {})", e, position))
        })?;
        let unknown_prefix = match resolved {
            ResolveResult::Unknown(prefix) => Some(prefix),
            _ => None,
        };

        match event {
            Event::Start(start) => {
                if let Some(prefix) = unknown_prefix {
                    return Err(Error::malformed(
                        filename,
                        format!("unbound prefix '{}'", String::from_utf8_lossy(&prefix)),
                    ));
                }
                open_element(filename, &start, depth, &mut seen_root)?;
                finish_capture(&mut capture, &mut out);
                if depth > 0 {
                    capture = MetadataField::from_local_name(start.local_name().as_ref())
                        .map(|field| (field, String::new()));
                }
                depth += 1;
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(Error::malformed(
                        filename,
                        "closing tag without matching opening tag",
                    ));
                }
                finish_capture(&mut capture, &mut out);
                depth -= 1;
            }
            Event::DocType(doctype) => {
                if seen_root {
                    return Err(Error::malformed(filename, "DOCTYPE after document element"));
                }
                let declarations = String::from_utf8_lossy(&doctype);
                entities.extend(internal_entities(&declarations));
            }
            Event::Text(text) => {
                let text = text
                    .unescape_with(|name| {
                        entities
                            .get(name)
                            .map(String::as_str)
                            .or_else(|| resolve_predefined_entity(name))
                    })
                    .map_err(|e| Error::malformed(filename, e.to_string()))?;
                push_text(filename, &text, depth, &mut capture, &mut out)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data);
                push_text(filename, &text, depth, &mut capture, &mut out)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(Error::malformed(filename, "unclosed element at end of document"));
    }
    if !seen_root {
        return Err(Error::malformed(filename, "no element found"));
    }

    Ok(out)
}

/// General entity declarations (`<!ENTITY name "value">`) of a DOCTYPE's
/// internal subset. Parameter and external entities are ignored.
fn internal_entities(doctype: &str) -> Vec<(String, String)> {
    let mut entities = Vec::new();
    let mut rest = doctype;

    while let Some(start) = rest.find("<!ENTITY") {
        rest = rest[start + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let Some(value_end) = rest[1..].find(quote) else {
            break;
        };
        if !name.is_empty() {
            entities.push((name.to_string(), rest[1..1 + value_end].to_string()));
        }
        rest = &rest[1 + value_end + 1..];
    }

    entities
}

fn open_element(
    filename: &str,
    start: &BytesStart<'_>,
    depth: usize,
    seen_root: &mut bool,
) -> Result<()> {
    if depth == 0 {
        if *seen_root {
            return Err(Error::malformed(filename, "junk after document element"));
        }
        *seen_root = true;
    }
    for attr in start.attributes() {
        attr.map_err(|e| Error::malformed(filename, e.to_string()))?;
    }
    Ok(())
}

fn push_text(
    filename: &str,
    text: &str,
    depth: usize,
    capture: &mut Option<(MetadataField, String)>,
    out: &mut ExtractedXml,
) -> Result<()> {
    if depth == 0 {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(Error::malformed(filename, "text outside the document element"));
    }
    out.raw_text.push_str(text);
    if let Some((_, buffer)) = capture.as_mut() {
        buffer.push_str(text);
    }
    Ok(())
}

fn finish_capture(capture: &mut Option<(MetadataField, String)>, out: &mut ExtractedXml) {
    if let Some((field, text)) = capture.take() {
        let value = text.trim();
        if !value.is_empty() {
            out.values[field.slot()].push(value.to_string());
        }
    }
}
