//! Owned XML tree and namespace-aware navigation helpers
//!
//! OCX documents cross-reference each other by GUID and the readers visit
//! subtrees in schema order rather than document order, so the translation
//! core works on a small owned tree built from quick-xml's pull events
//! instead of streaming. The tree keeps qualified names as written; all
//! lookups go through local-name matching so a document may bind the OCX
//! namespace to any prefix.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A node in the parsed document tree
///
/// The `Attribute` kind never comes out of [`Document::parse`]; it exists
/// because [`Element::first_child`] stops scanning when it meets an
/// attribute-typed sibling, and that behavior is part of the documented
/// contract (see the conformance test in this module before changing it).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element child
    Element(Element),
    /// Character data between tags (whitespace-trimmed, never empty)
    Text(String),
    /// An attribute-typed node appearing among a parent's children
    Attribute {
        /// Qualified attribute name
        name: String,
        /// Attribute value
        value: String,
    },
}

/// An XML element with its attributes and children in document order
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified tag name as written in the document (e.g. `ocx:Panel`)
    pub name: String,
    /// Attributes in document order, qualified name to value
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element with the given qualified name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name with any namespace prefix stripped
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Namespace prefix of the tag name, if any
    pub fn prefix(&self) -> Option<&str> {
        self.name.find(':').map(|pos| &self.name[..pos])
    }

    /// Look up an attribute value by its local name
    ///
    /// Matches regardless of namespace prefix; the first match in document
    /// order wins.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| local_attr_name(name) == local)
            .map(|(_, value)| value.as_str())
    }

    /// Look up an attribute value by its exact qualified name
    pub fn attr_exact(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Return the first element child whose local tag name matches
    ///
    /// Scans the children from the start on every call; repeated lookups
    /// under the same parent are each O(children). Scanning stops as soon
    /// as an attribute-typed sibling is encountered, even if a matching
    /// element follows it. Changing that would silently alter which element
    /// is matched in malformed documents, so it stays until a conformance
    /// run against real documents says otherwise.
    pub fn first_child(&self, local: &str) -> Option<&Element> {
        for child in &self.children {
            match child {
                Node::Element(el) => {
                    if el.local_name() == local {
                        return Some(el);
                    }
                }
                Node::Attribute { .. } => return None,
                Node::Text(_) => {}
            }
        }
        None
    }

    /// Iterate over all element children in document order
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Concatenated text content of the direct text children
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let Node::Text(t) = child {
                out.push_str(t);
            }
        }
        out
    }
}

/// A parsed XML document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The document's root element
    pub root: Element,
}

impl Document {
    /// Parse an XML string into an owned tree
    ///
    /// DTD declarations are rejected outright; an OCX document never
    /// carries one and accepting them opens the door to XXE payloads.
    pub fn parse(xml: &str) -> Result<Document> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) => {}
                Event::DocType(_) => {
                    return Err(Error::InvalidXml(
                        "DTD declarations are not allowed in OCX documents".to_string(),
                    ));
                }
                Event::Start(ref e) => {
                    stack.push(element_from_start(e)?);
                }
                Event::Empty(ref e) => {
                    let element = element_from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        Error::InvalidXml("Unbalanced closing tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(ref t) => {
                    let text = std::str::from_utf8(t.as_ref())
                        .map_err(|e| Error::InvalidXml(e.to_string()))?;
                    if !text.trim().is_empty() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(Node::Text(text.trim().to_string()));
                        }
                    }
                }
                Event::CData(ref t) => {
                    let text = std::str::from_utf8(t.as_ref())
                        .map_err(|e| Error::InvalidXml(e.to_string()))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(text.to_string()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::InvalidXml("Unclosed element at end of input".to_string()));
        }

        root.map(|root| Document { root })
            .ok_or_else(|| Error::InvalidXml("Document has no root element".to_string()))
    }
}

fn element_from_start(e: &quick_xml::events::BytesStart) -> Result<Element> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| Error::InvalidXml(e.to_string()))?
        .to_string();

    let mut element = Element::new(name);
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| Error::InvalidXml(e.to_string()))?;
        let value =
            std::str::from_utf8(&attr.value).map_err(|e| Error::InvalidXml(e.to_string()))?;
        element
            .attributes
            .push((key.to_string(), value.to_string()));
    }
    Ok(element)
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None => {
            if root.is_some() {
                return Err(Error::InvalidXml(
                    "Multiple root elements in document".to_string(),
                ));
            }
            *root = Some(element);
            Ok(())
        }
    }
}

/// Strip a namespace prefix from a qualified tag name
///
/// Removes everything up to and including the first colon; unprefixed
/// names come back unchanged.
///
/// # Examples
///
/// - `"ocx:Panel"` returns `"Panel"`
/// - `"Panel"` returns `"Panel"`
pub fn local_name(qualified: &str) -> &str {
    match qualified.find(':') {
        Some(pos) => &qualified[pos + 1..],
        None => qualified,
    }
}

/// Strip a namespace prefix from a qualified attribute name
///
/// Same stripping rule as [`local_name`], kept separate because attribute
/// and tag names are resolved at different call sites.
pub fn local_attr_name(qualified: &str) -> &str {
    local_name(qualified)
}

/// Split `text` on any character in `delimiters`
///
/// With `trim_empty` set, consecutive delimiters produce no empty tokens.
pub fn tokenize<'a>(text: &'a str, delimiters: &str, trim_empty: bool) -> Vec<&'a str> {
    let tokens = text.split(|c| delimiters.contains(c));
    if trim_empty {
        tokens.filter(|t| !t.is_empty()).collect()
    } else {
        tokens.collect()
    }
}
