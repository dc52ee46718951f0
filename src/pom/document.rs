//! Whitespace-preserving XML node tree.
//!
//! Every node parsed from a file keeps the exact source text it came from, so
//! serializing an unmodified tree reproduces the input byte for byte:
//! comments, attribute order and quoting, entity spelling, line endings and
//! indentation all survive. Nodes added by the patch engine carry generated
//! text instead. There is no formatting pass; whitespace between elements is
//! ordinary [`XmlNode::Text`] and is inserted explicitly by callers.
//!
//! Parsing uses `quick-xml` for tokenizing only. Each event's source span is
//! recovered from the reader position, which always sits right after the `>`
//! of the markup just read.

use quick_xml::Reader;
use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use thiserror::Error;

const BOM: &str = "\u{feff}";

/// Failure to tokenize or balance a document.
#[derive(Debug, Error)]
pub enum XmlError {
    /// Tokenizer error at a byte offset
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax {
        /// Byte offset reported by the reader
        position: usize,
        /// Tokenizer message
        message: String,
    },

    /// A closing tag without a matching open element
    #[error("Unexpected closing tag </{0}>")]
    UnexpectedEnd(String),

    /// An element left open at end of input
    #[error("Element <{0}> is never closed")]
    Unclosed(String),
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// An element with its children
    Element(XmlElement),
    /// Character data, kept in its escaped source form
    Text(String),
    /// Comment, CDATA, declaration, processing instruction or doctype, verbatim
    Other(String),
}

impl XmlNode {
    /// Whitespace text node helper.
    pub fn text(raw: impl Into<String>) -> Self {
        Self::Text(raw.into())
    }

    /// The element, if this node is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&XmlElement> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Mutable access to the element, if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Whether this is a text node made only of whitespace.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Text(raw) if raw.chars().all(char::is_whitespace))
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Self::Element(element) => element.write_to(out),
            Self::Text(raw) | Self::Other(raw) => out.push_str(raw),
        }
    }
}

/// An element. `end` is `None` for a self-closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    start: String,
    end: Option<String>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// A new empty element rendered as `<name></name>`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: format!("<{name}>"),
            end: Some(format!("</{name}>")),
            children: Vec::new(),
        }
    }

    /// A new element holding escaped text content.
    pub fn with_text(name: &str, text: &str) -> Self {
        let mut element = Self::new(name);
        element.children.push(XmlNode::Text(escape(text).into_owned()));
        element
    }

    /// Qualified tag name as written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag name without a namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Whether the tag was written as `<name/>`.
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.end.is_none()
    }

    /// Rewrite `<name/>` as `<name></name>` so children can be appended.
    pub fn expand_self_closing(&mut self) {
        if self.end.is_some() {
            return;
        }
        let open = self.start.trim_end_matches('>').trim_end_matches('/').trim_end();
        self.start = format!("{open}>");
        self.end = Some(format!("</{}>", self.name));
    }

    /// Child elements with their indices into [`children`](Self::children).
    pub fn child_elements(&self) -> impl Iterator<Item = (usize, &XmlElement)> {
        self.children.iter().enumerate().filter_map(|(i, node)| node.as_element().map(|e| (i, e)))
    }

    /// First direct child element with the given local name.
    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<(usize, &XmlElement)> {
        self.child_elements().find(|(_, e)| e.local_name() == name)
    }

    /// Trimmed, unescaped text of the first direct child with the given name.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.find_child(name).map(|(_, e)| e.text())
    }

    /// Concatenated, unescaped, trimmed text content of direct text children.
    #[must_use]
    pub fn text(&self) -> String {
        let raw: String = self
            .children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(raw) => Some(raw.as_str()),
                _ => None,
            })
            .collect();
        match unescape(&raw) {
            Ok(text) => text.trim().to_string(),
            Err(_) => raw.trim().to_string(),
        }
    }

    /// The whitespace-only text node right before child `index`, if any.
    #[must_use]
    pub fn whitespace_before(&self, index: usize) -> Option<&str> {
        match index.checked_sub(1).map(|i| &self.children[i]) {
            Some(XmlNode::Text(raw)) if raw.chars().all(char::is_whitespace) => Some(raw),
            _ => None,
        }
    }

    /// Whether the last child is whitespace text.
    #[must_use]
    pub fn ends_with_whitespace(&self) -> bool {
        self.children.last().is_some_and(XmlNode::is_whitespace)
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&self.start);
        for child in &self.children {
            child.write_to(out);
        }
        if let Some(end) = &self.end {
            out.push_str(end);
        }
    }
}

/// A parsed document: top-level nodes plus whether a byte-order mark led it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    bom: bool,
    /// Top-level nodes: prolog, root element, trailing whitespace
    pub nodes: Vec<XmlNode>,
}

/// Address of a node: child indices from the top level down.
pub type NodePath = Vec<usize>;

impl XmlDocument {
    /// Parse a document, keeping every byte of the source.
    pub fn parse(source: &str) -> Result<Self, XmlError> {
        let (bom, text) = match source.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, source),
        };

        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut top: Vec<XmlNode> = Vec::new();
        let mut cursor = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| XmlError::Syntax {
                position: reader.buffer_position() as usize,
                message: e.to_string(),
            })?;

            let node = match event {
                Event::Eof => break,
                Event::Text(_) => {
                    // Character data cannot contain a raw '<'
                    let len = text[cursor..].find('<').unwrap_or(text.len() - cursor);
                    let raw = &text[cursor..cursor + len];
                    cursor += len;
                    if raw.is_empty() {
                        continue;
                    }
                    XmlNode::Text(raw.to_string())
                }
                Event::Start(start) => {
                    let raw = markup(text, &mut cursor, reader.buffer_position() as usize);
                    stack.push(XmlElement {
                        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                        start: raw.to_string(),
                        end: None,
                        children: Vec::new(),
                    });
                    continue;
                }
                Event::End(end) => {
                    let raw = markup(text, &mut cursor, reader.buffer_position() as usize);
                    let mut element = stack.pop().ok_or_else(|| {
                        XmlError::UnexpectedEnd(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                    })?;
                    element.end = Some(raw.to_string());
                    XmlNode::Element(element)
                }
                Event::Empty(start) => {
                    let raw = markup(text, &mut cursor, reader.buffer_position() as usize);
                    XmlNode::Element(XmlElement {
                        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                        start: raw.to_string(),
                        end: None,
                        children: Vec::new(),
                    })
                }
                _ => {
                    let raw = markup(text, &mut cursor, reader.buffer_position() as usize);
                    XmlNode::Other(raw.to_string())
                }
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => top.push(node),
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name));
        }
        if cursor < text.len() {
            top.push(XmlNode::Text(text[cursor..].to_string()));
        }

        Ok(Self {
            bom,
            nodes: top,
        })
    }

    /// Serialize the tree. Unmodified input round-trips exactly.
    #[must_use]
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push_str(BOM);
        }
        for node in &self.nodes {
            node.write_to(&mut out);
        }
        out
    }

    /// Paths of every element with the given local name, in document order.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<NodePath> {
        fn walk(nodes: &[XmlNode], name: &str, path: &mut NodePath, found: &mut Vec<NodePath>) {
            for (i, node) in nodes.iter().enumerate() {
                if let XmlNode::Element(element) = node {
                    path.push(i);
                    if element.local_name() == name {
                        found.push(path.clone());
                    }
                    walk(&element.children, name, path, found);
                    path.pop();
                }
            }
        }

        let mut found = Vec::new();
        walk(&self.nodes, name, &mut Vec::new(), &mut found);
        found
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(XmlNode::as_element)
    }

    /// Element at `path`.
    #[must_use]
    pub fn element(&self, path: &[usize]) -> Option<&XmlElement> {
        let (first, rest) = path.split_first()?;
        let mut element = self.nodes.get(*first)?.as_element()?;
        for &i in rest {
            element = element.children.get(i)?.as_element()?;
        }
        Some(element)
    }

    /// Mutable element at `path`.
    pub fn element_mut(&mut self, path: &[usize]) -> Option<&mut XmlElement> {
        let (first, rest) = path.split_first()?;
        let mut element = self.nodes.get_mut(*first)?.as_element_mut()?;
        for &i in rest {
            element = element.children.get_mut(i)?.as_element_mut()?;
        }
        Some(element)
    }

    /// The whitespace text directly before the node at `path`, if any.
    #[must_use]
    pub fn whitespace_before(&self, path: &[usize]) -> Option<&str> {
        let (last, parent) = path.split_last()?;
        if parent.is_empty() {
            return match last.checked_sub(1).map(|i| &self.nodes[i]) {
                Some(XmlNode::Text(raw)) if raw.chars().all(char::is_whitespace) => Some(raw),
                _ => None,
            };
        }
        self.element(parent)?.whitespace_before(*last)
    }

    /// 1-based line on which the node at `path` starts in the serialized output.
    #[must_use]
    pub fn line_of(&self, path: &[usize]) -> Option<usize> {
        let mut out = String::new();
        if self.bom {
            out.push_str(BOM);
        }

        let (first, rest) = path.split_first()?;
        for node in self.nodes.get(..*first)? {
            node.write_to(&mut out);
        }
        let mut element = self.nodes.get(*first)?.as_element();
        for &i in rest {
            let current = element?;
            out.push_str(&current.start);
            for node in current.children.get(..i)? {
                node.write_to(&mut out);
            }
            element = current.children.get(i)?.as_element();
        }
        element?;

        Some(out.matches('\n').count() + 1)
    }
}

/// Source text of a markup event ending at `end`, advancing the cursor.
fn markup<'a>(text: &'a str, cursor: &mut usize, end: usize) -> &'a str {
    let end = end.min(text.len());
    let raw = &text[*cursor..end];
    *cursor = end;
    raw
}
