//! Minimal mutable XML tree for SVG cleanup.
//!
//! Nodes live in an arena and refer to each other by index. Namespaces are
//! resolved once while parsing, so later edits (dropping `xmlns:*` declarations
//! for instance) never change what an element or attribute belongs to.
//!
//! Text and attribute values are kept in their escaped source form and written
//! back verbatim. The XML declaration is not preserved.

use quick_xml::{Reader, events::Event};
use thiserror::Error;

use super::rules::XML_NS;

pub type NodeId = usize;

pub const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";

#[derive(Debug, Error)]
pub enum DomError {
    #[error("xml syntax error at byte {position}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed attribute")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("element `{0}` is never closed")]
    Unclosed(String),

    #[error("document has no root element")]
    NoRoot,
}

#[derive(Debug, Clone)]
pub struct Attr {
    /// Qualified name as written (`inkscape:label`, `fill`).
    pub name: String,
    /// Escaped value as written.
    pub value: String,
    /// Resolved namespace; `None` for unprefixed attributes.
    pub ns: Option<String>,
}

impl Attr {
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Prefix bound by this attribute if it is a namespace declaration
    /// (`""` for the default namespace).
    pub fn declared_prefix(&self) -> Option<&str> {
        if self.name == "xmlns" {
            Some("")
        } else {
            self.name.strip_prefix("xmlns:")
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub ns: Option<String>,
    pub attrs: Vec<Attr>,
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Value of an unprefixed attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an unprefixed attribute, replacing any existing value in place.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value.to_string(),
            None => self.attrs.push(Attr {
                name: name.to_string(),
                value: value.to_string(),
                ns: None,
            }),
        }
    }

    /// Remove attributes matching `pred`, returning how many were dropped.
    pub fn remove_attrs(&mut self, mut pred: impl FnMut(&Attr) -> bool) -> usize {
        let before = self.attrs.len();
        self.attrs.retain(|a| !pred(a));
        before - self.attrs.len()
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Escaped character data, entity references included.
    Text(String),
    /// Markup written back as-is (CDATA, processing instructions, doctype).
    Raw(String),
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    top: Vec<NodeId>,
    root: NodeId,
}

/// Part of a qualified name after the prefix.
pub fn local_name(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

fn prefix_of(qname: &str) -> Option<&str> {
    qname.split_once(':').map(|(prefix, _)| prefix)
}

/// Stack of in-scope namespace bindings, innermost frame last.
#[derive(Default)]
struct Scopes(Vec<Vec<(String, String)>>);

impl Scopes {
    fn resolve(&self, prefix: &str) -> Option<String> {
        if prefix == "xml" {
            return Some(XML_NS.to_string());
        }
        self.0
            .iter()
            .rev()
            .flat_map(|frame| frame.iter())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.clone())
            .filter(|uri| !uri.is_empty())
    }
}

impl Document {
    /// Parse markup into a tree.
    pub fn parse(src: &str) -> Result<Self, DomError> {
        let mut reader = Reader::from_str(src);
        reader.config_mut().trim_text(false);

        let mut doc = Self {
            slots: Vec::new(),
            top: Vec::new(),
            root: 0,
        };
        let mut root = None;
        let mut open: Vec<NodeId> = Vec::new();
        let mut scopes = Scopes::default();

        loop {
            let event = reader.read_event().map_err(|source| DomError::Syntax {
                position: reader.error_position() as u64,
                source,
            })?;

            match event {
                Event::Start(ref start) | Event::Empty(ref start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    let mut raw = Vec::new();
                    for attr in start.attributes() {
                        let attr = attr?;
                        raw.push((
                            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                            String::from_utf8_lossy(&attr.value).into_owned(),
                        ));
                    }

                    let frame: Vec<(String, String)> = raw
                        .iter()
                        .filter_map(|(k, v)| {
                            if k == "xmlns" {
                                Some((String::new(), v.clone()))
                            } else {
                                k.strip_prefix("xmlns:").map(|p| (p.to_string(), v.clone()))
                            }
                        })
                        .collect();
                    scopes.0.push(frame);

                    let ns = scopes.resolve(prefix_of(&name).unwrap_or(""));
                    let attrs = raw
                        .into_iter()
                        .map(|(name, value)| {
                            let ns = if name == "xmlns" || name.starts_with("xmlns:") {
                                Some(XMLNS_NS.to_string())
                            } else {
                                prefix_of(&name).and_then(|p| scopes.resolve(p))
                            };
                            Attr { name, value, ns }
                        })
                        .collect();

                    let id = doc.push(
                        Node::Element(Element {
                            name,
                            ns,
                            attrs,
                            children: Vec::new(),
                        }),
                        open.last().copied(),
                    );
                    if open.is_empty() && root.is_none() {
                        root = Some(id);
                    }

                    if matches!(event, Event::Start(_)) {
                        open.push(id);
                    } else {
                        scopes.0.pop();
                    }
                }
                Event::End(_) => {
                    open.pop();
                    scopes.0.pop();
                }
                Event::Text(text) => {
                    let text = String::from_utf8_lossy(&text).into_owned();
                    doc.push(Node::Text(text), open.last().copied());
                }
                Event::GeneralRef(reference) => {
                    let text = format!("&{};", String::from_utf8_lossy(&reference));
                    doc.push(Node::Text(text), open.last().copied());
                }
                Event::CData(data) => {
                    let raw = format!("<![CDATA[{}]]>", String::from_utf8_lossy(&data));
                    doc.push(Node::Raw(raw), open.last().copied());
                }
                Event::Comment(comment) => {
                    let raw = format!("<!--{}-->", String::from_utf8_lossy(&comment));
                    doc.push(Node::Raw(raw), open.last().copied());
                }
                Event::PI(pi) => {
                    let raw = format!("<?{}?>", String::from_utf8_lossy(&pi));
                    doc.push(Node::Raw(raw), open.last().copied());
                }
                Event::DocType(doctype) => {
                    let raw = format!("<!DOCTYPE {}>", String::from_utf8_lossy(&doctype));
                    doc.push(Node::Raw(raw), open.last().copied());
                }
                Event::Decl(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(&unclosed) = open.last() {
            let name = doc
                .element(unclosed)
                .map(|e| e.name.clone())
                .unwrap_or_default();
            return Err(DomError::Unclosed(name));
        }

        doc.root = root.ok_or(DomError::NoRoot)?;
        Ok(doc)
    }

    fn push(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = self.slots.len();
        self.slots.push(Slot { node, parent });
        match parent {
            Some(p) => {
                if let Node::Element(e) = &mut self.slots[p].node {
                    e.children.push(id);
                }
            }
            None => self.top.push(id),
        }
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.slots[id].node
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.slots.get(id)?.node {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.slots.get_mut(id)?.node {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id].parent
    }

    /// Element children of `id`, in document order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.element(id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_some())
    }

    /// All elements reachable from the root, pre-order.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(element) = self.element(id) else { continue };
            out.push(id);
            stack.extend(element.children.iter().rev().copied());
        }
        out
    }

    /// Unlink a node from its parent. Its subtree becomes unreachable.
    /// The root cannot be detached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.slots[id].parent else {
            return false;
        };
        if let Some(p) = self.element_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        self.slots[id].parent = None;
        true
    }

    /// Serialize back to markup.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(self.slots.len() * 32);
        for &id in &self.top {
            self.write_node(id, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.slots[id].node {
            Node::Text(text) => out.push_str(text),
            Node::Raw(raw) => out.push_str(raw),
            Node::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for attr in &element.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&attr.value.replace('"', "&quot;"));
                    out.push('"');
                }
                if element.children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for &child in &element.children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }
}
