//! Namespace-aware element tree for document parts.
//!
//! Every XML part an adapter needs (document body, style sheets, numbering,
//! sheets, charts) is parsed once into an [`Element`] tree. Names are resolved
//! against in-scope `xmlns` declarations, so lookups use the namespace URI
//! and are independent of the prefixes a producer chose.

use super::escape::{resolve_entity, unescape_xml};
use crate::common::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A resolved attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace URI, empty for unprefixed attributes
    pub namespace: String,
    pub local_name: String,
    pub value: String,
}

/// A node inside an element: either a child element or a run of text.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with resolved names and ordered mixed content.
#[derive(Debug, Clone)]
pub struct Element {
    namespace: String,
    local_name: String,
    attributes: SmallVec<[Attribute; 4]>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element. Mostly useful for tests and fallbacks.
    pub fn new(namespace: &str, local_name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            local_name: local_name.to_string(),
            attributes: SmallVec::new(),
            children: Vec::new(),
        }
    }

    /// Parse a complete XML document and return its root element.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = quick_xml::Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut scopes = NamespaceScopes::default();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let element = scopes.open(e)?;
                    stack.push(element);
                },
                Ok(Event::Empty(ref e)) => {
                    let element = scopes.open(e)?;
                    scopes.close();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(element)),
                        None => return Ok(element),
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(t)?;
                        current.push_text(&unescape_xml(raw));
                    }
                },
                Ok(Event::CData(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(std::str::from_utf8(t)?);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some(current) = stack.last_mut() {
                        let name = std::str::from_utf8(r)?;
                        match resolve_entity(name) {
                            Some(c) => current.push_text(c.encode_utf8(&mut [0u8; 4])),
                            None => current.push_text(&format!("&{};", name)),
                        }
                    }
                },
                Ok(Event::End(_)) => {
                    scopes.close();
                    if let Some(element) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(Node::Element(element)),
                            None => return Ok(element),
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlError(format!("XML parsing error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Err(Error::XmlError("No root element found".to_string()))
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Check namespace URI and local name at once.
    #[inline]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace == namespace
    }

    /// Attribute value by namespace URI and local name. Pass `""` for
    /// unprefixed attributes.
    pub fn attr(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.local_name == local_name && a.namespace == namespace)
            .map(|a| a.value.as_str())
    }

    /// Attribute parsed as a number.
    pub fn attr_parse<T: std::str::FromStr>(&self, namespace: &str, local_name: &str) -> Option<T> {
        self.attr(namespace, local_name)
            .and_then(|v| v.trim().parse().ok())
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Ordered mixed content.
    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Child elements with the given name.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.is(namespace, local_name))
    }

    /// First child element with the given name.
    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(namespace, local_name))
    }

    /// Follow a chain of child names.
    pub fn path(&self, steps: &[(&str, &str)]) -> Option<&Element> {
        let mut current = self;
        for (ns, local) in steps {
            current = current.child(ns, local)?;
        }
        Some(current)
    }

    /// All descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Descendant elements with the given name.
    pub fn descendants_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |e| e.is(namespace, local_name))
    }

    /// First descendant with the given name.
    pub fn find(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.is(namespace, local_name))
    }

    /// Whether any descendant has the given name.
    pub fn contains(&self, namespace: &str, local_name: &str) -> bool {
        self.find(namespace, local_name).is_some()
    }

    /// Concatenated text of this element and all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }
}

/// Depth-first iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(Node::Element(e)) => {
                    self.stack.push(e.children.iter());
                    return Some(e);
                },
                Some(Node::Text(_)) => {},
                None => {
                    self.stack.pop();
                },
            }
        }
    }
}

/// Stack of in-scope namespace declarations.
#[derive(Default)]
struct NamespaceScopes {
    bindings: Vec<(String, String)>,
    marks: Vec<usize>,
}

impl NamespaceScopes {
    fn open(&mut self, start: &BytesStart<'_>) -> Result<Element> {
        self.marks.push(self.bindings.len());

        let mut raw_attrs: SmallVec<[(String, String); 8]> = SmallVec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = unescape_xml(std::str::from_utf8(&attr.value)?);
            if key == "xmlns" {
                self.bindings.push((String::new(), value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.bindings.push((prefix.to_string(), value));
            } else {
                raw_attrs.push((key.to_string(), value));
            }
        }

        let qname = std::str::from_utf8(start.name().as_ref())?.to_string();
        let (namespace, local_name) = self.resolve(&qname, true);
        let mut element = Element::new(&namespace, &local_name);
        for (key, value) in raw_attrs {
            let (namespace, local_name) = self.resolve(&key, false);
            element.attributes.push(Attribute {
                namespace,
                local_name,
                value,
            });
        }
        Ok(element)
    }

    fn close(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.bindings.truncate(mark);
        }
    }

    fn resolve(&self, qname: &str, use_default: bool) -> (String, String) {
        let (prefix, local) = match qname.split_once(':') {
            Some((p, l)) => (p, l),
            None if use_default => ("", qname),
            None => return (String::new(), qname.to_string()),
        };
        if prefix == "xml" {
            return (XML_NS.to_string(), local.to_string());
        }
        let uri = self
            .bindings
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.clone())
            .unwrap_or_default();
        (uri, local.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS_A: &str = "urn:a";
    const NS_B: &str = "urn:b";

    #[test]
    fn test_resolves_prefixes_to_uris() {
        let xml = br#"<a:root xmlns:a="urn:a" xmlns:b="urn:b"><b:item a:val="1" plain="x"/></a:root>"#;
        let root = Element::parse(xml).unwrap();
        assert!(root.is(NS_A, "root"));
        let item = root.child(NS_B, "item").unwrap();
        assert_eq!(item.attr(NS_A, "val"), Some("1"));
        assert_eq!(item.attr("", "plain"), Some("x"));
        assert_eq!(item.attr(NS_B, "val"), None);
    }

    #[test]
    fn test_prefix_rebinding_is_scoped() {
        let xml = br#"<x:r xmlns:x="urn:a"><x:c xmlns:x="urn:b"/><x:d/></x:r>"#;
        let root = Element::parse(xml).unwrap();
        let names: Vec<_> = root
            .elements()
            .map(|e| (e.namespace().to_string(), e.local_name().to_string()))
            .collect();
        assert_eq!(
            names,
            vec![
                (NS_B.to_string(), "c".to_string()),
                (NS_A.to_string(), "d".to_string())
            ]
        );
    }

    #[test]
    fn test_default_namespace_applies_to_elements_only() {
        let xml = br#"<root xmlns="urn:a"><c r="A1"><v>3</v></c></root>"#;
        let root = Element::parse(xml).unwrap();
        let c = root.child(NS_A, "c").unwrap();
        assert_eq!(c.attr("", "r"), Some("A1"));
        assert_eq!(c.child(NS_A, "v").unwrap().text(), "3");
    }

    #[test]
    fn test_text_and_entities() {
        let xml = br#"<p>Obr&#225;zek &amp; <b>tab</b><![CDATA[<raw>]]></p>"#;
        let root = Element::parse(xml).unwrap();
        assert_eq!(root.text(), "Obrázek & tab<raw>");
    }

    #[test]
    fn test_descendants_document_order() {
        let xml = br#"<r><a><b/></a><c/></r>"#;
        let root = Element::parse(xml).unwrap();
        let names: Vec<_> = root.descendants().map(|e| e.local_name().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(root.path(&[("", "a"), ("", "b")]).is_some());
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(Element::parse(b"<a><b></a>").is_err());
        assert!(Element::parse(b"").is_err());
    }
}
