//! Owned HTML document tree for clone-and-patch rendering.
//!
//! `tl` parses the reference document; its borrowed nodes are converted into
//! an owned tree that can be cloned per route, mutated and serialized.
//!
//! - Text nodes hold source HTML (entities kept as written)
//! - Attribute values are decoded on parse and escaped on serialize
//! - Attribute order follows the source start tag
//! - `<script>`/`<style>` contents are kept verbatim

use crate::utils::html::{escape, escape_attr, is_raw_text_element, is_void_element, unescape};
use std::fmt::Write;

/// Marks stashed raw-text contents while `tl` parses the rest.
const RAW_MARK: char = '\u{E000}';

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Source HTML text (already escaped).
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, Option<String>)>,
    pub children: Vec<Node>,
}

/// A parsed HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Leading `<!DOCTYPE ...>` as written.
    pub doctype: Option<String>,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTML parse error: {0}")]
pub struct ParseError(String);

// ============================================================================
// Element
// ============================================================================

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of `set_attr`.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Decoded attribute value. Valueless attributes read as `""`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_deref().unwrap_or(""))
    }

    /// Set or replace an attribute, keeping its position when present.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self
            .attrs
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_ascii_lowercase(), value)),
        }
    }

    /// Whether attribute `name` equals `value`, ASCII case-insensitively.
    pub fn attr_is(&self, name: &str, value: &str) -> bool {
        self.attr(name).is_some_and(|v| v.trim().eq_ignore_ascii_case(value))
    }

    /// Whether whitespace-separated attribute `name` contains `token`.
    pub fn attr_has_token(&self, name: &str, token: &str) -> bool {
        self.attr(name)
            .is_some_and(|v| v.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case(token)))
    }

    /// Replace children with escaped text.
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![Node::Text(escape(text).into_owned())];
    }

    /// Replace children with source that is written verbatim (script bodies).
    pub fn set_raw_text(&mut self, raw: impl Into<String>) {
        self.children = vec![Node::Text(raw.into())];
    }

    /// Replace children with a parsed HTML fragment.
    pub fn set_inner_html(&mut self, html: &str) -> Result<(), ParseError> {
        self.children = parse_nodes(html)?;
        Ok(())
    }

    /// Decoded text content of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        unescape(&out).into_owned()
    }

    pub fn push(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First element in document order (self included) matching `pred`.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(pred))
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Element(e) = child
                && let Some(found) = e.find_mut(pred)
            {
                return Some(found);
            }
        }
        None
    }

    /// All matching elements in document order.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if pred(self) {
            out.push(self);
        }
        for child in self.child_elements() {
            child.find_all(pred, out);
        }
    }

    /// Remove matching descendants. Returns how many were removed.
    pub fn remove_all(&mut self, pred: &dyn Fn(&Element) -> bool) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, Node::Element(e) if pred(e)));
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            if let Node::Element(e) = child {
                removed += e.remove_all(pred);
            }
        }
        removed
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attrs {
            match value {
                Some(value) => {
                    let _ = write!(out, " {}=\"{}\"", key, escape_attr(value));
                }
                None => {
                    out.push(' ');
                    out.push_str(key);
                }
            }
        }
        out.push('>');

        if is_void_element(&self.tag) {
            return;
        }
        write_nodes(&self.children, out);
        let _ = write!(out, "</{}>", self.tag);
    }

    /// Serialize this element alone.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(e) if !is_raw_text_element(&e.tag) => collect_text(&e.children, out),
            _ => {}
        }
    }
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(e) => e.write_html(out),
            Node::Text(text) => out.push_str(text),
            Node::Comment(comment) if comment.starts_with("<!--") => out.push_str(comment),
            Node::Comment(comment) => {
                let _ = write!(out, "<!--{comment}-->");
            }
        }
    }
}

// ============================================================================
// Document
// ============================================================================

impl Document {
    pub fn parse(html: &str) -> Result<Self, ParseError> {
        let (doctype, rest) = split_doctype(html);
        Ok(Self {
            doctype: doctype.map(str::to_string),
            nodes: parse_nodes(rest)?,
        })
    }

    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        self.nodes.iter().find_map(|node| match node {
            Node::Element(e) => e.find(pred),
            _ => None,
        })
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        for node in &mut self.nodes {
            if let Node::Element(e) = node
                && let Some(found) = e.find_mut(pred)
            {
                return Some(found);
            }
        }
        None
    }

    pub fn find_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        for node in &self.nodes {
            if let Node::Element(e) = node {
                e.find_all(pred, &mut out);
            }
        }
        out
    }

    /// Remove matching elements anywhere in the document.
    pub fn remove_all(&mut self, pred: &dyn Fn(&Element) -> bool) -> usize {
        let before = self.nodes.len();
        self.nodes
            .retain(|node| !matches!(node, Node::Element(e) if pred(e)));
        let mut removed = before - self.nodes.len();
        for node in &mut self.nodes {
            if let Node::Element(e) = node {
                removed += e.remove_all(pred);
            }
        }
        removed
    }

    /// First element with the given tag name.
    pub fn element(&self, tag: &str) -> Option<&Element> {
        self.find(&|e| e.tag == tag)
    }

    pub fn element_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.find_mut(&|e| e.tag == tag)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(doctype) = &self.doctype {
            out.push_str(doctype);
        }
        write_nodes(&self.nodes, &mut out);
        out
    }
}

/// Split off a leading `<!DOCTYPE ...>` together with the whitespace after it.
fn split_doctype(html: &str) -> (Option<&str>, &str) {
    let trimmed = html.trim_start();
    if trimmed
        .get(..9)
        .is_some_and(|s| s.eq_ignore_ascii_case("<!doctype"))
    {
        if let Some(end) = trimmed.find('>') {
            let after = &trimmed[end + 1..];
            let ws = after.len() - after.trim_start().len();
            let split = end + 1 + ws;
            return (Some(&trimmed[..split]), &trimmed[split..]);
        }
    }
    (None, html)
}

// ============================================================================
// Parsing (tl -> owned tree)
// ============================================================================

/// Parse an HTML fragment or document body into owned nodes.
pub fn parse_nodes(html: &str) -> Result<Vec<Node>, ParseError> {
    let (protected, stash) = stash_raw_text(html);
    let dom = tl::parse(&protected, tl::ParserOptions::default())
        .map_err(|e| ParseError(e.to_string()))?;
    let parser = dom.parser();

    Ok(dom
        .children()
        .iter()
        .filter_map(|handle| convert(*handle, parser, &stash))
        .collect())
}

fn convert(handle: tl::NodeHandle, parser: &tl::Parser, stash: &[String]) -> Option<Node> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().to_ascii_lowercase();
            let raw = tag.raw().as_utf8_str();
            let start = start_tag(&raw);

            let mut attrs: Vec<(usize, String, Option<String>)> = tag
                .attributes()
                .iter()
                .map(|(key, value)| {
                    let key: &str = key.as_ref();
                    let key = key.to_ascii_lowercase();
                    let position = attr_position(start, &key);
                    let value = value.map(|v| unescape(v.as_ref()).into_owned());
                    (position, key, value)
                })
                .collect();
            attrs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

            let mut element = Element::new(name);
            element.attrs = attrs.into_iter().map(|(_, k, v)| (k, v)).collect();
            element.children = tag
                .children()
                .top()
                .iter()
                .filter_map(|child| convert(*child, parser, stash))
                .collect();
            Some(Node::Element(element))
        }
        tl::Node::Raw(bytes) => Some(Node::Text(restore_raw_text(&bytes.as_utf8_str(), stash))),
        tl::Node::Comment(bytes) => Some(Node::Comment(bytes.as_utf8_str().into_owned())),
    }
}

/// The `<tag ...>` part of a raw tag, honoring quoted `>`.
fn start_tag(raw: &str) -> &str {
    let mut quote = None;
    for (i, c) in raw.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '>') => return &raw[..=i],
            _ => {}
        }
    }
    raw
}

/// Byte offset of attribute `key` in a start tag, for source ordering.
fn attr_position(start_tag: &str, key: &str) -> usize {
    let lower = start_tag.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut from = 0;
    while let Some(found) = lower[from..].find(key) {
        let at = from + found;
        let before_ok = at > 0 && bytes[at - 1].is_ascii_whitespace();
        let after = bytes.get(at + key.len()).copied();
        let after_ok = matches!(after, Some(b'=' | b'>' | b'/') | None)
            || after.is_some_and(|b| b.is_ascii_whitespace());
        if before_ok && after_ok {
            return at;
        }
        from = at + key.len();
    }
    usize::MAX
}

/// Replace `<script>`/`<style>` contents with markers so the parser never
/// interprets them. Returns the protected HTML and the stashed contents.
fn stash_raw_text(html: &str) -> (String, Vec<String>) {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut stash = Vec::new();
    let mut pos = 0;

    while let Some((open_start, tag)) = next_raw_open(&lower, pos) {
        let Some(open_end) = lower[open_start..].find('>').map(|i| open_start + i + 1) else {
            break;
        };
        let close_pat = format!("</{tag}");
        let Some(close_start) = lower[open_end..].find(&close_pat).map(|i| open_end + i) else {
            break;
        };

        out.push_str(&html[pos..open_end]);
        let content = &html[open_end..close_start];
        if !content.is_empty() {
            let _ = write!(out, "{RAW_MARK}{}{RAW_MARK}", stash.len());
            stash.push(content.to_string());
        }
        pos = close_start;
    }
    out.push_str(&html[pos..]);
    (out, stash)
}

fn next_raw_open(lower: &str, from: usize) -> Option<(usize, &'static str)> {
    ["script", "style"]
        .into_iter()
        .filter_map(|tag| {
            let pat = format!("<{tag}");
            let mut search = from;
            while let Some(i) = lower[search..].find(&pat) {
                let at = search + i;
                let next = lower.as_bytes().get(at + pat.len()).copied();
                if matches!(next, Some(b'>' | b'/')) || next.is_some_and(|b| b.is_ascii_whitespace())
                {
                    return Some((at, tag));
                }
                search = at + pat.len();
            }
            None
        })
        .min_by_key(|(at, _)| *at)
}

fn restore_raw_text(text: &str, stash: &[String]) -> String {
    if !text.contains(RAW_MARK) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut parts = text.split(RAW_MARK);
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    // Parts alternate: index, literal, index, literal...
    let mut is_index = true;
    for part in parts {
        if is_index {
            match part.parse::<usize>().ok().and_then(|i| stash.get(i)) {
                Some(raw) => out.push_str(raw),
                None => {
                    out.push(RAW_MARK);
                    out.push_str(part);
                }
            }
        } else {
            out.push_str(part);
        }
        is_index = !is_index;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Home &amp; Away</title>
  <meta name="description" content="Fish &amp; chips">
  <link rel="canonical" href="https://example.com/">
  <script type="application/ld+json">{"name": "<b>x</b>"}</script>
</head>
<body>
  <!-- nav -->
  <header><h1>Welcome</h1></header>
  <main id="app"><p>Reference content</p></main>
  <script>if (a < b && c > d) { run(); }</script>
</body>
</html>
"#;

    #[test]
    fn test_roundtrip_structure() {
        let doc = Document::parse(PAGE).unwrap();
        assert_eq!(doc.doctype.as_deref(), Some("<!DOCTYPE html>\n"));

        let html = doc.element("html").unwrap();
        assert_eq!(html.attr("lang"), Some("en"));
        assert_eq!(doc.element("title").unwrap().text(), "Home & Away");

        let description = doc.find(&|e| e.tag == "meta" && e.attr_is("name", "description"));
        assert_eq!(description.unwrap().attr("content"), Some("Fish & chips"));
        assert!(doc.find(&|e| e.attr_has_token("rel", "canonical")).is_some());
    }

    #[test]
    fn test_serialize_reparse_is_stable() {
        let doc = Document::parse(PAGE).unwrap();
        let once = doc.to_html();
        let twice = Document::parse(&once).unwrap().to_html();
        assert_eq!(once, twice);
        assert!(once.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(once.contains("<meta charset=\"UTF-8\">"));
        assert!(!once.contains("</meta>"));
        assert!(once.contains("<!-- nav -->"));
    }

    #[test]
    fn test_raw_text_preserved() {
        let doc = Document::parse(PAGE).unwrap();
        let html = doc.to_html();
        assert!(html.contains(r#"{"name": "<b>x</b>"}"#));
        assert!(html.contains("if (a < b && c > d) { run(); }"));
        let scripts = doc.find_all(&|e| e.tag == "script");
        assert_eq!(scripts.len(), 2);
    }

    #[test]
    fn test_mutation() {
        let mut doc = Document::parse(PAGE).unwrap();
        doc.element_mut("title").unwrap().set_text("A <b> & C");
        doc.find_mut(&|e| e.attr_is("id", "app"))
            .unwrap()
            .set_inner_html("<section><p>New</p></section>")
            .unwrap();
        let head = doc.element_mut("head").unwrap();
        head.push(Element::new("meta").with_attr("name", "robots").with_attr("content", "noindex, nofollow"));

        let html = doc.to_html();
        assert!(html.contains("<title>A &lt;b&gt; &amp; C</title>"));
        assert!(html.contains(r#"<main id="app"><section><p>New</p></section></main>"#));
        assert!(!html.contains("Reference content"));
        assert!(html.contains(r#"<meta name="robots" content="noindex, nofollow">"#));
    }

    #[test]
    fn test_remove_all() {
        let mut doc = Document::parse(PAGE).unwrap();
        let removed = doc.remove_all(&|e| e.tag == "script");
        assert_eq!(removed, 2);
        assert!(doc.find_all(&|e| e.tag == "script").is_empty());
    }

    #[test]
    fn test_attribute_order_and_escaping() {
        let doc = Document::parse(r#"<a href="/x?a=1&amp;b=2" class="btn" data-q='say "hi"' hidden>Go</a>"#)
            .unwrap();
        let a = doc.element("a").unwrap();
        let keys: Vec<&str> = a.attrs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["href", "class", "data-q", "hidden"]);
        assert_eq!(a.attr("href"), Some("/x?a=1&b=2"));
        assert_eq!(
            a.to_html(),
            r#"<a href="/x?a=1&amp;b=2" class="btn" data-q="say &quot;hi&quot;" hidden>Go</a>"#
        );
    }

    #[test]
    fn test_split_doctype() {
        assert_eq!(split_doctype("<p>x</p>"), (None, "<p>x</p>"));
        assert_eq!(
            split_doctype("<!doctype html><html></html>"),
            (Some("<!doctype html>"), "<html></html>")
        );
        assert_eq!(split_doctype("<p>Résumé</p>"), (None, "<p>Résumé</p>"));
    }

    #[test]
    fn test_parse_multibyte_prefix() {
        let doc = Document::parse("<title>Résumé</title>").unwrap();
        assert_eq!(doc.element("title").map(Element::text).as_deref(), Some("Résumé"));
    }

    #[test]
    fn test_stash_raw_text() {
        let (protected, stash) = stash_raw_text("<style>a>b{}</style><SCRIPT src=x></SCRIPT><scripts>");
        assert_eq!(stash, ["a>b{}"]);
        assert!(!protected.contains("a>b"));
        assert_eq!(restore_raw_text(&format!("{RAW_MARK}0{RAW_MARK}"), &stash), "a>b{}");
    }

    #[test]
    fn test_start_tag_and_position() {
        assert_eq!(start_tag(r#"<a title="x>y" href="/">z</a>"#), r#"<a title="x>y" href="/">"#);
        let start = r#"<meta content="name" name="description">"#;
        assert!(attr_position(start, "content") < attr_position(start, "name"));
    }
}
