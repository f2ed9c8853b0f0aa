//! Small HTML element builder. Text and attribute values are always
//! escaped; tag and attribute names are compile-time strings.

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Markup that was produced by this builder earlier.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    classes: Vec<String>,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn class<S: Into<String>>(mut self, class: S) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn class_if<S: Into<String>>(self, condition: bool, class: S) -> Self {
        if condition {
            self.class(class)
        } else {
            self
        }
    }

    pub fn attr<S: Into<String>>(mut self, name: &'static str, value: S) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Inserts already-rendered markup verbatim. Only for output of
    /// [`Element::render`].
    pub fn raw<S: Into<String>>(mut self, html: S) -> Self {
        self.children.push(Node::Raw(html.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children<I: IntoIterator<Item = Element>>(mut self, children: I) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape_attr(&self.classes.join(" ")));
            out.push('"');
        }
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(out),
                Node::Text(text) => out.push_str(&escape_text(text)),
                Node::Raw(html) => out.push_str(html),
            }
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

pub fn render_all(elements: &[Element]) -> String {
    let mut out = String::new();
    for element in elements {
        element.write_to(&mut out);
    }
    out
}

pub fn escape_text(raw: &str) -> Cow<'_, str> {
    escape(raw, false)
}

pub fn escape_attr(raw: &str) -> Cow<'_, str> {
    escape(raw, true)
}

fn escape(raw: &str, quotes: bool) -> Cow<'_, str> {
    let needs_escape = |ch: char| matches!(ch, '&' | '<' | '>') || (quotes && matches!(ch, '"' | '\''));
    if !raw.contains(needs_escape) {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            '\'' if quotes => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_children() {
        let html = Element::new("p").text("<script>alert('x')</script> & co").render();
        assert_eq!(
            html,
            "<p>&lt;script&gt;alert('x')&lt;/script&gt; &amp; co</p>"
        );
    }

    #[test]
    fn escapes_attribute_values() {
        let html = Element::new("a")
            .attr("href", "x\" onclick=\"steal()")
            .class("link")
            .render();
        assert_eq!(
            html,
            "<a class=\"link\" href=\"x&quot; onclick=&quot;steal()\"></a>"
        );
    }

    #[test]
    fn nests_and_orders_children() {
        let html = Element::new("div")
            .class("card")
            .class_if(false, "active")
            .class_if(true, "wide")
            .child(Element::new("h5").text("Title"))
            .text("tail")
            .render();
        assert_eq!(html, "<div class=\"card wide\"><h5>Title</h5>tail</div>");
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_text("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_attr("it's"), "it&#39;s");
        assert_eq!(escape_text("it's"), "it's");
    }
}
