//! Post body model
//!
//! Forum posts, private messages, shouts and signatures are rich text. The
//! forum stores them as BBCode and renders them as HTML; [`Content`] sits in
//! between as a tree of tagged fragments that can be read from the rendered
//! HTML, written back out as BBCode, and parsed from BBCode typed by a user.
//!
//! ```
//! use epvp_api::{Content, Element};
//!
//! let mut content = Content::text("Hello ");
//! content.push(Element::Bold(vec![Element::Text("world".into())]));
//! assert_eq!(content.to_bbcode(), "Hello [B]world[/B]");
//!
//! let parsed = Content::from_bbcode("Hello [B]world[/B]");
//! assert_eq!(parsed, content);
//! ```

mod bbcode;
mod html;

use serde::Serialize;
use std::fmt;

/// A single formatted fragment of a post body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Element {
    Text(String),
    LineBreak,
    Bold(Vec<Element>),
    Italic(Vec<Element>),
    Underline(Vec<Element>),
    Strikethrough(Vec<Element>),
    Color {
        color: String,
        children: Vec<Element>,
    },
    Size {
        size: String,
        children: Vec<Element>,
    },
    Center(Vec<Element>),
    Left(Vec<Element>),
    Right(Vec<Element>),
    Link {
        url: String,
        children: Vec<Element>,
    },
    Image {
        url: String,
    },
    /// Embedded YouTube video, identified by its video id
    Video {
        id: String,
    },
    /// Preformatted code; never interpreted further
    Code(String),
    Quote {
        author: Option<String>,
        children: Vec<Element>,
    },
    Spoiler {
        title: Option<String>,
        children: Vec<Element>,
    },
    List {
        ordered: bool,
        items: Vec<Vec<Element>>,
    },
}

impl Element {
    /// Nested fragments of a container element
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Bold(c)
            | Element::Italic(c)
            | Element::Underline(c)
            | Element::Strikethrough(c)
            | Element::Center(c)
            | Element::Left(c)
            | Element::Right(c) => c,
            Element::Color { children, .. }
            | Element::Size { children, .. }
            | Element::Link { children, .. }
            | Element::Quote { children, .. }
            | Element::Spoiler { children, .. } => children,
            _ => &[],
        }
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a Element>, pred: &dyn Fn(&Element) -> bool) {
        if pred(self) {
            out.push(self);
        }
        for child in self.children() {
            child.walk(out, pred);
        }
        if let Element::List { items, .. } = self {
            for child in items.iter().flatten() {
                child.walk(out, pred);
            }
        }
    }
}

/// Rich text body of a post, message or shout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Content {
    elements: Vec<Element>,
}

impl Content {
    pub fn new(elements: Vec<Element>) -> Self {
        let mut content = Self::default();
        for element in elements {
            content.push(element);
        }
        content
    }

    /// Content made of a single text fragment
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![Element::Text(text.into())])
    }

    /// Append an element, merging adjacent text fragments
    pub fn push(&mut self, element: Element) {
        push_merged(&mut self.elements, element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Render as BBCode, the format the forum accepts in its forms
    pub fn to_bbcode(&self) -> String {
        let mut out = String::new();
        bbcode::render(&self.elements, &mut out);
        out
    }

    /// Parse BBCode into content; unknown or unbalanced tags stay literal text
    pub fn from_bbcode(text: &str) -> Self {
        Self::new(bbcode::parse(text))
    }

    /// Build content from the rendered HTML of a post body
    pub fn from_html(element: scraper::ElementRef<'_>) -> Self {
        Self::new(html::parse(element))
    }

    /// Text of the content without any formatting
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        plain_text(&self.elements, &mut out);
        out
    }

    /// All quotes, including nested ones, in document order
    pub fn quotes(&self) -> Vec<&Element> {
        self.find(&|e| matches!(e, Element::Quote { .. }))
    }

    pub fn spoilers(&self) -> Vec<&Element> {
        self.find(&|e| matches!(e, Element::Spoiler { .. }))
    }

    /// Urls of all embedded images
    pub fn images(&self) -> Vec<&str> {
        self.find(&|e| matches!(e, Element::Image { .. }))
            .into_iter()
            .filter_map(|e| match e {
                Element::Image { url } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Targets of all links
    pub fn links(&self) -> Vec<&str> {
        self.find(&|e| matches!(e, Element::Link { .. }))
            .into_iter()
            .filter_map(|e| match e {
                Element::Link { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        for element in &self.elements {
            element.walk(&mut out, pred);
        }
        out
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::text(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::text(text)
    }
}

impl From<Vec<Element>> for Content {
    fn from(elements: Vec<Element>) -> Self {
        Content::new(elements)
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain_text())
    }
}

/// Push onto a fragment list, merging with a preceding text fragment
pub(crate) fn push_merged(list: &mut Vec<Element>, element: Element) {
    if let Element::Text(text) = &element {
        if text.is_empty() {
            return;
        }
        if let Some(Element::Text(last)) = list.last_mut() {
            last.push_str(text);
            return;
        }
    }
    list.push(element);
}

/// Video id from an embed url, a watch url, a short link or a bare id
pub(crate) fn youtube_id(source: &str) -> String {
    let source = source.trim();
    if let Some((_, query)) = source.split_once("v=") {
        return query.split(['&', '#']).next().unwrap_or_default().to_string();
    }
    source
        .split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .unwrap_or(source)
        .to_string()
}

fn plain_text(elements: &[Element], out: &mut String) {
    for element in elements {
        match element {
            Element::Text(text) | Element::Code(text) => out.push_str(text),
            Element::LineBreak => out.push('\n'),
            Element::Image { .. } | Element::Video { .. } => {}
            Element::List { items, .. } => {
                for item in items {
                    plain_text(item, out);
                    out.push('\n');
                }
            }
            other => plain_text(other.children(), out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Element {
        Element::Text(s.to_string())
    }

    #[test]
    fn test_push_merges_text() {
        let mut content = Content::text("a");
        content.push(text("b"));
        content.push(Element::LineBreak);
        content.push(text("c"));
        content.push(text(""));
        assert_eq!(
            content.elements(),
            &[text("ab"), Element::LineBreak, text("c")]
        );
    }

    #[test]
    fn test_plain_text_skips_media() {
        let content = Content::new(vec![
            text("see "),
            Element::Image {
                url: "https://i.imgur.com/x.png".into(),
            },
            Element::Bold(vec![text("this")]),
            Element::LineBreak,
            Element::Link {
                url: "https://example.com".into(),
                children: vec![text("link")],
            },
        ]);
        assert_eq!(content.plain_text(), "see this\nlink");
    }

    #[test]
    fn test_queries_are_recursive() {
        let content = Content::new(vec![Element::Quote {
            author: Some("outer".into()),
            children: vec![
                Element::Quote {
                    author: None,
                    children: vec![Element::Image { url: "a.png".into() }],
                },
                Element::List {
                    ordered: false,
                    items: vec![vec![Element::Link {
                        url: "https://x.y".into(),
                        children: vec![],
                    }]],
                },
            ],
        }]);

        assert_eq!(content.quotes().len(), 2);
        assert_eq!(content.images(), vec!["a.png"]);
        assert_eq!(content.links(), vec!["https://x.y"]);
        assert!(content.spoilers().is_empty());
    }

    #[test]
    fn test_youtube_id_forms() {
        assert_eq!(youtube_id("dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=4"), "dQw4w9WgXcQ");
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(
            youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ?wmode=opaque"),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_serializes_as_tagged_list() {
        let content = Content::new(vec![text("hi"), Element::Bold(vec![text("b")])]);
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json[0]["type"], "text");
        assert_eq!(json[0]["value"], "hi");
        assert_eq!(json[1]["type"], "bold");
        assert_eq!(json[1]["value"][0]["value"], "b");
    }
}
