//! BBCode rendering and parsing

use super::{Element, push_merged};

pub(super) fn render(elements: &[Element], out: &mut String) {
    for element in elements {
        match element {
            Element::Text(text) => out.push_str(text),
            Element::LineBreak => out.push('\n'),
            Element::Bold(c) => wrap(out, "B", None, c),
            Element::Italic(c) => wrap(out, "I", None, c),
            Element::Underline(c) => wrap(out, "U", None, c),
            Element::Strikethrough(c) => wrap(out, "STRIKE", None, c),
            Element::Color { color, children } => wrap(out, "COLOR", Some(color), children),
            Element::Size { size, children } => wrap(out, "SIZE", Some(size), children),
            Element::Center(c) => wrap(out, "CENTER", None, c),
            Element::Left(c) => wrap(out, "LEFT", None, c),
            Element::Right(c) => wrap(out, "RIGHT", None, c),
            Element::Link { url, children } => {
                let bare = children.is_empty()
                    || matches!(children.as_slice(), [Element::Text(t)] if t == url);
                if bare {
                    raw(out, "URL", url);
                } else {
                    wrap(out, "URL", Some(url), children);
                }
            }
            Element::Image { url } => raw(out, "IMG", url),
            Element::Video { id } => raw(out, "YOUTUBE", id),
            Element::Code(code) => raw(out, "CODE", code),
            Element::Quote { author, children } => wrap(out, "QUOTE", author.as_ref(), children),
            Element::Spoiler { title, children } => {
                wrap(out, "SPOILER", title.as_ref(), children)
            }
            Element::List { ordered, items } => {
                out.push_str(if *ordered { "[LIST=1]" } else { "[LIST]" });
                for item in items {
                    out.push_str("[*]");
                    render(item, out);
                }
                out.push_str("[/LIST]");
            }
        }
    }
}

fn wrap(out: &mut String, tag: &str, arg: Option<&String>, children: &[Element]) {
    out.push('[');
    out.push_str(tag);
    if let Some(arg) = arg {
        out.push('=');
        out.push_str(arg);
    }
    out.push(']');
    render(children, out);
    out.push_str("[/");
    out.push_str(tag);
    out.push(']');
}

fn raw(out: &mut String, tag: &str, body: &str) {
    out.push_str(&format!("[{tag}]{body}[/{tag}]"));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Bold,
    Italic,
    Underline,
    Strike,
    Color,
    Size,
    Center,
    Left,
    Right,
    Url,
    Img,
    Youtube,
    Code,
    Quote,
    Spoiler,
    List,
    Item,
}

impl Tag {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_uppercase().as_str() {
            "B" => Tag::Bold,
            "I" => Tag::Italic,
            "U" => Tag::Underline,
            "S" | "STRIKE" => Tag::Strike,
            "COLOR" => Tag::Color,
            "SIZE" => Tag::Size,
            "CENTER" => Tag::Center,
            "LEFT" => Tag::Left,
            "RIGHT" => Tag::Right,
            "URL" => Tag::Url,
            "IMG" => Tag::Img,
            "YOUTUBE" => Tag::Youtube,
            "CODE" | "PHP" => Tag::Code,
            "QUOTE" => Tag::Quote,
            "SPOILER" => Tag::Spoiler,
            "LIST" => Tag::List,
            "*" => Tag::Item,
            _ => return None,
        })
    }

    /// Tags whose body is taken verbatim up to the closing tag
    fn is_raw(self, arg: Option<&str>) -> bool {
        match self {
            Tag::Img | Tag::Youtube | Tag::Code => true,
            Tag::Url => arg.is_none(),
            _ => false,
        }
    }

    fn requires_arg(self) -> bool {
        matches!(self, Tag::Color | Tag::Size)
    }
}

struct Frame {
    tag: Option<Tag>,
    arg: Option<String>,
    opening: String,
    children: Vec<Element>,
    items: Vec<Vec<Element>>,
    in_item: bool,
}

impl Frame {
    fn new(tag: Option<Tag>, arg: Option<String>, opening: &str) -> Self {
        Self {
            tag,
            arg,
            opening: opening.to_string(),
            children: Vec::new(),
            items: Vec::new(),
            in_item: false,
        }
    }

    fn into_element(mut self) -> Element {
        let children = std::mem::take(&mut self.children);
        match self.tag {
            Some(Tag::Bold) => Element::Bold(children),
            Some(Tag::Italic) => Element::Italic(children),
            Some(Tag::Underline) => Element::Underline(children),
            Some(Tag::Strike) => Element::Strikethrough(children),
            Some(Tag::Color) => Element::Color {
                color: self.arg.unwrap_or_default(),
                children,
            },
            Some(Tag::Size) => Element::Size {
                size: self.arg.unwrap_or_default(),
                children,
            },
            Some(Tag::Center) => Element::Center(children),
            Some(Tag::Left) => Element::Left(children),
            Some(Tag::Right) => Element::Right(children),
            Some(Tag::Url) => Element::Link {
                url: self.arg.unwrap_or_default(),
                children,
            },
            Some(Tag::Quote) => Element::Quote {
                author: self.arg.map(quote_author),
                children,
            },
            Some(Tag::Spoiler) => Element::Spoiler {
                title: self.arg.filter(|t| !t.is_empty()),
                children,
            },
            Some(Tag::List) => {
                if self.in_item {
                    self.items.push(children);
                }
                Element::List {
                    ordered: self.arg.is_some(),
                    items: self.items.into_iter().map(trim_item).collect(),
                }
            }
            // Raw and item tags never get a frame; the root is never converted
            _ => Element::Bold(children),
        }
    }

    /// Give up on a frame that was never closed: its opening tag becomes text
    fn into_literal(self, parent: &mut Vec<Element>) {
        push_merged(parent, Element::Text(self.opening));
        for item in self.items {
            push_merged(parent, Element::Text("[*]".to_string()));
            for element in item {
                push_merged(parent, element);
            }
        }
        if self.tag == Some(Tag::List) && self.in_item {
            push_merged(parent, Element::Text("[*]".to_string()));
        }
        for element in self.children {
            push_merged(parent, element);
        }
    }
}

/// `[QUOTE=name;12345]` carries the quoted post id after the name
fn quote_author(arg: String) -> String {
    match arg.split_once(';') {
        Some((name, _)) => name.to_string(),
        None => arg,
    }
}

fn trim_item(mut item: Vec<Element>) -> Vec<Element> {
    while matches!(item.last(), Some(Element::LineBreak)) {
        item.pop();
    }
    if let Some(Element::Text(text)) = item.last_mut() {
        let trimmed = text.trim_end().len();
        text.truncate(trimmed);
        if text.is_empty() {
            item.pop();
        }
    }
    item
}

fn push_text(list: &mut Vec<Element>, text: &str) {
    let mut lines = text.split('\n');
    if let Some(first) = lines.next() {
        push_merged(list, Element::Text(first.replace('\r', "")));
    }
    for line in lines {
        list.push(Element::LineBreak);
        push_merged(list, Element::Text(line.replace('\r', "")));
    }
}

fn raw_element(tag: Tag, body: &str) -> Element {
    match tag {
        Tag::Img => Element::Image {
            url: body.trim().to_string(),
        },
        Tag::Youtube => Element::Video {
            id: super::youtube_id(body.trim()),
        },
        Tag::Url => Element::Link {
            url: body.trim().to_string(),
            children: vec![Element::Text(body.to_string())],
        },
        _ => Element::Code(body.to_string()),
    }
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

pub(super) fn parse(input: &str) -> Vec<Element> {
    let mut stack = vec![Frame::new(None, None, "")];
    let mut pos = 0;

    let tag = regex!(r"\[(/?)([A-Za-z]+|\*)(?:=([^\]\[]*))?\]");
    while let Some(caps) = tag.captures_at(input, pos) {
        let Some(whole) = caps.get(0) else { break };
        push_text(current(&mut stack), &input[pos..whole.start()]);
        pos = whole.end();

        let literal = whole.as_str();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps.get(2).map_or("", |m| m.as_str());
        let arg = caps
            .get(3)
            .map(|m| m.as_str().trim().trim_matches(['"', '\'']).to_string());

        let Some(tag) = Tag::from_name(name) else {
            push_text(current(&mut stack), literal);
            continue;
        };

        if closing {
            close(&mut stack, tag, literal);
            continue;
        }

        if tag == Tag::Item {
            let top = stack.len() - 1;
            if stack[top].tag == Some(Tag::List) {
                let frame = &mut stack[top];
                let children = std::mem::take(&mut frame.children);
                if frame.in_item {
                    frame.items.push(children);
                }
                frame.in_item = true;
            } else {
                push_text(current(&mut stack), literal);
            }
            continue;
        }

        if tag.is_raw(arg.as_deref()) {
            let closing_tag = format!("[/{}]", name);
            match find_ignore_case(&input[pos..], &closing_tag) {
                Some(offset) => {
                    let body = &input[pos..pos + offset];
                    current(&mut stack).push(raw_element(tag, body));
                    pos += offset + closing_tag.len();
                }
                None => push_text(current(&mut stack), literal),
            }
            continue;
        }

        if tag.requires_arg() && arg.as_deref().is_none_or(str::is_empty) {
            push_text(current(&mut stack), literal);
            continue;
        }

        stack.push(Frame::new(Some(tag), arg, literal));
    }
    push_text(current(&mut stack), &input[pos..]);

    while stack.len() > 1 {
        if let Some(frame) = stack.pop() {
            frame.into_literal(current(&mut stack));
        }
    }
    stack.pop().map(|root| root.children).unwrap_or_default()
}

fn current(stack: &mut [Frame]) -> &mut Vec<Element> {
    let top = stack.len() - 1;
    &mut stack[top].children
}

fn close(stack: &mut Vec<Frame>, tag: Tag, literal: &str) {
    let Some(index) = stack.iter().rposition(|f| f.tag == Some(tag)) else {
        push_text(current(stack), literal);
        return;
    };

    while stack.len() > index + 1 {
        if let Some(frame) = stack.pop() {
            frame.into_literal(current(stack));
        }
    }
    if let Some(frame) = stack.pop() {
        let element = frame.into_element();
        current(stack).push(element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> Element {
        Element::Text(s.to_string())
    }

    #[test]
    fn test_nested_formatting() {
        let parsed = parse("a [b]bold [i]both[/i][/b] c");
        assert_eq!(
            parsed,
            vec![
                text("a "),
                Element::Bold(vec![text("bold "), Element::Italic(vec![text("both")])]),
                text(" c"),
            ]
        );
    }

    #[test]
    fn test_quote_with_post_id() {
        let parsed = parse("[QUOTE=Mostey;123456]hi[/QUOTE]");
        assert_eq!(
            parsed,
            vec![Element::Quote {
                author: Some("Mostey".into()),
                children: vec![text("hi")],
            }]
        );
    }

    #[test]
    fn test_code_is_not_interpreted() {
        let parsed = parse("[code]let [b]x[/b] = 1;\n[/CODE]");
        assert_eq!(parsed, vec![Element::Code("let [b]x[/b] = 1;\n".into())]);
    }

    #[test]
    fn test_unknown_and_unbalanced_tags_stay_literal() {
        assert_eq!(parse("[foo]bar[/foo]"), vec![text("[foo]bar[/foo]")]);
        assert_eq!(parse("x[/b]y"), vec![text("x[/b]y")]);
        assert_eq!(
            parse("[b]open [i]inner[/i]"),
            vec![text("[b]open "), Element::Italic(vec![text("inner")])]
        );
        assert_eq!(parse("[img]no end"), vec![text("[img]no end")]);
        assert_eq!(parse("[color]x[/color]"), vec![text("[color]x[/color]")]);
    }

    #[test]
    fn test_crossed_tags_close_outer() {
        // [i] is abandoned when [b] closes around it
        let parsed = parse("[b]a[i]b[/b]c[/i]");
        assert_eq!(
            parsed,
            vec![Element::Bold(vec![text("a[i]b")]), text("c[/i]")]
        );
    }

    #[test]
    fn test_lists() {
        let parsed = parse("[LIST=1]\n[*]one\n[*][b]two[/b]\n[/LIST]");
        assert_eq!(
            parsed,
            vec![Element::List {
                ordered: true,
                items: vec![vec![text("one")], vec![Element::Bold(vec![text("two")])]],
            }]
        );
    }

    #[test]
    fn test_url_forms() {
        assert_eq!(
            parse("[url]https://x.y[/url]"),
            vec![Element::Link {
                url: "https://x.y".into(),
                children: vec![text("https://x.y")],
            }]
        );
        assert_eq!(
            parse("[URL=\"https://x.y\"]here[/URL]"),
            vec![Element::Link {
                url: "https://x.y".into(),
                children: vec![text("here")],
            }]
        );
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(
            parse("a\r\nb"),
            vec![text("a"), Element::LineBreak, text("b")]
        );
    }

    #[test]
    fn test_render() {
        let elements = vec![
            Element::Center(vec![Element::Color {
                color: "red".into(),
                children: vec![text("hot")],
            }]),
            Element::Link {
                url: "https://x.y".into(),
                children: vec![],
            },
            Element::Spoiler {
                title: None,
                children: vec![Element::Image { url: "i.png".into() }],
            },
            Element::List {
                ordered: false,
                items: vec![vec![text("a")], vec![text("b")]],
            },
        ];
        let mut out = String::new();
        render(&elements, &mut out);
        assert_eq!(
            out,
            "[CENTER][COLOR=red]hot[/COLOR][/CENTER][URL]https://x.y[/URL]\
             [SPOILER][IMG]i.png[/IMG][/SPOILER][LIST][*]a[*]b[/LIST]"
        );
    }

    #[test]
    fn test_render_then_parse_keeps_structure() {
        let elements = vec![
            Element::Quote {
                author: Some("someone".into()),
                children: vec![
                    Element::Spoiler {
                        title: Some("secret".into()),
                        children: vec![Element::Underline(vec![text("u")])],
                    },
                    Element::LineBreak,
                    Element::Video { id: "dQw4w9WgXcQ".into() },
                ],
            },
            Element::Size {
                size: "4".into(),
                children: vec![Element::Strikethrough(vec![text("gone")])],
            },
        ];
        let mut out = String::new();
        render(&elements, &mut out);
        assert_eq!(parse(&out), elements);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_parse_never_loses_plain_text(input in "[a-zA-Z0-9 .,!?]{0,120}") {
            let parsed = parse(&input);
            if input.is_empty() {
                prop_assert!(parsed.is_empty());
            } else {
                prop_assert_eq!(parsed, vec![Element::Text(input.clone())]);
            }
        }

        #[test]
        fn prop_parse_tolerates_garbage(input in "[\\[\\]/=*a-zA-Z \n]{0,80}") {
            let parsed = parse(&input);
            let mut out = String::new();
            render(&parsed, &mut out);
            // Whatever was recognised re-renders to something parseable again
            let _ = parse(&out);
        }
    }
}
