//! Rendered post HTML to content tree

use super::{Element, push_merged, youtube_id};
use scraper::{ElementRef, Node};

pub(super) fn parse(root: ElementRef<'_>) -> Vec<Element> {
    let mut out = children(root);
    trim_edges(&mut out);
    out
}

fn children(element: ElementRef<'_>) -> Vec<Element> {
    let mut out = Vec::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if let Some(text) = clean_text(text) {
                    push_merged(&mut out, Element::Text(text));
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    parse_element(child, &mut out);
                }
            }
            _ => {}
        }
    }
    out
}

/// Source newlines and the indentation after them are template noise; the
/// forum renders real line breaks as `<br>`. A newline between words still
/// separates them like any whitespace.
fn clean_text(raw: &str) -> Option<String> {
    if raw.contains('\n') && raw.trim().is_empty() {
        return None;
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {}
            '\n' => {
                while matches!(chars.peek(), Some(' ' | '\t' | '\r' | '\n')) {
                    chars.next();
                }
                if chars.peek().is_some() && !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            '\t' => out.push(' '),
            c => out.push(c),
        }
    }
    Some(out)
}

fn inline(element: ElementRef<'_>, out: &mut Vec<Element>) {
    for child in children(element) {
        push_merged(out, child);
    }
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Value of a single declaration in an inline `style` attribute
fn style_value(element: ElementRef<'_>, property: &str) -> Option<String> {
    element
        .value()
        .attr("style")?
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(property))
        .map(|(_, value)| value.trim().to_string())
}

fn alignment(element: ElementRef<'_>) -> Option<String> {
    element
        .value()
        .attr("align")
        .map(str::to_string)
        .or_else(|| style_value(element, "text-align"))
        .map(|a| a.to_ascii_lowercase())
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn parse_element(element: ElementRef<'_>, out: &mut Vec<Element>) {
    let node = element.value();
    let parsed = match node.name() {
        "br" => Element::LineBreak,
        "b" | "strong" => Element::Bold(children(element)),
        "i" | "em" => Element::Italic(children(element)),
        "u" => Element::Underline(children(element)),
        "strike" | "s" | "del" => Element::Strikethrough(children(element)),
        "font" => {
            let mut inner = children(element);
            if let Some(size) = node.attr("size") {
                inner = vec![Element::Size {
                    size: size.to_string(),
                    children: inner,
                }];
            }
            if let Some(color) = node.attr("color") {
                inner = vec![Element::Color {
                    color: color.to_string(),
                    children: inner,
                }];
            }
            for child in inner {
                push_merged(out, child);
            }
            return;
        }
        "span" => match style_value(element, "color") {
            Some(color) => Element::Color {
                color,
                children: children(element),
            },
            None => return inline(element, out),
        },
        "a" => match node.attr("href") {
            Some(href) if !href.starts_with("javascript:") && !href.starts_with('#') => {
                Element::Link {
                    url: href.to_string(),
                    children: children(element),
                }
            }
            _ => return inline(element, out),
        },
        "img" => match node.attr("src") {
            Some(src) => Element::Image {
                url: src.to_string(),
            },
            None => return,
        },
        "iframe" => match node.attr("src") {
            Some(src) if src.contains("youtube") || src.contains("youtu.be") => Element::Video {
                id: youtube_id(src),
            },
            _ => return,
        },
        "pre" => Element::Code(text_of(element)),
        "ul" | "ol" => Element::List {
            ordered: node.name() == "ol",
            items: element
                .child_elements()
                .filter(|li| li.value().name() == "li")
                .map(|li| {
                    let mut item = children(li);
                    trim_edges(&mut item);
                    item
                })
                .collect(),
        },
        "script" | "style" | "input" | "noscript" => return,
        "div" if has_class(element, "codeblock") => {
            let code = element
                .select(selector!("pre"))
                .next()
                .map(text_of)
                .unwrap_or_else(|| text_of(element));
            Element::Code(code)
        }
        "div" if has_class(element, "quote") => quote(element),
        "div" if has_class(element, "spoiler") => spoiler(element),
        "div" | "p" => match alignment(element).as_deref() {
            Some("center") => Element::Center(children(element)),
            Some("left") => Element::Left(children(element)),
            Some("right") => Element::Right(children(element)),
            _ => return inline(element, out),
        },
        _ => return inline(element, out),
    };
    push_merged(out, parsed);
}

fn quote(element: ElementRef<'_>) -> Element {
    let author = element
        .select(selector!(".quote-author strong"))
        .next()
        .map(|a| text_of(a).trim().to_string())
        .filter(|a| !a.is_empty());
    let mut body = match element.select(selector!(".quote-content")).next() {
        Some(content) => children(content),
        None => children(element),
    };
    trim_edges(&mut body);
    Element::Quote {
        author,
        children: body,
    }
}

fn spoiler(element: ElementRef<'_>) -> Element {
    let title = element
        .select(selector!(".spoiler-head"))
        .next()
        .map(|head| {
            let head = text_of(head);
            let head = head.trim();
            let head = head.strip_prefix("Spoiler").unwrap_or(head);
            let head = head.strip_prefix(':').unwrap_or(head);
            head.trim().to_string()
        })
        .filter(|t| !t.is_empty());
    let mut body = match element.select(selector!(".spoiler-body")).next() {
        Some(content) => children(content),
        None => Vec::new(),
    };
    trim_edges(&mut body);
    Element::Spoiler {
        title,
        children: body,
    }
}

fn trim_edges(elements: &mut Vec<Element>) {
    if let Some(Element::Text(first)) = elements.first_mut() {
        *first = first.trim_start().to_string();
        if first.is_empty() {
            elements.remove(0);
        }
    }
    if let Some(Element::Text(last)) = elements.last_mut() {
        let trimmed = last.trim_end().len();
        last.truncate(trimmed);
        if last.is_empty() {
            elements.pop();
        }
    }
}
