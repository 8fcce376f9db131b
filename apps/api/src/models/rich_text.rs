//! HTML captured from the browser's editable region.
//!
//! The editing surface itself lives in the browser; this type only carries its
//! `getHTML()`/`setHTML()` value and converts it to plain text (for prompts and
//! the PDF) and to a tag-allowlisted form (for the preview).

use serde::{Deserialize, Deserializer, Serialize};

const FORMATTING_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "ul", "ol", "li", "br", "p", "div", "span",
];
const BLOCK_TAGS: &[&str] = &["p", "div", "li", "ul", "ol"];
/// Tags whose content is dropped along with the tag.
const OPAQUE_TAGS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RichText(String);

impl RichText {
    pub fn from_html(html: impl Into<String>) -> Self {
        RichText(html.into())
    }

    /// Escapes `text` and turns its line breaks into `<br>`.
    pub fn from_plain_text(text: &str) -> Self {
        RichText(escape_html(text).replace('\n', "<br>"))
    }

    pub fn as_html(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.to_plain_text().trim().is_empty()
    }

    /// Text content with block boundaries and `<br>` as newlines.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        let mut rest = self.0.as_str();

        while let Some(start) = rest.find('<') {
            out.push_str(&rest[..start]);
            rest = &rest[start..];

            if let Some(after) = skip_comment(rest) {
                rest = after;
                continue;
            }

            match scan_tag(rest) {
                Some((tag, len)) => {
                    if tag.name == "br" {
                        out.push('\n');
                    } else if BLOCK_TAGS.contains(&tag.name.as_str()) {
                        ensure_line_break(&mut out);
                    }
                    rest = &rest[len..];
                    if !tag.closing && OPAQUE_TAGS.contains(&tag.name.as_str()) {
                        rest = skip_past_closing(rest, &tag.name);
                    }
                }
                None => {
                    out.push('<');
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);

        decode_entities(&out).trim_end_matches('\n').to_string()
    }

    /// The HTML restricted to formatting tags, with every attribute removed.
    pub fn sanitized_html(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut rest = self.0.as_str();

        while let Some(start) = rest.find('<') {
            out.push_str(&rest[..start]);
            rest = &rest[start..];

            if let Some(after) = skip_comment(rest) {
                rest = after;
                continue;
            }

            match scan_tag(rest) {
                Some((tag, len)) => {
                    rest = &rest[len..];
                    if FORMATTING_TAGS.contains(&tag.name.as_str()) {
                        match (tag.closing, tag.name.as_str()) {
                            (true, "br") => {}
                            (true, name) => {
                                out.push_str("</");
                                out.push_str(name);
                                out.push('>');
                            }
                            (false, name) => {
                                out.push('<');
                                out.push_str(name);
                                out.push('>');
                            }
                        }
                    } else if !tag.closing && OPAQUE_TAGS.contains(&tag.name.as_str()) {
                        rest = skip_past_closing(rest, &tag.name);
                    }
                }
                None => {
                    out.push_str("&lt;");
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl From<&str> for RichText {
    fn from(html: &str) -> Self {
        RichText::from_html(html)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRichText {
    Html(String),
    Lines(Vec<String>),
}

// Older drafts stored responsibilities as an array of lines.
impl<'de> Deserialize<'de> for RichText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawRichText::deserialize(deserializer)? {
            RawRichText::Html(html) => RichText(html),
            RawRichText::Lines(lines) => RichText::from_plain_text(&lines.join("\n")),
        })
    }
}

struct Tag {
    name: String,
    closing: bool,
}

/// Parses the tag at the start of `rest` (which begins with `<`).
/// Returns the tag and its length in bytes including the closing `>`.
fn scan_tag(rest: &str) -> Option<(Tag, usize)> {
    let end = rest.find('>')?;
    let inner = &rest[1..end];
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(inner) => (true, inner),
        None => (false, inner),
    };
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    Some((Tag { name, closing }, end + 1))
}

fn skip_comment(rest: &str) -> Option<&str> {
    let body = rest.strip_prefix("<!--")?;
    Some(body.find("-->").map_or("", |end| &body[end + 3..]))
}

fn skip_past_closing<'a>(rest: &'a str, name: &str) -> &'a str {
    let closing = format!("</{name}");
    let lower = rest.to_ascii_lowercase();
    match lower.find(&closing) {
        Some(start) => match rest[start..].find('>') {
            Some(end) => &rest[start + end + 1..],
            None => "",
        },
        None => "",
    }
}

fn ensure_line_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
