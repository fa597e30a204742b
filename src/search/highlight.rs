//! Emphasis of the query inside displayed titles and descriptions.
//!
//! Highlighting only produces a view over the original text; the stored strings are
//! never modified.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Emphasis(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted<'a> {
    pub segments: Vec<Segment<'a>>,
}

impl Highlighted<'_> {
    pub fn has_match(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Emphasis(_)))
    }

    /// Escaped HTML with the match wrapped in `<mark>`.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain(text) => out.push_str(&html_escape(text)),
                Segment::Emphasis(text) => {
                    out.push_str("<mark>");
                    out.push_str(&html_escape(text));
                    out.push_str("</mark>");
                }
            }
        }
        out
    }

    /// Plain text with the match wrapped in `open`/`close`, for terminals.
    pub fn to_marked(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain(text) => out.push_str(text),
                Segment::Emphasis(text) => {
                    out.push_str(open);
                    out.push_str(text);
                    out.push_str(close);
                }
            }
        }
        out
    }
}

/// Splits `text` around the first case-insensitive occurrence of `query`.
pub fn highlight<'a>(text: &'a str, query: &str) -> Highlighted<'a> {
    let query = query.trim();
    let Some((start, end)) = find_case_insensitive(text, query) else {
        return Highlighted {
            segments: vec![Segment::Plain(text)],
        };
    };

    let mut segments = Vec::with_capacity(3);
    if start > 0 {
        segments.push(Segment::Plain(&text[..start]));
    }
    segments.push(Segment::Emphasis(&text[start..end]));
    if end < text.len() {
        segments.push(Segment::Plain(&text[end..]));
    }
    Highlighted { segments }
}

// Compared char by char so offsets land on boundaries of the original string.
fn find_case_insensitive(text: &str, query: &str) -> Option<(usize, usize)> {
    if query.is_empty() {
        return None;
    }
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();

    for (start, _) in text.char_indices() {
        let mut remaining = needle.iter();
        let mut end = start;
        let mut matched = true;
        for (offset, c) in text[start..].char_indices() {
            if remaining.as_slice().is_empty() {
                break;
            }
            for lower in c.to_lowercase() {
                if remaining.next() != Some(&lower) {
                    matched = false;
                    break;
                }
            }
            if !matched {
                break;
            }
            end = start + offset + c.len_utf8();
        }
        if matched && remaining.as_slice().is_empty() {
            return Some((start, end));
        }
    }
    None
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
