//! URL detection for message text.
//!
//! Text is split into plain and link segments; nothing is ever turned into
//! markup, so service-supplied text cannot inject anything into the view.

use std::sync::LazyLock;

use regex::Regex;

/// `None` only if the pattern fails to compile.
static URL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").ok());

/// A piece of message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text.
    Text(&'a str),
    /// An `http://` or `https://` URL, running until the next whitespace.
    Link(&'a str),
}

impl<'a> Segment<'a> {
    /// The raw text of the segment.
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Text(s) | Self::Link(s) => s,
        }
    }
}

/// Split `text` into plain and link segments, in order.
///
/// Concatenating the segments reproduces `text` exactly.
pub fn linkify(text: &str) -> Vec<Segment<'_>> {
    let Some(re) = URL_PATTERN.as_ref() else {
        return vec![Segment::Text(text)];
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Text(&text[last..m.start()]));
        }
        segments.push(Segment::Link(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        segments.push(Segment::Text(&text[last..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_single_segment() {
        assert_eq!(linkify("no links here"), vec![Segment::Text("no links here")]);
    }

    #[test]
    fn test_empty_text_has_no_segments() {
        assert!(linkify("").is_empty());
    }

    #[test]
    fn test_link_in_middle() {
        let segments = linkify(
            "Your website has been generated! View it at https://example.com/view_website now",
        );
        assert_eq!(
            segments,
            vec![
                Segment::Text("Your website has been generated! View it at "),
                Segment::Link("https://example.com/view_website"),
                Segment::Text(" now"),
            ]
        );
    }

    #[test]
    fn test_multiple_links_and_reassembly() {
        let text = "http://a.test and https://b.test/x?y=1";
        let segments = linkify(text);
        let links: Vec<_> = segments
            .iter()
            .filter(|s| matches!(s, Segment::Link(_)))
            .map(Segment::as_str)
            .collect();
        assert_eq!(links, vec!["http://a.test", "https://b.test/x?y=1"]);

        let rebuilt: String = segments.iter().map(Segment::as_str).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_markup_stays_text() {
        let segments = linkify("<b>bold</b> <script>x</script>");
        assert_eq!(
            segments,
            vec![Segment::Text("<b>bold</b> <script>x</script>")]
        );
    }
}
