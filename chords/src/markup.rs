use once_cell::sync::Lazy;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::{Captures, Regex};

// Tags that end a visual line in rich-text editor output.
static LINE_BREAK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|h[1-6])\s*>").expect("line break pattern")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern"));

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("entity pattern")
});

static SECTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\[\]\n]*\]").expect("section marker pattern"));

/// Removes markup tags and decodes HTML entities.
///
/// Line-break tags (`<br>`, `</p>`, ...) become newlines, every other tag is
/// dropped. Entities that don't resolve are kept as written.
pub fn strip_markup(html: &str) -> String {
    let text = LINE_BREAK_TAG.replace_all(html, "\n");
    let text = TAG.replace_all(&text, "");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[0];
            match unescape_with(entity, resolve_html5_entity) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => entity.to_string(),
            }
        })
        .into_owned()
}

/// Puts every bracketed section marker (`[Chorus]`, `[Verse 2]`) on its own line.
pub fn isolate_section_markers(text: &str) -> String {
    SECTION_MARKER.replace_all(text, "\n${0}\n").into_owned()
}

/// Wraps plain extracted text for storage as a song body.
pub fn preformatted_html(text: &str) -> String {
    format!("<pre>{}</pre>", quick_xml::escape::escape(text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_markup("<b>Amazing</b> grace"), "Amazing grace");
        assert_eq!(
            strip_markup(r#"<span style="color: red">G</span>"#),
            "G"
        );
    }

    #[test]
    fn test_line_break_tags_become_newlines() {
        assert_eq!(
            strip_markup("<p>line one</p><p>line two<br/>line three</p>"),
            "line one\nline two\nline three\n"
        );
        assert_eq!(strip_markup("a<BR>b"), "a\nb");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(strip_markup("Rock &amp; Roll"), "Rock & Roll");
        assert_eq!(strip_markup("&lt;3 &quot;hi&quot;"), "<3 \"hi\"");
        assert_eq!(strip_markup("caf&eacute;"), "café");
        assert_eq!(strip_markup("it&#39;s &#x41;"), "it's A");
        assert_eq!(strip_markup("a&nbsp;b"), "a\u{a0}b");
    }

    #[test]
    fn test_malformed_markup_is_best_effort() {
        assert_eq!(strip_markup("a < b and c > d"), "a  d");
        assert_eq!(strip_markup("unclosed <b tag"), "unclosed <b tag");
        assert_eq!(strip_markup("AT&T &bogus; &"), "AT&T &bogus; &");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_isolate_section_markers() {
        assert_eq!(
            isolate_section_markers("[Intro] C G [Chorus]"),
            "\n[Intro]\n C G \n[Chorus]\n"
        );
        assert_eq!(isolate_section_markers("no markers"), "no markers");
    }

    #[test]
    fn test_preformatted_html() {
        assert_eq!(preformatted_html("\n C  G \n"), "<pre>C  G</pre>");
        assert_eq!(preformatted_html("A & B"), "<pre>A &amp; B</pre>");
    }
}
