//! Separates chord annotations from lyrics in song sheets.
//!
//! Song bodies arrive as rich-text markup or as text pulled out of a PDF, with
//! chord symbols interleaved with the lyric words ("chords over lyrics" flattened
//! into one blob) and bracketed section markers such as `[Chorus]`. Rather than
//! parsing the whole document, every whitespace-delimited token is classified
//! on its own against a chord grammar.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, instrument};

mod markup;
mod notation;

pub use markup::{isolate_section_markers, preformatted_html, strip_markup};
pub use notation::{strip_parenthesized, ChordNotation, WesternNotation};

/// Lyrics and chord vocabulary pulled out of one song body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SongSheet {
    pub lyrics: String,
    pub chords: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Extractor<N: ChordNotation = WesternNotation> {
    notation: N,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: ChordNotation> Extractor<N> {
    pub fn with_notation(notation: N) -> Self {
        Self { notation }
    }

    /// Whether a token is a chord once its parenthesized extensions are removed.
    pub fn is_chord_token(&self, token: &str) -> bool {
        let base = strip_parenthesized(token);
        !base.is_empty() && self.notation.is_valid_chord_notation(&base)
    }

    /// Renders the song with every chord token removed.
    ///
    /// Lines left empty by the removal are dropped; surviving tokens are joined
    /// by single spaces.
    #[instrument(skip_all, level = "trace")]
    pub fn lyrics_without_chords(&self, raw_markup: &str) -> String {
        let text = isolate_section_markers(&strip_markup(raw_markup));

        let lines = text
            .lines()
            .filter_map(|line| {
                let kept = line
                    .split_whitespace()
                    .filter(|token| !self.is_chord_token(token))
                    .collect::<Vec<_>>();
                (!kept.is_empty()).then(|| kept.join(" "))
            })
            .collect::<Vec<_>>();

        debug!(lines = lines.len(), "extracted lyrics");
        lines.join("\n")
    }

    /// Distinct chord tokens found in plain text, kept as written.
    #[instrument(skip_all, level = "trace")]
    pub fn collect_chords(&self, text: &str) -> BTreeSet<String> {
        let chords = text
            .split_whitespace()
            .filter(|token| self.is_chord_token(token))
            .map(str::to_string)
            .collect::<BTreeSet<_>>();

        debug!(distinct = chords.len(), "collected chords");
        chords
    }

    /// Lyrics and chords, both read from the same marker-isolated text so a
    /// chord glued to a section marker (`[Intro]G`) lands in the chord set.
    pub fn extract(&self, raw_markup: &str) -> SongSheet {
        SongSheet {
            lyrics: self.lyrics_without_chords(raw_markup),
            chords: self.collect_chords(&isolate_section_markers(&strip_markup(raw_markup))),
        }
    }
}

pub fn is_chord_token(token: &str) -> bool {
    Extractor::new().is_chord_token(token)
}

pub fn lyrics_without_chords(raw_markup: &str) -> String {
    Extractor::new().lyrics_without_chords(raw_markup)
}

pub fn collect_chords(text: &str) -> BTreeSet<String> {
    Extractor::new().collect_chords(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesized_extensions() {
        assert!(is_chord_token("Dm7(add9)"));
        assert!(is_chord_token("Dm7(9)"));
        assert!(is_chord_token("Bm7(b5)"));
        assert!(!is_chord_token("(add9)"));
        assert!(!is_chord_token("()"));
    }

    #[test]
    fn test_is_chord_token_examples() {
        for token in ["C", "G7", "Bm7(b5)", "F#maj7"] {
            assert!(is_chord_token(token), "{token}");
        }
        for token in ["Hello", "123", "", "the"] {
            assert!(!is_chord_token(token), "{token:?}");
        }
    }

    #[test]
    fn test_brazilian_notation_with_extension() {
        assert!(is_chord_token("G7M(9)"));
        assert_eq!(lyrics_without_chords("G7M(9) Santo C7M"), "Santo");
    }

    #[test]
    fn test_mixed_line_keeps_words() {
        assert_eq!(
            lyrics_without_chords("G Amazing D/F# grace how Em sweet"),
            "Amazing grace how sweet"
        );
    }

    #[test]
    fn test_spacing_is_normalised() {
        assert_eq!(
            lyrics_without_chords("  Holy \t  holy   holy  \n\n\n   C   \n"),
            "Holy holy holy"
        );
    }

    #[test]
    fn test_custom_notation() {
        struct OnlyX;
        impl ChordNotation for OnlyX {
            fn is_valid_chord_notation(&self, symbol: &str) -> bool {
                symbol == "X"
            }
        }

        let extractor = Extractor::with_notation(OnlyX);
        assert!(extractor.is_chord_token("X(7)"));
        assert!(!extractor.is_chord_token("C"));
        assert_eq!(extractor.lyrics_without_chords("X C X\nX"), "C");
    }
}
