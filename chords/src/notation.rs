use std::borrow::Cow;

/// Decides whether a bare symbol (no parenthesized extensions) is a chord.
///
/// Implementations must be total: anything they don't understand is `false`.
pub trait ChordNotation {
    fn is_valid_chord_notation(&self, symbol: &str) -> bool;
}

/// Western chord-symbol grammar used for lead sheets.
///
/// ```text
/// ROOT ACCIDENTAL? QUALITY? EXTENSION? SUS? ALTERATION* ("/" ROOT ACCIDENTAL?)?
/// ```
///
/// The accepted vocabulary is the fixed set of the tables below, so "C", "G7",
/// "F#maj7", "Bbm7b5", "Dsus4", "C6/9", "Cadd9" and "D/F#" are chords while
/// "Cmaj13#11b9sus" style stacks only pass when every piece is in a table.
#[derive(Debug, Default, Clone, Copy)]
pub struct WesternNotation;

const ACCIDENTALS: &[&str] = &["#", "b", "♯", "♭"];

// longest match first
const QUALITIES: &[&str] = &[
    "maj", "Maj", "min", "dim", "aug", "M", "Δ", "m", "-", "°", "ø", "+",
];

const MINOR_MAJOR: &[&str] = &["maj", "M", "Δ"];

// "7M" is the Brazilian spelling of a major seventh
const EXTENSIONS: &[&str] = &["6/9", "69", "7M", "13", "11", "9", "7", "6", "5", "4", "2"];

const SUSPENSIONS: &[&str] = &["sus2", "sus4", "sus"];

const ADDED: &[&str] = &["add13", "add11", "add9", "add4", "add2"];

const ALTERED_DEGREES: &[&str] = &["13", "11", "9", "6", "5"];

const ALTERATION_SIGNS: &[&str] = &["b", "#", "♭", "♯", "+", "-"];

impl ChordNotation for WesternNotation {
    fn is_valid_chord_notation(&self, symbol: &str) -> bool {
        let mut rest = match root(symbol) {
            Some(rest) => rest,
            None => return false,
        };

        if let Some((quality, after)) = longest_prefix(rest, QUALITIES) {
            rest = after;
            if matches!(quality, "m" | "min" | "-") {
                if let Some((_, after)) = longest_prefix(rest, MINOR_MAJOR) {
                    rest = after;
                }
            }
        }

        if let Some((_, after)) = longest_prefix(rest, EXTENSIONS) {
            rest = after;
        }
        if let Some((_, after)) = longest_prefix(rest, SUSPENSIONS) {
            rest = after;
        }

        loop {
            if let Some((_, after)) = longest_prefix(rest, ADDED) {
                rest = after;
                continue;
            }
            match longest_prefix(rest, ALTERATION_SIGNS)
                .and_then(|(_, after)| longest_prefix(after, ALTERED_DEGREES))
            {
                Some((_, after)) => rest = after,
                None => break,
            }
        }

        if let Some(bass) = rest.strip_prefix('/') {
            rest = match root(bass) {
                Some(after) => after,
                None => return false,
            };
        }

        rest.is_empty()
    }
}

/// Consumes a note name plus optional accidental, returning what follows.
fn root(symbol: &str) -> Option<&str> {
    let rest = symbol.strip_prefix(|c: char| matches!(c, 'A'..='G'))?;
    Some(
        longest_prefix(rest, ACCIDENTALS)
            .map(|(_, after)| after)
            .unwrap_or(rest),
    )
}

fn longest_prefix<'a>(input: &'a str, table: &[&'static str]) -> Option<(&'static str, &'a str)> {
    table
        .iter()
        .filter_map(|candidate| input.strip_prefix(candidate).map(|after| (*candidate, after)))
        .max_by_key(|(candidate, _)| candidate.len())
}

/// Removes every parenthesized group from a token, e.g. `Dm7(add9)` -> `Dm7`.
///
/// An unclosed `(` swallows the rest of the token and stray `)` are dropped.
pub fn strip_parenthesized(token: &str) -> Cow<'_, str> {
    if !token.contains(['(', ')']) {
        return Cow::Borrowed(token);
    }

    let mut depth = 0usize;
    let mut out = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    Cow::Owned(out)
}
