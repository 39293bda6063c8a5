use std::collections::BTreeSet;

use chords::{collect_chords, lyrics_without_chords, strip_markup, Extractor, SongSheet};

const CHORUS: &str = "<p>[Chorus]\nC G Am F\nHow great is our God</p>";

#[test]
fn chorus_with_chord_line() {
    assert_eq!(lyrics_without_chords(CHORUS), "[Chorus]\nHow great is our God");

    let chords = collect_chords(&strip_markup(CHORUS));
    let expected: BTreeSet<String> = ["C", "G", "Am", "F"].into_iter().map(String::from).collect();
    assert_eq!(chords, expected);
}

#[test]
fn extract_returns_both_outputs() {
    let sheet = Extractor::new().extract(CHORUS);
    assert_eq!(
        sheet,
        SongSheet {
            lyrics: "[Chorus]\nHow great is our God".to_string(),
            chords: ["Am", "C", "F", "G"].into_iter().map(String::from).collect(),
        }
    );
}

#[test]
fn chord_glued_to_section_marker_is_collected() {
    let sheet = Extractor::new().extract("<p>[Intro]G D</p><p>Holy</p>");
    assert_eq!(sheet.lyrics, "[Intro]\nHoly");
    assert_eq!(
        sheet.chords,
        ["D", "G"].into_iter().map(String::from).collect::<BTreeSet<_>>()
    );
}

#[test]
fn section_markers_are_split_from_surrounding_text() {
    let raw = "[Verse 1] G D\nBlessed be your name [Chorus] Em C\nIn the land that is plentiful";
    assert_eq!(
        lyrics_without_chords(raw),
        "[Verse 1]\nBlessed be your name\n[Chorus]\nIn the land that is plentiful"
    );
}

#[test]
fn editor_markup_with_entities() {
    let raw = "<p><strong>[Intro]</strong></p>\
               <p>D&nbsp;&nbsp;A/C#&nbsp;&nbsp;Bm7(11)</p>\
               <p>Open the eyes of my heart, Lord &amp; Savior</p>";
    assert_eq!(
        lyrics_without_chords(raw),
        "[Intro]\nOpen the eyes of my heart, Lord & Savior"
    );
    assert_eq!(
        collect_chords(&strip_markup(raw)),
        ["A/C#", "Bm7(11)", "D"].into_iter().map(String::from).collect()
    );
}

#[test]
fn no_output_line_is_blank() {
    let inputs = [
        "",
        "\n\n\n",
        "C G\n\nD",
        "<p></p><p>   </p>",
        "[Bridge]\n\n   \nE   B\n  words  \n",
        "<br><br>Am<br>",
    ];
    for input in inputs {
        let lyrics = lyrics_without_chords(input);
        assert!(
            lyrics.lines().all(|line| !line.trim().is_empty()),
            "blank line in output for {input:?}: {lyrics:?}"
        );
    }
}

#[test]
fn clean_text_is_stable() {
    let clean = "Holy holy holy\nLord God almighty\nEarly in the morning\nour song shall rise to thee";
    let once = lyrics_without_chords(clean);
    assert_eq!(once, clean);
    assert_eq!(lyrics_without_chords(&once), once);
}

#[test]
fn repeated_chords_are_collected_once() {
    let text = "G D Em C\nG D Em C\nG D C C C";
    assert_eq!(collect_chords(text).len(), 4);
}

#[test]
fn song_sheet_serializes_chords_as_list() {
    let sheet = Extractor::new().extract("G Hi");
    let json = serde_json::to_value(&sheet).unwrap();
    assert_eq!(json["lyrics"], "Hi");
    assert_eq!(json["chords"], serde_json::json!(["G"]));
}
