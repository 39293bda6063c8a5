use std::{collections::BTreeSet, path::Path};

use anyhow::Context;
use chords::{Extractor, SongSheet};
use tracing::{debug, info, instrument};

/// Lyrics and chords of a text or rich-text song file.
#[instrument(level = "trace")]
pub fn read_song_file(path: &Path) -> anyhow::Result<SongSheet> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    debug!(bytes = raw.len(), "read song file");

    Ok(Extractor::new().extract(&raw))
}

/// A chord sheet pulled out of a PDF, ready to be stored as a song body.
#[derive(Debug)]
pub struct ImportedSheet {
    pub body: String,
    pub chords: BTreeSet<String>,
}

#[instrument(level = "trace")]
pub fn read_pdf(path: &Path) -> anyhow::Result<ImportedSheet> {
    let start = std::time::Instant::now();
    let text = pdf_extract::extract_text(path).map_err(|err| {
        anyhow::anyhow!("failed to extract text from {}: {err}", path.display())
    })?;
    let elapsed = start.elapsed();
    info!(?elapsed, chars = text.len(), "completed pdf parse");

    Ok(import_text(&text))
}

/// The text keeps its line breaks inside a `<pre>` block; chords are collected
/// from the raw text with section markers split off.
pub fn import_text(text: &str) -> ImportedSheet {
    ImportedSheet {
        body: chords::preformatted_html(text),
        chords: Extractor::new().collect_chords(&chords::isolate_section_markers(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_song_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<p>[Verse]</p><p>G D/F# Em</p><p>Amazing grace</p>").unwrap();

        let sheet = read_song_file(file.path()).unwrap();
        assert_eq!(sheet.lyrics, "[Verse]\nAmazing grace");
        assert_eq!(
            sheet.chords.into_iter().collect::<Vec<_>>(),
            vec!["D/F#", "Em", "G"]
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_song_file(&dir.path().join("missing.html")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_import_text() {
        let imported = import_text("  C        G\nHow great & strong\n[Coda]A7M\n");
        assert_eq!(
            imported.body,
            "<pre>C        G\nHow great &amp; strong\n[Coda]A7M</pre>"
        );
        assert_eq!(
            imported.chords.into_iter().collect::<Vec<_>>(),
            vec!["A7M", "C", "G"]
        );
    }
}
