use hilite_core::{AnnotationDoc, HiliteError, Palette, Result, TranscriptDoc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;

const TRANSCRIPT_DOC: &str = "transcript";
const ANNOTATION_DOC: &str = "annotation";
const PALETTE_DOC: &str = "palette";

/// Palette document: `{html_colour_list: [...]}`.
#[derive(Debug, Deserialize)]
struct PaletteDoc {
    html_colour_list: Vec<String>,
}

// ── Reading ──

/// Read and parse a JSON file, without interpreting it.
pub fn read_json(path: &Path) -> Result<Value> {
    let data = fs::read_to_string(path).map_err(|e| HiliteError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| HiliteError::json(path, e))
}

pub fn load_transcript(path: &Path) -> Result<TranscriptDoc> {
    let doc = parse_transcript(read_json(path)?)?;
    tracing::debug!(path = %path.display(), words = doc.words.len(), "loaded transcript");
    Ok(doc)
}

pub fn load_annotations(path: &Path) -> Result<AnnotationDoc> {
    let doc = parse_annotations(read_json(path)?)?;
    tracing::debug!(
        path = %path.display(),
        annotations = doc.annotations.len(),
        ids = doc.metadata.ids.len(),
        "loaded annotations"
    );
    Ok(doc)
}

pub fn load_palette(path: &Path) -> Result<Palette> {
    let palette = parse_palette(read_json(path)?)?;
    tracing::debug!(path = %path.display(), colours = palette.colours().len(), "loaded palette");
    Ok(palette)
}

/// Validate required keys (`words`) before decoding.
pub fn parse_transcript(value: Value) -> Result<TranscriptDoc> {
    require(&value, &["words"], TRANSCRIPT_DOC)?;
    decode(value, TRANSCRIPT_DOC)
}

/// Validate required keys (`annotations`, `metadata.ids`) before decoding.
pub fn parse_annotations(value: Value) -> Result<AnnotationDoc> {
    require(&value, &["annotations"], ANNOTATION_DOC)?;
    require(&value, &["metadata", "ids"], ANNOTATION_DOC)?;
    decode(value, ANNOTATION_DOC)
}

pub fn parse_palette(value: Value) -> Result<Palette> {
    require(&value, &["html_colour_list"], PALETTE_DOC)?;
    let doc: PaletteDoc = decode(value, PALETTE_DOC)?;
    Palette::new(doc.html_colour_list)
}

fn require(value: &Value, key_path: &[&str], document: &'static str) -> Result<()> {
    let found = key_path
        .iter()
        .try_fold(value, |node, key| node.get(key))
        .is_some();
    if found {
        Ok(())
    } else {
        Err(HiliteError::malformed(
            document,
            format!("missing required key `{}`", key_path.join(".")),
        ))
    }
}

fn decode<T: DeserializeOwned>(value: Value, document: &'static str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| HiliteError::malformed(document, e.to_string()))
}

// ── Naming ──

/// File id of a transcript: its file name up to the first `.`
/// (`calls/2024-05-01.en.json` -> `2024-05-01`).
pub fn file_id(transcript_path: &Path) -> String {
    let name = transcript_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => "transcript".to_string(),
    }
}

// ── Writing ──

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| HiliteError::io(parent, e))?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| HiliteError::io(parent, e))?;
    tmp.write_all(data).map_err(|e| HiliteError::io(path, e))?;
    tmp.flush().map_err(|e| HiliteError::io(path, e))?;
    tmp.persist(path).map_err(|e| HiliteError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_transcript_reads_words_and_ignores_phrases() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "t.json",
            r#"{"words":[{"text":"Hi","startTime":0.0,"endTime":0.3,"speaker":"A"}],
                "phrases":[{"x":1}]}"#,
        );
        let doc = load_transcript(&path).unwrap();
        assert_eq!(doc.words.len(), 1);
        assert_eq!(doc.words[0].text, "Hi");
    }

    #[test]
    fn missing_words_is_malformed() {
        let err = parse_transcript(json!({"phrases": []})).unwrap_err();
        match err {
            HiliteError::MalformedInput { document, message } => {
                assert_eq!(document, "transcript");
                assert!(message.contains("`words`"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_metadata_ids_is_malformed() {
        let err = parse_annotations(json!({"annotations": [], "metadata": {}})).unwrap_err();
        assert!(err.to_string().contains("metadata.ids"));
    }

    #[test]
    fn word_missing_field_is_malformed() {
        let err =
            parse_transcript(json!({"words": [{"text": "a", "startTime": 0.0}]})).unwrap_err();
        assert!(matches!(err, HiliteError::MalformedInput { .. }));
    }

    #[test]
    fn parse_annotations_reads_spans() {
        let doc = parse_annotations(json!({
            "annotations": [{"id": "ORG", "startWordIndex": 2, "endWordIndex": 4}],
            "metadata": {"ids": ["ORG", "PERSON"]}
        }))
        .unwrap();
        assert_eq!(doc.annotations[0].end_word_index, 4);
        assert_eq!(doc.metadata.ids, ["ORG", "PERSON"]);
    }

    #[test]
    fn palette_document_round_trips_order() {
        let palette =
            parse_palette(json!({"html_colour_list": ["red", "#00ff00", "blue"]})).unwrap();
        assert_eq!(palette.colours(), ["red", "#00ff00", "blue"]);
    }

    #[test]
    fn empty_palette_document_is_rejected() {
        let err = parse_palette(json!({"html_colour_list": []})).unwrap_err();
        assert!(matches!(err, HiliteError::EmptyPalette));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = read_json(Path::new("/nonexistent/annotations.json")).unwrap_err();
        assert!(matches!(err, HiliteError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/annotations.json"));
    }

    #[test]
    fn invalid_json_is_a_json_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "bad.json", "{not json");
        assert!(matches!(read_json(&path), Err(HiliteError::Json { .. })));
    }

    #[test]
    fn file_id_stops_at_first_dot() {
        assert_eq!(file_id(Path::new("/data/call_42.en.json")), "call_42");
        assert_eq!(file_id(Path::new("interview.json")), "interview");
        assert_eq!(file_id(Path::new("/")), "transcript");
    }

    #[test]
    fn write_atomic_creates_output_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out").join("annotated_transcript.html");
        write_atomic(&path, b"<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");

        write_atomic(&path, b"v2").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "v2");
    }
}
