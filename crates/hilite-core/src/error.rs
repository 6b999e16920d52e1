use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = HiliteError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum HiliteError {
    #[error("malformed {document} document: {message}")]
    MalformedInput {
        document: &'static str,
        message: String,
    },
    #[error(
        "annotation `{id}` covers words [{start}, {end}] but the transcript has {token_count} words"
    )]
    OutOfRangeAnnotation {
        id: String,
        start: i64,
        end: i64,
        token_count: usize,
    },
    #[error("annotation `{id}` starts at word {start} after it ends at word {end}")]
    InvertedAnnotation { id: String, start: i64, end: i64 },
    #[error("entity `{id}` is not listed in metadata.ids")]
    UnknownEntityId { id: String },
    #[error("palette has no colours")]
    EmptyPalette,
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl HiliteError {
    pub fn malformed(document: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            document,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_the_annotation() {
        let err = HiliteError::OutOfRangeAnnotation {
            id: "PERSON".into(),
            start: 3,
            end: 9,
            token_count: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("PERSON"));
        assert!(msg.contains("[3, 9]"));
        assert!(msg.contains("5 words"));
    }

    #[test]
    fn io_message_includes_path() {
        let err = HiliteError::io(
            "/tmp/missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/missing.json"));
    }
}
