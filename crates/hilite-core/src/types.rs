use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Joins the labels of a token carrying several entities at once.
pub const KEY_SEPARATOR: &str = "-";

// ── Input documents ──

/// One word of the transcript document (`words[]`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptWord {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(deserialize_with = "speaker_label")]
    pub speaker: String,
}

/// Transcript document: `{words: [...], phrases?: ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptDoc {
    pub words: Vec<TranscriptWord>,
    /// Pre-segmented phrases from the transcriber. Carried but not used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrases: Option<serde_json::Value>,
}

/// Entity span over word indices, inclusive on both ends.
///
/// Indices stay signed as they arrive; range checks happen in
/// [`crate::apply::validate_annotations`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    pub start_word_index: i64,
    pub end_word_index: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationMetadata {
    pub ids: Vec<String>,
}

/// Annotation document: `{annotations: [...], metadata: {ids: [...]}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationDoc {
    pub annotations: Vec<Annotation>,
    pub metadata: AnnotationMetadata,
}

/// Speakers arrive either as names or as diarization indices.
fn speaker_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Name(String),
        Index(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Name(name) => name,
        Raw::Index(index) => index.to_string(),
    })
}

// ── Entity catalog ──

/// Ordered, duplicate-free set of known entity ids (`metadata.ids`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCatalog {
    ids: Vec<String>,
}

impl EntityCatalog {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let ids = ids
            .into_iter()
            .map(Into::into)
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Self { ids }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ── Tokens ──

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub index: usize,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    pub speaker: String,
    pub labels: BTreeSet<String>,
}

impl Token {
    /// Key of all labels on this token. `None` for unlabelled tokens.
    pub fn entity_key(&self) -> Option<EntityKey> {
        EntityKey::from_labels(&self.labels)
    }
}

// ── Entity keys ──

/// The full label set active on a tagged token.
///
/// Identity is the set itself, never its joined text: the single entity
/// `A-B` and the pair `{A, B}` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    /// Sorted, duplicate-free.
    components: Vec<String>,
}

impl EntityKey {
    pub fn from_labels(labels: &BTreeSet<String>) -> Option<Self> {
        if labels.is_empty() {
            return None;
        }
        Some(Self {
            components: labels.iter().cloned().collect(),
        })
    }

    pub fn single(id: impl Into<String>) -> Self {
        Self {
            components: vec![id.into()],
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn is_compound(&self) -> bool {
        self.components.len() > 1
    }

    /// Class name carried by spans with this key: each component through
    /// [`css_class`], joined with [`KEY_SEPARATOR`]. Distinct keys always
    /// get distinct classes.
    pub fn css_class(&self) -> String {
        self.components
            .iter()
            .map(|id| css_class(id))
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }
}

/// Labels joined with [`KEY_SEPARATOR`], for logs and test output.
impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join(KEY_SEPARATOR))
    }
}

// ── Markup units ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
}

/// Synthetic span boundary inserted around labelled tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanTag {
    pub kind: TagKind,
    pub key: EntityKey,
    pub start_time: f64,
    pub end_time: f64,
    pub speaker: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupUnit<'a> {
    Word(&'a Token),
    Tag(SpanTag),
}

impl MarkupUnit<'_> {
    pub fn speaker(&self) -> &str {
        match self {
            MarkupUnit::Word(token) => &token.speaker,
            MarkupUnit::Tag(tag) => &tag.speaker,
        }
    }

    pub fn start_time(&self) -> f64 {
        match self {
            MarkupUnit::Word(token) => token.start_time,
            MarkupUnit::Tag(tag) => tag.start_time,
        }
    }

    pub fn end_time(&self) -> f64 {
        match self {
            MarkupUnit::Word(token) => token.end_time,
            MarkupUnit::Tag(tag) => tag.end_time,
        }
    }

    pub fn as_tag(&self) -> Option<&SpanTag> {
        match self {
            MarkupUnit::Tag(tag) => Some(tag),
            MarkupUnit::Word(_) => None,
        }
    }
}

// ── Phrases ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseKind {
    /// `{start} - {end} - {speaker}:` line opening a speaker turn.
    Header,
    /// Marked-up words of the turn.
    Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    pub kind: PhraseKind,
    pub speaker: String,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// CSS class name for one entity id.
///
/// The result never contains whitespace (class attributes split on it) or a
/// bare `-` (reserved for joining compound keys). Those characters and `_`
/// itself become `_{hex}_`, so the mapping stays one-to-one.
pub fn css_class(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            out.push_str(&format!("_{:x}_", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}
