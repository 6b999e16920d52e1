use std::collections::BTreeSet;

use crate::apply::apply_annotations;
use crate::error::Result;
use crate::markup::inject_markup;
use crate::merge::merge_adjacent_spans;
use crate::rank::{
    assign_colours, rank_entities, ColorAssignment, Palette, DEFAULT_FALLBACK_COLOUR,
};
use crate::segment::segment_phrases;
use crate::tokens::TokenStore;
use crate::types::{AnnotationDoc, EntityCatalog, EntityKey, Phrase, Token, TranscriptDoc};

/// What to do with entity ids that `metadata.ids` does not list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownEntityPolicy {
    /// Render with the fallback colour (a warning is logged).
    #[default]
    Fallback,
    /// Abort with `UnknownEntityId`.
    Fail,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub fallback_colour: String,
    pub unknown_entities: UnknownEntityPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            fallback_colour: DEFAULT_FALLBACK_COLOUR.to_string(),
            unknown_entities: UnknownEntityPolicy::default(),
        }
    }
}

/// One legend row: an entity, its colour, and where it sits in the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub id: String,
    pub colour: String,
    pub mean_position: Option<f64>,
}

/// Everything the templating layer needs.
#[derive(Debug, Clone)]
pub struct AnnotatedTranscript {
    pub phrases: Vec<Phrase>,
    /// Ranked entities, earliest-mentioned first.
    pub legend: Vec<LegendEntry>,
    pub colours: ColorAssignment,
    /// Every distinct label set that appears on a span.
    pub entity_keys: BTreeSet<EntityKey>,
    pub token_count: usize,
}

/// Run the full engine over one transcript and its annotations.
pub fn annotate(
    transcript: &TranscriptDoc,
    annotations: &AnnotationDoc,
    palette: &Palette,
    options: &PipelineOptions,
) -> Result<AnnotatedTranscript> {
    let mut store = TokenStore::from_words(&transcript.words);
    apply_annotations(&mut store, &annotations.annotations)?;

    let catalog = EntityCatalog::new(annotations.metadata.ids.iter().cloned());
    let ranked = rank_entities(&catalog, &annotations.annotations);
    let colours = assign_colours(&ranked, palette, &options.fallback_colour);

    if options.unknown_entities == UnknownEntityPolicy::Fail {
        for entity in ranked.iter().filter(|e| !e.in_catalog) {
            colours.require(&entity.id)?;
        }
    }

    let entity_keys: BTreeSet<EntityKey> =
        store.iter().filter_map(Token::entity_key).collect();

    let units = merge_adjacent_spans(inject_markup(store.tokens()));
    let phrases = segment_phrases(&units);

    let legend = ranked
        .into_iter()
        .map(|entity| LegendEntry {
            colour: colours.colour_of(&entity.id).to_string(),
            id: entity.id,
            mean_position: entity.mean_position,
        })
        .collect();

    tracing::info!(
        tokens = store.len(),
        annotations = annotations.annotations.len(),
        entities = catalog.len(),
        phrases = phrases.len(),
        "annotated transcript"
    );

    Ok(AnnotatedTranscript {
        phrases,
        legend,
        colours,
        entity_keys,
        token_count: store.len(),
    })
}
