//! Entity ordering and colour assignment for the legend and stylesheet.
//!
//! Entities are ordered by the mean `startWordIndex` of their annotations, so
//! the ones mentioned earliest come first and take the first palette colours.

use std::collections::{BTreeMap, HashMap};

use crate::error::{HiliteError, Result};
use crate::types::{Annotation, EntityCatalog};

/// Built-in highlight colours, light enough to keep black text readable.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#D2E3FC", // light blue
    "#C8E6C9", // light green
    "#FEF0C3", // light yellow
    "#F9DEDC", // light red
    "#FFDDBE", // light orange
    "#EADDFF", // light purple
    "#C4E9E4", // light teal
    "#FCE4EC", // light pink
    "#E8EAED", // light grey
    "#DDE8E8", // pale cyan
];

/// Colour for entities the palette cannot place.
pub const DEFAULT_FALLBACK_COLOUR: &str = "#dddddd";

// ── Palette ──

/// Non-empty ordered colour list, reused cyclically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colours: Vec<String>,
}

impl Palette {
    pub fn new(colours: Vec<String>) -> Result<Self> {
        if colours.is_empty() {
            return Err(HiliteError::EmptyPalette);
        }
        Ok(Self { colours })
    }

    pub fn colour(&self, rank: usize) -> &str {
        &self.colours[rank % self.colours.len()]
    }

    pub fn colours(&self) -> &[String] {
        &self.colours
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colours: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

// ── Ranking ──

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntity {
    pub id: String,
    /// Mean start index over this entity's annotations; `None` when it has none.
    pub mean_position: Option<f64>,
    /// Listed in `metadata.ids`.
    pub in_catalog: bool,
}

/// Order entities for display.
///
/// 1. catalog entities with annotations, by ascending mean start index
///    (ties keep catalog order);
/// 2. catalog entities without annotations, in catalog order;
/// 3. ids used by annotations but missing from the catalog, in order of
///    first use.
pub fn rank_entities(catalog: &EntityCatalog, annotations: &[Annotation]) -> Vec<RankedEntity> {
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    let mut unknown: Vec<&str> = Vec::new();
    for annotation in annotations {
        let entry = totals.entry(annotation.id.as_str()).or_insert((0.0, 0));
        entry.0 += annotation.start_word_index as f64;
        entry.1 += 1;
        if entry.1 == 1 && !catalog.contains(&annotation.id) {
            unknown.push(&annotation.id);
        }
    }
    let mean = |id: &str| totals.get(id).map(|&(sum, count)| sum / count as f64);

    let (mut annotated, unannotated): (Vec<RankedEntity>, Vec<RankedEntity>) = catalog
        .ids()
        .iter()
        .map(|id| RankedEntity {
            id: id.clone(),
            mean_position: mean(id),
            in_catalog: true,
        })
        .partition(|entity| entity.mean_position.is_some());
    annotated.sort_by(|a, b| {
        a.mean_position
            .unwrap_or_default()
            .total_cmp(&b.mean_position.unwrap_or_default())
    });

    for entity in &unannotated {
        tracing::debug!(
            id = %entity.id,
            "entity has no annotations, ranked after annotated ones"
        );
    }

    let unknown = unknown.into_iter().map(|id| {
        tracing::warn!(id, "annotation uses an entity id missing from metadata.ids");
        RankedEntity {
            id: id.to_string(),
            mean_position: mean(id),
            in_catalog: false,
        }
    });

    annotated.into_iter().chain(unannotated).chain(unknown).collect()
}

// ── Colour assignment ──

/// Entity id -> colour. Catalog entities take `palette[rank % len]`; anything
/// else resolves to the fallback colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorAssignment {
    colours: BTreeMap<String, String>,
    fallback: String,
}

impl ColorAssignment {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.colours.get(id).map(String::as_str)
    }

    /// Colour for `id`, or the fallback colour for unknown entities.
    pub fn colour_of(&self, id: &str) -> &str {
        self.get(id).unwrap_or(&self.fallback)
    }

    /// Colour for `id`, failing for entities outside the catalog.
    pub fn require(&self, id: &str) -> Result<&str> {
        self.get(id)
            .ok_or_else(|| HiliteError::UnknownEntityId { id: id.to_string() })
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

pub fn assign_colours(
    ranked: &[RankedEntity],
    palette: &Palette,
    fallback: &str,
) -> ColorAssignment {
    let colours = ranked
        .iter()
        .filter(|entity| entity.in_catalog)
        .enumerate()
        .map(|(rank, entity)| (entity.id.clone(), palette.colour(rank).to_string()))
        .collect();
    ColorAssignment {
        colours,
        fallback: fallback.to_string(),
    }
}
