use std::ops::RangeInclusive;

use crate::error::{HiliteError, Result};
use crate::tokens::TokenStore;
use crate::types::Annotation;

/// Annotation whose interval has been checked against the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpan<'a> {
    pub id: &'a str,
    pub range: RangeInclusive<usize>,
}

/// Check every annotation against `[0, token_count - 1]`.
///
/// Fails on the first bad interval so nothing is labelled from a document
/// that would render misleading highlights.
pub fn validate_annotations(
    annotations: &[Annotation],
    token_count: usize,
) -> Result<Vec<LabelSpan<'_>>> {
    annotations
        .iter()
        .map(|annotation| {
            let (start, end) = (annotation.start_word_index, annotation.end_word_index);
            if start > end {
                return Err(HiliteError::InvertedAnnotation {
                    id: annotation.id.clone(),
                    start,
                    end,
                });
            }
            let in_bounds = |i: i64| usize::try_from(i).ok().filter(|&i| i < token_count);
            match (in_bounds(start), in_bounds(end)) {
                (Some(start), Some(end)) => Ok(LabelSpan {
                    id: &annotation.id,
                    range: start..=end,
                }),
                _ => Err(HiliteError::OutOfRangeAnnotation {
                    id: annotation.id.clone(),
                    start,
                    end,
                    token_count,
                }),
            }
        })
        .collect()
}

/// Add each annotation's id to the labels of every token it covers.
///
/// Overlapping annotations union their ids. Annotations are applied in input
/// order; validation of the whole set happens before any label is written.
pub fn apply_annotations(store: &mut TokenStore, annotations: &[Annotation]) -> Result<()> {
    let spans = validate_annotations(annotations, store.len())?;
    let mut labelled = 0usize;
    for span in &spans {
        for index in span.range.clone() {
            store.add_label(index, span.id);
            labelled += 1;
        }
    }
    tracing::debug!(
        annotations = spans.len(),
        labelled,
        "applied annotations to tokens"
    );
    Ok(())
}
