use crate::types::{MarkupUnit, SpanTag, TagKind};

/// Collapse directly adjacent spans that share an entity key and speaker
/// into one span.
///
/// A close tag immediately followed by an open tag for the same label set
/// (and the same speaker) is dropped together with that open tag, so a multi-word
/// mention becomes a single span whose open/close times come from its first
/// and last words. Spans separated by any word stay apart, and word order is
/// never changed. Running it on its own output changes nothing.
pub fn merge_adjacent_spans(units: Vec<MarkupUnit<'_>>) -> Vec<MarkupUnit<'_>> {
    let before = units.len();
    let mut merged: Vec<MarkupUnit<'_>> = Vec::with_capacity(before);
    let mut iter = units.into_iter().peekable();

    while let Some(unit) = iter.next() {
        if let MarkupUnit::Tag(close) = &unit {
            if let Some(MarkupUnit::Tag(open)) = iter.peek() {
                if continues_span(close, open) {
                    iter.next();
                    continue;
                }
            }
        }
        merged.push(unit);
    }

    tracing::debug!(
        merged_pairs = (before - merged.len()) / 2,
        "merged adjacent spans"
    );
    merged
}

fn continues_span(close: &SpanTag, open: &SpanTag) -> bool {
    close.kind == TagKind::Close
        && open.kind == TagKind::Open
        && close.key == open.key
        && close.speaker == open.speaker
}
