use crate::types::{EntityKey, MarkupUnit, SpanTag, TagKind, Token};

/// Wrap every labelled token in an open/close tag pair keyed by its full
/// label set.
///
/// Built in one forward pass into a fresh sequence; tokens are borrowed, never
/// spliced. Tag times sit in the gap between the token and its neighbour so
/// the stream stays time-ordered:
/// - open: `[previous.end_time, token.start_time]`, or
///   `[token.start_time, token.start_time]` for the first token;
/// - close: `[token.end_time, next.start_time]`, or
///   `[token.end_time, token.end_time]` for the last token.
pub fn inject_markup(tokens: &[Token]) -> Vec<MarkupUnit<'_>> {
    let mut units = Vec::with_capacity(tokens.len());
    let mut tagged = 0usize;

    for (pos, token) in tokens.iter().enumerate() {
        let Some(key) = token.entity_key() else {
            units.push(MarkupUnit::Word(token));
            continue;
        };

        let open_start = pos
            .checked_sub(1)
            .and_then(|prev| tokens.get(prev))
            .map_or(token.start_time, |prev| prev.end_time);
        let close_end = tokens
            .get(pos + 1)
            .map_or(token.end_time, |next| next.start_time);

        units.push(MarkupUnit::Tag(SpanTag {
            kind: TagKind::Open,
            key: key.clone(),
            start_time: open_start,
            end_time: token.start_time,
            speaker: token.speaker.clone(),
        }));
        units.push(MarkupUnit::Word(token));
        units.push(MarkupUnit::Tag(SpanTag {
            kind: TagKind::Close,
            key,
            start_time: token.end_time,
            end_time: close_end,
            speaker: token.speaker.clone(),
        }));
        tagged += 1;
    }

    tracing::debug!(tokens = tokens.len(), tagged, "injected span markup");
    units
}

/// Check that every open tag is closed by the next tag, with the same key.
pub fn is_balanced(units: &[MarkupUnit<'_>]) -> bool {
    let mut open: Option<&EntityKey> = None;
    for tag in units.iter().filter_map(MarkupUnit::as_tag) {
        match (tag.kind, open) {
            (TagKind::Open, None) => open = Some(&tag.key),
            (TagKind::Close, Some(key)) if *key == tag.key => open = None,
            _ => return false,
        }
    }
    open.is_none()
}
