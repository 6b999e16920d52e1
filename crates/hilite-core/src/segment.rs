use html_escape::{encode_single_quoted_attribute, encode_text};

use crate::types::{MarkupUnit, Phrase, PhraseKind, TagKind};

/// Split the merged unit stream into speaker turns.
///
/// A turn ends exactly where a unit's speaker differs from the previous
/// unit's. Each turn yields a [`PhraseKind::Header`] phrase
/// (`{start} - {end} - {speaker}:`) followed by a [`PhraseKind::Body`] phrase
/// holding the marked-up words. Both carry the turn's first-unit start time
/// and last-unit end time.
pub fn segment_phrases(units: &[MarkupUnit<'_>]) -> Vec<Phrase> {
    let mut phrases = Vec::new();
    let mut turn_start = 0usize;

    for pos in 1..=units.len() {
        let boundary = match (units.get(pos - 1), units.get(pos)) {
            (Some(prev), Some(next)) => prev.speaker() != next.speaker(),
            _ => true,
        };
        if boundary {
            push_turn(&mut phrases, &units[turn_start..pos]);
            turn_start = pos;
        }
    }

    tracing::debug!(
        turns = phrases.len() / 2,
        units = units.len(),
        "segmented phrases"
    );
    phrases
}

fn push_turn(phrases: &mut Vec<Phrase>, turn: &[MarkupUnit<'_>]) {
    let (Some(first), Some(last)) = (turn.first(), turn.last()) else {
        return;
    };
    let speaker = first.speaker().to_string();
    let (start_time, end_time) = (first.start_time(), last.end_time());

    phrases.push(Phrase {
        kind: PhraseKind::Header,
        text: format!(
            "{} - {} - {}:",
            format_time(start_time),
            format_time(end_time),
            encode_text(&speaker)
        ),
        speaker: speaker.clone(),
        start_time,
        end_time,
    });
    phrases.push(Phrase {
        kind: PhraseKind::Body,
        text: render_units(turn),
        speaker,
        start_time,
        end_time,
    });
}

/// Serialize units as HTML: words separated by single spaces, no space just
/// inside a span.
pub fn render_units(units: &[MarkupUnit<'_>]) -> String {
    let mut text = String::new();
    // Whether the next word or open tag needs a separating space.
    let mut pending_space = false;

    for unit in units {
        match unit {
            MarkupUnit::Word(token) => {
                if pending_space {
                    text.push(' ');
                }
                text.push_str(&encode_text(&token.text));
                pending_space = true;
            }
            MarkupUnit::Tag(tag) if tag.kind == TagKind::Open => {
                if pending_space {
                    text.push(' ');
                }
                text.push_str("<span class='entity ");
                text.push_str(&encode_single_quoted_attribute(&tag.key.css_class()));
                text.push_str("'>");
                pending_space = false;
            }
            MarkupUnit::Tag(_) => {
                text.push_str("</span>");
                pending_space = true;
            }
        }
    }
    text
}

/// Seconds with two decimals, e.g. `12.50`.
pub fn format_time(seconds: f64) -> String {
    format!("{seconds:.2}")
}
