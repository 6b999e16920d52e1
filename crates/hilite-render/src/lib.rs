//! HTML document for an annotated transcript: per-entity stylesheet, a
//! checkbox legend, the phrase-segmented transcript, and one shared toggle
//! handler.

mod css;
mod script;

use html_escape::{encode_double_quoted_attribute, encode_text};

use hilite_core::segment::format_time;
use hilite_core::{css_class, AnnotatedTranscript, LegendEntry, Phrase, PhraseKind};

pub use css::css_ident;
pub use script::key_components;

pub struct RenderInput<'a> {
    /// Shown in `<title>` and the page heading; usually the transcript file id.
    pub title: &'a str,
    pub transcript: &'a AnnotatedTranscript,
}

/// Render the complete, self-contained HTML document.
pub fn render_document(input: &RenderInput<'_>) -> String {
    let title = encode_text(input.title);
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{title}</title>\n"));
    out.push_str("<style>\n");
    out.push_str(&css::stylesheet(input.transcript));
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str(&format!(
        "<h1 id=\"MainTitle\" class=\"main_header\">{title}: NER Highlighting</h1>\n"
    ));

    out.push_str("<div id=\"legend\">\n");
    for entry in &input.transcript.legend {
        out.push_str(&legend_item(entry));
    }
    out.push_str("</div>\n");

    out.push_str("<div id=\"transcript\">\n");
    for phrase in &input.transcript.phrases {
        out.push_str(&phrase_line(phrase));
    }
    out.push_str("</div>\n");

    out.push_str("<script>\n");
    out.push_str(&script::toggle_script(input.transcript));
    out.push_str("</script>\n</body>\n</html>\n");
    out
}

fn legend_item(entry: &LegendEntry) -> String {
    let class = css_class(&entry.id);
    let toggle_id = encode_double_quoted_attribute(&format!("toggle-{class}")).into_owned();
    let label_id = encode_double_quoted_attribute(&format!("label-{class}")).into_owned();
    format!(
        "<input type=\"checkbox\" id=\"{toggle_id}\" class=\"entity-toggle\" \
         data-entity=\"{}\" checked>\n\
         <label id=\"{label_id}\" for=\"{toggle_id}\" \
         style=\"background-color: {};\"> {} </label><br>\n",
        encode_double_quoted_attribute(&entry.id),
        encode_double_quoted_attribute(&entry.colour),
        encode_text(&entry.id),
    )
}

fn phrase_line(phrase: &Phrase) -> String {
    let class = match phrase.kind {
        PhraseKind::Header => "speaker",
        PhraseKind::Body => "phrase",
    };
    // Phrase text is already escaped markup.
    format!(
        "<p class=\"{class}\" data-speaker=\"{}\" data-start=\"{}\" data-end=\"{}\">{}</p>\n",
        encode_double_quoted_attribute(&phrase.speaker),
        format_time(phrase.start_time),
        format_time(phrase.end_time),
        phrase.text
    )
}
