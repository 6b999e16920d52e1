use anyhow::Context;
use hilite_core::{annotate, PipelineOptions};
use hilite_render::{render_document, RenderInput};
use std::path::{Path, PathBuf};

use crate::settings::RenderSettings;

pub struct RenderParams<'a> {
    pub transcript_file: &'a Path,
    pub annotation_file: &'a Path,
    pub output_dir: &'a Path,
    pub title: Option<&'a str>,
    pub settings: &'a RenderSettings,
}

/// Load both documents, run the engine, and write the HTML page.
/// Returns the path written.
pub fn execute(params: &RenderParams) -> anyhow::Result<PathBuf> {
    tracing::info!("Loading transcript and annotations...");
    tracing::debug!(path = %params.transcript_file.display(), "transcript file");
    tracing::debug!(path = %params.annotation_file.display(), "annotation file");

    let file_id = hilite_store::file_id(params.transcript_file);
    tracing::info!(file_id = %file_id, "file id");

    let transcript = hilite_store::load_transcript(params.transcript_file)
        .with_context(|| format!("loading transcript {}", params.transcript_file.display()))?;
    let annotations = hilite_store::load_annotations(params.annotation_file)
        .with_context(|| format!("loading annotations {}", params.annotation_file.display()))?;

    tracing::info!("Creating the HTML file...");
    let options = PipelineOptions {
        fallback_colour: params.settings.fallback_colour.clone(),
        unknown_entities: params.settings.unknown_entities,
    };
    let annotated = annotate(&transcript, &annotations, &params.settings.palette, &options)
        .context("annotating transcript")?;

    let html = render_document(&RenderInput {
        title: params.title.unwrap_or(&file_id),
        transcript: &annotated,
    });

    let output = params.output_dir.join(&params.settings.output_name);
    hilite_store::write_atomic(&output, html.as_bytes())
        .with_context(|| format!("writing {}", output.display()))?;

    tracing::info!(path = %output.display(), "HTML file saved");
    Ok(output)
}
