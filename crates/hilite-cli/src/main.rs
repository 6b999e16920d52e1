mod cmd_render;
mod logging;
mod settings;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hilite",
    version,
    about = "Create an HTML page displaying entity annotations on a transcript"
)]
struct Cli {
    /// Path to a transcript file
    #[arg(short = 't', long = "transcript_file", alias = "transcript-file")]
    transcript_file: PathBuf,
    /// Path to an annotation file
    #[arg(short = 'a', long = "annotation_file", alias = "annotation-file")]
    annotation_file: PathBuf,
    /// Path to the output directory
    #[arg(short = 'o', long = "output_dir", alias = "output-dir")]
    output_dir: PathBuf,
    /// Palette file ({"html_colour_list": [...]}); falls back to $HILITE_PALETTE,
    /// then the built-in palette
    #[arg(short = 'p', long)]
    palette: Option<PathBuf>,
    /// Colour for entities missing from metadata.ids (default: $HILITE_FALLBACK_COLOUR or #dddddd)
    #[arg(long = "fallback-colour")]
    fallback_colour: Option<String>,
    /// Output file name inside the output directory
    #[arg(long = "output-name")]
    output_name: Option<String>,
    /// Page title (defaults to the transcript file id)
    #[arg(long)]
    title: Option<String>,
    /// Abort when an annotation uses an id missing from metadata.ids
    #[arg(long)]
    strict: bool,
    /// Also write a debug-level log to this file (truncated each run)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let settings = settings::resolve(&settings::SettingsArgs {
        palette: cli.palette.as_deref(),
        fallback_colour: cli.fallback_colour.as_deref(),
        output_name: cli.output_name.as_deref(),
        strict: cli.strict,
    })?;

    let output = cmd_render::execute(&cmd_render::RenderParams {
        transcript_file: &cli.transcript_file,
        annotation_file: &cli.annotation_file,
        output_dir: &cli.output_dir,
        title: cli.title.as_deref(),
        settings: &settings,
    })?;

    println!("{}", output.display());
    Ok(())
}
