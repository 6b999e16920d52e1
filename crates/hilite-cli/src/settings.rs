use anyhow::Context;
use hilite_core::rank::DEFAULT_FALLBACK_COLOUR;
use hilite_core::{Palette, UnknownEntityPolicy};
use std::path::{Path, PathBuf};

pub const PALETTE_ENV: &str = "HILITE_PALETTE";
pub const FALLBACK_COLOUR_ENV: &str = "HILITE_FALLBACK_COLOUR";
pub const DEFAULT_OUTPUT_NAME: &str = "annotated_transcript.html";

/// Resolved once per invocation and passed down explicitly.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub palette: Palette,
    pub fallback_colour: String,
    pub output_name: String,
    pub unknown_entities: UnknownEntityPolicy,
}

pub struct SettingsArgs<'a> {
    pub palette: Option<&'a Path>,
    pub fallback_colour: Option<&'a str>,
    pub output_name: Option<&'a str>,
    pub strict: bool,
}

/// Flag, then environment variable, then built-in default.
pub fn resolve(args: &SettingsArgs) -> anyhow::Result<RenderSettings> {
    resolve_with(args, |key| std::env::var(key).ok())
}

fn resolve_with(
    args: &SettingsArgs,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<RenderSettings> {
    let palette_path = args
        .palette
        .map(Path::to_path_buf)
        .or_else(|| env(PALETTE_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));
    let palette = match palette_path {
        Some(path) => hilite_store::load_palette(&path)
            .with_context(|| format!("loading palette {}", path.display()))?,
        None => Palette::default(),
    };

    let fallback_colour = args
        .fallback_colour
        .map(str::to_string)
        .or_else(|| env(FALLBACK_COLOUR_ENV).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_FALLBACK_COLOUR.to_string());

    let output_name = args.output_name.unwrap_or(DEFAULT_OUTPUT_NAME).to_string();
    if output_name.is_empty() || output_name.contains(['/', '\\']) {
        anyhow::bail!("--output-name must be a plain file name, got {output_name:?}");
    }

    let unknown_entities = if args.strict {
        UnknownEntityPolicy::Fail
    } else {
        UnknownEntityPolicy::Fallback
    };

    tracing::debug!(
        colours = palette.colours().len(),
        fallback = %fallback_colour,
        output_name = %output_name,
        "resolved render settings"
    );

    Ok(RenderSettings {
        palette,
        fallback_colour,
        output_name,
        unknown_entities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args() -> SettingsArgs<'static> {
        SettingsArgs {
            palette: None,
            fallback_colour: None,
            output_name: None,
            strict: false,
        }
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_flags_or_env() {
        let settings = resolve_with(&args(), env_of(&[])).unwrap();
        assert_eq!(settings.palette, Palette::default());
        assert_eq!(settings.fallback_colour, DEFAULT_FALLBACK_COLOUR);
        assert_eq!(settings.output_name, DEFAULT_OUTPUT_NAME);
        assert_eq!(settings.unknown_entities, UnknownEntityPolicy::Fallback);
    }

    #[test]
    fn env_palette_is_used_when_no_flag() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("colours.json");
        std::fs::write(&path, r#"{"html_colour_list": ["red", "green"]}"#).unwrap();

        let env = env_of(&[(PALETTE_ENV, path.to_str().unwrap())]);
        let settings = resolve_with(&args(), env).unwrap();
        assert_eq!(settings.palette.colours(), ["red", "green"]);
    }

    #[test]
    fn flag_beats_env() {
        let tmp = tempfile::tempdir().unwrap();
        let flag_path = tmp.path().join("flag.json");
        std::fs::write(&flag_path, r#"{"html_colour_list": ["navy"]}"#).unwrap();

        let env = env_of(&[
            (PALETTE_ENV, "/nonexistent/palette.json"),
            (FALLBACK_COLOUR_ENV, "pink"),
        ]);
        let settings = resolve_with(
            &SettingsArgs {
                palette: Some(&flag_path),
                fallback_colour: Some("black"),
                ..args()
            },
            env,
        )
        .unwrap();
        assert_eq!(settings.palette.colours(), ["navy"]);
        assert_eq!(settings.fallback_colour, "black");
    }

    #[test]
    fn env_fallback_colour_applies() {
        let settings = resolve_with(&args(), env_of(&[(FALLBACK_COLOUR_ENV, "pink")])).unwrap();
        assert_eq!(settings.fallback_colour, "pink");
    }

    #[test]
    fn missing_palette_file_is_an_error() {
        let err = resolve_with(
            &SettingsArgs {
                palette: Some(Path::new("/nonexistent/palette.json")),
                ..args()
            },
            env_of(&[]),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/palette.json"));
    }

    #[test]
    fn output_name_must_not_be_a_path() {
        let result = resolve_with(
            &SettingsArgs {
                output_name: Some("../escape.html"),
                ..args()
            },
            env_of(&[]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn strict_selects_fail_policy() {
        let settings = resolve_with(&SettingsArgs { strict: true, ..args() }, env_of(&[])).unwrap();
        assert_eq!(settings.unknown_entities, UnknownEntityPolicy::Fail);
    }
}
