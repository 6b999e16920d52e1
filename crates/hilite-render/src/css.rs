use hilite_core::{css_class, AnnotatedTranscript, EntityKey};

const BASE_CSS: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; margin: 2em; }
#legend { margin-bottom: 1.5em; }
#legend label { display: inline-block; padding: 2px 6px; border-radius: 3px; margin: 2px 0; }
.entity {
    padding: 2px;
    border-radius: 3px;
    transition: background-color 0.3s ease;
}
.speaker { font-weight: bold; margin: 1em 0 0.2em; color: #444; }
.phrase { margin: 0 0 0.5em; }
";

const NO_HIGHLIGHT_CSS: &str = "\
.no-highlight {
    background-color: transparent !important;
    background-image: none !important;
}
";

/// Full `<style>` body: base rules, one rule per entity key, then the
/// `.no-highlight` override.
pub fn stylesheet(transcript: &AnnotatedTranscript) -> String {
    let mut out = String::from(BASE_CSS);

    // Legend entities first so unused ones still have a rule.
    for entry in &transcript.legend {
        if transcript.entity_keys.contains(&EntityKey::single(entry.id.as_str())) {
            continue;
        }
        out.push_str(&solid_rule(&css_class(&entry.id), &entry.colour));
    }

    for key in &transcript.entity_keys {
        let colours: Vec<&str> = key
            .components()
            .iter()
            .map(|id| transcript.colours.colour_of(id))
            .collect();
        let class = key.css_class();
        match colours.as_slice() {
            [single] => out.push_str(&solid_rule(&class, single)),
            _ => out.push_str(&striped_rule(&class, &colours)),
        }
    }

    out.push_str(NO_HIGHLIGHT_CSS);
    out
}

fn solid_rule(class: &str, colour: &str) -> String {
    format!(
        ".entity.{} {{ background-color: {}; }}\n",
        css_ident(class),
        css_value(colour)
    )
}

/// Compound keys show every component colour as an equal hard-edged band.
fn striped_rule(class: &str, colours: &[&str]) -> String {
    let n = colours.len().max(1) as f64;
    let stops: Vec<String> = colours
        .iter()
        .enumerate()
        .map(|(i, colour)| {
            format!(
                "{} {:.2}% {:.2}%",
                css_value(colour),
                i as f64 * 100.0 / n,
                (i + 1) as f64 * 100.0 / n
            )
        })
        .collect();
    format!(
        ".entity.{} {{ background-image: linear-gradient(135deg, {}); }}\n",
        css_ident(class),
        stops.join(", ")
    )
}

/// Escape a class name for use in a selector. Anything outside
/// `[A-Za-z0-9_-]` and non-ASCII becomes a hex escape, as does a leading digit.
pub fn css_ident(class: &str) -> String {
    let mut out = String::with_capacity(class.len());
    for (i, c) in class.chars().enumerate() {
        let plain = c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii();
        if plain && !(i == 0 && c.is_ascii_digit()) {
            out.push(c);
        } else {
            out.push_str(&format!("\\{:x} ", c as u32));
        }
    }
    out
}

/// Colour tokens come from user files; drop anything that could end the
/// declaration or the style element.
fn css_value(colour: &str) -> String {
    colour
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '"' | '\'' | '\\'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_ident_keeps_plain_names() {
        assert_eq!(css_ident("PERSON"), "PERSON");
        assert_eq!(css_ident("ORG-PERSON"), "ORG-PERSON");
        assert_eq!(css_ident("WORK_OF_ART"), "WORK_OF_ART");
    }

    #[test]
    fn css_ident_escapes_leading_digit_and_punctuation() {
        assert_eq!(css_ident("1st"), "\\31 st");
        assert_eq!(css_ident("a.b"), "a\\2e b");
        assert_eq!(css_ident("</style>"), "\\3c \\2f style\\3e ");
    }

    #[test]
    fn css_value_strips_declaration_breakers() {
        assert_eq!(css_value("#abc"), "#abc");
        assert_eq!(css_value("red;}</style>"), "red/style");
    }

    #[test]
    fn striped_rule_splits_evenly() {
        let rule = striped_rule("A-B", &["red", "blue"]);
        assert_eq!(
            rule,
            ".entity.A-B { background-image: linear-gradient(135deg, \
             red 0.00% 50.00%, blue 50.00% 100.00%); }\n"
        );
    }
}
