use std::collections::BTreeMap;

use hilite_core::{css_class, AnnotatedTranscript};
use serde_json::{Map, Value};

/// One handler shared by every legend checkbox. A span stays highlighted
/// only while all entities in its key are checked; `.speaker` lines are
/// never dimmed.
const TOGGLE_SCRIPT: &str = r#"(function () {
    const KEY_COMPONENTS = __KEY_COMPONENTS__;
    const toggles = document.querySelectorAll("input.entity-toggle");

    function refresh() {
        const hidden = new Set();
        toggles.forEach(function (toggle) {
            if (!toggle.checked) {
                hidden.add(toggle.dataset.entity);
            }
        });
        Object.keys(KEY_COMPONENTS).forEach(function (cls) {
            const dim = KEY_COMPONENTS[cls].some(function (id) { return hidden.has(id); });
            document.querySelectorAll("." + CSS.escape(cls)).forEach(function (el) {
                if (el.classList.contains("speaker")) {
                    return;
                }
                el.classList.toggle("no-highlight", dim);
            });
        });
    }

    toggles.forEach(function (toggle) {
        toggle.addEventListener("change", refresh);
    });
})();
"#;

/// Class name -> entity ids, as embedded in the toggle script.
pub fn key_components(transcript: &AnnotatedTranscript) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = transcript
        .legend
        .iter()
        .map(|entry| (css_class(&entry.id), vec![entry.id.clone()]))
        .collect();
    for key in &transcript.entity_keys {
        map.insert(key.css_class(), key.components().to_vec());
    }
    map
}

pub fn toggle_script(transcript: &AnnotatedTranscript) -> String {
    let object: Map<String, Value> = key_components(transcript)
        .into_iter()
        .map(|(class, ids)| (class, Value::from(ids)))
        .collect();
    // Keep `</script>` inside ids from closing the element.
    let json = Value::Object(object).to_string().replace("</", "<\\/");
    TOGGLE_SCRIPT.replace("__KEY_COMPONENTS__", &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilite_core::{annotate, AnnotationDoc, Palette, PipelineOptions, TranscriptDoc};
    use serde_json::json;

    #[test]
    fn embedded_map_parses_back_with_closing_tags_escaped() {
        let t: TranscriptDoc = serde_json::from_value(json!({
            "words": [{"text": "x", "startTime": 0.0, "endTime": 0.5, "speaker": "A"}]
        }))
        .unwrap();
        let a: AnnotationDoc = serde_json::from_value(json!({
            "annotations": [{"id": "</script>", "startWordIndex": 0, "endWordIndex": 0}],
            "metadata": {"ids": ["</script>", "ORG"]}
        }))
        .unwrap();
        let annotated = annotate(&t, &a, &Palette::default(), &PipelineOptions::default()).unwrap();

        let script = toggle_script(&annotated);
        assert!(!script.contains("</script>"));

        let marker = "KEY_COMPONENTS = ";
        let start = script.find(marker).unwrap() + marker.len();
        let end = start + script[start..].find(";\n").unwrap();
        let parsed: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&script[start..end]).unwrap();
        assert_eq!(parsed, key_components(&annotated));
        assert_eq!(parsed["ORG"], ["ORG"]);
    }
}
