use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{classify_fragment, ClassifiedLine, DocumentStats, OcrResult, Role, Thresholds};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    pub unknown: String,
    pub annotation: String,
    pub caption: String,
    pub body: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            unknown: "()".to_string(),
            annotation: "//".to_string(),
            caption: "''".to_string(),
            body: "[]".to_string(),
        }
    }
}

impl Markers {
    pub fn marker(&self, role: Role) -> &str {
        match role {
            Role::Unknown => &self.unknown,
            Role::Annotation => &self.annotation,
            Role::Caption => &self.caption,
            Role::Body => &self.body,
        }
    }

    pub fn render(&self, line: &ClassifiedLine) -> String {
        format!("{} : {}", self.marker(line.role), line.text)
    }
}

/// Turns a recognition result into classified lines, in the order the engine reported them.
///
/// Results without geometry collapse into a single `unknown` line holding all non-blank
/// entries joined by spaces.
#[instrument(level = "debug", skip_all)]
pub fn classify_result(result: &OcrResult, thresholds: &Thresholds) -> Vec<ClassifiedLine> {
    if result.is_empty() {
        log::debug!("Nothing recognized");
        return vec![];
    }
    match result {
        OcrResult::Geometric(fragments) => {
            let stats = DocumentStats::collect(fragments);
            let lines = fragments
                .iter()
                .filter_map(|fragment| classify_fragment(fragment, &stats, thresholds))
                .collect::<Vec<_>>();
            log::debug!(
                "Classified {} lines from {} fragments",
                lines.len(),
                fragments.len()
            );
            lines
        }
        OcrResult::FlatText(description) => {
            log::debug!("No geometry, joining {} text entries", description.len());
            let text = description
                .iter()
                .map(|part| part.trim())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if text.is_empty() {
                vec![]
            } else {
                vec![ClassifiedLine::new(Role::Unknown, text)]
            }
        }
        OcrResult::Empty => vec![],
    }
}

pub fn render_lines(lines: &[ClassifiedLine], markers: &Markers) -> String {
    lines
        .iter()
        .map(|line| markers.render(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fragment;

    #[test]
    fn flat_text_skips_blank_entries() {
        let result = OcrResult::FlatText(vec![" Hello ".into(), "   ".into(), "world\n".into()]);
        let lines = classify_result(&result, &Thresholds::default());
        assert_eq!(lines, vec![ClassifiedLine::new(Role::Unknown, "Hello world")]);
    }

    #[test]
    fn flat_text_of_only_blanks_is_empty() {
        let result = OcrResult::FlatText(vec![" ".into(), "".into()]);
        assert!(classify_result(&result, &Thresholds::default()).is_empty());
    }

    #[test]
    fn lines_keep_engine_order() {
        let result = OcrResult::Geometric(vec![
            Fragment::new("second?", []),
            Fragment::new("", []),
            Fragment::new("first?", []),
        ]);
        let lines = classify_result(&result, &Thresholds::default());
        let texts = lines.iter().map(|it| it.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, ["second?", "first?"]);
    }

    #[test]
    fn custom_markers_are_used() {
        let markers = Markers {
            body: "B".to_string(),
            ..Default::default()
        };
        let lines = [
            ClassifiedLine::new(Role::Body, "text"),
            ClassifiedLine::new(Role::Unknown, "more"),
        ];
        assert_eq!(render_lines(&lines, &markers), "B : text\n() : more");
    }
}
