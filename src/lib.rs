mod classify;
pub mod config;
mod engine;
mod error;
mod format;
mod result;
mod stats;

pub use classify::*;
pub use config::Config;
pub use engine::*;
pub use error::*;
pub use format::*;
pub use result::*;
pub use stats::*;

use tracing::instrument;

pub struct FormatterBuilder {
    thresholds: Thresholds,
    markers: Markers,
}

impl FormatterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn build(self) -> Formatter {
        Formatter {
            thresholds: self.thresholds,
            markers: self.markers,
        }
    }
}

impl Default for FormatterBuilder {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            markers: Markers::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    thresholds: Thresholds,
    markers: Markers,
}

impl Formatter {
    pub fn builder() -> FormatterBuilder {
        FormatterBuilder::new()
    }

    pub fn from_config(config: &Config) -> Self {
        FormatterBuilder::new()
            .thresholds(config.thresholds)
            .markers(config.markers.clone())
            .build()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn classify(&self, result: &OcrResult) -> Vec<ClassifiedLine> {
        classify_result(result, &self.thresholds)
    }

    #[instrument(skip_all)]
    pub fn format(&self, result: &OcrResult) -> String {
        render_lines(&self.classify(result), &self.markers)
    }
}
