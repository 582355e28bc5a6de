use std::{
    path::Path,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{Config, Formatter, OcrResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub dilation_factor: f32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            dilation_factor: 2.0,
        }
    }
}

/// A text recognition engine. Loading models is expensive, so one instance is expected to be
/// built up front and reused for every image.
pub trait OcrEngine {
    type Error: std::error::Error;

    fn recognize(&self, image: &Path, options: &EngineOptions) -> Result<OcrResult, Self::Error>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for &E {
    type Error = E::Error;

    fn recognize(&self, image: &Path, options: &EngineOptions) -> Result<OcrResult, Self::Error> {
        (**self).recognize(image, options)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutput {
    pub text: String,
    pub duration: Duration,
}

pub struct Reader<E> {
    engine: E,
    formatter: Formatter,
    options: EngineOptions,
}

impl<E: OcrEngine> Reader<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            formatter: Formatter::default(),
            options: EngineOptions::default(),
        }
    }

    pub fn from_config(engine: E, config: &Config) -> Self {
        Self::new(engine)
            .with_formatter(Formatter::from_config(config))
            .with_options(config.engine)
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dilation_factor(mut self, dilation_factor: f32) -> Self {
        self.options.dilation_factor = dilation_factor;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Runs the engine on `image` and formats the result. Engine errors are returned as is.
    #[instrument(skip(self, image), fields(image = %image.as_ref().display()))]
    pub fn read(&self, image: impl AsRef<Path>) -> Result<ReadOutput, E::Error> {
        let start = Instant::now();
        let result = self.engine.recognize(image.as_ref(), &self.options)?;
        let text = self.formatter.format(&result);
        let duration = start.elapsed();
        log::debug!("Read {} in {duration:?}", image.as_ref().display());
        Ok(ReadOutput { text, duration })
    }
}
