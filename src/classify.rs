use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{BoundingBox, DocumentStats, Error, Fragment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Unknown,
    Annotation,
    Caption,
    Body,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Unknown, Role::Annotation, Role::Caption, Role::Body];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Unknown => "unknown",
            Role::Annotation => "annotation",
            Role::Caption => "caption",
            Role::Body => "body",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownRole(s.to_string()))
    }
}

/// Cut-off values for the decision policy.
///
/// The defaults are fixed calibration constants with no derivation behind them. Re-check them
/// before use on a different kind of document layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub annotation_max_aspect: f32,
    pub annotation_max_chars: usize,
    pub annotation_min_uppercase_ratio: f32,
    pub edge_caption_min_area_ratio: f32,
    pub edge_margin_ratio: f32,
    pub body_min_words: usize,
    pub body_min_chars: usize,
    pub body_min_rel_width: f32,
    pub top_band_ratio: f32,
    pub top_band_min_rel_width: f32,
    pub tall_caption_min_rel_height: f32,
    pub tall_caption_max_rel_width: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            annotation_max_aspect: 0.7,
            annotation_max_chars: 4,
            annotation_min_uppercase_ratio: 0.6,
            edge_caption_min_area_ratio: 0.4,
            edge_margin_ratio: 0.12,
            body_min_words: 10,
            body_min_chars: 40,
            body_min_rel_width: 0.75,
            top_band_ratio: 0.15,
            top_band_min_rel_width: 0.4,
            tall_caption_min_rel_height: 0.6,
            tall_caption_max_rel_width: 0.45,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub width: f32,
    pub height: f32,
    pub aspect: f32,
    pub area_ratio: f32,
    pub rel_width: f32,
    pub rel_height: f32,
    pub center_x: f32,
    pub edge_margin: f32,
    /// Distance of the top edge below the top of the document.
    pub top_offset: f32,
    pub word_count: usize,
    pub char_count: usize,
    pub uppercase_ratio: f32,
}

impl Features {
    pub fn measure(
        bounds: &BoundingBox,
        text: &str,
        stats: &DocumentStats,
        thresholds: &Thresholds,
    ) -> Self {
        let width = bounds.width();
        let height = bounds.height();
        let char_count = text.chars().count();
        let uppercase = text
            .chars()
            .filter(|c| c.is_alphabetic() && c.to_uppercase().eq([*c]))
            .count();

        Self {
            width,
            height,
            aspect: width / height.max(1.0),
            area_ratio: (width * height) / (stats.width_span * stats.height_span),
            rel_width: width / stats.max_width,
            rel_height: height / stats.max_height,
            center_x: (bounds.min().x + bounds.max().x) / 2.0,
            edge_margin: thresholds.edge_margin_ratio * stats.width_span,
            top_offset: bounds.min().y - stats.min_y,
            word_count: text.split_whitespace().count(),
            char_count,
            uppercase_ratio: uppercase as f32 / char_count.max(1) as f32,
        }
    }

    fn hugs_side_edge(&self, stats: &DocumentStats) -> bool {
        self.center_x - stats.min_x < self.edge_margin
            || stats.max_x - self.center_x < self.edge_margin
    }
}

impl Thresholds {
    /// Applies the decision policy. Rules are checked in order and the first match wins.
    pub fn decide(&self, features: &Features, stats: &DocumentStats) -> Role {
        let f = features;
        if f.width <= 0.0 || f.height <= 0.0 {
            Role::Unknown
        } else if f.aspect < self.annotation_max_aspect
            || f.char_count <= self.annotation_max_chars
            || f.uppercase_ratio > self.annotation_min_uppercase_ratio
        {
            Role::Annotation
        } else if f.area_ratio > self.edge_caption_min_area_ratio && f.hugs_side_edge(stats) {
            Role::Caption
        } else if f.word_count >= self.body_min_words
            || f.char_count > self.body_min_chars
            || f.rel_width > self.body_min_rel_width
        {
            Role::Body
        } else if f.top_offset < self.top_band_ratio * stats.height_span
            && f.rel_width > self.top_band_min_rel_width
        {
            Role::Body
        } else if f.rel_height > self.tall_caption_min_rel_height
            && f.rel_width < self.tall_caption_max_rel_width
        {
            Role::Caption
        } else {
            Role::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    pub role: Role,
    pub text: String,
}

impl ClassifiedLine {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// `role<TAB>text` on a single row; line breaks and tabs in the text become spaces.
    pub fn to_record(&self) -> String {
        format!("{}\t{}", self.role, self.text.replace(['\n', '\r', '\t'], " "))
    }
}

#[instrument(level = "trace", skip_all)]
pub fn classify_fragment(
    fragment: &Fragment,
    stats: &DocumentStats,
    thresholds: &Thresholds,
) -> Option<ClassifiedLine> {
    let text = fragment.text.trim();
    if text.is_empty() {
        return None;
    }
    let Some(bounds) = fragment.bounding_box() else {
        log::trace!("No geometry for {text:?}");
        return Some(ClassifiedLine::new(Role::Unknown, text));
    };

    let features = Features::measure(&bounds, text, stats, thresholds);
    let role = thresholds.decide(&features, stats);
    log::trace!("{text:?} -> {role} ({features:?})");
    Some(ClassifiedLine::new(role, text))
}
