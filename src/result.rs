use std::io::Read;

use geo::{BoundingRect, Coord, MultiPoint, Rect};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Result;

pub type BoundingBox = Rect<f32>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                x: map.get("x").and_then(coerce_coord).unwrap_or(0.0),
                y: map.get("y").and_then(coerce_coord).unwrap_or(0.0),
            },
            Value::Array(pair) => Self {
                x: pair.first().and_then(coerce_coord).unwrap_or(0.0),
                y: pair.get(1).and_then(coerce_coord).unwrap_or(0.0),
            },
            _ => Self::default(),
        }
    }
}

impl<'de> Deserialize<'de> for Vertex {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl From<Vertex> for Coord<f32> {
    fn from(vertex: Vertex) -> Self {
        Coord {
            x: vertex.x,
            y: vertex.y,
        }
    }
}

fn coerce_coord(value: &Value) -> Option<f32> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(raw) => raw.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let number = number as f32;
    number.is_finite().then_some(number)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    #[serde(rename = "description", default, deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_vertices")]
    pub vertices: Vec<Vertex>,
}

impl Fragment {
    pub fn new(text: impl Into<String>, vertices: impl IntoIterator<Item = Vertex>) -> Self {
        Self {
            text: text.into(),
            vertices: vertices.into_iter().collect(),
        }
    }

    pub fn from_rect(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(
            text,
            [
                Vertex::new(x, y),
                Vertex::new(x + width, y),
                Vertex::new(x + width, y + height),
                Vertex::new(x, y + height),
            ],
        )
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.vertices
            .iter()
            .copied()
            .map(Coord::from)
            .collect::<MultiPoint<f32>>()
            .bounding_rect()
    }
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_vertices<'de, D>(deserializer: D) -> std::result::Result<Vec<Vertex>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Vertex>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOcrResult {
    #[serde(default)]
    pub bounding_poly: Option<Vec<Fragment>>,
    #[serde(default)]
    pub description: Option<Vec<String>>,
}

impl RawOcrResult {
    pub fn into_result(self) -> OcrResult {
        match (self.bounding_poly, self.description) {
            (Some(fragments), _) if !fragments.is_empty() => OcrResult::Geometric(fragments),
            (_, Some(description)) if !description.is_empty() => OcrResult::FlatText(description),
            _ => OcrResult::Empty,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum OcrResult {
    Geometric(Vec<Fragment>),
    FlatText(Vec<String>),
    #[default]
    Empty,
}

impl OcrResult {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawOcrResult = serde_json::from_str(json)?;
        Ok(raw.into_result())
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let raw: RawOcrResult = serde_json::from_reader(reader)?;
        Ok(raw.into_result())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            OcrResult::Geometric(fragments) => fragments.is_empty(),
            OcrResult::FlatText(description) => description.is_empty(),
            OcrResult::Empty => true,
        }
    }
}

impl From<Vec<Fragment>> for OcrResult {
    fn from(fragments: Vec<Fragment>) -> Self {
        RawOcrResult {
            bounding_poly: Some(fragments),
            description: None,
        }
        .into_result()
    }
}
