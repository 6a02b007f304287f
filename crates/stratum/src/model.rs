//! Layout options.
//!
//! Editors usually persist these next to their other preferences, so the type round-trips
//! through JSON with every field optional.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use stratum_graph::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Layers stacked top-to-bottom; items flow left-to-right inside a layer.
    #[default]
    Horizontal,
    /// Layers stacked left-to-right; items flow top-to-bottom inside a layer.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            horizontal: 10.0,
            vertical: 10.0,
        }
    }
}

impl Margins {
    pub const fn transposed(self) -> Self {
        Self {
            horizontal: self.vertical,
            vertical: self.horizontal,
        }
    }
}

/// Which items contribute to a barycenter weight during crossing reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarycenterScope {
    /// Mean position over the whole adjacent layer, regardless of connectivity.
    #[default]
    Layer,
    /// Mean position over graph-adjacent items in the adjacent layer only.
    Neighbors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub direction: Direction,
    pub margins: Margins,
    /// Top-left corner of the laid out drawing.
    pub origin: Point,
    /// Minimum distance between two consecutive layers.
    pub layer_gap: f64,
    pub barycenter: BarycenterScope,
    /// Number of ascending barycenter passes. At least one pass always runs, so `0` behaves
    /// like `1`.
    pub sweeps: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Horizontal,
            margins: Margins::default(),
            origin: Point::new(0.0, 0.0),
            layer_gap: 40.0,
            barycenter: BarycenterScope::Layer,
            sweeps: 1,
        }
    }
}

impl LayoutOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_margins(mut self, horizontal: f64, vertical: f64) -> Self {
        self.margins = Margins {
            horizontal,
            vertical,
        };
        self
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_layer_gap(mut self, layer_gap: f64) -> Self {
        self.layer_gap = layer_gap;
        self
    }

    pub fn with_barycenter(mut self, scope: BarycenterScope) -> Self {
        self.barycenter = scope;
        self
    }
}
