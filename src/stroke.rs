//! Recorded strokes and the per-layer stroke log.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use serde::{Deserialize, Serialize};

use crate::brush::{Brush, DabPath, create_dab_for};
use crate::color::Color;
use crate::geom::Point;

/// One dab of a stroke, in drawing space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    /// Brush size in drawing units at the time of the dab.
    pub size: f64,
    pub point: Point,
}

/// A drawing gesture's captured dabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub brush_id: String,
    pub color: Color,
    pub points: Vec<StrokePoint>,
}

impl Stroke {
    #[must_use]
    pub fn new(brush_id: &str, color: Color) -> Self {
        Self { brush_id: brush_id.to_owned(), color, points: Vec::new() }
    }

    pub fn push(&mut self, size: f64, point: Point) {
        self.points.push(StrokePoint { size, point });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Union path of every dab at `scale` backing pixels per drawing unit.
    #[must_use]
    pub fn build_path(&self, active: &dyn Brush, scale: f64) -> DabPath {
        let mut path = DabPath::new();
        for dab in &self.points {
            create_dab_for(active, &self.brush_id, dab.point.scale(scale), dab.size * scale, &mut path);
        }
        path
    }
}

/// Append-only history of sealed strokes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeLog {
    strokes: Vec<Stroke>,
}

impl StrokeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seal `stroke` at the end of the log. Empty strokes are dropped.
    ///
    /// Returns whether the stroke was kept.
    pub fn seal(&mut self, stroke: Stroke) -> bool {
        if stroke.is_empty() {
            return false;
        }
        self.strokes.push(stroke);
        true
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total number of recorded dabs.
    #[must_use]
    pub fn dab_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }
}

impl<'a> IntoIterator for &'a StrokeLog {
    type Item = &'a Stroke;
    type IntoIter = std::slice::Iter<'a, Stroke>;

    fn into_iter(self) -> Self::IntoIter {
        self.strokes.iter()
    }
}
