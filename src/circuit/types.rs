use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::distance::euclidean;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Spatially close samples collapsed to their mean position
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub centroid: Point3,
    pub member_count: usize,
    /// Drivers that contributed at least one sample
    pub source_ids: BTreeSet<u32>,
}

/// Cluster centroids in visiting order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderedPath {
    points: Vec<Point3>,
}

impl OrderedPath {
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Length of the open polyline through every centroid
    pub fn total_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| euclidean(&pair[0], &pair[1]))
            .sum()
    }

    /// Length including the segment from the last centroid back to the first
    pub fn closed_length(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 => {
                self.total_length() + euclidean(last, first)
            }
            _ => 0.0,
        }
    }

    /// Planar extent of the path, `None` when empty
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };

        Some(self.points.iter().fold(init, |acc, p| Bounds {
            min_x: acc.min_x.min(p.x),
            min_y: acc.min_y.min(p.y),
            max_x: acc.max_x.max(p.x),
            max_y: acc.max_y.max(p.y),
        }))
    }
}

impl From<Vec<Cluster>> for OrderedPath {
    fn from(clusters: Vec<Cluster>) -> Self {
        Self {
            points: clusters.into_iter().map(|c| c.centroid).collect(),
        }
    }
}

/// Axis-aligned x/y box, used to size the rendering viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grow the box by `padding` on every side
    pub fn padded(&self, padding: f64) -> Self {
        Self {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }
}
