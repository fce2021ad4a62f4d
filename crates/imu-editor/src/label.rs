//! Label tweaks applied through the host's per-layer style function.
//!
//! Labels scale with zoom and turn to follow the longest side of a
//! rectangle or the direction of a segment. Each vector layer's style
//! function is wrapped once; [`PatchRegistry`] remembers which.

use crate::host::LayerInfo;
use imu_core::geometry::{Geometry, GeometryKind, is_rectangle, rectangle_angle, segment_angle};
use imu_core::LayerId;
use std::collections::HashSet;
use std::f64::consts::TAU;

/// Scale and rotation to set on a feature's text style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelTransform {
    pub scale: f64,
    /// Clockwise radians in `[0, 2π)`, the OpenLayers text convention.
    pub rotation: f64,
}

impl LabelTransform {
    /// `ratio` is the configured label scale ratio, `resolution` the map
    /// resolution the style function was called with.
    pub fn for_feature(geometry: Option<&Geometry>, resolution: f64, ratio: f64) -> Self {
        Self {
            scale: ratio / resolution,
            rotation: geometry.map(label_rotation).unwrap_or(0.0),
        }
    }
}

/// Text rotation for a geometry: rectangles follow their longest side,
/// segments their direction, everything else stays horizontal.
pub fn label_rotation(geometry: &Geometry) -> f64 {
    let angle = if is_rectangle(geometry) {
        rectangle_angle(geometry)
    } else {
        segment_angle(geometry)
    };
    // Counter-clockwise math angle → clockwise text angle.
    angle.map(|a| (TAU - a).rem_euclid(TAU)).unwrap_or(0.0)
}

/// Whether a geometry can turn its label, judged from its type and the
/// vertex count of each ring (a line string is one ring). Only these are
/// worth reading in full: a two-point line, or a single-ring polygon of
/// four corners, optionally closed.
pub fn can_rotate_label(kind: GeometryKind, ring_lengths: &[usize]) -> bool {
    match kind {
        GeometryKind::LineString => ring_lengths == [2],
        GeometryKind::Polygon => matches!(ring_lengths, [4] | [5]),
        _ => false,
    }
}

/// Layers whose style function has already been wrapped.
#[derive(Debug, Default)]
pub struct PatchRegistry {
    patched: HashSet<LayerId>,
}

impl PatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_patched(&self, layer: LayerId) -> bool {
        self.patched.contains(&layer)
    }

    /// Vector layers not patched yet, now marked as patched.
    /// Calling it again with the same layers returns nothing.
    pub fn claim(&mut self, layers: &[LayerInfo]) -> Vec<LayerId> {
        layers
            .iter()
            .filter(|l| l.is_vector())
            .filter(|l| self.patched.insert(l.id))
            .map(|l| l.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.patched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patched.is_empty()
    }
}
