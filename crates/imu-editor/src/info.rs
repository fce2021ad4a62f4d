//! Feature information report (the "show info" dialog).

use crate::error::ActionError;
use crate::host::{Host, Viewport};
use crate::wizards::compute_distance_conversion_ratio;
use imu_core::geometry::{
    Geometry, GeometryKind, distance, edge_lengths, is_rectangle, rectangle_angle,
    ring_edge_lengths, segment_angle,
};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectangleInfo {
    /// Angle of the longest side, degrees counter-clockwise from east.
    pub angle_degrees: f64,
    /// First side, metres.
    pub width: f64,
    /// Second side, metres.
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentInfo {
    pub angle_degrees: f64,
    /// Metres.
    pub length: f64,
}

/// What the info dialog shows about a single feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureReport {
    pub kind: GeometryKind,
    pub rectangle: Option<RectangleInfo>,
    pub segment: Option<SegmentInfo>,
    /// Edge lengths in metres when the feature is a line string.
    pub line_edges: Option<Vec<f64>>,
    /// Exterior ring edge lengths in metres (closing edge first) when the
    /// feature is a polygon.
    pub polygon_edges: Option<Vec<f64>>,
    /// Raw coordinates as the host reports them.
    pub coordinates: serde_json::Value,
}

/// Real-world lengths of `edges`, all scaled with the ratio measured on
/// the first edge.
fn edges_in_metres<H: Viewport + ?Sized>(host: &H, edges: Vec<f64>) -> Vec<f64> {
    let ratio = compute_distance_conversion_ratio(host, edges.first().copied().unwrap_or(0.0));
    edges.into_iter().map(|e| e / ratio).collect()
}

impl FeatureReport {
    pub fn build<H: Viewport + ?Sized>(host: &H, geometry: &Geometry) -> Self {
        let rectangle = match geometry {
            Geometry::Polygon(rings) if is_rectangle(geometry) => {
                let ring = &rings[0];
                let a = distance(ring[0], ring[1]);
                let b = distance(ring[1], ring[2]);
                let ratio = compute_distance_conversion_ratio(host, a);
                Some(RectangleInfo {
                    angle_degrees: rectangle_angle(geometry)
                        .unwrap_or(0.0)
                        .to_degrees(),
                    width: a / ratio,
                    height: b / ratio,
                })
            }
            _ => None,
        };

        let segment = match geometry {
            Geometry::LineString(pts) => segment_angle(geometry).map(|angle| {
                let length = distance(pts[0], pts[1]);
                let ratio = compute_distance_conversion_ratio(host, length);
                SegmentInfo {
                    angle_degrees: angle.to_degrees(),
                    length: length / ratio,
                }
            }),
            _ => None,
        };

        let line_edges = match geometry {
            Geometry::LineString(pts) => Some(edges_in_metres(host, edge_lengths(pts))),
            _ => None,
        };

        let polygon_edges = match geometry {
            Geometry::Polygon(rings) => {
                let ring = rings.first().map(Vec::as_slice).unwrap_or_default();
                let ratio = match ring {
                    [a, b, ..] => compute_distance_conversion_ratio(host, distance(*a, *b)),
                    _ => 1.0,
                };
                Some(
                    ring_edge_lengths(ring)
                        .into_iter()
                        .map(|e| e / ratio)
                        .collect(),
                )
            }
            _ => None,
        };

        Self {
            kind: geometry.kind(),
            rectangle,
            segment,
            line_edges,
            polygon_edges,
            coordinates: geometry.coordinates_json(),
        }
    }

    /// Dialog body.
    pub fn to_html(&self) -> String {
        let mut out = String::new();

        let _ = write!(
            out,
            "<h4>Rectangle</h4>isRectangle: {}<br/>",
            self.rectangle.is_some()
        );
        if let Some(r) = &self.rectangle {
            let _ = write!(
                out,
                "getRectangleAngle: {:.2}<br/>Dimensions: {:.3} x {:.3} m<br/>",
                r.angle_degrees, r.width, r.height
            );
        }

        let _ = write!(
            out,
            "<h4>Segment</h4>isSegment: {}<br/>",
            self.segment.is_some()
        );
        if let Some(s) = &self.segment {
            let _ = write!(
                out,
                "getSegmentAngle: {:.2}°<br/>Length: {:.3} m<br/>",
                s.angle_degrees, s.length
            );
        }

        let _ = write!(
            out,
            "<h4>LineString</h4>isLineString: {}<br/>",
            self.line_edges.is_some()
        );
        for edge in self.line_edges.iter().flatten() {
            let _ = write!(out, "segment length: {edge:.3} m<br/>");
        }

        let _ = write!(
            out,
            "<h4>Polygon</h4>isPolygon: {}<br/>",
            self.polygon_edges.is_some()
        );
        for edge in self.polygon_edges.iter().flatten() {
            let _ = write!(out, "segment length: {edge:.3} m<br/>");
        }

        let coords = serde_json::to_string_pretty(&self.coordinates).unwrap_or_default();
        let _ = write!(out, "<h4>Coordonnées</h4><pre>{coords}</pre>");
        out
    }
}

/// Report on the single selected feature.
pub fn show_info<H: Host + ?Sized>(host: &H) -> Result<FeatureReport, ActionError> {
    let selected = host.selected();
    let [feature] = selected.as_slice() else {
        return Err(ActionError::SingleSelectionRequired(selected.len()));
    };
    let geometry = host
        .geometry(*feature)
        .ok_or(ActionError::SingleSelectionRequired(0))?;
    log::info!("selected feature {feature}: {:?}", geometry.kind());
    Ok(FeatureReport::build(host, &geometry))
}
