//! Geometry model mirroring the OpenLayers simple geometries.
//!
//! Coordinates are projection units (EPSG:3857 on MaCarte), y pointing up.
//! Rotations follow the OpenLayers convention: positive angles turn
//! counter-clockwise around the anchor.
//!
//! The classification helpers (`is_rectangle`, `segment_angle`, ...) are
//! what the label tweak and the info dialog build on.

use kurbo::{Affine, Point, Vec2};
use serde::Serialize;
use serde_json::{Value, json};

/// Dot-product tolerance for a single right angle.
pub const ORTHOGONAL_EPSILON: f64 = 1e-10;

/// Looser tolerance used when classifying a whole ring as a rectangle.
/// Hand-drawn or reprojected rectangles drift well past `1e-10`.
pub const RECTANGLE_EPSILON: f64 = 1e-1;

/// The geometry types the host can hand us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    Circle,
}

impl GeometryKind {
    /// The OpenLayers `getType()` name.
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::Circle => "Circle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Point" => Some(GeometryKind::Point),
            "LineString" => Some(GeometryKind::LineString),
            "Polygon" => Some(GeometryKind::Polygon),
            "MultiPoint" => Some(GeometryKind::MultiPoint),
            "MultiLineString" => Some(GeometryKind::MultiLineString),
            "MultiPolygon" => Some(GeometryKind::MultiPolygon),
            "Circle" => Some(GeometryKind::Circle),
            _ => None,
        }
    }
}

/// A feature geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(Vec<Point>),
    /// Rings; the first one is the exterior.
    Polygon(Vec<Vec<Point>>),
    MultiPoint(Vec<Point>),
    MultiLineString(Vec<Vec<Point>>),
    MultiPolygon(Vec<Vec<Vec<Point>>>),
    Circle { center: Point, radius: f64 },
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::Circle { .. } => GeometryKind::Circle,
        }
    }

    /// First vertex in document order (`getFirstCoordinate`).
    pub fn first_coordinate(&self) -> Option<Point> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::Circle { center, .. } => Some(*center),
            Geometry::LineString(pts) | Geometry::MultiPoint(pts) => pts.first().copied(),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.iter().flatten().next().copied()
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().next().copied(),
        }
    }

    /// Visit every vertex mutably.
    fn for_each_point_mut(&mut self, mut f: impl FnMut(&mut Point)) {
        match self {
            Geometry::Point(p) => f(p),
            Geometry::Circle { center, .. } => f(center),
            Geometry::LineString(pts) | Geometry::MultiPoint(pts) => pts.iter_mut().for_each(f),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.iter_mut().flatten().for_each(f)
            }
            Geometry::MultiPolygon(polys) => polys.iter_mut().flatten().flatten().for_each(f),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.for_each_point_mut(|p| *p += delta);
    }

    /// Rotate counter-clockwise by `angle` radians around `anchor`.
    pub fn rotate(&mut self, angle: f64, anchor: Point) {
        let affine = Affine::rotate_about(angle, anchor);
        self.for_each_point_mut(|p| *p = affine * *p);
    }

    /// Coordinates as nested `[x, y]` JSON arrays, the `getCoordinates()` shape.
    /// A circle serializes as `[[cx, cy], radius]`.
    pub fn coordinates_json(&self) -> Value {
        fn pt(p: &Point) -> Value {
            json!([p.x, p.y])
        }
        fn line(pts: &[Point]) -> Value {
            Value::Array(pts.iter().map(pt).collect())
        }
        fn rings(rings: &[Vec<Point>]) -> Value {
            Value::Array(rings.iter().map(|r| line(r)).collect())
        }

        match self {
            Geometry::Point(p) => pt(p),
            Geometry::Circle { center, radius } => json!([[center.x, center.y], radius]),
            Geometry::LineString(pts) | Geometry::MultiPoint(pts) => line(pts),
            Geometry::Polygon(r) | Geometry::MultiLineString(r) => rings(r),
            Geometry::MultiPolygon(polys) => {
                Value::Array(polys.iter().map(|p| rings(p)).collect())
            }
        }
    }

    /// Rebuild a geometry from its kind and `coordinates_json()` payload.
    /// Extra ordinates (z, m) are dropped.
    pub fn from_json(kind: GeometryKind, coords: &Value) -> Option<Self> {
        fn pt(v: &Value) -> Option<Point> {
            let arr = v.as_array()?;
            Some(Point::new(arr.first()?.as_f64()?, arr.get(1)?.as_f64()?))
        }
        fn line(v: &Value) -> Option<Vec<Point>> {
            v.as_array()?.iter().map(pt).collect()
        }
        fn rings(v: &Value) -> Option<Vec<Vec<Point>>> {
            v.as_array()?.iter().map(line).collect()
        }

        Some(match kind {
            GeometryKind::Point => Geometry::Point(pt(coords)?),
            GeometryKind::LineString => Geometry::LineString(line(coords)?),
            GeometryKind::MultiPoint => Geometry::MultiPoint(line(coords)?),
            GeometryKind::Polygon => Geometry::Polygon(rings(coords)?),
            GeometryKind::MultiLineString => Geometry::MultiLineString(rings(coords)?),
            GeometryKind::MultiPolygon => {
                Geometry::MultiPolygon(coords.as_array()?.iter().map(rings).collect::<Option<_>>()?)
            }
            GeometryKind::Circle => {
                let arr = coords.as_array()?;
                Geometry::Circle {
                    center: pt(arr.first()?)?,
                    radius: arr.get(1)?.as_f64()?,
                }
            }
        })
    }
}

// ─── Classification ──────────────────────────────────────────────────────

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Whether the angle a-b-c (at `b`) is a right angle within `epsilon`.
pub fn is_orthogonal(a: Point, b: Point, c: Point, epsilon: f64) -> bool {
    (b - a).dot(b - c).abs() <= epsilon
}

/// The four corners of a rectangle-candidate exterior ring.
/// A closed ring (last vertex repeating the first) is accepted.
fn quad_corners(geometry: &Geometry) -> Option<[Point; 4]> {
    let Geometry::Polygon(rings) = geometry else {
        return None;
    };
    if rings.len() != 1 {
        return None;
    }
    match rings[0].as_slice() {
        [a, b, c, d] => Some([*a, *b, *c, *d]),
        [a, b, c, d, e] if e == a => Some([*a, *b, *c, *d]),
        _ => None,
    }
}

/// Whether `geometry` is a single-ring, four-corner polygon with right angles.
pub fn is_rectangle(geometry: &Geometry) -> bool {
    let Some([a, b, c, d]) = quad_corners(geometry) else {
        return false;
    };
    is_orthogonal(a, b, c, RECTANGLE_EPSILON)
        && is_orthogonal(b, c, d, RECTANGLE_EPSILON)
        && is_orthogonal(c, d, a, RECTANGLE_EPSILON)
}

/// Angle (radians, counter-clockwise from +x) of the longer of the first
/// two edges of a polygon's exterior ring.
///
/// Meaningful for rectangles only; other polygons get the same arithmetic.
pub fn rectangle_angle(geometry: &Geometry) -> Option<f64> {
    let Geometry::Polygon(rings) = geometry else {
        return None;
    };
    let ring = rings.first()?;
    let (a, b, c) = (*ring.first()?, *ring.get(1)?, *ring.get(2)?);
    let edge = if distance(a, b) > distance(b, c) {
        b - a
    } else {
        c - b
    };
    Some(edge.atan2())
}

/// Angle of a two-point line, `None` for anything else.
pub fn segment_angle(geometry: &Geometry) -> Option<f64> {
    match geometry {
        Geometry::LineString(pts) if pts.len() == 2 => Some((pts[1] - pts[0]).atan2()),
        _ => None,
    }
}

/// Edge lengths of a polyline, in vertex order.
pub fn edge_lengths(points: &[Point]) -> Vec<f64> {
    points.windows(2).map(|w| distance(w[0], w[1])).collect()
}

/// Edge lengths of a ring, starting with the closing edge (last → first).
pub fn ring_edge_lengths(ring: &[Point]) -> Vec<f64> {
    (0..ring.len())
        .map(|i| {
            let prev = if i == 0 { ring[ring.len() - 1] } else { ring[i - 1] };
            distance(prev, ring[i])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn polygon(pts: &[(f64, f64)]) -> Geometry {
        Geometry::Polygon(vec![pts.iter().map(|&(x, y)| p(x, y)).collect()])
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn orthogonal_corner() {
        assert!(is_orthogonal(p(0.0, 1.0), p(0.0, 0.0), p(1.0, 0.0), ORTHOGONAL_EPSILON));
        assert!(!is_orthogonal(p(1.0, 1.0), p(0.0, 0.0), p(1.0, 0.0), ORTHOGONAL_EPSILON));
    }

    #[test]
    fn axis_aligned_rectangle() {
        let rect = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
        assert!(is_rectangle(&rect));
    }

    #[test]
    fn rotated_rectangle() {
        let mut rect = polygon(&[(-5.0, -2.5), (5.0, -2.5), (5.0, 2.5), (-5.0, 2.5)]);
        rect.rotate(0.3, Point::ORIGIN);
        assert!(is_rectangle(&rect));
    }

    #[test]
    fn closed_ring_rectangle() {
        let rect = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0), (0.0, 0.0)]);
        assert!(is_rectangle(&rect));
    }

    #[test]
    fn non_rectangles() {
        let triangle = polygon(&[(0.0, 0.0), (4.0, 0.0), (0.0, 2.0)]);
        let pentagon = polygon(&[(0.0, 0.0), (4.0, 0.0), (5.0, 2.0), (2.0, 4.0), (-1.0, 2.0)]);
        let rhombus = polygon(&[(0.0, 0.0), (4.0, 0.0), (6.0, 3.0), (2.0, 3.0)]);
        let line = Geometry::LineString(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        assert!(!is_rectangle(&triangle));
        assert!(!is_rectangle(&pentagon));
        assert!(!is_rectangle(&rhombus));
        assert!(!is_rectangle(&line));
    }

    #[test]
    fn rectangle_with_hole_is_not_a_rectangle() {
        let mut geom = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
        if let Geometry::Polygon(rings) = &mut geom {
            rings.push(vec![p(1.0, 1.0), p(2.0, 1.0), p(2.0, 1.5), p(1.0, 1.5)]);
        }
        assert!(!is_rectangle(&geom));
    }

    #[test]
    fn rectangle_angle_picks_longest_side() {
        let wide = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
        assert!(close(rectangle_angle(&wide).unwrap(), 0.0));

        let tall = polygon(&[(0.0, 0.0), (2.0, 0.0), (2.0, 4.0), (0.0, 4.0)]);
        assert!(close(rectangle_angle(&tall).unwrap(), FRAC_PI_2));

        let mut tilted = wide.clone();
        tilted.rotate(FRAC_PI_4, Point::ORIGIN);
        assert!(close(rectangle_angle(&tilted).unwrap(), FRAC_PI_4));
    }

    #[test]
    fn segment_angle_for_two_points() {
        let east = Geometry::LineString(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        let north = Geometry::LineString(vec![p(0.0, 0.0), p(0.0, 1.0)]);
        let west = Geometry::LineString(vec![p(0.0, 0.0), p(-1.0, 0.0)]);
        assert_eq!(segment_angle(&east), Some(0.0));
        assert!(close(segment_angle(&north).unwrap(), FRAC_PI_2));
        assert!(close(segment_angle(&west).unwrap(), PI));
    }

    #[test]
    fn segment_angle_rejects_everything_else() {
        let three = Geometry::LineString(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1.0)]);
        let one = Geometry::LineString(vec![p(0.0, 0.0)]);
        let point = Geometry::Point(p(0.0, 0.0));
        let square = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert_eq!(segment_angle(&three), None);
        assert_eq!(segment_angle(&one), None);
        assert_eq!(segment_angle(&point), None);
        assert_eq!(segment_angle(&square), None);
    }

    #[test]
    fn translate_moves_every_vertex() {
        let mut geom = Geometry::MultiPolygon(vec![vec![vec![p(0.0, 0.0), p(1.0, 0.0)]]]);
        geom.translate(Vec2::new(2.0, -1.0));
        assert_eq!(
            geom,
            Geometry::MultiPolygon(vec![vec![vec![p(2.0, -1.0), p(3.0, -1.0)]]])
        );
    }

    #[test]
    fn rotate_is_counter_clockwise() {
        let mut geom = Geometry::Point(p(1.0, 0.0));
        geom.rotate(FRAC_PI_2, Point::ORIGIN);
        let Geometry::Point(q) = geom else {
            unreachable!()
        };
        assert!(close(q.x, 0.0) && close(q.y, 1.0));
    }

    #[test]
    fn first_coordinate_of_nested_geometries() {
        let poly = polygon(&[(3.0, 4.0), (5.0, 4.0), (5.0, 6.0)]);
        assert_eq!(poly.first_coordinate(), Some(p(3.0, 4.0)));
        assert_eq!(Geometry::LineString(vec![]).first_coordinate(), None);
    }

    #[test]
    fn json_coordinates_roundtrip_through_kind() {
        let poly = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let json = poly.coordinates_json();
        assert_eq!(json, json!([[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]));
        assert_eq!(Geometry::from_json(GeometryKind::Polygon, &json), Some(poly));
    }

    #[test]
    fn from_json_drops_extra_ordinates() {
        let json = json!([[0.0, 1.0, 99.0], [2.0, 3.0, 99.0]]);
        assert_eq!(
            Geometry::from_json(GeometryKind::LineString, &json),
            Some(Geometry::LineString(vec![p(0.0, 1.0), p(2.0, 3.0)]))
        );
    }

    #[test]
    fn ring_edges_include_closing_edge() {
        let ring = [p(0.0, 0.0), p(3.0, 0.0), p(3.0, 4.0)];
        assert_eq!(edge_lengths(&ring), vec![3.0, 4.0]);
        assert_eq!(ring_edge_lengths(&ring), vec![5.0, 3.0, 4.0]);
    }
}
