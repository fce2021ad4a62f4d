//! Shape wizards: rectangle, segment, and map orientation.
//!
//! Dialogs collect raw text; the `*Request::parse` constructors validate it
//! and the `add_*` functions build the shape at the view center, in
//! real-world metres.

use crate::actions::select_for_transform;
use crate::error::ActionError;
use crate::host::{Host, Viewport};
use crate::session::Session;
use imu_core::{FeatureId, Geometry, Point, parse_input_float};

fn parse_field(field: &'static str, raw: &str) -> Result<f64, ActionError> {
    let value = parse_input_float(raw);
    if !value.is_finite() {
        return Err(ActionError::InvalidInput {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(value)
}

/// Projection units per real-world metre around the view center.
///
/// Measures a horizontal line of `width` units centered on the view. Web
/// Mercator distortion depends on latitude and on the extent measured, so
/// compute this for every shape instead of caching it.
pub fn compute_distance_conversion_ratio<H: Viewport + ?Sized>(host: &H, width: f64) -> f64 {
    if width == 0.0 {
        return 1.0;
    }
    let center = host.center();
    let line = [
        Point::new(center.x - width / 2.0, center.y),
        Point::new(center.x + width / 2.0, center.y),
    ];
    (width / host.geodesic_length(&line)).abs()
}

/// Axis-aligned `width × height` rectangle centered on `center`.
pub fn rectangle_geometry(center: Point, width: f64, height: f64) -> Geometry {
    let (x1, x2) = (center.x - width / 2.0, center.x + width / 2.0);
    let (y1, y2) = (center.y - height / 2.0, center.y + height / 2.0);
    Geometry::Polygon(vec![vec![
        Point::new(x1, y1),
        Point::new(x2, y1),
        Point::new(x2, y2),
        Point::new(x1, y2),
    ]])
}

/// Horizontal two-point line of `length` centered on `center`.
pub fn segment_geometry(center: Point, length: f64) -> Geometry {
    Geometry::LineString(vec![
        Point::new(center.x - length / 2.0, center.y),
        Point::new(center.x + length / 2.0, center.y),
    ])
}

/// Counter-clockwise rotation to apply for a clockwise user angle.
fn shape_rotation<H: Viewport + ?Sized>(session: &Session, host: &H, angle_degrees: f64) -> f64 {
    let view = if session.config.compensate_view_rotation {
        host.rotation()
    } else {
        0.0
    };
    view - angle_degrees.to_radians()
}

/// Rotate, add to the active layer, select for transform.
fn place<H: Host + ?Sized>(
    session: &Session,
    host: &mut H,
    mut geometry: Geometry,
    angle_degrees: f64,
) -> Result<FeatureId, ActionError> {
    let layer = host.active_layer().ok_or(ActionError::NoActiveLayer)?;
    geometry.rotate(shape_rotation(session, &*host, angle_degrees), host.center());
    let feature = host.create_feature(geometry);
    host.add_to_layer(layer, feature);
    select_for_transform(session, host, &[feature]);
    Ok(feature)
}

// ─── Rectangle ───────────────────────────────────────────────────────────

/// Validated rectangle dialog input. Lengths in metres, angle in degrees
/// clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleRequest {
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

impl RectangleRequest {
    pub fn parse(width: &str, height: &str, angle: &str) -> Result<Self, ActionError> {
        Ok(Self {
            width: parse_field("width", width)?,
            height: parse_field("height", height)?,
            angle: parse_field("angle", angle)?,
        })
    }
}

pub fn add_rectangle<H: Host + ?Sized>(
    session: &Session,
    host: &mut H,
    request: RectangleRequest,
) -> Result<FeatureId, ActionError> {
    let ratio = compute_distance_conversion_ratio(&*host, request.width);
    let geometry = rectangle_geometry(
        host.center(),
        request.width * ratio,
        request.height * ratio,
    );
    log::debug!(
        "adding {}x{} m rectangle at {}° (ratio {ratio})",
        request.width,
        request.height,
        request.angle
    );
    place(session, host, geometry, request.angle)
}

// ─── Segment ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRequest {
    pub length: f64,
    pub angle: f64,
}

impl SegmentRequest {
    pub fn parse(length: &str, angle: &str) -> Result<Self, ActionError> {
        Ok(Self {
            length: parse_field("length", length)?,
            angle: parse_field("angle", angle)?,
        })
    }
}

pub fn add_segment<H: Host + ?Sized>(
    session: &Session,
    host: &mut H,
    request: SegmentRequest,
) -> Result<FeatureId, ActionError> {
    let ratio = compute_distance_conversion_ratio(&*host, request.length);
    let geometry = segment_geometry(host.center(), request.length * ratio);
    log::debug!(
        "adding {} m segment at {}° (ratio {ratio})",
        request.length,
        request.angle
    );
    place(session, host, geometry, request.angle)
}

// ─── Map orientation ─────────────────────────────────────────────────────

/// Current view rotation in degrees, used to pre-fill the dialog.
pub fn current_orientation_degrees<H: Viewport + ?Sized>(host: &H) -> f64 {
    host.rotation().to_degrees()
}

/// Set the absolute view rotation from a dialog value in degrees.
///
/// `0` puts north up, `90` puts west up, `-90` puts east up.
pub fn set_map_orientation<H: Viewport + ?Sized>(
    host: &mut H,
    angle: &str,
) -> Result<f64, ActionError> {
    let degrees = parse_field("orientation", angle)?;
    host.set_rotation(degrees.to_radians());
    Ok(degrees)
}
