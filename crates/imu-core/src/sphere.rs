//! Spherical measurements for Web Mercator coordinates.
//!
//! Reproduces what OpenLayers' `ol/sphere.getLength` returns for a line
//! in EPSG:3857: vertices are unprojected to lon/lat, then great-circle
//! distances are summed on the mean-radius sphere.

use kurbo::Point;

/// Mean Earth radius used by `ol/sphere` (metres).
pub const DEFAULT_RADIUS: f64 = 6_371_008.8;

/// Radius of the EPSG:3857 projection sphere (metres).
pub const MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Convert an EPSG:3857 coordinate to `(lon, lat)` in degrees.
pub fn to_lon_lat(p: Point) -> (f64, f64) {
    let lon = (p.x / MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (p.y / MERCATOR_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}

/// Great-circle (haversine) distance between two `(lon, lat)` pairs in degrees.
pub fn haversine(a: (f64, f64), b: (f64, f64), radius: f64) -> f64 {
    let lat1 = a.1.to_radians();
    let lat2 = b.1.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.0 - a.0).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + (dlon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    2.0 * radius * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Geodesic length (metres) of a Web Mercator polyline.
pub fn line_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine(to_lon_lat(w[0]), to_lon_lat(w[1]), DEFAULT_RADIUS))
        .sum()
}
