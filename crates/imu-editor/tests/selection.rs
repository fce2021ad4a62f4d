//! Integration tests: delete, move to layer and the info report.

use imu_core::{Geometry, IgnStyle, LayerId, Point};
use imu_editor::actions::{delete_selection, move_to_layer, prepare_delete, prepare_move_to_layer};
use imu_editor::info::show_info;
use imu_editor::{ActionError, LayerKind, LayerSource, MemoryHost, SelectionProvider};
use pretty_assertions::assert_eq;

fn rectangle() -> Geometry {
    Geometry::Polygon(vec![vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(4.0, 2.0),
        Point::new(0.0, 2.0),
    ]])
}

struct Fixture {
    host: MemoryHost,
    background: LayerId,
    drawing: LayerId,
    notes: LayerId,
}

fn fixture() -> Fixture {
    let mut host = MemoryHost::planar();
    let background = host.add_layer("plan IGN", LayerKind::Other);
    let drawing = host.add_layer("croquis", LayerKind::Vector);
    let notes = host.add_layer("notes", LayerKind::Vector);
    Fixture {
        host,
        background,
        drawing,
        notes,
    }
}

// ─── Delete ──────────────────────────────────────────────────────────────

#[test]
fn delete_requires_a_selection() {
    let f = fixture();
    let err = prepare_delete(&f.host).unwrap_err();
    assert_eq!(err, ActionError::NothingSelected);
    assert_eq!(
        err.user_message(),
        Some("Veuiller sélectionner un ou des objects.")
    );
}

#[test]
fn delete_after_confirmation() {
    let mut f = fixture();
    let a = f.host.insert(f.drawing, rectangle(), IgnStyle::new());
    let b = f.host.insert(f.drawing, Geometry::Point(Point::ORIGIN), IgnStyle::new());
    f.host.add_to_layer(f.notes, a);
    f.host.set_selection(&[a, b]);

    let request = prepare_delete(&f.host).unwrap();
    assert_eq!(request.prompt(), "Supprimer les 2 objects sélectionnés ?");

    // Nothing happens until the user confirms.
    assert_eq!(f.host.layer_features(f.drawing), vec![a, b]);

    delete_selection(&mut f.host, &request);
    assert!(f.host.layer_features(f.drawing).is_empty());
    assert!(f.host.layer_features(f.notes).is_empty());
    assert!(f.host.selected().is_empty());
}

// ─── Move to layer ───────────────────────────────────────────────────────

#[test]
fn move_requires_a_selection() {
    let f = fixture();
    assert_eq!(
        prepare_move_to_layer(&f.host),
        Err(ActionError::NothingSelected)
    );
}

#[test]
fn move_offers_vector_layers_only() {
    let mut f = fixture();
    let a = f.host.insert(f.drawing, rectangle(), IgnStyle::new());
    f.host.set_selection(&[a]);
    let request = prepare_move_to_layer(&f.host).unwrap();
    let names: Vec<_> = request.targets.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["croquis", "notes"]);
}

#[test]
fn move_detaches_then_attaches() {
    let mut f = fixture();
    let a = f.host.insert(f.drawing, rectangle(), IgnStyle::new());
    let b = f.host.insert(f.drawing, Geometry::Point(Point::ORIGIN), IgnStyle::new());
    f.host.set_selection(&[a]);

    let request = prepare_move_to_layer(&f.host).unwrap();
    move_to_layer(&mut f.host, &request, f.notes).unwrap();
    assert_eq!(f.host.layer_features(f.drawing), vec![b]);
    assert_eq!(f.host.layer_features(f.notes), vec![a]);
    assert_eq!(f.host.layers_containing(a), vec![f.notes]);
}

#[test]
fn move_to_unknown_layer_is_refused() {
    let mut f = fixture();
    let a = f.host.insert(f.drawing, rectangle(), IgnStyle::new());
    f.host.set_selection(&[a]);
    let request = prepare_move_to_layer(&f.host).unwrap();

    let err = move_to_layer(&mut f.host, &request, f.background).unwrap_err();
    assert_eq!(err, ActionError::UnknownLayer("plan IGN".into()));
    assert_eq!(f.host.layer_features(f.drawing), vec![a]);
}

// ─── Info ────────────────────────────────────────────────────────────────

#[test]
fn info_requires_exactly_one_feature() {
    let mut f = fixture();
    assert_eq!(
        show_info(&f.host).unwrap_err(),
        ActionError::SingleSelectionRequired(0)
    );

    let a = f.host.insert(f.drawing, rectangle(), IgnStyle::new());
    let b = f.host.insert(f.drawing, rectangle(), IgnStyle::new());
    f.host.set_selection(&[a, b]);
    let err = show_info(&f.host).unwrap_err();
    assert_eq!(err, ActionError::SingleSelectionRequired(2));
    assert_eq!(err.user_message(), Some("Veuiller sélectionner un seul object."));
}

#[test]
fn info_on_a_rectangle() {
    let mut f = fixture();
    let a = f.host.insert(f.drawing, rectangle(), IgnStyle::new());
    f.host.set_selection(&[a]);

    let report = show_info(&f.host).unwrap();
    let rect = report.rectangle.as_ref().unwrap();
    assert_eq!(rect.angle_degrees, 0.0);
    assert_eq!((rect.width, rect.height), (4.0, 2.0));
    assert_eq!(report.segment, None);
    assert_eq!(report.line_edges, None);
    assert_eq!(report.polygon_edges, Some(vec![2.0, 4.0, 2.0, 4.0]));

    let html = report.to_html();
    assert!(html.contains("isRectangle: true"));
    assert!(html.contains("Dimensions: 4.000 x 2.000 m"));
    assert!(html.contains("isSegment: false"));
    assert!(html.contains("<h4>Coordonnées</h4><pre>"));
}

#[test]
fn info_on_a_segment() {
    let mut f = fixture();
    let seg = f.host.insert(
        f.drawing,
        Geometry::LineString(vec![Point::new(0.0, 0.0), Point::new(0.0, 3.0)]),
        IgnStyle::new(),
    );
    f.host.set_selection(&[seg]);

    let report = show_info(&f.host).unwrap();
    let info = report.segment.as_ref().unwrap();
    assert!((info.angle_degrees - 90.0).abs() < 1e-9);
    assert_eq!(info.length, 3.0);
    assert_eq!(report.line_edges, Some(vec![3.0]));
    assert_eq!(report.rectangle, None);
    assert!(report.to_html().contains("getSegmentAngle: 90.00°"));
}
