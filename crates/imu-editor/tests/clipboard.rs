//! Integration tests: clipboard actions against the in-memory host.
//!
//! Copy/cut/paste/paste-style/duplicate, driven the way the toolbar
//! drives them, checking what ends up in the layers and the selection.

use imu_core::{FeatureId, Geometry, IgnStyle, Point, Vec2};
use imu_editor::actions::{copy, cut, duplicate_selection, paste, paste_style};
use imu_editor::{
    ActionError, ExtensionConfig, FeatureAccess, LayerKind, LayerSource, MemoryHost, SelectMode,
    SelectionProvider, Session,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn style(v: Value) -> IgnStyle {
    serde_json::from_value(v).unwrap()
}

fn square(x: f64, y: f64) -> Geometry {
    Geometry::Polygon(vec![vec![
        Point::new(x, y),
        Point::new(x + 2.0, y),
        Point::new(x + 2.0, y + 2.0),
        Point::new(x, y + 2.0),
    ]])
}

/// Host with one drawing layer holding a square and a point.
fn setup() -> (MemoryHost, FeatureId, FeatureId) {
    let mut host = MemoryHost::planar();
    host.add_layer("fond", LayerKind::Other);
    let layer = host.add_layer("dessin", LayerKind::Vector);
    let a = host.insert(layer, square(1.0, 2.0), style(json!({ "fillColor": "red" })));
    let b = host.insert(
        layer,
        Geometry::Point(Point::new(11.0, 7.0)),
        style(json!({ "pointColor": "blue" })),
    );
    (host, a, b)
}

fn first(host: &MemoryHost, id: FeatureId) -> Point {
    host.geometry(id).unwrap().first_coordinate().unwrap()
}

// ─── Copy / paste ────────────────────────────────────────────────────────

#[test]
fn paste_keeps_relative_offsets() {
    let (mut host, a, b) = setup();
    let mut session = Session::default();
    host.set_selection(&[a, b]);
    assert_eq!(copy(&mut session, &mut host), 2);

    host.set_center(Point::new(100.0, 100.0));
    let pasted = paste(&mut session, &mut host).unwrap();
    assert_eq!(pasted.len(), 2);

    // First coordinate of the first entry lands on the view center.
    assert_eq!(first(&host, pasted[0]), Point::new(100.0, 100.0));
    assert_eq!(
        first(&host, pasted[1]) - first(&host, pasted[0]),
        first(&host, b) - first(&host, a)
    );
}

#[test]
fn paste_adds_to_active_layer_and_selects_for_transform() {
    let (mut host, a, b) = setup();
    let mut session = Session::default();
    host.set_selection(&[a, b]);
    copy(&mut session, &mut host);

    let layer = host.active_layer().unwrap();
    let pasted = paste(&mut session, &mut host).unwrap();
    assert_eq!(host.layer_features(layer), vec![a, b, pasted[0], pasted[1]]);
    assert_eq!(host.selected(), pasted);
    assert_eq!(host.select_mode(), Some(SelectMode::Transform));
}

#[test]
fn copy_leaves_layers_alone() {
    let (mut host, a, b) = setup();
    let mut session = Session::default();
    host.set_selection(&[a]);
    copy(&mut session, &mut host);
    let layer = host.active_layer().unwrap();
    assert_eq!(host.layer_features(layer), vec![a, b]);
    assert_eq!(host.selected(), vec![a]);
}

#[test]
fn repeated_paste_lands_in_the_same_place() {
    let (mut host, a, _) = setup();
    let mut session = Session::default();
    host.set_selection(&[a]);
    copy(&mut session, &mut host);
    host.set_center(Point::new(-30.0, 45.0));

    let first_paste = paste(&mut session, &mut host).unwrap();
    let second_paste = paste(&mut session, &mut host).unwrap();
    assert_ne!(first_paste, second_paste);
    assert_eq!(
        host.geometry(first_paste[0]),
        host.geometry(second_paste[0])
    );
}

#[test]
fn recopying_releases_the_previous_clones() {
    let (mut host, a, b) = setup();
    let mut session = Session::default();
    host.set_selection(&[a, b]);

    copy(&mut session, &mut host);
    let first: Vec<FeatureId> = session.clipboard.entries().to_vec();
    let count = host.feature_count();

    copy(&mut session, &mut host);
    assert_eq!(host.feature_count(), count);
    assert!(first.iter().all(|f| host.geometry(*f).is_none()));
    assert_eq!(session.clipboard.len(), 2);
}

#[test]
fn copy_keeps_the_cloned_style_when_it_cannot_be_read() {
    let (mut host, a, _) = setup();
    let mut session = Session::default();
    host.set_selection(&[a]);

    host.set_styles_unreadable(true);
    copy(&mut session, &mut host);
    host.set_styles_unreadable(false);

    let entry = session.clipboard.first().unwrap();
    assert_eq!(host.style(entry).unwrap().get("fillColor"), Some(&json!("red")));
}

#[test]
fn paste_with_empty_clipboard_is_a_noop() {
    let (mut host, a, _) = setup();
    let mut session = Session::default();
    host.set_selection(&[a]);
    let count = host.feature_count();
    assert_eq!(paste(&mut session, &mut host), Ok(Vec::new()));
    assert_eq!(host.feature_count(), count);
    assert_eq!(host.selected(), vec![a]);
}

#[test]
fn paste_without_active_layer_fails() {
    let (mut host, a, _) = setup();
    let mut session = Session::default();
    host.set_selection(&[a]);
    copy(&mut session, &mut host);
    host.set_active_layer(None);
    assert_eq!(paste(&mut session, &mut host), Err(ActionError::NoActiveLayer));
}

#[test]
fn copying_nothing_empties_the_clipboard() {
    let (mut host, a, _) = setup();
    let mut session = Session::default();
    host.set_selection(&[a]);
    copy(&mut session, &mut host);
    host.clear_selection();
    assert_eq!(copy(&mut session, &mut host), 0);
    assert!(session.clipboard.is_empty());
}

#[test]
fn miu_selects_only_the_first_pasted_feature() {
    let (mut host, a, b) = setup();
    let mut session = Session::new(ExtensionConfig::miu());
    host.set_selection(&[a, b]);
    copy(&mut session, &mut host);
    let pasted = paste(&mut session, &mut host).unwrap();
    assert_eq!(pasted.len(), 2);
    assert_eq!(host.selected(), vec![pasted[0]]);
}

// ─── Independence ────────────────────────────────────────────────────────

#[test]
fn clipboard_ignores_later_edits_to_the_original() {
    let (mut host, a, _) = setup();
    let mut session = Session::default();
    host.set_selection(&[a]);
    copy(&mut session, &mut host);

    host.edit_style(a, |s| s.set("fillColor", "green"));
    let mut moved = host.geometry(a).unwrap();
    moved.translate(Vec2::new(50.0, 50.0));
    host.set_geometry(a, moved);

    host.set_center(Point::new(1.0, 2.0));
    let pasted = paste(&mut session, &mut host).unwrap();
    assert_eq!(host.geometry(pasted[0]), Some(square(1.0, 2.0)));
    assert_eq!(
        host.style(pasted[0]).unwrap(),
        style(json!({ "fillColor": "red" }))
    );
}

#[test]
fn pasted_features_do_not_share_style() {
    let (mut host, a, _) = setup();
    let mut session = Session::default();
    host.set_selection(&[a]);
    copy(&mut session, &mut host);
    let one = paste(&mut session, &mut host).unwrap()[0];
    let two = paste(&mut session, &mut host).unwrap()[0];

    host.edit_style(one, |s| s.set("fillColor", "black"));
    assert_eq!(host.style(two).unwrap().get("fillColor"), Some(&json!("red")));
    assert_eq!(host.style(a).unwrap().get("fillColor"), Some(&json!("red")));
}

// ─── Cut ─────────────────────────────────────────────────────────────────

#[test]
fn cut_removes_from_every_layer() {
    let (mut host, a, b) = setup();
    let extra = host.add_layer("annotations", LayerKind::Vector);
    host.add_to_layer(extra, a);
    let mut session = Session::default();

    host.set_selection(&[a]);
    assert_eq!(cut(&mut session, &mut host), 1);
    assert!(host.layers_containing(a).is_empty());
    assert_eq!(host.layers_containing(b).len(), 1);
    assert!(host.selected().is_empty());
}

#[test]
fn cut_then_paste_restores_geometry_up_to_translation() {
    let (mut host, a, b) = setup();
    let original = host.geometry(a).unwrap();
    let mut session = Session::default();
    host.set_selection(&[a, b]);
    cut(&mut session, &mut host);

    host.set_center(Point::new(5.0, 5.0));
    let pasted = paste(&mut session, &mut host).unwrap();
    let mut expected = original;
    expected.translate(Point::new(5.0, 5.0) - Point::new(1.0, 2.0));
    assert_eq!(host.geometry(pasted[0]), Some(expected));

    let layer = host.active_layer().unwrap();
    assert!(!host.layer_features(layer).contains(&a));
    assert!(!host.layer_features(layer).contains(&b));
}

// ─── Paste style ─────────────────────────────────────────────────────────

#[test]
fn paste_style_keeps_target_label() {
    let mut host = MemoryHost::planar();
    let layer = host.add_layer("dessin", LayerKind::Vector);
    let source = host.insert(
        layer,
        square(0.0, 0.0),
        style(json!({
            "fillColor": "red",
            "strokeWidth": 2,
            "labelAttribute": "source",
            "textSize": 20
        })),
    );
    let target = host.insert(
        layer,
        square(10.0, 0.0),
        style(json!({
            "fillColor": "blue",
            "fillOpacity": 0.5,
            "labelAttribute": "parcelle 12",
            "textSize": 12
        })),
    );
    let unlabeled = host.insert(layer, square(20.0, 0.0), IgnStyle::new());

    let mut session = Session::default();
    host.set_selection(&[source]);
    copy(&mut session, &mut host);
    host.set_selection(&[target, unlabeled]);
    assert_eq!(paste_style(&session, &mut host), 2);

    assert_eq!(
        host.style(target).unwrap(),
        style(json!({
            "fillColor": "red",
            "strokeWidth": 2,
            "labelAttribute": "parcelle 12",
            "textSize": 12
        }))
    );
    assert_eq!(
        host.style(unlabeled).unwrap(),
        style(json!({ "fillColor": "red", "strokeWidth": 2 }))
    );
    assert_eq!(host.changed_features(), &[target, unlabeled]);
}

#[test]
fn paste_style_with_empty_clipboard_does_nothing() {
    let (mut host, a, _) = setup();
    let session = Session::default();
    host.set_selection(&[a]);
    assert_eq!(paste_style(&session, &mut host), 0);
    assert_eq!(
        host.style(a).unwrap(),
        style(json!({ "fillColor": "red" }))
    );
}

// ─── Duplicate ───────────────────────────────────────────────────────────

#[test]
fn duplicate_clones_in_place() {
    let (mut host, a, b) = setup();
    host.set_selection(&[a, b]);
    let clones = duplicate_selection(&mut host).unwrap();
    assert_eq!(clones.len(), 2);
    assert_eq!(host.geometry(clones[0]), host.geometry(a));
    assert_eq!(host.geometry(clones[1]), host.geometry(b));

    let layer = host.active_layer().unwrap();
    assert_eq!(host.layer_features(layer).len(), 4);

    host.edit_style(clones[0], |s| s.set("fillColor", "white"));
    assert_eq!(host.style(a).unwrap().get("fillColor"), Some(&json!("red")));
}

#[test]
fn duplicate_with_nothing_selected_tells_the_user() {
    let (mut host, _, _) = setup();
    let count = host.feature_count();
    assert_eq!(duplicate_selection(&mut host), Ok(Vec::new()));
    assert_eq!(host.feature_count(), count);

    let [(text, duration)] = host.messages() else {
        panic!("expected one message, got {:?}", host.messages());
    };
    assert!(text.starts_with("Aucun élement selectionné."));
    assert_eq!(*duration, Some(2000));
}
