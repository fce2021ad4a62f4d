//! Selection-driven editing actions.
//!
//! Each action runs to completion against the host and reports what it
//! touched. Preconditions that fail come back as [`ActionError`]; the
//! caller decides how to surface them.

use crate::config::TransformSelect;
use crate::error::ActionError;
use crate::host::{FeatureAccess, Host, LayerInfo, LayerSource, SelectMode, SelectionProvider};
use crate::session::Session;
use imu_core::{FeatureId, LayerId, Vec2};

/// Message shown by duplicate when the selection is empty.
const DUPLICATE_EMPTY_MESSAGE: &str = "Aucun élement selectionné. <br/>\
    Veuillez utiliser l'outil de selection \
    <i data-mode=\"None\" class=\"fa fa-hand-o-up\"></i>.";

/// Host-side clone of `feature` carrying its own copy of the style.
fn detached_copy<H: FeatureAccess + ?Sized>(host: &mut H, feature: FeatureId) -> Option<FeatureId> {
    let clone = host.clone_feature(feature)?;
    // An unreadable style is left as the host cloned it.
    if let Some(style) = host.style(feature) {
        host.set_style(clone, style);
    }
    Some(clone)
}

/// Remove each feature from every layer that holds it.
pub fn remove_from_all_layers<H: LayerSource + ?Sized>(host: &mut H, features: &[FeatureId]) {
    for &feature in features {
        for layer in host.layers_containing(feature) {
            host.remove_from_layer(layer, feature);
        }
    }
}

/// Select freshly created features in transform mode, honoring the
/// configured multi-feature policy.
pub(crate) fn select_for_transform<H: SelectionProvider + ?Sized>(
    session: &Session,
    host: &mut H,
    features: &[FeatureId],
) {
    let targets = match session.config.transform_select {
        TransformSelect::All => features,
        TransformSelect::First => &features[..features.len().min(1)],
    };
    host.select(targets, SelectMode::Transform);
}

/// Replace the clipboard with detached copies of the selection.
/// Returns how many features were copied.
pub fn copy<H: Host + ?Sized>(session: &mut Session, host: &mut H) -> usize {
    let copies: Vec<FeatureId> = host
        .selected()
        .into_iter()
        .filter_map(|f| detached_copy(host, f))
        .collect();
    log::debug!("copied {} feature(s)", copies.len());
    let count = copies.len();
    for stale in session.clipboard.replace(copies) {
        host.release(stale);
    }
    count
}

/// Copy, then remove the selection from every layer and clear it.
pub fn cut<H: Host + ?Sized>(session: &mut Session, host: &mut H) -> usize {
    let count = copy(session, host);
    let selected = host.selected();
    remove_from_all_layers(host, &selected);
    host.clear_selection();
    log::debug!("cut {} feature(s)", selected.len());
    count
}

/// Paste the clipboard into the active layer, centered on the view.
///
/// One translation is computed from the first coordinate of the first
/// entry to the view center and applied to every entry, so relative
/// placement survives. The pasted features end up selected for transform.
pub fn paste<H: Host + ?Sized>(
    session: &mut Session,
    host: &mut H,
) -> Result<Vec<FeatureId>, ActionError> {
    let Some(first) = session.clipboard.first() else {
        return Ok(Vec::new());
    };
    let layer = host.active_layer().ok_or(ActionError::NoActiveLayer)?;

    let center = host.center();
    let delta = host
        .geometry(first)
        .and_then(|g| g.first_coordinate())
        .map(|p| center - p)
        .unwrap_or(Vec2::ZERO);

    let mut pasted = Vec::with_capacity(session.clipboard.len());
    for &entry in session.clipboard.entries() {
        let Some(clone) = detached_copy(host, entry) else {
            log::warn!("clipboard entry {entry} is gone, skipping");
            continue;
        };
        if let Some(mut geometry) = host.geometry(clone) {
            geometry.translate(delta);
            host.set_geometry(clone, geometry);
        }
        host.add_to_layer(layer, clone);
        pasted.push(clone);
    }

    log::debug!("pasted {} feature(s) into {layer}", pasted.len());
    select_for_transform(session, host, &pasted);
    Ok(pasted)
}

/// Apply the first clipboard entry's style to the selection, keeping each
/// target's own label text and size. Returns the number of restyled features.
pub fn paste_style<H: Host + ?Sized>(session: &Session, host: &mut H) -> usize {
    let Some(source) = session.clipboard.first().and_then(|f| host.style(f)) else {
        return 0;
    };
    let selected = host.selected();
    for &feature in &selected {
        let current = host.style(feature).unwrap_or_default();
        host.set_style(feature, current.restyled_from(&source));
        host.changed(feature);
    }
    selected.len()
}

/// Clone every selected feature in place into the active layer.
///
/// An empty selection tells the user how to select and does nothing.
pub fn duplicate_selection<H: Host + ?Sized>(host: &mut H) -> Result<Vec<FeatureId>, ActionError> {
    let selected = host.selected();
    log::debug!("cloning {} feature(s)", selected.len());
    if selected.is_empty() {
        host.message(DUPLICATE_EMPTY_MESSAGE, Some(2000));
        return Ok(Vec::new());
    }
    let layer = host.active_layer().ok_or(ActionError::NoActiveLayer)?;

    let mut clones = Vec::with_capacity(selected.len());
    for feature in selected {
        if let Some(clone) = detached_copy(host, feature) {
            host.add_to_layer(layer, clone);
            clones.push(clone);
        }
    }
    Ok(clones)
}

// ─── Delete ──────────────────────────────────────────────────────────────

/// A validated delete waiting for the user's confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    pub features: Vec<FeatureId>,
}

impl DeleteRequest {
    pub fn prompt(&self) -> String {
        format!("Supprimer les {} objects sélectionnés ?", self.features.len())
    }
}

/// Check there is something to delete and capture it.
pub fn prepare_delete<H: SelectionProvider + ?Sized>(
    host: &H,
) -> Result<DeleteRequest, ActionError> {
    let features = host.selected();
    if features.is_empty() {
        return Err(ActionError::NothingSelected);
    }
    Ok(DeleteRequest { features })
}

/// Remove the confirmed features from every layer and clear the selection.
pub fn delete_selection<H: Host + ?Sized>(host: &mut H, request: &DeleteRequest) {
    remove_from_all_layers(host, &request.features);
    host.clear_selection();
    log::debug!("deleted {} feature(s)", request.features.len());
}

// ─── Move to layer ───────────────────────────────────────────────────────

/// A validated move waiting for the user to pick a destination.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRequest {
    pub features: Vec<FeatureId>,
    /// Vector layers the selection can go to.
    pub targets: Vec<LayerInfo>,
}

pub fn prepare_move_to_layer<H: Host + ?Sized>(host: &H) -> Result<MoveRequest, ActionError> {
    let features = host.selected();
    if features.is_empty() {
        return Err(ActionError::NothingSelected);
    }
    let targets = host.layers().into_iter().filter(LayerInfo::is_vector).collect();
    Ok(MoveRequest { features, targets })
}

/// Detach the features from wherever they are and add them to `layer`.
pub fn move_to_layer<H: Host + ?Sized>(
    host: &mut H,
    request: &MoveRequest,
    layer: LayerId,
) -> Result<(), ActionError> {
    if !request.targets.iter().any(|l| l.id == layer) {
        return Err(ActionError::UnknownLayer(layer.to_string()));
    }
    remove_from_all_layers(host, &request.features);
    for &feature in &request.features {
        host.add_to_layer(layer, feature);
    }
    log::debug!("moved {} feature(s) to {layer}", request.features.len());
    Ok(())
}
