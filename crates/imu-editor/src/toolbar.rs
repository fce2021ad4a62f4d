//! Toolbar model: which buttons exist, what they do, and which browser
//! clipboard events they answer to.
//!
//! The DOM side lives in `imu-wasm`; this is the static part it renders.

use crate::config::Variant;
use crate::host::SelectMode;

/// What a button (or bound event) triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Cut,
    Copy,
    Paste,
    PasteStyle,
    AddRectangle,
    AddSegment,
    SetMapOrientation,
    Delete,
    MoveToLayer,
    ShowInfo,
    Duplicate,
}

impl ToolbarAction {
    pub const ALL: [ToolbarAction; 11] = [
        ToolbarAction::Cut,
        ToolbarAction::Copy,
        ToolbarAction::Paste,
        ToolbarAction::PasteStyle,
        ToolbarAction::AddRectangle,
        ToolbarAction::AddSegment,
        ToolbarAction::SetMapOrientation,
        ToolbarAction::Delete,
        ToolbarAction::MoveToLayer,
        ToolbarAction::ShowInfo,
        ToolbarAction::Duplicate,
    ];

    /// Inverse of [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolbarAction::Cut => "cut",
            ToolbarAction::Copy => "copy",
            ToolbarAction::Paste => "paste",
            ToolbarAction::PasteStyle => "pasteStyle",
            ToolbarAction::AddRectangle => "addRectangle",
            ToolbarAction::AddSegment => "addSegment",
            ToolbarAction::SetMapOrientation => "setMapOrientation",
            ToolbarAction::Delete => "delete",
            ToolbarAction::MoveToLayer => "moveToLayer",
            ToolbarAction::ShowInfo => "showInfo",
            ToolbarAction::Duplicate => "duplicateSelection",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonIcon {
    /// A Font Awesome class, e.g. `fa-copy`.
    FontAwesome(&'static str),
    /// A bold text glyph, for actions with no fitting icon.
    Text(&'static str),
}

/// Document-level clipboard events a button can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardEvent {
    Cut,
    Copy,
    Paste,
}

impl ClipboardEvent {
    pub const ALL: [ClipboardEvent; 3] = [ClipboardEvent::Cut, ClipboardEvent::Copy, ClipboardEvent::Paste];

    /// DOM event type.
    pub fn event_name(self) -> &'static str {
        match self {
            ClipboardEvent::Cut => "cut",
            ClipboardEvent::Copy => "copy",
            ClipboardEvent::Paste => "paste",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarButton {
    /// Tooltip.
    pub title: &'static str,
    pub icon: ButtonIcon,
    pub action: ToolbarAction,
    pub body_event: Option<ClipboardEvent>,
}

const fn button(title: &'static str, icon: ButtonIcon, action: ToolbarAction) -> ToolbarButton {
    ToolbarButton {
        title,
        icon,
        action,
        body_event: None,
    }
}

pub const IMU_BUTTONS: &[ToolbarButton] = &[
    ToolbarButton {
        body_event: Some(ClipboardEvent::Cut),
        ..button("Couper (ctrl+x)", ButtonIcon::FontAwesome("fa-scissors"), ToolbarAction::Cut)
    },
    ToolbarButton {
        body_event: Some(ClipboardEvent::Copy),
        ..button("Copier (ctrl+c)", ButtonIcon::FontAwesome("fa-copy"), ToolbarAction::Copy)
    },
    ToolbarButton {
        body_event: Some(ClipboardEvent::Paste),
        ..button("Coller (ctrl+v)", ButtonIcon::FontAwesome("fa-paste"), ToolbarAction::Paste)
    },
    button("Coller le style", ButtonIcon::FontAwesome("fa-tint"), ToolbarAction::PasteStyle),
    button(
        "Ajouter un rectangle",
        ButtonIcon::FontAwesome("fa-square-o"),
        ToolbarAction::AddRectangle,
    ),
    button("Ajouter un segment", ButtonIcon::Text("/"), ToolbarAction::AddSegment),
    button(
        "Orienter la carte",
        ButtonIcon::FontAwesome("fa-compass"),
        ToolbarAction::SetMapOrientation,
    ),
    button(
        "Supprimer la sélection (suppr)",
        ButtonIcon::FontAwesome("fa-trash"),
        ToolbarAction::Delete,
    ),
    button(
        "Déplacer vers un autre calque",
        ButtonIcon::FontAwesome("fa-exchange"),
        ToolbarAction::MoveToLayer,
    ),
    button(
        "Informations sur l'objet",
        ButtonIcon::FontAwesome("fa-info-circle"),
        ToolbarAction::ShowInfo,
    ),
];

pub const MIU_BUTTONS: &[ToolbarButton] = &[button(
    "Dupliquer la sélection",
    ButtonIcon::FontAwesome("fa-clone"),
    ToolbarAction::Duplicate,
)];

pub fn buttons(variant: Variant) -> &'static [ToolbarButton] {
    match variant {
        Variant::Imu => IMU_BUTTONS,
        Variant::Miu => MIU_BUTTONS,
    }
}

/// Buttons bound to document clipboard events, with their event.
pub fn clipboard_bindings(variant: Variant) -> impl Iterator<Item = (ClipboardEvent, ToolbarAction)> {
    buttons(variant)
        .iter()
        .filter_map(|b| b.body_event.map(|e| (e, b.action)))
}

/// The toolbox `data-mode` that activates a selection interaction.
pub fn mode_name(mode: SelectMode) -> &'static str {
    match mode {
        SelectMode::Hand => "None",
        SelectMode::Transform => "Transform",
    }
}
