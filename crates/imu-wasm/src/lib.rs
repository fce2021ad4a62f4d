//! WASM bridge for IMU, injected into MaCarte pages by the browser extension.
//!
//! Waits for the host map, then adds the toolbar buttons and bindings and
//! routes every action through `imu-editor` over a [`MacarteHost`].

mod dialogs;
mod gui;
pub mod host;
mod js;
mod logger;
mod tweaks;

use dialogs::Dialog;
use host::MacarteHost;
use imu_editor::actions;
use imu_editor::config::{ExtensionConfig, Variant};
use imu_editor::host::{Host, Notifier};
use imu_editor::info;
use imu_editor::toolbar::ToolbarAction;
use imu_editor::wizards;
use imu_editor::{ActionError, Session};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

const INIT_RETRY_MS: i32 = 100;
const INIT_MAX_RETRIES: u32 = 50;

/// State shared by every listener.
pub(crate) struct Extension {
    pub session: Session,
    pub host: MacarteHost,
}

pub(crate) type Shared = Rc<RefCell<Extension>>;

/// Log an action error and show its user message, if it has one.
pub(crate) fn report(host: &mut MacarteHost, err: &ActionError) {
    log::info!("{err}");
    if let Some(text) = err.user_message() {
        host.message(text, None);
    }
}

// ─── Dispatch ────────────────────────────────────────────────────────────

/// Run an action; those that need user input return the dialog to show.
fn perform<H: Host>(
    session: &mut Session,
    host: &mut H,
    action: ToolbarAction,
) -> Result<Option<Dialog>, ActionError> {
    match action {
        ToolbarAction::Cut => {
            actions::cut(session, host);
        }
        ToolbarAction::Copy => {
            actions::copy(session, host);
        }
        ToolbarAction::Paste => {
            actions::paste(session, host)?;
        }
        ToolbarAction::PasteStyle => {
            actions::paste_style(session, host);
        }
        ToolbarAction::Duplicate => {
            actions::duplicate_selection(host)?;
        }
        ToolbarAction::AddRectangle => return Ok(Some(Dialog::Rectangle)),
        ToolbarAction::AddSegment => return Ok(Some(Dialog::Segment)),
        ToolbarAction::SetMapOrientation => {
            let current = wizards::current_orientation_degrees(&*host);
            return Ok(Some(Dialog::Orientation(current)));
        }
        ToolbarAction::Delete => {
            let request = actions::prepare_delete(&*host)?;
            return Ok(Some(Dialog::ConfirmDelete(request)));
        }
        ToolbarAction::MoveToLayer => {
            let request = actions::prepare_move_to_layer(&*host)?;
            return Ok(Some(Dialog::MoveToLayer(request)));
        }
        ToolbarAction::ShowInfo => {
            let report = info::show_info(&*host)?;
            return Ok(Some(Dialog::Info(report)));
        }
    }
    Ok(None)
}

/// Entry point of every button, bound event and shortcut.
pub(crate) fn dispatch(state: &Shared, action: ToolbarAction) {
    log::debug!("{}", action.name());
    let dialog = {
        let Ok(mut guard) = state.try_borrow_mut() else {
            log::warn!("{} ignored, another action is running", action.name());
            return;
        };
        let ext = &mut *guard;
        match perform(&mut ext.session, &mut ext.host, action) {
            Ok(dialog) => dialog,
            Err(err) => {
                report(&mut ext.host, &err);
                None
            }
        }
    };
    if let Some(dialog) = dialog {
        if let Err(err) = dialogs::open(state, dialog) {
            log::warn!("{} dialog failed: {}", action.name(), js::describe(&err));
        }
    }
}

// ─── Init ────────────────────────────────────────────────────────────────

fn install(state: &Shared, config: &ExtensionConfig) -> Result<(), JsValue> {
    gui::install_toolbar(state, config.variant)?;
    if config.variant == Variant::Imu {
        gui::bind_shortcuts(state)?;
        tweaks::init_style_tweaking(state, config.label_scale_ratio)?;
        tweaks::init_interaction_tweaking(state, config.multi_select_modifier)?;
    }
    Ok(())
}

fn try_init(cell: Rc<RefCell<Option<Shared>>>, config: ExtensionConfig, attempt: u32) {
    let ready = MacarteHost::find().filter(|_| gui::toolbox_inner().is_some());
    let Some(macarte) = ready else {
        if attempt >= INIT_MAX_RETRIES {
            log::error!("MaCarte not found after {attempt} attempts, giving up");
            return;
        }
        let retry = Closure::once_into_js(move || try_init(cell, config, attempt + 1));
        let scheduled = web_sys::window().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                retry.unchecked_ref(),
                INIT_RETRY_MS,
            )
        });
        if !matches!(scheduled, Some(Ok(_))) {
            log::error!("cannot schedule init retry");
        }
        return;
    };

    let state: Shared = Rc::new(RefCell::new(Extension {
        host: MacarteHost::new(macarte, config.message_duration_ms),
        session: Session::new(config.clone()),
    }));
    match install(&state, &config) {
        Ok(()) => log::info!("ready after {attempt} attempt(s)"),
        Err(err) => log::error!("install failed: {}", js::describe(&err)),
    }
    *cell.borrow_mut() = Some(state);
}

/// The extension as seen from the content script.
#[wasm_bindgen]
pub struct ImuExtension {
    config: ExtensionConfig,
    state: Rc<RefCell<Option<Shared>>>,
}

#[wasm_bindgen]
impl ImuExtension {
    /// Parse the JSON config (empty for defaults) and set up logging.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<ImuExtension, JsValue> {
        console_error_panic_hook_setup();
        let config =
            ExtensionConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        logger::init(config.variant.log_tag(), config.log_level());
        Ok(Self {
            config,
            state: Rc::new(RefCell::new(None)),
        })
    }

    /// Wait for MaCarte, then install everything.
    pub fn start(&self) {
        log::info!("starting");
        try_init(self.state.clone(), self.config.clone(), 0);
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Trigger an action by name, e.g. `"paste"`. Returns `false` for
    /// unknown names or before init.
    pub fn run(&self, name: &str) -> bool {
        let Some(action) = ToolbarAction::from_name(name) else {
            log::warn!("unknown action {name}");
            return false;
        };
        let Some(state) = self.state.borrow().clone() else {
            return false;
        };
        dispatch(&state, action);
        true
    }

    /// Number of features on the clipboard.
    pub fn clipboard_len(&self) -> usize {
        self.state
            .borrow()
            .as_ref()
            .and_then(|s| s.try_borrow().ok().map(|ext| ext.session.clipboard.len()))
            .unwrap_or(0)
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("[IMU] panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imu_core::{Geometry, IgnStyle, Point};
    use imu_editor::host::{LayerKind, SelectionProvider};
    use imu_editor::MemoryHost;
    use pretty_assertions::assert_eq;

    fn host_with_selection() -> MemoryHost {
        let mut host = MemoryHost::planar();
        let layer = host.add_layer("croquis", LayerKind::Vector);
        let a = host.insert(
            layer,
            Geometry::LineString(vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)]),
            IgnStyle::new(),
        );
        host.set_selection(&[a]);
        host
    }

    #[test]
    fn clipboard_actions_need_no_dialog() {
        let mut session = Session::default();
        let mut host = host_with_selection();
        assert!(matches!(perform(&mut session, &mut host, ToolbarAction::Copy), Ok(None)));
        assert_eq!(session.clipboard.len(), 1);
        assert!(matches!(perform(&mut session, &mut host, ToolbarAction::Paste), Ok(None)));
        assert_eq!(host.feature_count(), 3);
    }

    #[test]
    fn input_actions_open_dialogs() {
        let mut session = Session::default();
        let mut host = host_with_selection();
        assert!(matches!(
            perform(&mut session, &mut host, ToolbarAction::AddRectangle),
            Ok(Some(Dialog::Rectangle))
        ));
        assert!(matches!(
            perform(&mut session, &mut host, ToolbarAction::Delete),
            Ok(Some(Dialog::ConfirmDelete(_)))
        ));
        assert!(matches!(
            perform(&mut session, &mut host, ToolbarAction::ShowInfo),
            Ok(Some(Dialog::Info(_)))
        ));
    }

    #[test]
    fn preconditions_fail_before_any_dialog() {
        let mut session = Session::default();
        let mut host = host_with_selection();
        host.clear_selection();
        assert_eq!(
            perform(&mut session, &mut host, ToolbarAction::MoveToLayer).err(),
            Some(ActionError::NothingSelected)
        );
        assert_eq!(
            perform(&mut session, &mut host, ToolbarAction::ShowInfo).err(),
            Some(ActionError::SingleSelectionRequired(0))
        );
    }
}
