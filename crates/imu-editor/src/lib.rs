pub mod actions;
pub mod config;
pub mod error;
pub mod host;
pub mod info;
pub mod label;
pub mod memory;
pub mod session;
pub mod shortcuts;
pub mod toolbar;
pub mod wizards;

pub use config::{ExtensionConfig, MultiSelectModifier, TransformSelect, Variant};
pub use error::ActionError;
pub use host::{
    FeatureAccess, Host, LayerInfo, LayerKind, LayerSource, Notifier, SelectMode,
    SelectionProvider, Viewport,
};
pub use memory::MemoryHost;
pub use session::{Clipboard, Session};
