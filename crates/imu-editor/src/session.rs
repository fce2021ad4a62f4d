//! Per-page editing session.
//!
//! Holds what survives between two user actions: the clipboard and the
//! extension config. One session per injected page.

use crate::config::ExtensionConfig;
use imu_core::FeatureId;

/// Detached feature clones captured by copy/cut.
///
/// Entries are host-side clones that belong to no layer, so later edits to
/// the originals never show up in a paste.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entries: Vec<FeatureId>,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[FeatureId] {
        &self.entries
    }

    pub fn first(&self) -> Option<FeatureId> {
        self.entries.first().copied()
    }

    /// Replace the whole content, handing back the previous entries.
    pub fn replace(&mut self, entries: Vec<FeatureId>) -> Vec<FeatureId> {
        std::mem::replace(&mut self.entries, entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub clipboard: Clipboard,
    pub config: ExtensionConfig,
}

impl Session {
    pub fn new(config: ExtensionConfig) -> Self {
        Self {
            clipboard: Clipboard::default(),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_default_is_empty() {
        let clipboard = Clipboard::default();
        assert!(clipboard.is_empty());
        assert_eq!(clipboard.first(), None);
    }

    #[test]
    fn replace_overwrites() {
        let mut clipboard = Clipboard::default();
        let a = FeatureId::fresh();
        let b = FeatureId::fresh();
        assert!(clipboard.replace(vec![a, b]).is_empty());
        assert_eq!(clipboard.len(), 2);
        assert_eq!(clipboard.replace(vec![b]), vec![a, b]);
        assert_eq!(clipboard.entries(), &[b]);
        clipboard.clear();
        assert!(clipboard.is_empty());
    }
}
