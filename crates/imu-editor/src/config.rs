//! Extension configuration.
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! yields the stock Imu behavior.

use serde::{Deserialize, Serialize};

/// Which extension flavor is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Clipboard, wizards and selection tools.
    #[default]
    Imu,
    /// Duplicate button only.
    Miu,
}

impl Variant {
    /// Console prefix, e.g. `[IMU]`.
    pub fn log_tag(self) -> &'static str {
        match self {
            Variant::Imu => "[IMU]",
            Variant::Miu => "[MIU]",
        }
    }
}

/// What to hand the transform interaction when selecting several features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformSelect {
    /// Every feature (Imu).
    #[default]
    All,
    /// Only the first one (Miu; older transform interactions handle one).
    First,
}

/// Modifier that adds to a transform selection on click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiSelectModifier {
    #[default]
    Shift,
    Alt,
    /// Ctrl, or ⌘ on macOS.
    Platform,
    /// Leave the host's condition alone.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    pub variant: Variant,
    pub transform_select: TransformSelect,
    /// Subtract the view rotation when orienting new shapes, so the
    /// requested angle is relative to the screen rather than to north.
    pub compensate_view_rotation: bool,
    /// Label scale is `label_scale_ratio / resolution`.
    pub label_scale_ratio: f64,
    pub multi_select_modifier: MultiSelectModifier,
    pub message_duration_ms: u32,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Imu,
            transform_select: TransformSelect::All,
            compensate_view_rotation: true,
            label_scale_ratio: 0.1,
            multi_select_modifier: MultiSelectModifier::Shift,
            message_duration_ms: 3000,
            log_level: "info".to_string(),
        }
    }
}

impl ExtensionConfig {
    /// Parse a JSON config; blank input gives the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    /// Defaults matching the Miu flavor.
    pub fn miu() -> Self {
        Self {
            variant: Variant::Miu,
            transform_select: TransformSelect::First,
            ..Self::default()
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(ExtensionConfig::from_json("").unwrap(), ExtensionConfig::default());
        assert_eq!(ExtensionConfig::from_json("{}").unwrap(), ExtensionConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = ExtensionConfig::from_json(
            r#"{ "variant": "miu", "label_scale_ratio": 0.2, "multi_select_modifier": "alt" }"#,
        )
        .unwrap();
        assert_eq!(cfg.variant, Variant::Miu);
        assert_eq!(cfg.label_scale_ratio, 0.2);
        assert_eq!(cfg.multi_select_modifier, MultiSelectModifier::Alt);
        assert_eq!(cfg.transform_select, TransformSelect::All);
        assert!(cfg.compensate_view_rotation);
    }

    #[test]
    fn unknown_variant_is_an_error() {
        assert!(ExtensionConfig::from_json(r#"{ "variant": "xyz" }"#).is_err());
    }

    #[test]
    fn log_level_falls_back_to_info() {
        let mut cfg = ExtensionConfig::default();
        cfg.log_level = "debug".into();
        assert_eq!(cfg.log_level(), log::LevelFilter::Debug);
        cfg.log_level = "loud".into();
        assert_eq!(cfg.log_level(), log::LevelFilter::Info);
    }
}
