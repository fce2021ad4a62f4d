use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for feature and layer handles.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter shared by every minted handle.
static COUNTER: AtomicU64 = AtomicU64::new(0);

fn mint(prefix: &str) -> Spur {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    INTERNER.get_or_intern(format!("{prefix}_{n}"))
}

/// Opaque handle to a feature owned by the host map.
///
/// The host adapter mints one per host object it hands out; the same
/// object always maps back to the same handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureId(Spur);

impl FeatureId {
    /// Intern a string as a FeatureId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        FeatureId(INTERNER.get_or_intern(s))
    }

    /// Mint a fresh, never-seen handle (`feature_N`).
    pub fn fresh() -> Self {
        FeatureId(mint("feature"))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

/// Opaque handle to a map layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(Spur);

impl LayerId {
    pub fn intern(s: &str) -> Self {
        LayerId(INTERNER.get_or_intern(s))
    }

    /// Mint a fresh, never-seen handle (`layer_N`).
    pub fn fresh() -> Self {
        LayerId(mint("layer"))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.as_str())
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LayerId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = LayerId::intern("Dessin");
        let b = LayerId::intern("Dessin");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "Dessin");
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = FeatureId::fresh();
        let b = FeatureId::fresh();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("feature_"));
    }

    #[test]
    fn layer_id_serializes_as_string() {
        let id = LayerId::intern("calque_1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""calque_1""#);
        let back: LayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
