use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for diagram node IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Process-wide counter backing fresh IDs.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identifier shared by every node on the canvas (entities and circles).
/// Internally a 4-byte `Spur` index, so copies and hashing are O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing handle.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh ID with a type prefix (e.g. `entity_3`, `circle_4`).
    ///
    /// Skips any candidate that was already interned by hand, so the result
    /// never collides with an ID handed out earlier in the process.
    pub fn with_prefix(prefix: &str) -> Self {
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            if INTERNER.get(&candidate).is_none() {
                return Self::intern(&candidate);
            }
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        let a = NodeId::intern("users");
        let b = NodeId::intern("users");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "users");
    }

    #[test]
    fn prefixed_ids_are_unique() {
        let a = NodeId::with_prefix("entity");
        let b = NodeId::with_prefix("entity");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("entity_"));
    }

    #[test]
    fn prefixed_ids_skip_hand_interned_names() {
        let next = COUNTER.load(Ordering::Relaxed);
        let squatter = NodeId::intern(&format!("squat_{next}"));
        let fresh = NodeId::with_prefix("squat");
        assert_ne!(fresh, squatter);
    }
}
