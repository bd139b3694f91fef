//! Element identity.
//!
//! Ids minted by builds are plain serial numbers tagged with the element
//! kind, so previewing costs nothing beyond a counter bump. Host-chosen
//! names go through a global interner; only those ever allocate.

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

static SERIAL: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Repr);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Repr {
    Named(Spur),
    Serial { prefix: &'static str, n: u64 },
}

impl ElementId {
    /// A host-chosen id. Interning the same name twice yields the same id.
    pub fn intern(name: &str) -> Self {
        ElementId(Repr::Named(NAMES.get_or_intern(name)))
    }

    /// A fresh id rendered as `{prefix}_{n}`. Never returns an id that was
    /// generated before.
    pub fn with_prefix(prefix: &'static str) -> Self {
        let n = SERIAL.fetch_add(1, Ordering::Relaxed);
        ElementId(Repr::Serial { prefix, n })
    }

    /// The interned name, for host-chosen ids.
    pub fn name(&self) -> Option<&'static str> {
        match self.0 {
            Repr::Named(spur) => Some(NAMES.resolve(&spur)),
            Repr::Serial { .. } => None,
        }
    }

    /// Number of distinct host-chosen names interned so far.
    pub fn interned_count() -> usize {
        NAMES.len()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Named(spur) => write!(f, "#{}", NAMES.resolve(&spur)),
            Repr::Serial { prefix, n } => write!(f, "#{prefix}_{n}"),
        }
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
