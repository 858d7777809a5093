//! Live reachability of the Record Store.

use crate::errors::{Error, Result};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::info;

/// Cloneable handle to the shared online flag.
///
/// Connectivity-change events call [`Connectivity::set_online`]; mutating
/// operations consult [`Connectivity::ensure_online`] before any remote call.
#[derive(Debug, Clone)]
pub struct Connectivity {
    online: Arc<AtomicBool>,
}

impl Connectivity {
    /// Creates a flag with the given initial state.
    #[must_use]
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    /// Records a connectivity-change event.
    pub fn set_online(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous != online {
            info!("Connectivity changed: {}", if online { "online" } else { "offline" });
        }
    }

    /// Current state of the flag.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Fails with [`Error::Connectivity`] naming `operation` when offline.
    pub fn ensure_online(&self, operation: &'static str) -> Result<()> {
        if self.is_online() {
            Ok(())
        } else {
            Err(Error::Connectivity { operation })
        }
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}
