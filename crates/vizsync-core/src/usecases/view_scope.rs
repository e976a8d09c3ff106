//! Lifetime of an open destination view
//!
//! A [`ViewScope`] is created when a destination view opens and closed when
//! it goes away. It carries the view's banner message and a cancellation
//! token; work started on behalf of the view checks [`ViewScope::is_active`]
//! before applying results, and long waits select on
//! [`ViewScope::cancelled`].
//!
//! Clones share the same state, so the scope can be handed to spawned tasks.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Context object for one open view
#[derive(Debug, Clone)]
pub struct ViewScope {
    banner: Arc<Mutex<Option<String>>>,
    token: CancellationToken,
}

impl ViewScope {
    /// Opens a scope, optionally showing `banner` for its whole lifetime
    pub fn mount(banner: Option<String>) -> Self {
        debug!(has_banner = banner.is_some(), "View scope mounted");
        Self {
            banner: Arc::new(Mutex::new(banner)),
            token: CancellationToken::new(),
        }
    }

    /// Closes the scope: clears the banner and cancels pending work
    pub fn unmount(&self) {
        self.set_banner(None);
        self.token.cancel();
        debug!("View scope unmounted");
    }

    /// Returns true until [`unmount`](Self::unmount) is called
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Resolves once the scope is unmounted
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    pub fn banner(&self) -> Option<String> {
        match self.banner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replaces the banner; ignored once the scope is closed
    pub fn set_banner(&self, banner: Option<String>) {
        if banner.is_some() && !self.is_active() {
            return;
        }
        match self.banner.lock() {
            Ok(mut guard) => *guard = banner,
            Err(poisoned) => *poisoned.into_inner() = banner,
        }
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::mount(None)
    }
}
