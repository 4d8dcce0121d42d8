use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::CoreError;

/// Jeton d'annulation coopératif, vérifié entre deux seeks et pendant leur attente.
///
/// Clonable et `Send + Sync` : un handler Ctrl-C peut le déclencher pendant
/// qu'un autre thread extrait les frames.
///
/// # Example
/// ```
/// use af_core::cancel::CancelToken;
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert!(token.check().is_ok());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Demande l'arrêt. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err(CoreError::Cancelled)` si l'annulation a été demandée.
    ///
    /// # Errors
    /// Returns [`CoreError::Cancelled`] once [`CancelToken::cancel`] was called.
    pub fn check(&self) -> Result<(), CoreError> {
        if self.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        Ok(())
    }
}
