//! Global configuration options for the router.

use std::sync::Arc;

use crate::fingerprint::{Fingerprint, Sha256Fingerprint};
use crate::history::HistoryProvider;
use crate::service::LoadFailure;

/// Customize the default behavior of the router.
///
/// This implements [`Default`] and follows the builder pattern, so you can
/// use it like this:
///
/// ```rust
/// # use signpost::prelude::*;
/// let cfg = RouterConfig::<String>::default()
///     .history(MemoryHistory::with_initial_path("/users/42"))
///     .fallback(|| String::from("not found"));
/// ```
pub struct RouterConfig<V> {
    pub(crate) history: Option<Box<dyn HistoryProvider>>,
    pub(crate) fallback: Option<Box<dyn Fn() -> V>>,
    pub(crate) failure: Option<Box<dyn Fn() -> V>>,
    pub(crate) fingerprint: Arc<dyn Fingerprint>,
    pub(crate) on_load_error: Option<Arc<dyn Fn(LoadFailure)>>,
}

impl<V> Default for RouterConfig<V> {
    fn default() -> Self {
        Self {
            history: None,
            fallback: None,
            failure: None,
            fingerprint: Arc::new(Sha256Fingerprint),
            on_load_error: None,
        }
    }
}

impl<V> RouterConfig<V> {
    /// The location provider to read from and navigate with.
    ///
    /// Defaults to a [`MemoryHistory`](crate::history::MemoryHistory)
    /// starting at `/`.
    pub fn history(self, history: impl HistoryProvider + 'static) -> Self {
        Self {
            history: Some(Box::new(history)),
            ..self
        }
    }

    /// The view to render when no route matches, or when nothing has been
    /// committed yet for the current location and no stale entry exists.
    ///
    /// Without a fallback the router renders nothing in those situations.
    pub fn fallback(self, fallback: impl Fn() -> V + 'static) -> Self {
        Self {
            fallback: Some(Box::new(fallback)),
            ..self
        }
    }

    /// The view to render when a load failed and there is neither a
    /// committed nor a stale entry to fall back to.
    ///
    /// Defaults to the fallback view.
    pub fn failure(self, failure: impl Fn() -> V + 'static) -> Self {
        Self {
            failure: Some(Box::new(failure)),
            ..self
        }
    }

    /// The digest used to turn interpolated paths into cache keys.
    ///
    /// Defaults to [`Sha256Fingerprint`].
    pub fn fingerprint(self, fingerprint: impl Fingerprint + 'static) -> Self {
        Self {
            fingerprint: Arc::new(fingerprint),
            ..self
        }
    }

    /// An observer called once for every rejected load.
    ///
    /// Rejected loads are never retried; besides this observer they are only
    /// visible through the log.
    pub fn on_load_error(self, observer: impl Fn(LoadFailure) + 'static) -> Self {
        Self {
            on_load_error: Some(Arc::new(observer)),
            ..self
        }
    }
}
