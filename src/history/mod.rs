//! Location provider integration.
//!
//! The router relies on a [`HistoryProvider`] to read the current location
//! and to perform the navigation side effects of redirects. To integrate
//! with any kind of host location handling, implement the trait; a
//! [`MemoryHistory`] default implementation is provided for tests and
//! non-browser hosts.

use std::sync::{Arc, RwLock};

mod memory;
pub use memory::*;

/// An integration with the host's location handling.
pub trait HistoryProvider {
    /// Get the path of the current location. Must start with `/`.
    ///
    /// ```rust
    /// # use signpost::prelude::*;
    /// let history = MemoryHistory::default();
    /// assert_eq!(history.current_path(), "/");
    /// ```
    #[must_use]
    fn current_path(&self) -> String;

    /// Get the query string of the current location, without the leading
    /// `?`, if present.
    #[must_use]
    fn current_query(&self) -> Option<String>;

    /// Get the origin (scheme and authority) of the current location, used
    /// to build absolute URLs.
    #[must_use]
    fn current_origin(&self) -> String;

    /// Navigate to `path`, which may carry a query part.
    ///
    /// With `replace` the current location is replaced instead of a new
    /// history entry being created. Redirects always replace.
    fn navigate(&mut self, path: String, replace: bool);

    /// Provide the [`HistoryProvider`] with an update callback.
    ///
    /// Some providers receive location updates from outside the router (a
    /// browser's back button, for example). When such an update arrives they
    /// should call `callback`, which makes the router re-route.
    #[allow(unused_variables)]
    fn updater(&mut self, callback: Arc<dyn Fn()>) {}
}

// Allows a test or host to keep inspecting a provider it has handed to the
// router.
impl<H: HistoryProvider> HistoryProvider for Arc<RwLock<H>> {
    fn current_path(&self) -> String {
        self.read().unwrap().current_path()
    }

    fn current_query(&self) -> Option<String> {
        self.read().unwrap().current_query()
    }

    fn current_origin(&self) -> String {
        self.read().unwrap().current_origin()
    }

    fn navigate(&mut self, path: String, replace: bool) {
        self.write().unwrap().navigate(path, replace);
    }

    fn updater(&mut self, callback: Arc<dyn Fn()>) {
        self.write().unwrap().updater(callback);
    }
}
