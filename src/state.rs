//! The current routing information.

use crate::path::SearchParams;
use crate::screen::Params;

/// A snapshot of where the router currently is and what it is doing.
#[derive(Clone, Debug)]
pub struct RouterState {
    /// The current path.
    pub path: String,

    /// The current query string, if present.
    pub query: Option<String>,

    /// The parameters read from the path, as specified by the matched route.
    pub params: Params,

    /// The query parameters of the current location.
    pub search: SearchParams,

    /// Whether a load pass for the current location is still in flight.
    pub loading: bool,

    /// Whether the most recent load pass for the current location failed.
    pub failed: bool,

    /// Index of the matched route entry.
    pub(crate) active: Option<usize>,

    /// Fingerprint of the current location.
    pub(crate) fingerprint: Option<String>,

    /// Fingerprint of the entry committed before this navigation started,
    /// served while the current one is loading.
    pub(crate) previous: Option<String>,

    /// Fingerprint of the most recently committed entry.
    pub(crate) committed: Option<String>,

    /// Bumped on every navigation; load passes that finish under an older
    /// generation are inert.
    pub(crate) generation: u64,

    /// Generation of the load pass the current location is waiting on.
    pub(crate) pending_generation: Option<u64>,
}

impl RouterState {
    pub(crate) fn new() -> Self {
        Self {
            path: String::new(),
            query: None,
            params: Params::new(),
            search: SearchParams::new(),
            loading: false,
            failed: false,
            active: None,
            fingerprint: None,
            previous: None,
            committed: None,
            generation: 0,
            pending_generation: None,
        }
    }

    /// The fingerprint of the current location, once a route has matched.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// The fingerprint served while the current location is loading, if a
    /// previously committed entry exists.
    #[must_use]
    pub fn previous_fingerprint(&self) -> Option<&str> {
        self.previous.as_deref()
    }
}
