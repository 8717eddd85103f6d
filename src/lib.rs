#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod cache;
pub mod context;
pub mod fingerprint;
pub mod history;
pub mod path;
pub mod pattern;
pub mod redirect;
pub mod registry;
mod router_cfg;
pub mod screen;
pub mod service;
pub mod state;
pub mod toolkit;

pub use router_cfg::RouterConfig;

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::cache::{CacheMap, CachedEntry, ResultCache, SubscriptionId};
    pub use crate::context::RouterHandle;
    pub use crate::fingerprint::{Fingerprint, Sha256Fingerprint};
    pub use crate::history::{HistoryProvider, MemoryHistory};
    pub use crate::path::{interpolate, PathContext, PathError, SearchParams};
    pub use crate::pattern::{PathPattern, PatternCompiler, SegmentCompiler, SegmentPattern};
    pub use crate::redirect::{is_redirect, redirect, LoadOutcome, RedirectEnvelope};
    pub use crate::registry::RouteRegistry;
    pub use crate::router_cfg::RouterConfig;
    pub use crate::screen::{
        Deps, Layout, LayoutProps, LoadContext, LoadFn, Params, Props, Screen, ScreenProps,
    };
    pub use crate::service::{LoadFailure, LoadSource, RouterService};
    pub use crate::state::RouterState;
    pub use crate::toolkit::{LinkContent, LinkState, Routing, ViewFactory};
}
