//! The routing toolkit handed to every rendered screen and layout.
//!
//! All helpers are derived, read-only views over the live route registry:
//! they build paths, URLs, links and eager redirects purely from registered
//! path patterns, so a view never has to spell out a path string itself.

use std::sync::Arc;

use futures_channel::mpsc::UnboundedSender;
use tracing::error;

use crate::path::{interpolate, PathContext};
use crate::registry::RouteRegistry;
use crate::screen::Screen;
use crate::service::RouterMessage;

/// What a link wraps.
pub enum LinkContent<V> {
    /// A literal text label.
    Label(String),
    /// A render capability receiving the link's destination and active
    /// state.
    Render(Box<dyn Fn(LinkState) -> V>),
    /// A pre-built element.
    Element(V),
}

/// Passed to a [`LinkContent::Render`] capability.
#[derive(Clone, Debug)]
pub struct LinkState {
    /// The destination path of the link.
    pub href: String,
    /// Whether the current location matches the link target's pattern.
    pub active: bool,
}

/// Builds the host-specific renderables the toolkit cannot construct itself.
///
/// The router never inspects a renderable's internals; links and eager
/// redirects are the two places where it has to produce one, and both go
/// through this factory.
pub trait ViewFactory<V> {
    /// Build a navigable link to `href`.
    fn link(&self, href: &str, active: bool, content: LinkContent<V>) -> V;

    /// Build an element that, as soon as it is rendered, replaces the
    /// current location with `path`.
    fn redirect(&self, path: &str) -> V;
}

/// Pure helpers bound to a live route registry.
pub struct Routing<V> {
    routes: Arc<RouteRegistry<V>>,
    factory: Arc<dyn ViewFactory<V>>,
    tx: UnboundedSender<RouterMessage>,
    origin: String,
    current_path: String,
    loading: bool,
}

impl<V> Routing<V> {
    pub(crate) fn new(
        routes: Arc<RouteRegistry<V>>,
        factory: Arc<dyn ViewFactory<V>>,
        tx: UnboundedSender<RouterMessage>,
        origin: String,
        current_path: String,
        loading: bool,
    ) -> Self {
        Self {
            routes,
            factory,
            tx,
            origin,
            current_path,
            loading,
        }
    }

    /// The path of `screen`, interpolated with `context`.
    ///
    /// # Panic
    /// If `screen` was never registered, or `context` misses a parameter its
    /// pattern requires. Both are programming errors.
    #[must_use]
    pub fn path_of(&self, screen: &Arc<Screen<V>>, context: &PathContext) -> String {
        let pattern = self.routes.pattern_of(screen);
        match interpolate(pattern, context) {
            Ok(path) => path,
            Err(err) => {
                error!(%pattern, "failed to build path: {err}");
                panic!(r#"failed to build path for pattern "{pattern}": {err}"#);
            }
        }
    }

    /// Like [`path_of`](Self::path_of), prefixed with the current origin.
    #[must_use]
    pub fn url_of(&self, screen: &Arc<Screen<V>>, context: &PathContext) -> String {
        format!("{}{}", self.origin, self.path_of(screen, context))
    }

    /// Build a navigable link to `screen`.
    ///
    /// The link's active state is derived by testing the current location
    /// against the screen's compiled pattern.
    #[must_use]
    pub fn link_to(
        &self,
        screen: &Arc<Screen<V>>,
        content: LinkContent<V>,
        context: &PathContext,
    ) -> V {
        let href = self.path_of(screen, context);
        let active = self
            .routes
            .entry_of(screen)
            .is_some_and(|entry| entry.matcher.test(&self.current_path));
        self.factory.link(&href, active, content)
    }

    /// Build an eager redirect to `screen`: it fires as soon as it is
    /// rendered, unlike the load-time [`redirect`](crate::redirect::redirect)
    /// outcome.
    #[must_use]
    pub fn redirect_to(&self, screen: &Arc<Screen<V>>, context: &PathContext) -> V {
        self.factory.redirect(&self.path_of(screen, context))
    }

    /// Force a fresh load pass for the current location, even if an entry is
    /// already committed for it.
    pub fn reload(&self) {
        let _ = self.tx.unbounded_send(RouterMessage::Reload);
    }

    /// Whether a load pass for the current location is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
