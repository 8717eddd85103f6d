//! The handle linking the host and its rendered views to a running
//! [`RouterService`](crate::service::RouterService).

use std::sync::{Arc, RwLock};

use futures_channel::mpsc::UnboundedSender;

use crate::cache::ResultCache;
use crate::registry::RouteRegistry;
use crate::screen::{LayoutProps, ScreenProps};
use crate::service::RouterMessage;
use crate::state::RouterState;
use crate::toolkit::{Routing, ViewFactory};

/// A handle to a [`RouterService`](crate::service::RouterService).
///
/// Cloning yields another handle to the same service. The handle is how the
/// host reads the router's output: after every `update` callback it calls
/// [`render`](Self::render) for the composed view of the current location.
pub struct RouterHandle<V> {
    pub(crate) routes: Arc<RouteRegistry<V>>,
    pub(crate) tx: UnboundedSender<RouterMessage>,
    pub(crate) state: Arc<RwLock<RouterState>>,
    pub(crate) cache: ResultCache,
    pub(crate) factory: Arc<dyn ViewFactory<V>>,
    pub(crate) fallback: Option<Arc<dyn Fn() -> V>>,
    pub(crate) failure: Option<Arc<dyn Fn() -> V>>,
    pub(crate) origin: String,
}

impl<V> Clone for RouterHandle<V> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
            tx: self.tx.clone(),
            state: self.state.clone(),
            cache: self.cache.clone(),
            factory: self.factory.clone(),
            fallback: self.fallback.clone(),
            failure: self.failure.clone(),
            origin: self.origin.clone(),
        }
    }
}

impl<V> RouterHandle<V> {
    /// Tell the router the location changed outside of it.
    pub fn update(&self) {
        let _ = self.tx.unbounded_send(RouterMessage::Update);
    }

    /// Push a new location.
    pub fn navigate(&self, path: impl Into<String>) {
        let _ = self.tx.unbounded_send(RouterMessage::Navigate {
            path: path.into(),
            replace: false,
        });
    }

    /// Replace the current location.
    pub fn replace(&self, path: impl Into<String>) {
        let _ = self.tx.unbounded_send(RouterMessage::Navigate {
            path: path.into(),
            replace: true,
        });
    }

    /// Force a fresh load pass for the current location.
    pub fn reload(&self) {
        let _ = self.tx.unbounded_send(RouterMessage::Reload);
    }

    /// A snapshot of the current routing state.
    #[must_use]
    pub fn state(&self) -> RouterState {
        self.state.read().unwrap().clone()
    }

    /// The result cache the service commits to. Subscribe to re-render on
    /// commits from superseded load passes too.
    #[must_use]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// The routing toolkit, bound to the current location.
    #[must_use]
    pub fn routing(&self) -> Routing<V> {
        self.routing_for(&self.state())
    }

    /// Compose the view for the current location.
    ///
    /// Reads the committed entry for the current fingerprint, falling back
    /// to the previous committed entry while a load is in flight
    /// (stale-while-loading). With nothing to show the fallback view is
    /// returned, or the failure view after a rejected load; [`None`] if the
    /// respective view is not configured.
    ///
    /// The screen renders with only its own committed props. When a layout
    /// is assigned, the screen's output becomes the layout's `outlet` and
    /// the layout renders with only the layout props.
    #[must_use]
    pub fn render(&self) -> Option<V> {
        let state = self.state.read().unwrap().clone();

        let index = match state.active {
            Some(index) => index,
            None => return self.fallback_view(),
        };
        let entry = self.routes.entry(index);

        let map = self.cache.get();
        let cached = state
            .fingerprint
            .as_ref()
            .and_then(|fp| map.get(fp))
            .or_else(|| state.previous.as_ref().and_then(|fp| map.get(fp)));
        let cached = match cached {
            Some(cached) => cached,
            None if state.failed => return self.failure_view().or_else(|| self.fallback_view()),
            None => return self.fallback_view(),
        };

        let routing = self.routing_for(&state);
        let outlet = entry.screen.render(ScreenProps {
            params: &state.params,
            search: &state.search,
            props: &cached.screen_props,
            routing: &routing,
        });

        Some(match &entry.layout {
            Some(slot) => slot.layout.render(LayoutProps {
                outlet,
                params: &state.params,
                search: &state.search,
                props: &cached.layout_props,
                routing: &routing,
            }),
            None => outlet,
        })
    }

    fn routing_for(&self, state: &RouterState) -> Routing<V> {
        Routing::new(
            self.routes.clone(),
            self.factory.clone(),
            self.tx.clone(),
            self.origin.clone(),
            state.path.clone(),
            state.loading,
        )
    }

    fn fallback_view(&self) -> Option<V> {
        self.fallback.as_ref().map(|fallback| fallback())
    }

    fn failure_view(&self) -> Option<V> {
        self.failure.as_ref().map(|failure| failure())
    }
}
