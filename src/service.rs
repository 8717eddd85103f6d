//! The core of the router.
//!
//! [`RouterService`] combines the route registry, a history provider and the
//! result cache into the load orchestrator. For every navigation it finds
//! the matched screen, fingerprints the target location, and either serves a
//! committed entry straight from the cache or starts a load pass: the
//! screen's and its layout's loads, started together and awaited jointly.
//! Finished passes commit their props to the cache under the fingerprint
//! captured when the pass started, or turn a redirect outcome into a
//! navigation side effect.
//!
//! The service can be made to do things by sending it messages via the
//! [`RouterHandle`](crate::context::RouterHandle) returned alongside it.
//! Load passes run on the service's own task; nothing here blocks, and
//! superseded passes are left to run to completion, their results inert.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use futures_channel::mpsc::{unbounded, UnboundedReceiver};
use futures_util::future::{join, ready, LocalBoxFuture};
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tracing::{debug, error};

use crate::cache::{CachedEntry, ResultCache};
use crate::context::RouterHandle;
use crate::fingerprint::Fingerprint;
use crate::history::{HistoryProvider, MemoryHistory};
use crate::path::{interpolate, PathContext, SearchParams};
use crate::redirect::{LoadOutcome, RedirectEnvelope};
use crate::registry::RouteRegistry;
use crate::router_cfg::RouterConfig;
use crate::screen::{LoadContext, Props};
use crate::state::RouterState;
use crate::toolkit::ViewFactory;

/// A set of messages the [`RouterService`] can handle.
pub(crate) enum RouterMessage {
    /// The location changed outside the router; re-route.
    Update,

    /// Navigate to a path.
    Navigate {
        /// The target path, which may carry a query part.
        path: String,
        /// Replace the current location instead of pushing a new one.
        replace: bool,
    },

    /// Force a fresh load pass for the current location.
    Reload,
}

/// Which load capability of a route rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    /// The screen's own load.
    Screen,
    /// The load of the screen's assigned layout.
    Layout,
}

/// A rejected load, as reported to the load error observer.
#[derive(Debug)]
pub struct LoadFailure {
    /// The pattern of the route whose load rejected.
    pub pattern: String,
    /// Whether the screen's or the layout's load rejected.
    pub source: LoadSource,
    /// The error the load rejected with.
    pub error: anyhow::Error,
}

struct PassOutcome<V> {
    generation: u64,
    fingerprint: String,
    pattern: String,
    screen: anyhow::Result<LoadOutcome<V>>,
    layout: anyhow::Result<LoadOutcome<V>>,
}

/// The load orchestrator.
///
/// Constructed with [`RouterService::new`], which also returns the
/// [`RouterHandle`] the host and the rendered views interact with. Drive it
/// by awaiting [`run`](Self::run) on the host's event loop.
pub struct RouterService<V> {
    routes: Arc<RouteRegistry<V>>,
    history: Box<dyn HistoryProvider>,
    cache: ResultCache,
    fingerprint: Arc<dyn Fingerprint>,
    on_load_error: Option<Arc<dyn Fn(LoadFailure)>>,
    update: Arc<dyn Fn()>,
    state: Arc<RwLock<RouterState>>,
    rx: UnboundedReceiver<RouterMessage>,
    pending: FuturesUnordered<LocalBoxFuture<'static, PassOutcome<V>>>,
    in_flight: BTreeMap<String, u64>,
}

impl<V: 'static> RouterService<V> {
    /// Create a new [`RouterService`] and the [`RouterHandle`] linked to it.
    ///
    /// `update` is called after every state change so the host can schedule
    /// a re-render; it re-reads via [`RouterHandle::render`].
    #[must_use]
    pub fn new(
        routes: RouteRegistry<V>,
        factory: Arc<dyn ViewFactory<V>>,
        update: Arc<dyn Fn()>,
        cfg: RouterConfig<V>,
    ) -> (Self, RouterHandle<V>) {
        let (tx, rx) = unbounded();

        let RouterConfig {
            history,
            fallback,
            failure,
            fingerprint,
            on_load_error,
        } = cfg;

        let mut history =
            history.unwrap_or_else(|| Box::new(MemoryHistory::default()) as Box<dyn HistoryProvider>);
        {
            let tx = tx.clone();
            history.updater(Arc::new(move || {
                let _ = tx.unbounded_send(RouterMessage::Update);
            }));
        }

        let routes = Arc::new(routes);
        let state = Arc::new(RwLock::new(RouterState::new()));
        let cache = ResultCache::new();

        let handle = RouterHandle {
            routes: routes.clone(),
            tx: tx.clone(),
            state: state.clone(),
            cache: cache.clone(),
            factory,
            fallback: fallback.map(Arc::from),
            failure: failure.map(Arc::from),
            origin: history.current_origin(),
        };

        // trigger initial routing
        let _ = tx.unbounded_send(RouterMessage::Update);

        (
            Self {
                routes,
                history,
                cache,
                fingerprint,
                on_load_error,
                update,
                state,
                rx,
                pending: FuturesUnordered::new(),
                in_flight: BTreeMap::new(),
            },
            handle,
        )
    }

    /// The router's event loop.
    ///
    /// Handles messages and finished load passes until every
    /// [`RouterHandle`](crate::context::RouterHandle) is dropped.
    pub async fn run(&mut self) {
        loop {
            futures_util::select! {
                msg = self.rx.next() => match msg {
                    Some(msg) => self.handle_message(msg),
                    None => break,
                },
                outcome = self.pending.select_next_some() => self.finish_pass(outcome),
            }
        }
    }

    /// Drive the service until no progress can be made without an external
    /// event: queued messages are handled and already-resolved load passes
    /// are finished, but nothing is awaited.
    pub async fn run_until_stalled(&mut self) {
        loop {
            let mut progressed = false;

            while let Ok(Some(msg)) = self.rx.try_next() {
                self.handle_message(msg);
                progressed = true;
            }

            if let Some(Some(outcome)) = self.pending.next().now_or_never() {
                self.finish_pass(outcome);
                progressed = true;
            }

            if !progressed {
                break;
            }
        }
    }

    fn handle_message(&mut self, msg: RouterMessage) {
        match msg {
            RouterMessage::Update => self.route_current(false),
            RouterMessage::Navigate { path, replace } => {
                self.history.navigate(path, replace);
                self.route_current(false);
            }
            RouterMessage::Reload => self.route_current(true),
        }
    }

    /// Route the current location: steps 1 to 4 of a navigation.
    fn route_current(&mut self, force: bool) {
        let path = self.history.current_path();
        let query = self.history.current_query();
        let matched = self.routes.match_path(&path);

        let mut state = self.state.write().unwrap();
        state.generation += 1;
        state.path = path.clone();
        state.query = query.clone();
        state.failed = false;

        let (index, params) = match matched {
            Some(matched) => matched,
            None => {
                debug!(%path, "no route matched");
                state.active = None;
                state.params.clear();
                state.search = SearchParams::new();
                state.fingerprint = None;
                state.previous = None;
                state.loading = false;
                state.pending_generation = None;
                drop(state);
                (self.update)();
                return;
            }
        };

        let search = query
            .as_deref()
            .map(SearchParams::from_query)
            .unwrap_or_default();
        let entry = self.routes.entry(index);

        // The fingerprint is the digest of the fully interpolated location
        // for the matched screen.
        let context = PathContext {
            params: params.clone(),
            search: search.clone(),
        };
        // The built-in compiler's parameters always satisfy its own
        // pattern, but a custom matcher may extract fewer than the pattern
        // needs. That leaves the location unroutable; treat it like a
        // failed load.
        let interpolated = match interpolate(&entry.pattern, &context) {
            Ok(interpolated) => interpolated,
            Err(err) => {
                error!(pattern = %entry.pattern, "failed to interpolate matched route: {err}");
                state.active = Some(index);
                state.params = params;
                state.search = search;
                state.fingerprint = None;
                state.previous = state.committed.clone();
                state.loading = false;
                state.failed = true;
                state.pending_generation = None;
                drop(state);
                (self.update)();
                return;
            }
        };
        let fingerprint = self.fingerprint.digest(&interpolated);

        state.active = Some(index);
        state.params = params.clone();
        state.search = search.clone();
        state.fingerprint = Some(fingerprint.clone());
        state.previous = state.committed.clone();

        let needs_load = entry.screen.has_load()
            || entry
                .layout
                .as_ref()
                .is_some_and(|slot| slot.layout.has_load());

        // Nothing to load: commit synchronously, no loading flicker.
        if !needs_load {
            state.loading = false;
            state.pending_generation = None;
            state.committed = Some(fingerprint.clone());
            let hit = self.cache.get().contains_key(&fingerprint);
            drop(state);
            if !hit {
                self.cache.set(fingerprint, CachedEntry::default());
            }
            (self.update)();
            return;
        }

        // Served straight from the committed cache state.
        if !force && self.cache.get().contains_key(&fingerprint) {
            debug!(%interpolated, "cache hit");
            state.loading = false;
            state.pending_generation = None;
            state.committed = Some(fingerprint);
            drop(state);
            (self.update)();
            return;
        }

        // An identical pass is already in flight; adopt it instead of
        // starting another.
        if !force {
            if let Some(generation) = self.in_flight.get(&fingerprint) {
                debug!(%interpolated, "load already in flight");
                state.loading = true;
                state.pending_generation = Some(*generation);
                drop(state);
                (self.update)();
                return;
            }
        }

        let generation = state.generation;
        state.loading = true;
        state.pending_generation = Some(generation);
        drop(state);

        debug!(%interpolated, generation, "starting load pass");

        let screen_fut = match entry.screen.load() {
            Some(load) => load(LoadContext {
                params: params.clone(),
                search: search.clone(),
                deps: entry.deps.clone(),
            }),
            None => ready(Ok(LoadOutcome::Props(Props::new()))).boxed_local(),
        };
        let layout_fut = match entry.layout.as_ref() {
            Some(slot) => match slot.layout.load() {
                Some(load) => load(LoadContext {
                    params,
                    search,
                    deps: slot.deps.clone(),
                }),
                None => ready(Ok(LoadOutcome::Props(Props::new()))).boxed_local(),
            },
            None => ready(Ok(LoadOutcome::Props(Props::new()))).boxed_local(),
        };

        let pattern = entry.pattern.clone();
        let pass_fingerprint = fingerprint.clone();
        self.in_flight.insert(fingerprint, generation);
        self.pending.push(
            async move {
                let (screen, layout) = join(screen_fut, layout_fut).await;
                PassOutcome {
                    generation,
                    fingerprint: pass_fingerprint,
                    pattern,
                    screen,
                    layout,
                }
            }
            .boxed_local(),
        );
        (self.update)();
    }

    /// Steps 5 and 6 of a navigation: turn a finished pass into a commit or
    /// a redirect.
    fn finish_pass(&mut self, outcome: PassOutcome<V>) {
        let PassOutcome {
            generation,
            fingerprint,
            pattern,
            screen,
            layout,
        } = outcome;

        if self.in_flight.get(&fingerprint) == Some(&generation) {
            self.in_flight.remove(&fingerprint);
        }

        let live = {
            let state = self.state.read().unwrap();
            state.pending_generation == Some(generation)
        };

        // A rejected load aborts the whole pass: no commit, no redirect.
        let (screen, layout) = match (screen, layout) {
            (Ok(screen), Ok(layout)) => (screen, layout),
            (screen, layout) => {
                if let Err(error) = screen {
                    self.report_failure(&pattern, LoadSource::Screen, error);
                }
                if let Err(error) = layout {
                    self.report_failure(&pattern, LoadSource::Layout, error);
                }
                if live {
                    let mut state = self.state.write().unwrap();
                    state.loading = false;
                    state.failed = true;
                    state.pending_generation = None;
                    drop(state);
                    (self.update)();
                }
                return;
            }
        };

        match (screen, layout) {
            // The screen's redirect takes priority over the layout's.
            (LoadOutcome::Redirect(envelope), _)
            | (LoadOutcome::Props(_), LoadOutcome::Redirect(envelope)) => {
                if live {
                    self.redirect(envelope);
                } else {
                    debug!(generation, "ignoring redirect from superseded load pass");
                }
            }
            (LoadOutcome::Props(screen_props), LoadOutcome::Props(layout_props)) => {
                // A pass commits under the fingerprint captured when it
                // started; a superseded one lands on a key nobody is
                // observing anymore.
                self.cache.set(
                    fingerprint.clone(),
                    CachedEntry {
                        layout_props,
                        screen_props,
                    },
                );
                if live {
                    let mut state = self.state.write().unwrap();
                    state.loading = false;
                    state.committed = Some(fingerprint);
                    state.pending_generation = None;
                    drop(state);
                    (self.update)();
                }
            }
        }
    }

    fn redirect(&mut self, envelope: RedirectEnvelope<V>) {
        let pattern = self.routes.pattern_of(&envelope.screen).to_string();
        match interpolate(&pattern, &envelope.context) {
            Ok(path) => {
                debug!(%path, "redirecting");
                self.history.navigate(path, true);
                self.route_current(false);
            }
            Err(err) => {
                error!(%pattern, "cannot redirect: {err}");
                let mut state = self.state.write().unwrap();
                state.loading = false;
                state.failed = true;
                state.pending_generation = None;
                drop(state);
                (self.update)();
            }
        }
    }

    fn report_failure(&self, pattern: &str, source: LoadSource, error: anyhow::Error) {
        error!(%pattern, ?source, "load failed: {error:#}");
        if let Some(observer) = &self.on_load_error {
            observer(LoadFailure {
                pattern: pattern.to_string(),
                source,
                error,
            });
        }
    }
}
