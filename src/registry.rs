//! The route registry: the mapping from screens to path patterns, layouts
//! and dependencies.
//!
//! The registry is a move-based builder. Every mutating call consumes the
//! registry and returns the updated one, so a registry value captured
//! earlier is never changed behind the caller's back; two registries never
//! alias unless explicitly shared.

use std::sync::Arc;

use tracing::error;

use crate::pattern::{PathPattern, PatternCompiler, SegmentCompiler};
use crate::screen::{Deps, Layout, Screen};

pub(crate) struct LayoutSlot<V> {
    pub(crate) layout: Arc<Layout<V>>,
    pub(crate) deps: Deps,
}

impl<V> Clone for LayoutSlot<V> {
    fn clone(&self) -> Self {
        Self {
            layout: self.layout.clone(),
            deps: self.deps.clone(),
        }
    }
}

pub(crate) struct RouteEntry<V> {
    pub(crate) pattern: String,
    pub(crate) matcher: Box<dyn PathPattern>,
    pub(crate) screen: Arc<Screen<V>>,
    pub(crate) deps: Deps,
    pub(crate) layout: Option<LayoutSlot<V>>,
}

/// A census of all the routes of an application.
///
/// ```rust
/// # use signpost::prelude::*;
/// let home = Screen::<String>::new(|_| String::from("home"));
/// let user = Screen::<String>::new(|_| String::from("user"));
///
/// let routes = RouteRegistry::new()
///     .route("/", &home)
///     .route("/users/:id", &user);
///
/// assert_eq!(routes.pattern_of(&user), "/users/:id");
/// ```
pub struct RouteRegistry<V> {
    entries: Vec<RouteEntry<V>>,
    current_layout: Option<LayoutSlot<V>>,
    compiler: Box<dyn PatternCompiler>,
}

impl<V> Default for RouteRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RouteRegistry<V> {
    /// Create an empty registry using the built-in pattern compiler.
    #[must_use]
    pub fn new() -> Self {
        Self::with_compiler(SegmentCompiler)
    }

    /// Create an empty registry using a custom pattern compiler.
    #[must_use]
    pub fn with_compiler(compiler: impl PatternCompiler + 'static) -> Self {
        Self {
            entries: Vec::new(),
            current_layout: None,
            compiler: Box::new(compiler),
        }
    }

    /// Register `screen` under `pattern`, with the layout currently in
    /// scope.
    ///
    /// # Panic
    /// If `screen` was already registered, but only in debug builds.
    #[must_use]
    pub fn route(self, pattern: &str, screen: &Arc<Screen<V>>) -> Self {
        self.route_with_deps(pattern, screen, Deps::new())
    }

    /// Like [`route`](Self::route), additionally recording the dependencies
    /// passed to the screen's load capability.
    #[must_use]
    pub fn route_with_deps(mut self, pattern: &str, screen: &Arc<Screen<V>>, deps: Deps) -> Self {
        if self.entries.iter().any(|e| Arc::ptr_eq(&e.screen, screen)) {
            error!(r#"screen already registered, pattern: "{pattern}", earlier prevails"#);
            #[cfg(debug_assertions)]
            panic!(r#"screen already registered, pattern: "{pattern}""#);
        }

        let matcher = self.compiler.compile(pattern);
        self.entries.push(RouteEntry {
            pattern: pattern.to_string(),
            matcher,
            screen: screen.clone(),
            deps,
            layout: self.current_layout.clone(),
        });
        self
    }

    /// Put `layout` in scope for all subsequent registrations, until
    /// [`without_layout`](Self::without_layout).
    ///
    /// Routes registered before this call keep whatever layout was in scope
    /// at their own registration; the assignment is immutable.
    #[must_use]
    pub fn with_layout(self, layout: &Arc<Layout<V>>) -> Self {
        self.with_layout_deps(layout, Deps::new())
    }

    /// Like [`with_layout`](Self::with_layout), additionally recording the
    /// dependencies passed to the layout's load capability.
    #[must_use]
    pub fn with_layout_deps(mut self, layout: &Arc<Layout<V>>, deps: Deps) -> Self {
        self.current_layout = Some(LayoutSlot {
            layout: layout.clone(),
            deps,
        });
        self
    }

    /// Take the current layout out of scope.
    #[must_use]
    pub fn without_layout(mut self) -> Self {
        self.current_layout = None;
        self
    }

    /// The pattern `screen` was registered under.
    ///
    /// # Panic
    /// If `screen` was never registered. Asking for the pattern of an
    /// unregistered screen is a programming error, not a recoverable
    /// condition.
    #[must_use]
    pub fn pattern_of(&self, screen: &Arc<Screen<V>>) -> &str {
        match self.entry_of(screen) {
            Some(entry) => &entry.pattern,
            None => {
                error!("no route registered for screen");
                panic!("no route registered for screen");
            }
        }
    }

    /// The layout assigned to `screen` at registration, if any.
    #[must_use]
    pub fn layout_of(&self, screen: &Arc<Screen<V>>) -> Option<&Arc<Layout<V>>> {
        self.entry_of(screen)
            .and_then(|entry| entry.layout.as_ref())
            .map(|slot| &slot.layout)
    }

    /// The dependencies registered for `screen`. Empty if none were
    /// supplied.
    #[must_use]
    pub fn deps_of(&self, screen: &Arc<Screen<V>>) -> Deps {
        self.entry_of(screen)
            .map(|entry| entry.deps.clone())
            .unwrap_or_default()
    }

    /// The dependencies registered for `layout`. Empty if none were
    /// supplied.
    #[must_use]
    pub fn layout_deps_of(&self, layout: &Arc<Layout<V>>) -> Deps {
        self.entries
            .iter()
            .filter_map(|entry| entry.layout.as_ref())
            .find(|slot| Arc::ptr_eq(&slot.layout, layout))
            .map(|slot| slot.deps.clone())
            .unwrap_or_default()
    }

    /// How many routes are registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entry_of(&self, screen: &Arc<Screen<V>>) -> Option<&RouteEntry<V>> {
        self.entries
            .iter()
            .find(|entry| Arc::ptr_eq(&entry.screen, screen))
    }

    pub(crate) fn entry(&self, index: usize) -> &RouteEntry<V> {
        &self.entries[index]
    }

    /// Find the first registered route matching `path`, in registration
    /// order, together with the extracted parameters.
    pub(crate) fn match_path(&self, path: &str) -> Option<(usize, crate::screen::Params)> {
        self.entries
            .iter()
            .enumerate()
            .find_map(|(index, entry)| entry.matcher.extract(path).map(|params| (index, params)))
    }
}
