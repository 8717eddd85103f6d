//! Screens and layouts, the renderable units bound to routes.
//!
//! A [`Screen`] couples a render capability with an optional asynchronous
//! load capability. A screen with a load is a *loading* screen; its load runs
//! before the first render for a location and produces the props the render
//! receives. A [`Layout`] is shaped like a screen, but its render additionally
//! receives an `outlet`: the rendered output of the screen nested inside it.
//!
//! Both are handed out as [`Arc`]s; the router treats the pointer as the
//! screen's identity and never compares screens by value.

use std::any::Any;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;

use crate::path::SearchParams;
use crate::redirect::LoadOutcome;
use crate::toolkit::Routing;

/// Render props produced by a load capability.
///
/// Kept as a JSON object so entries can be cached and cloned without the
/// router knowing anything about their shape.
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Path parameters extracted from the current location.
pub type Params = BTreeMap<String, String>;

/// Opaque per-route dependencies threaded into load capabilities.
pub type Deps = Vec<Arc<dyn Any>>;

/// The context a load capability runs with.
///
/// Constructed fresh for every navigation. `params` and `search` describe the
/// current match and are shared between a screen's and its layout's load;
/// `deps` are the dependencies supplied for that screen or layout when it was
/// registered.
pub struct LoadContext {
    /// Path parameters of the current match.
    pub params: Params,
    /// Query parameters of the current location.
    pub search: SearchParams,
    /// The dependencies registered for the loading entity.
    pub deps: Deps,
}

/// A boxed load capability.
///
/// Resolves to props for the render capability, or to a redirect envelope
/// requesting navigation elsewhere. Errors are reported to the router's load
/// error observer and never retried.
pub type LoadFn<V> = Box<dyn Fn(LoadContext) -> LocalBoxFuture<'static, anyhow::Result<LoadOutcome<V>>>>;

/// Everything a screen's render capability receives.
pub struct ScreenProps<'a, V> {
    /// Path parameters of the current match.
    pub params: &'a Params,
    /// Query parameters of the current location.
    pub search: &'a SearchParams,
    /// The props committed for this location by the screen's own load.
    pub props: &'a Props,
    /// The routing toolkit, for building links and redirects.
    pub routing: &'a Routing<V>,
}

/// Everything a layout's render capability receives.
pub struct LayoutProps<'a, V> {
    /// The rendered output of the nested screen.
    pub outlet: V,
    /// Path parameters of the current match.
    pub params: &'a Params,
    /// Query parameters of the current location.
    pub search: &'a SearchParams,
    /// The props committed for this location by the layout's own load.
    pub props: &'a Props,
    /// The routing toolkit, for building links and redirects.
    pub routing: &'a Routing<V>,
}

/// A boxed screen render capability.
pub type RenderFn<V> = Box<dyn Fn(ScreenProps<'_, V>) -> V>;

/// A boxed layout render capability.
pub type LayoutRenderFn<V> = Box<dyn Fn(LayoutProps<'_, V>) -> V>;

/// A renderable unit bound to a route.
pub enum Screen<V> {
    /// A screen without a load capability. Commits synchronously.
    Static {
        /// The screen's render capability.
        render: RenderFn<V>,
    },
    /// A screen whose load runs before the first render for a location.
    Loading {
        /// The screen's render capability.
        render: RenderFn<V>,
        /// The screen's load capability.
        load: LoadFn<V>,
    },
}

impl<V> Screen<V> {
    /// Create a static screen from a render capability.
    pub fn new(render: impl Fn(ScreenProps<'_, V>) -> V + 'static) -> Arc<Self> {
        Arc::new(Self::Static {
            render: Box::new(render),
        })
    }

    /// Create a loading screen from a render and a load capability.
    pub fn loading<F>(
        render: impl Fn(ScreenProps<'_, V>) -> V + 'static,
        load: impl Fn(LoadContext) -> F + 'static,
    ) -> Arc<Self>
    where
        F: Future<Output = anyhow::Result<LoadOutcome<V>>> + 'static,
    {
        Arc::new(Self::Loading {
            render: Box::new(render),
            load: Box::new(move |context| load(context).boxed_local()),
        })
    }

    /// Whether this screen has a load capability.
    #[must_use]
    pub fn has_load(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub(crate) fn render(&self, props: ScreenProps<'_, V>) -> V {
        match self {
            Self::Static { render } | Self::Loading { render, .. } => render(props),
        }
    }

    pub(crate) fn load(&self) -> Option<&LoadFn<V>> {
        match self {
            Self::Static { .. } => None,
            Self::Loading { load, .. } => Some(load),
        }
    }
}

/// A screen-like wrapper that renders a nested screen's output inside its own
/// shell.
pub enum Layout<V> {
    /// A layout without a load capability.
    Static {
        /// The layout's render capability.
        render: LayoutRenderFn<V>,
    },
    /// A layout whose load runs alongside the nested screen's load.
    Loading {
        /// The layout's render capability.
        render: LayoutRenderFn<V>,
        /// The layout's load capability.
        load: LoadFn<V>,
    },
}

impl<V> Layout<V> {
    /// Create a static layout from a render capability.
    pub fn new(render: impl Fn(LayoutProps<'_, V>) -> V + 'static) -> Arc<Self> {
        Arc::new(Self::Static {
            render: Box::new(render),
        })
    }

    /// Create a loading layout from a render and a load capability.
    pub fn loading<F>(
        render: impl Fn(LayoutProps<'_, V>) -> V + 'static,
        load: impl Fn(LoadContext) -> F + 'static,
    ) -> Arc<Self>
    where
        F: Future<Output = anyhow::Result<LoadOutcome<V>>> + 'static,
    {
        Arc::new(Self::Loading {
            render: Box::new(render),
            load: Box::new(move |context| load(context).boxed_local()),
        })
    }

    /// Whether this layout has a load capability.
    #[must_use]
    pub fn has_load(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub(crate) fn render(&self, props: LayoutProps<'_, V>) -> V {
        match self {
            Self::Static { render } | Self::Loading { render, .. } => render(props),
        }
    }

    pub(crate) fn load(&self) -> Option<&LoadFn<V>> {
        match self {
            Self::Static { .. } => None,
            Self::Loading { load, .. } => Some(load),
        }
    }
}
