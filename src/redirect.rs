//! The redirect protocol for load capabilities.
//!
//! A load can resolve to ordinary props, or request that the router render
//! nothing for the current location and navigate somewhere else instead. The
//! two cases are the variants of [`LoadOutcome`]; the enum tag is the marker
//! that keeps a redirect distinguishable from any prop shape a load could
//! produce by accident.

use std::sync::Arc;

use crate::path::PathContext;
use crate::screen::{Props, Screen};

/// A request, produced by a load, to navigate to another screen instead of
/// rendering.
///
/// Never written to the result cache. The router interpolates the target
/// screen's registered pattern with `context` and replaces the current
/// location with the result.
pub struct RedirectEnvelope<V> {
    /// The screen to navigate to.
    pub screen: Arc<Screen<V>>,
    /// Parameters and search values for the target's path pattern.
    pub context: PathContext,
}

/// What a load capability resolved to.
pub enum LoadOutcome<V> {
    /// Props for the render capability.
    Props(Props),
    /// Render nothing here, navigate elsewhere instead.
    Redirect(RedirectEnvelope<V>),
}

impl<V> From<Props> for LoadOutcome<V> {
    fn from(props: Props) -> Self {
        Self::Props(props)
    }
}

/// Build a redirect outcome targeting `screen`.
///
/// ```rust
/// # use signpost::prelude::*;
/// let target = Screen::<String>::new(|_| String::from("home"));
/// let outcome = redirect(&target, PathContext::new());
/// assert!(is_redirect(&outcome));
/// ```
pub fn redirect<V>(screen: &Arc<Screen<V>>, context: PathContext) -> LoadOutcome<V> {
    LoadOutcome::Redirect(RedirectEnvelope {
        screen: screen.clone(),
        context,
    })
}

/// Whether `outcome` is a redirect. The only way to tell a redirect apart
/// from ordinary props.
#[must_use]
pub fn is_redirect<V>(outcome: &LoadOutcome<V>) -> bool {
    matches!(outcome, LoadOutcome::Redirect(_))
}
