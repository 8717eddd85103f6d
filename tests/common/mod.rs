#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, RwLock};

use futures_channel::oneshot;
use signpost::prelude::*;

/// Renders everything into plain strings.
pub struct TestFactory;

impl ViewFactory<String> for TestFactory {
    fn link(&self, href: &str, active: bool, content: LinkContent<String>) -> String {
        let label = match content {
            LinkContent::Label(label) => label,
            LinkContent::Element(element) => element,
            LinkContent::Render(render) => render(LinkState {
                href: href.to_string(),
                active,
            }),
        };
        format!("link({href},{active},{label})")
    }

    fn redirect(&self, path: &str) -> String {
        format!("redirect({path})")
    }
}

pub fn router(
    routes: RouteRegistry<String>,
    cfg: RouterConfig<String>,
) -> (RouterService<String>, RouterHandle<String>) {
    RouterService::new(routes, Arc::new(TestFactory), Arc::new(|| {}), cfg)
}

pub type Gate = Rc<RefCell<Vec<oneshot::Sender<anyhow::Result<LoadOutcome<String>>>>>>;

/// A loading screen whose loads stay pending until resolved through the
/// returned gate. Renders as `tag:<id param>:<props as json>`.
pub fn gated_screen(tag: &'static str) -> (Arc<Screen<String>>, Gate) {
    let gate: Gate = Rc::new(RefCell::new(Vec::new()));
    let senders = gate.clone();
    let screen = Screen::loading(
        move |props: ScreenProps<String>| {
            format!(
                "{tag}:{}:{}",
                props.params.get("id").cloned().unwrap_or_default(),
                serde_json::to_string(props.props).unwrap(),
            )
        },
        move |_context: LoadContext| {
            let (tx, rx) = oneshot::channel();
            senders.borrow_mut().push(tx);
            async move { rx.await.expect("gated load dropped") }
        },
    );
    (screen, gate)
}

/// Resolve the oldest pending gated load.
pub fn resolve(gate: &Gate, outcome: anyhow::Result<LoadOutcome<String>>) {
    let sender = gate.borrow_mut().remove(0);
    assert!(sender.send(outcome).is_ok());
}

pub fn props_with(key: &str, value: &str) -> Props {
    let mut props = Props::new();
    props.insert(key.to_string(), serde_json::json!(value));
    props
}

pub fn shared_history(path: &str) -> Arc<RwLock<MemoryHistory>> {
    Arc::new(RwLock::new(MemoryHistory::with_initial_path(path)))
}
