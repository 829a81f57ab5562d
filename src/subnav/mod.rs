use crate::component::{Activation, Component, EventKind, InputEvent, Notifier};
use crate::dom::{Document, NodeId};
use crate::utils::error::Result;

const COMPONENT_NAME: &str = "subnav";

/// Closes an open collapsible sub-navigation on outside clicks and Escape
/// key presses.
///
/// The component expects a `details` disclosure somewhere in its subtree;
/// the `open` attribute is the open/closed state. Without one it stays
/// inert and emits a single debug signal.
pub struct SubNavCloser {
    element: NodeId,
    disclosure: Option<NodeId>,
}

impl SubNavCloser {
    pub fn new(element: NodeId) -> Self {
        SubNavCloser {
            element,
            disclosure: None,
        }
    }
}

impl Component for SubNavCloser {
    fn name(&self) -> &'static str {
        COMPONENT_NAME
    }

    fn connected(
        &mut self,
        doc: &mut Document,
        notifier: &mut dyn Notifier,
    ) -> Result<Activation> {
        let disclosure = doc
            .descendants(self.element)
            .into_iter()
            .find(|&node| doc.tag(node) == Some("details"));

        match disclosure {
            Some(node) => {
                self.disclosure = Some(node);
                notifier.ready(COMPONENT_NAME);
                Ok(Activation::Ready {
                    listen: vec![EventKind::Click, EventKind::KeyDown],
                })
            }
            None => {
                notifier.debug(COMPONENT_NAME, "no sub-navigation found");
                Ok(Activation::Skipped)
            }
        }
    }

    fn handle_event(&mut self, event: &InputEvent, doc: &mut Document) {
        let disclosure = match self.disclosure {
            Some(node) => node,
            None => return,
        };
        if !doc.has_attr(disclosure, "open") {
            return;
        }

        let close = match event.kind {
            EventKind::Click => event
                .target
                .map_or(false, |target| !doc.contains(disclosure, target)),
            EventKind::KeyDown => event.key.as_deref() == Some("Escape"),
        };

        if close {
            doc.remove_attr(disclosure, "open");
            log::debug!("closed sub-navigation");
        }
    }
}
