mod notifier;

pub use notifier::{LogNotifier, Notifier, RecordingNotifier, Signal};

use crate::dom::{Document, NodeId};
use crate::utils::error::Result;

/// Per-instance lifecycle state.
///
/// `New` components have not initialized yet (or found nothing applicable
/// and stayed inert). `Ready` components receive events. `Paused` marks a
/// component detached from the host with its listeners deregistered; the
/// subscription list is remembered so reattachment restores delivery
/// without re-running initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    New,
    Ready,
    Paused,
}

/// Document-level input event kinds components may subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    KeyDown,
}

/// A host input event, dispatched synchronously and never re-emitted
#[derive(Debug, Clone)]
pub struct InputEvent {
    pub kind: EventKind,
    pub target: Option<NodeId>,
    pub key: Option<String>,
}

impl InputEvent {
    pub fn click(target: NodeId) -> Self {
        InputEvent {
            kind: EventKind::Click,
            target: Some(target),
            key: None,
        }
    }

    pub fn key_press(key: &str) -> Self {
        InputEvent {
            kind: EventKind::KeyDown,
            target: None,
            key: Some(key.to_string()),
        }
    }
}

/// Outcome of a component's initialization
#[derive(Debug)]
pub enum Activation {
    /// Initialization succeeded; subscribe to the given event kinds
    Ready { listen: Vec<EventKind> },
    /// Nothing applicable was found; the component stays inert
    Skipped,
}

/// A navigation component driven by host lifecycle callbacks.
///
/// `connected` runs once when the document becomes ready; a successful
/// activation emits the component's ready signal, a skip emits a debug
/// signal with the reason. Both paths leave prior document content
/// untouched on failure.
pub trait Component {
    fn name(&self) -> &'static str;

    fn connected(
        &mut self,
        doc: &mut Document,
        notifier: &mut dyn Notifier,
    ) -> Result<Activation>;

    fn disconnected(&mut self, _doc: &mut Document) {}

    fn handle_event(&mut self, _event: &InputEvent, _doc: &mut Document) {}
}

/// Handle to a registered component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentId(usize);

struct Entry {
    component: Box<dyn Component>,
    state: Lifecycle,
    listeners: Vec<EventKind>,
}

/// Owns the document, the notifier and the registered components, and
/// drives them from host callbacks. Everything runs synchronously on one
/// control thread; there is no locking because there is no concurrency.
pub struct Host {
    document: Document,
    notifier: Box<dyn Notifier>,
    entries: Vec<Entry>,
}

impl Host {
    pub fn new(document: Document) -> Self {
        Self::with_notifier(document, Box::new(LogNotifier))
    }

    pub fn with_notifier(document: Document, notifier: Box<dyn Notifier>) -> Self {
        Host {
            document,
            notifier,
            entries: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn register(&mut self, component: Box<dyn Component>) -> ComponentId {
        let id = ComponentId(self.entries.len());
        self.entries.push(Entry {
            component,
            state: Lifecycle::New,
            listeners: Vec::new(),
        });
        id
    }

    pub fn state(&self, id: ComponentId) -> Lifecycle {
        self.entries[id.0].state
    }

    /// Run initialization for every component that has not initialized yet.
    /// Re-invocation is a guarded no-op for components already ready.
    pub fn document_ready(&mut self) -> Result<()> {
        for entry in &mut self.entries {
            if entry.state == Lifecycle::New {
                connect_entry(entry, &mut self.document, self.notifier.as_mut())?;
            }
        }
        Ok(())
    }

    /// Fan an input event out to every ready subscriber of its kind
    pub fn dispatch(&mut self, event: &InputEvent) {
        for entry in &mut self.entries {
            if entry.state == Lifecycle::Ready && entry.listeners.contains(&event.kind) {
                entry.component.handle_event(event, &mut self.document);
            }
        }
    }

    /// Remove a component from the host: its listeners stop receiving
    /// events until it is reattached
    pub fn detach(&mut self, id: ComponentId) {
        let entry = &mut self.entries[id.0];
        if entry.state == Lifecycle::Ready {
            entry.state = Lifecycle::Paused;
            entry.component.disconnected(&mut self.document);
        }
    }

    /// Reattach a detached component. A paused component gets its listeners
    /// back without re-running initialization; a component that never
    /// initialized gets its first chance now.
    pub fn reattach(&mut self, id: ComponentId) -> Result<()> {
        match self.entries[id.0].state {
            Lifecycle::Paused => self.entries[id.0].state = Lifecycle::Ready,
            Lifecycle::New => connect_entry(
                &mut self.entries[id.0],
                &mut self.document,
                self.notifier.as_mut(),
            )?,
            Lifecycle::Ready => {}
        }
        Ok(())
    }
}

fn connect_entry(
    entry: &mut Entry,
    doc: &mut Document,
    notifier: &mut dyn Notifier,
) -> Result<()> {
    match entry.component.connected(doc, notifier)? {
        Activation::Ready { listen } => {
            entry.listeners = listen;
            entry.state = Lifecycle::Ready;
        }
        Activation::Skipped => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    /// Counts lifecycle calls and flips an attribute on click
    struct Probe {
        target: NodeId,
        connects: std::rc::Rc<std::cell::Cell<usize>>,
        events: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl Component for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn connected(
            &mut self,
            _doc: &mut Document,
            notifier: &mut dyn Notifier,
        ) -> Result<Activation> {
            self.connects.set(self.connects.get() + 1);
            notifier.ready(self.name());
            Ok(Activation::Ready {
                listen: vec![EventKind::Click],
            })
        }

        fn handle_event(&mut self, _event: &InputEvent, doc: &mut Document) {
            self.events.set(self.events.get() + 1);
            doc.set_attr(self.target, "data-clicked", "true");
        }
    }

    fn probe_host() -> (
        Host,
        ComponentId,
        RecordingNotifier,
        std::rc::Rc<std::cell::Cell<usize>>,
        std::rc::Rc<std::cell::Cell<usize>>,
        NodeId,
    ) {
        let doc = parse_document("<div></div>").unwrap();
        let target = doc.children(doc.root())[0];
        let recorder = RecordingNotifier::new();
        let connects = std::rc::Rc::new(std::cell::Cell::new(0));
        let events = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut host = Host::with_notifier(doc, Box::new(recorder.clone()));
        let id = host.register(Box::new(Probe {
            target,
            connects: connects.clone(),
            events: events.clone(),
        }));
        (host, id, recorder, connects, events, target)
    }

    #[test]
    fn test_document_ready_runs_once() {
        let (mut host, id, recorder, connects, _, _) = probe_host();
        host.document_ready().unwrap();
        host.document_ready().unwrap();

        assert_eq!(connects.get(), 1);
        assert_eq!(recorder.ready_count("probe"), 1);
        assert_eq!(host.state(id), Lifecycle::Ready);
    }

    #[test]
    fn test_dispatch_reaches_subscribers_only() {
        let (mut host, _, _, _, events, target) = probe_host();
        host.document_ready().unwrap();

        host.dispatch(&InputEvent::key_press("Escape"));
        assert_eq!(events.get(), 0);

        host.dispatch(&InputEvent::click(target));
        assert_eq!(events.get(), 1);
        assert_eq!(host.document().attr(target, "data-clicked"), Some("true"));
    }

    #[test]
    fn test_detach_pauses_and_reattach_resumes_without_reinit() {
        let (mut host, id, recorder, connects, events, target) = probe_host();
        host.document_ready().unwrap();

        host.detach(id);
        assert_eq!(host.state(id), Lifecycle::Paused);
        host.dispatch(&InputEvent::click(target));
        assert_eq!(events.get(), 0);

        host.reattach(id).unwrap();
        assert_eq!(host.state(id), Lifecycle::Ready);
        host.dispatch(&InputEvent::click(target));
        assert_eq!(events.get(), 1);

        // Initialization ran exactly once across the whole cycle
        assert_eq!(connects.get(), 1);
        assert_eq!(recorder.ready_count("probe"), 1);
    }

    #[test]
    fn test_events_before_ready_are_ignored() {
        let (mut host, _, _, _, events, target) = probe_host();
        host.dispatch(&InputEvent::click(target));
        assert_eq!(events.get(), 0);
    }
}
