use std::cell::RefCell;
use std::rc::Rc;

/// A lifecycle or diagnostic signal emitted by a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Initialization succeeded
    Ready { component: String },
    /// Initialization found nothing applicable; carries a human-readable reason
    Debug { component: String, reason: String },
}

impl Signal {
    /// Namespaced signal name, e.g. `pagenav:toc:ready`
    pub fn name(&self) -> String {
        match self {
            Signal::Ready { component } => format!("pagenav:{}:ready", component),
            Signal::Debug { component, .. } => format!("pagenav:{}:debug", component),
        }
    }
}

/// Sink for component signals. Nothing feeds back from the notifier into
/// component logic.
pub trait Notifier {
    fn ready(&mut self, component: &str);
    fn debug(&mut self, component: &str, reason: &str);
}

/// Routes signals to the `log` crate
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn ready(&mut self, component: &str) {
        log::info!("pagenav:{}:ready", component);
    }

    fn debug(&mut self, component: &str, reason: &str) {
        log::debug!("pagenav:{}: {}", component, reason);
    }
}

/// Collects signals for later inspection; mainly used in tests.
///
/// Clones share the same signal buffer, so a handle kept outside the host
/// observes everything the host-owned copy records.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    signals: Rc<RefCell<Vec<Signal>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals.borrow().clone()
    }

    pub fn ready_count(&self, component: &str) -> usize {
        self.signals
            .borrow()
            .iter()
            .filter(|s| matches!(s, Signal::Ready { component: c } if c == component))
            .count()
    }

    pub fn debug_reasons(&self, component: &str) -> Vec<String> {
        self.signals
            .borrow()
            .iter()
            .filter_map(|s| match s {
                Signal::Debug { component: c, reason } if c == component => Some(reason.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn ready(&mut self, component: &str) {
        self.signals.borrow_mut().push(Signal::Ready {
            component: component.to_string(),
        });
    }

    fn debug(&mut self, component: &str, reason: &str) {
        self.signals.borrow_mut().push(Signal::Debug {
            component: component.to_string(),
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_names_are_namespaced() {
        let ready = Signal::Ready {
            component: "toc".to_string(),
        };
        assert_eq!(ready.name(), "pagenav:toc:ready");

        let debug = Signal::Debug {
            component: "subnav".to_string(),
            reason: "no sub-navigation found".to_string(),
        };
        assert_eq!(debug.name(), "pagenav:subnav:debug");
    }

    #[test]
    fn test_recording_handles_share_a_buffer() {
        let recorder = RecordingNotifier::new();
        let mut other = recorder.clone();
        other.ready("toc");
        other.debug("toc", "no matching headings");

        assert_eq!(recorder.ready_count("toc"), 1);
        assert_eq!(recorder.debug_reasons("toc"), vec!["no matching headings"]);
    }
}
