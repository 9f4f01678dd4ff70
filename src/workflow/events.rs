use crate::connector::ConnectorId;
use crate::node::NodeId;
use crate::terminal::TerminalKey;
use std::fmt;

/// A synchronous notification that editor state changed and should be re-rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A terminal's connectors, map-over or declaration changed.
    TerminalChanged(TerminalKey),
    /// A terminal was removed from its node.
    TerminalDestroyed(TerminalKey),
    /// Something on the node changed; the host should re-validate it.
    NodeChanged(NodeId),
    NodeRemoved(NodeId),
    ConnectorCreated(ConnectorId),
    ConnectorDestroyed(ConnectorId),
}

/// Callback invoked for every event as it is emitted.
pub type Subscriber = Box<dyn FnMut(&ChangeEvent)>;

/// Records emitted events until the host drains them, and fans each one
/// out to registered subscribers.
#[derive(Default)]
pub(crate) struct EventJournal {
    pending: Vec<ChangeEvent>,
    subscribers: Vec<Subscriber>,
}

impl EventJournal {
    pub(crate) fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    pub(crate) fn emit(&mut self, event: ChangeEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&event);
        }
        self.pending.push(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn pending(&self) -> &[ChangeEvent] {
        &self.pending
    }
}

impl fmt::Debug for EventJournal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventJournal")
            .field("pending", &self.pending)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
