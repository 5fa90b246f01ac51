//! Open sessions keyed by document identity.

use super::{DocumentHost, Inbound, Outbound, Session};
use std::collections::BTreeMap;

/// Sessions are added on open and removed on close; nothing is global.
pub struct SessionRegistry<H: DocumentHost> {
    sessions: BTreeMap<String, Session<H>>,
}

impl<H: DocumentHost> Default for SessionRegistry<H> {
    fn default() -> Self {
        Self {
            sessions: BTreeMap::new(),
        }
    }
}

impl<H: DocumentHost> SessionRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session, replacing any previous session for the same document.
    pub fn open(&mut self, session: Session<H>) -> Option<Session<H>> {
        self.sessions.insert(session.identity(), session)
    }

    pub fn close(&mut self, identity: &str) -> Option<Session<H>> {
        self.sessions.remove(identity)
    }

    pub fn get_mut(&mut self, identity: &str) -> Option<&mut Session<H>> {
        self.sessions.get_mut(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.sessions.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Deliver a message to one session. `None` when the document is not open.
    pub fn send_to(&mut self, identity: &str, message: Inbound) -> Option<Vec<Outbound>> {
        self.sessions
            .get_mut(identity)
            .map(|session| session.handle(message))
    }

    /// Deliver a message to every open session, in identity order.
    pub fn broadcast(&mut self, message: &Inbound) -> Vec<(String, Vec<Outbound>)> {
        self.sessions
            .iter_mut()
            .map(|(identity, session)| (identity.clone(), session.handle(message.clone())))
            .collect()
    }
}
