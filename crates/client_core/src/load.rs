//! Request-generation tracking used to drop completions of superseded loads.

/// Identity of one issued load. Completions carry their ticket back to the
/// controller, which applies them only while the ticket is still the active
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket<K = ()> {
    generation: u64,
    key: K,
}

impl<K: Copy> LoadTicket<K> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> K {
        self.key
    }
}

#[derive(Debug)]
pub(crate) struct LoadTracker<K> {
    last_generation: u64,
    active: Option<LoadTicket<K>>,
}

impl<K> Default for LoadTracker<K> {
    fn default() -> Self {
        Self {
            last_generation: 0,
            active: None,
        }
    }
}

impl<K: Copy + PartialEq> LoadTracker<K> {
    pub(crate) fn begin(&mut self, key: K) -> LoadTicket<K> {
        self.last_generation = self.last_generation.wrapping_add(1);
        let ticket = LoadTicket {
            generation: self.last_generation,
            key,
        };
        self.active = Some(ticket);
        ticket
    }

    pub(crate) fn is_current(&self, ticket: &LoadTicket<K>) -> bool {
        self.active.as_ref() == Some(ticket)
    }

    pub(crate) fn active(&self) -> Option<LoadTicket<K>> {
        self.active
    }
}
