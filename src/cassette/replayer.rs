//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Serves interactions from a loaded cassette in recorded order, one queue
/// per port/method pair.
#[derive(Debug, Default)]
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a replayer over every interaction in the cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        Self::from_interactions(cassette.interactions.iter())
    }

    /// Create a replayer over one port's interactions only.
    #[must_use]
    pub fn for_port(cassette: &Cassette, port: &str) -> Self {
        Self::from_interactions(cassette.interactions.iter().filter(|i| i.port == port))
    }

    fn from_interactions<'a>(interactions: impl Iterator<Item = &'a Interaction>) -> Self {
        let mut queues: HashMap<PortMethodKey, VecDeque<Interaction>> = HashMap::new();
        for interaction in interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Interactions not yet served for a port/method pair.
    #[must_use]
    pub fn remaining(&self, port: &str, method: &str) -> usize {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };
        self.queues.get(&key).map_or(0, VecDeque::len)
    }

    /// Take the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair, naming
    /// what was requested and which pairs still have interactions left.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };
        if let Some(interaction) = self.queues.get_mut(&key).and_then(VecDeque::pop_front) {
            return interaction;
        }

        let mut available: Vec<String> = self
            .queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(k, queue)| format!("{}::{} ({})", k.port, k.method, queue.len()))
            .collect();
        available.sort();
        panic!(
            "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
             Remaining port::method pairs: [{}]",
            available.join(", ")
        );
    }
}
