//! AnyEvent - engine instance and observer lifecycle
//!
//! Unattached until a root element is supplied; attaching instruments the
//! root's subtree and starts observing it. There is no detach: the owner of
//! the tree decides when the observed subtree goes away.

use std::sync::atomic::{AtomicU64, Ordering};

use anyevent_dom::{DomTree, MutationRecord, MutationSource, NodeId, ObserverId};

use crate::{handle_mutations, instrument_subtree, AnyEventError, Config, DeliveryReport, EventSpec, InstrumentReport};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Batches one `deliver` call processes before leaving the rest queued
pub const MAX_DELIVERY_ROUNDS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Unattached,
    Attached { root: NodeId, observer: ObserverId },
}

/// Virtual event engine bound to one observed subtree
#[derive(Debug)]
pub struct AnyEvent {
    id: u64,
    config: Config,
    state: Lifecycle,
}

impl Default for AnyEvent {
    fn default() -> Self {
        Self::new(Vec::<EventSpec>::new())
    }
}

impl AnyEvent {
    /// Compile the spec list; `None` entries are skipped
    pub fn new<I, S>(specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Option<EventSpec>>,
    {
        Self {
            id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
            config: Config::compile(specs),
            state: Lifecycle::Unattached,
        }
    }

    /// Instance identifier, used to key this engine's listeners
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, Lifecycle::Attached { .. })
    }

    /// Observed root, once attached
    pub fn root(&self) -> Option<NodeId> {
        match self.state {
            Lifecycle::Attached { root, .. } => Some(root),
            Lifecycle::Unattached => None,
        }
    }

    /// Instrument the subtree under `root` and start observing it
    pub fn attach(&mut self, tree: &mut DomTree, root: NodeId) -> Result<InstrumentReport, AnyEventError> {
        if let Lifecycle::Attached { root, .. } = self.state {
            return Err(AnyEventError::AlreadyAttached(root));
        }
        if tree.get(root).is_none() {
            return Err(anyevent_dom::DomError::NodeNotFound(root).into());
        }
        if tree.element(root).is_none() {
            return Err(AnyEventError::RootNotElement(root));
        }

        let report = instrument_subtree(tree, &self.config, self.id, root);
        let observer = tree.observe(root, self.config.observer_init());
        self.state = Lifecycle::Attached { root, observer };

        tracing::info!(
            "AnyEvent {} attached to {} ({} elements instrumented)",
            self.id,
            root,
            report.elements
        );
        Ok(report)
    }

    /// Drain and process queued mutation records until none are left
    ///
    /// Records queued while a batch is processed (by predicates, listeners
    /// or handlers) are delivered in a following batch of the same call, up
    /// to [`MAX_DELIVERY_ROUNDS`] batches. Handlers that keep writing new
    /// values would never settle; past the cap the remaining records stay
    /// queued for the next call.
    pub fn deliver(&self, tree: &mut DomTree) -> Result<DeliveryReport, AnyEventError> {
        let Lifecycle::Attached { observer, .. } = self.state else {
            return Err(AnyEventError::NotAttached);
        };

        let mut report = DeliveryReport::default();
        for _ in 0..MAX_DELIVERY_ROUNDS {
            let records = tree.take_records(observer);
            if records.is_empty() {
                return Ok(report);
            }
            report += self.handle_mutations(tree, &records);
        }
        if tree.has_pending_records(observer) {
            tracing::warn!(
                "AnyEvent {} still has records after {} rounds, leaving them queued",
                self.id,
                MAX_DELIVERY_ROUNDS
            );
        }
        Ok(report)
    }

    /// Process a batch of records, whatever produced them
    pub fn handle_mutations(&self, tree: &mut DomTree, records: &[MutationRecord]) -> DeliveryReport {
        handle_mutations(tree, &self.config, self.id, records)
    }

    /// Instrument a node and its descendants with this engine's tables
    pub fn instrument(&self, tree: &mut DomTree, node: NodeId) -> InstrumentReport {
        instrument_subtree(tree, &self.config, self.id, node)
    }
}
