use super::filter::{self, Preferences};
use super::ledger::{LedgerError, LedgerResult, VisitLedger, VisitRequest};
use super::store::{Listing, ListingStore};

/// The capability seam exposed to the conversational agent.
///
/// Mirrors the two operations the model may invoke: querying listings and
/// booking a visit. The agent loop dispatches validated tool calls against
/// this trait, and tests substitute their own implementations.
pub trait PropertyCapabilities {
    fn search(&self, prefs: &Preferences) -> Vec<Listing>;
    fn schedule(&self, visit: &VisitRequest) -> LedgerResult<()>;
}

/// The live backend: an immutable listing store plus the visit ledger.
#[derive(Debug)]
pub struct PropertyDesk {
    store: ListingStore,
    ledger: VisitLedger,
}

impl PropertyDesk {
    pub fn new(store: ListingStore, ledger: VisitLedger) -> Self {
        Self { store, ledger }
    }

    pub fn listings(&self) -> &[Listing] {
        self.store.listings()
    }

    pub fn ledger(&self) -> &VisitLedger {
        &self.ledger
    }
}

impl PropertyCapabilities for PropertyDesk {
    fn search(&self, prefs: &Preferences) -> Vec<Listing> {
        filter::search(self.store.listings(), prefs)
    }

    fn schedule(&self, visit: &VisitRequest) -> Result<(), LedgerError> {
        self.ledger.append(visit)
    }
}
