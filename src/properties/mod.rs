pub mod capabilities;
pub mod filter;
pub mod ledger;
pub mod render;
pub mod store;

pub use capabilities::{PropertyCapabilities, PropertyDesk};
pub use filter::{Preferences, search};
pub use ledger::{LedgerError, LedgerResult, VisitLedger, VisitRequest};
pub use render::render_listings;
pub use store::{Listing, ListingStore, StoreError};
