pub mod error;
pub mod events;
pub mod filter;
pub mod reconcile;
pub mod record;
pub mod selection;
pub mod session;
pub mod store;
