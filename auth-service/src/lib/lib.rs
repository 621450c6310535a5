pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::account;
pub use outbound::ledger;
pub use outbound::repositories;
