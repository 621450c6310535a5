pub mod memory;
pub mod user;

pub use memory::InMemoryCredentialStore;
pub use user::PostgresCredentialStore;
