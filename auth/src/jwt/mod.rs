pub mod claims;
pub mod errors;
pub mod handler;
pub mod issuer;

pub use claims::Claims;
pub use claims::Role;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use issuer::TokenConfig;
pub use issuer::TokenIssuer;
