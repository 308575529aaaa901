/// Labeled console output.
pub mod logger;
/// Mojang authentication API implementation.
pub mod mojang;

pub use logger::{Channel, Logger};
pub use mojang::auth::{Agent, AuthClient};
pub use mojang::error::AuthError;
