//! Auth-domain identifiers, redacted secrets, and the authentication state contract.

pub mod id;
pub mod secret;
pub mod state;

pub use id::*;
pub use secret::*;
pub use state::*;
