// auth/mod.rs - Credential verification and ownership checks
//
// Callers authenticate on every request with an HTTP Basic header carrying
// `email:password`. There are no tokens or sessions: the header is checked
// against the stored Argon2 hash each time.

pub mod credentials;
pub mod ownership;
pub mod password;

pub use credentials::{verify, AuthFailure, AuthenticatedContext, CredentialError};
pub use ownership::{authorize, Forbidden, Owned};
