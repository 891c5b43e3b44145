// handlers/mod.rs - Request handlers by security tier
//
// Public (no credentials) → Protected (Basic credentials, checked by
// `middleware::require_credentials` before the handler runs).
//
// Record-scoped mutations load the record first, then run the ownership
// check, then mutate. A missing record is always 404, never 403.

pub mod protected;
pub mod public;
