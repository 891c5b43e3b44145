// handlers/protected/mod.rs - Handlers behind the authentication gate
//
// Route Prefix: /api
// Middleware: require_credentials (Basic auth, 401 "Access Denied" on failure)
//
// Every handler here receives the caller as `Extension<AuthenticatedContext>`.

pub mod courses;
pub mod users;
