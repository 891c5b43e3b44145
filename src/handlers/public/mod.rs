// handlers/public/mod.rs - Handlers reachable without credentials
//
// Route Prefix: /api
// Middleware: none

pub mod courses;
pub mod users;
