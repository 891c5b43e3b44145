pub mod auth;
pub mod panic;

pub use auth::require_credentials;
pub use panic::render_panic;
