pub mod extract;
pub mod response;

pub use extract::{ApiJson, ApiPath};
pub use response::{Created, Message};
