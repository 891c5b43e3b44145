pub mod course;
pub mod user;

pub use course::{Course, CourseFields};
pub use user::{Identity, NewUser, User, ValidUser};
