pub mod types;

pub use types::{Email, OutgoingEmail};
