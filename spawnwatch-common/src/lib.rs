pub mod expiry;
pub mod filter;
pub mod types;

pub use expiry::{format_time_left, recompute_time_left};
pub use filter::{visible_entries, Denylist};
pub use types::{Entry, Status};
