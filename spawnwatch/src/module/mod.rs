pub mod display;
pub mod location;
pub mod notify;
pub mod provider;
pub mod tracker;
