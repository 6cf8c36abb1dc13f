pub mod coordinator;
pub mod expiry;
