pub mod bids;
pub mod designs;
pub mod notifications;
pub mod payments;
pub mod progress;
