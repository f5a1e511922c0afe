pub mod biddtos;
pub mod common;
pub mod designdtos;
pub mod notificationdtos;
pub mod paymentdtos;
pub mod progressdtos;
