pub mod biddb;
pub mod db;
pub mod designdb;
pub mod notificationdb;
pub mod offerdb;
pub mod paymentdb;
pub mod progressdb;
pub mod userdb;
