pub mod bidmodel;
pub mod designmodel;
pub mod notificationmodel;
pub mod offermodel;
pub mod paymentmodel;
pub mod progressmodel;
pub mod usermodel;
