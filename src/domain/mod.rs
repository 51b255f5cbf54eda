pub mod error;
pub mod id;
pub mod money;
pub mod notification;
pub mod payment;
