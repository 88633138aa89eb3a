pub mod health;
pub mod notification;
pub mod request;
pub mod response;
pub mod user;
