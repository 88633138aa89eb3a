pub mod health;
pub mod kafka;
