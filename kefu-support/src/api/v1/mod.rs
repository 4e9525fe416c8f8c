pub mod chat_log;
pub mod group;
pub mod health;
