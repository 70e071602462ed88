//! Outbound adapters: persistence, mail, push, and the notification queue.

pub mod mail;
pub mod persistence;
pub mod push;
pub mod queue;
