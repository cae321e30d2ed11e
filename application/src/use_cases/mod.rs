//! Use cases for the application layer

pub mod relay_chat;
