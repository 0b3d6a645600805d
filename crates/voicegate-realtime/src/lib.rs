mod client;

pub mod types;

pub use client::{Client, Config, ServerRx, connect, connect_with_config};
