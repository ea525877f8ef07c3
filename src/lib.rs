//! Pure Rust async client for the [Source RCON protocol](https://developer.valvesoftware.com/wiki/Source_RCON_Protocol).
pub mod auth;
pub mod client;
pub mod codec;
pub mod command;
pub mod connection;
pub mod error;
pub mod id;
pub mod notify;
pub mod packet;
pub mod reassembler;
