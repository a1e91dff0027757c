// src/acquisition/mod.rs
//! Sample retention components

pub mod history_buffer;

pub use history_buffer::*;
