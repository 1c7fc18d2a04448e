#![doc = include_str!("../README.md")]
pub mod error;
pub mod grammar;
pub mod host;
pub mod logging;
pub mod sink;
pub mod text;
