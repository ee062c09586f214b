//! The Native Token Transfer protocol above the wire format.
//!
//! [`ntt::Ntt`] is the contract every chain adapter satisfies. The state
//! machines it relies on (rate limiting, the inbound and outbound queues,
//! peer configuration) live in [`queue`], [`state`] and [`instructions`]
//! and are free of I/O: they take the current time as an argument.
//! [`memory::MemoryNtt`] wires them into a complete in-process adapter.

pub mod capability;
pub mod clock;
pub mod config;
pub mod error;
pub mod instructions;
pub mod memory;
pub mod ntt;
pub mod peer;
pub mod queue;
pub mod registry;
pub mod state;
pub mod transaction;

pub use error::{NttError, Result};
