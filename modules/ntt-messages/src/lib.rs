//! Wire formats shared by every Native Token Transfer deployment.
//!
//! All frames are big-endian and byte-for-byte identical across chains.
//! Encoding and decoding are pure: nothing here holds state or performs I/O.

pub mod chain_id;
pub mod errors;
pub mod layout;
pub mod ntt;
pub mod ntt_manager;
pub mod transceiver;
pub mod transceivers;
pub mod trimmed_amount;
pub mod universal_address;
