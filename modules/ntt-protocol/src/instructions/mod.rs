pub mod admin;
pub mod redeem;
pub mod release_inbound;
pub mod release_outbound;
pub mod transfer;

pub use admin::*;
pub use redeem::*;
pub use release_inbound::*;
pub use release_outbound::*;
pub use transfer::*;
