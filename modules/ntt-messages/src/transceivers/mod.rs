pub mod wormhole;
