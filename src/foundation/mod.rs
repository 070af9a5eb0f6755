/// Core value types shared across the engine.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
/// Small numeric helpers.
pub mod math;
