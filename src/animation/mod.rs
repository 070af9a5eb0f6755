/// Easing curves applied to per-flap progress.
pub mod ease;
/// Progress clamping, fold angles and synthetic lighting.
pub mod shading;
