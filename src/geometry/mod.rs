/// Procedural meshes in normalized device space.
pub mod mesh;
/// Fold regions: flap bounds, seams and rotation signs.
pub mod region;
