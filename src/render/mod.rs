/// Frame buffers, backend traits and backend selection.
pub mod backend;
/// Software rasterizer backend.
pub mod cpu;
/// `wgpu` offscreen backend.
#[cfg(feature = "gpu")]
pub mod gpu;
/// Draw passes and frame plans.
pub mod passes;
/// Vertex/fragment stages and the WGSL program.
pub mod shader;
