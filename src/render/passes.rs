use std::sync::Arc;

use crate::foundation::core::Resolution;
use crate::foundation::error::{FoldError, FoldResult};
use crate::geometry::mesh::Mesh;
use crate::render::backend::{FrameRGB, Readback, TextureId};
use crate::render::shader::FoldUniforms;

/// Role of a pass within a frame. Background passes must precede every other role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassRole {
    /// Full-frame image the flaps composite over.
    Background,
    /// Static, unrotated part of the source surface.
    Surface,
    /// Rotating flap.
    Flap,
    /// Untextured gap filler.
    Fill,
}

/// Color source for a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassSource {
    /// Sample a texture previously uploaded to the backend.
    Texture(TextureId),
    /// Constant RGB color.
    Solid([u8; 3]),
}

/// One draw call: a mesh, its color source and shader parameters.
#[derive(Clone, Debug)]
pub struct DrawPass {
    pub mesh: Arc<Mesh>,
    pub source: PassSource,
    pub uniforms: FoldUniforms,
    pub role: PassRole,
}

impl DrawPass {
    /// Full-frame (or partial) background drawn flat.
    pub fn background(mesh: Arc<Mesh>, texture: TextureId) -> Self {
        Self {
            mesh,
            source: PassSource::Texture(texture),
            uniforms: FoldUniforms::flat(),
            role: PassRole::Background,
        }
    }

    /// Textured, unrotated part of the surface.
    pub fn surface(mesh: Arc<Mesh>, texture: TextureId, uniforms: FoldUniforms) -> Self {
        Self {
            mesh,
            source: PassSource::Texture(texture),
            uniforms,
            role: PassRole::Surface,
        }
    }

    /// Textured flap rotating about a hinge.
    pub fn flap(mesh: Arc<Mesh>, texture: TextureId, uniforms: FoldUniforms) -> Self {
        Self {
            mesh,
            source: PassSource::Texture(texture),
            uniforms,
            role: PassRole::Flap,
        }
    }

    /// Solid-color fill.
    pub fn fill(mesh: Arc<Mesh>, rgb: [u8; 3]) -> Self {
        Self {
            mesh,
            source: PassSource::Solid(rgb),
            uniforms: FoldUniforms::flat(),
            role: PassRole::Fill,
        }
    }

    /// Replace the shader parameters.
    pub fn with_uniforms(mut self, uniforms: FoldUniforms) -> Self {
        self.uniforms = uniforms;
        self
    }
}

/// Ordered list of passes producing one frame.
#[derive(Clone, Debug)]
pub struct FramePlan {
    pub resolution: Resolution,
    pub passes: Vec<DrawPass>,
}

impl FramePlan {
    /// Reject plans that would draw a background over already-composited flaps.
    pub fn validate(&self) -> FoldResult<()> {
        self.resolution.validate()?;
        let mut seen_foreground = false;
        for (idx, pass) in self.passes.iter().enumerate() {
            match pass.role {
                PassRole::Background if seen_foreground => {
                    return Err(FoldError::render(format!(
                        "background pass {idx} scheduled after a foreground pass"
                    )));
                }
                PassRole::Background => {}
                _ => seen_foreground = true,
            }
        }
        Ok(())
    }
}

/// Low-level frame execution interface implemented by each backend.
pub trait PassBackend {
    /// Clear the color buffer for a new frame at `resolution`.
    fn begin_frame(&mut self, resolution: Resolution, clear_rgb: [u8; 3]) -> FoldResult<()>;

    /// Draw one pass over the current color buffer.
    fn exec_pass(&mut self, pass: &DrawPass) -> FoldResult<()>;

    /// Read the color buffer back to host memory.
    fn readback(&mut self) -> FoldResult<Readback>;
}

/// Run every pass of `plan` in order and return the finished frame, top row first.
pub fn execute_plan<B: PassBackend + ?Sized>(
    backend: &mut B,
    plan: &FramePlan,
    clear_rgb: [u8; 3],
) -> FoldResult<FrameRGB> {
    plan.validate()?;
    backend.begin_frame(plan.resolution, clear_rgb)?;
    for pass in &plan.passes {
        backend.exec_pass(pass)?;
    }
    let frame = backend.readback()?.into_frame()?;
    if frame.width != plan.resolution.width || frame.height != plan.resolution.height {
        return Err(FoldError::render(format!(
            "readback is {}x{}, expected {}",
            frame.width, frame.height, plan.resolution
        )));
    }
    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/render/passes.rs"]
mod tests;
