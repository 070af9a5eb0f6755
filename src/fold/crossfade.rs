use std::sync::Arc;

use crate::animation::shading::frame_progress_inclusive;
use crate::fold::{FoldAlgorithm, FoldContext, Requirements};
use crate::foundation::error::FoldResult;
use crate::geometry::mesh::Mesh;
use crate::render::backend::FrameRGB;
use crate::render::passes::DrawPass;
use crate::render::shader::FoldUniforms;

/// Plain opacity blend from `from` to `to`, substituted when a fold cannot render.
#[derive(Clone, Debug)]
pub struct Crossfade {
    full: Arc<Mesh>,
}

impl Crossfade {
    pub fn new() -> Self {
        Self {
            full: Arc::new(Mesh::fullscreen()),
        }
    }
}

impl Default for Crossfade {
    fn default() -> Self {
        Self::new()
    }
}

impl FoldAlgorithm for Crossfade {
    fn name(&self) -> &'static str {
        "crossfade"
    }

    fn requirements(&self) -> Requirements {
        Requirements {
            two_phase: false,
            eased: false,
            seam_shrink: false,
            discards_dark: false,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(variant = self.name(), num_frames = num_frames))]
    fn render_phase1(
        &self,
        ctx: &mut FoldContext<'_>,
        _from: &FrameRGB,
        _to: &FrameRGB,
        num_frames: usize,
    ) -> FoldResult<Vec<FrameRGB>> {
        let (from_tex, to_tex) = (ctx.from_texture(), ctx.to_texture());
        let mut frames = Vec::with_capacity(num_frames);
        for i in 0..num_frames {
            let alpha = frame_progress_inclusive(i, num_frames) as f32;
            let passes = vec![
                DrawPass::background(self.full.clone(), from_tex),
                DrawPass::surface(
                    self.full.clone(),
                    to_tex,
                    FoldUniforms::flat().with_opacity(alpha),
                ),
            ];
            frames.push(ctx.draw(passes)?);
        }
        Ok(frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fold/crossfade.rs"]
mod tests;
