use std::sync::Arc;

use crate::animation::shading::{QUARTER_TURN, fold_angle, frame_progress, seam_height};
use crate::fold::{FoldAlgorithm, FoldContext, Requirements};
use crate::foundation::core::Axis;
use crate::foundation::error::{FoldError, FoldResult};
use crate::geometry::mesh::Mesh;
use crate::geometry::region::FoldRegion;
use crate::render::backend::{FrameRGB, TextureId};
use crate::render::passes::DrawPass;
use crate::render::shader::FoldUniforms;

/// Depth the closing flaps sink to at full progress.
pub const MAX_PUSH: f32 = 0.5;

/// Orientation of the center seam.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CenterAxis {
    /// Vertical seam; left and right halves close toward each other.
    Horizontal,
    /// Horizontal seam; top and bottom halves close toward each other.
    Vertical,
}

/// Closing-book fold: both halves swing away from the viewer about the center line while the
/// seam shrinks toward `min_seam_height`. Single phase; the transition ends closed.
#[derive(Clone, Debug)]
pub struct CenterFold {
    axis: CenterAxis,
    flaps: [(FoldRegion, Arc<Mesh>); 2],
    full: Arc<Mesh>,
    min_seam_height: f64,
    discard_dark: bool,
}

impl CenterFold {
    pub fn new(
        axis: CenterAxis,
        segments: u32,
        min_seam_height: f64,
        discard_dark: bool,
    ) -> FoldResult<Self> {
        if !(0.0..=1.0).contains(&min_seam_height) {
            return Err(FoldError::validation(format!(
                "min_seam_height must be within [0, 1], got {min_seam_height}"
            )));
        }
        let fold_axis = match axis {
            CenterAxis::Horizontal => Axis::X,
            CenterAxis::Vertical => Axis::Y,
        };
        let low = FoldRegion::new(fold_axis, -1.0, 0.0, 0.0)?;
        let high = FoldRegion::new(fold_axis, 0.0, 1.0, 0.0)?;
        Ok(Self {
            axis,
            flaps: [
                (low, Arc::new(low.mesh(segments)?)),
                (high, Arc::new(high.mesh(segments)?)),
            ],
            full: Arc::new(Mesh::fullscreen()),
            min_seam_height,
            discard_dark,
        })
    }

    pub fn axis(&self) -> CenterAxis {
        self.axis
    }

    /// Seam height fraction drawn at `progress`.
    pub fn seam_height_at(&self, progress: f64) -> f64 {
        seam_height(progress, self.min_seam_height)
    }

    fn frame_passes(&self, progress: f64, from_tex: TextureId, to_tex: TextureId) -> Vec<DrawPass> {
        let angle = fold_angle(progress, QUARTER_TURN) as f32;
        let seam_scale = self.seam_height_at(progress) as f32;
        let mut passes = Vec::with_capacity(3);
        passes.push(DrawPass::background(self.full.clone(), to_tex));
        for (region, mesh) in &self.flaps {
            let mut hinge = region.hinge(angle, false);
            hinge.seam_scale = seam_scale;
            hinge.push = progress as f32 * MAX_PUSH;
            passes.push(DrawPass::flap(
                mesh.clone(),
                from_tex,
                FoldUniforms::hinged(hinge).with_discard_dark(self.discard_dark),
            ));
        }
        passes
    }
}

impl FoldAlgorithm for CenterFold {
    fn name(&self) -> &'static str {
        match self.axis {
            CenterAxis::Horizontal => "center-horizontal",
            CenterAxis::Vertical => "center-vertical",
        }
    }

    fn requirements(&self) -> Requirements {
        Requirements {
            two_phase: false,
            eased: false,
            seam_shrink: true,
            discards_dark: true,
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
            let passes = self.frame_passes(frame_progress(i, num_frames), from_tex, to_tex);
            frames.push(ctx.draw(passes)?);
        }
        Ok(frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fold/center.rs"]
mod tests;
