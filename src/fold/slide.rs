use std::sync::Arc;

use crate::animation::shading::{clamp_progress, frame_progress, seam_height};
use crate::fold::{FoldAlgorithm, FoldContext, Requirements};
use crate::foundation::error::{FoldError, FoldResult};
use crate::geometry::mesh::Mesh;
use crate::render::backend::{FrameRGB, TextureId};
use crate::render::passes::DrawPass;
use crate::render::shader::FoldUniforms;

const GAP_RGB: [u8; 3] = [0, 0, 0];

// Below this the seam gap is too thin to draw as triangles.
const MIN_GAP: f32 = 1e-4;

/// Edge the folded surface travels toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    /// Left edge pinned at -1, right edge slides inward.
    Left,
    /// Right edge pinned at +1, left edge slides inward.
    Right,
}

/// Outline of the folded surface at one progress value, in NDC.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideGeometry {
    pub left_x: f32,
    pub right_x: f32,
    pub seam_x: f32,
    /// Half-height of the seam; 1 at rest.
    pub seam_half_height: f32,
}

impl SlideGeometry {
    pub fn has_gap(&self) -> bool {
        self.seam_half_height < 1.0 - MIN_GAP
    }

    /// Left and right trapezoids, each mapped to its half of the source.
    pub fn trapezoids(&self) -> FoldResult<[Mesh; 2]> {
        let (lx, rx, sx, s) = (self.left_x, self.right_x, self.seam_x, self.seam_half_height);
        let left = Mesh::quad(
            [[lx, -1.0], [sx, -s], [sx, s], [lx, 1.0]],
            [[0.0, 1.0], [0.5, 1.0], [0.5, 0.0], [0.0, 0.0]],
        )?;
        let right = Mesh::quad(
            [[sx, -s], [rx, -1.0], [rx, 1.0], [sx, s]],
            [[0.5, 1.0], [1.0, 1.0], [1.0, 0.0], [0.5, 0.0]],
        )?;
        Ok([left, right])
    }

    /// Triangles filling the wedges above and below a shrunken seam.
    pub fn gap(&self) -> FoldResult<Mesh> {
        let (lx, rx, sx, s) = (self.left_x, self.right_x, self.seam_x, self.seam_half_height);
        Mesh::triangles(&[
            [lx, 1.0],
            [sx, s],
            [rx, 1.0],
            [lx, -1.0],
            [rx, -1.0],
            [sx, -s],
        ])
    }
}

/// Slide fold: the source is cut at a seam that travels from the center toward one edge,
/// squeezing the two halves into trapezoids. Single phase.
#[derive(Clone, Debug)]
pub struct SlideFold {
    direction: SlideDirection,
    min_seam_height: f64,
    discard_dark: bool,
    full: Arc<Mesh>,
}

impl SlideFold {
    pub fn new(
        direction: SlideDirection,
        min_seam_height: f64,
        discard_dark: bool,
    ) -> FoldResult<Self> {
        if !(0.0..=1.0).contains(&min_seam_height) {
            return Err(FoldError::validation(format!(
                "min_seam_height must be within [0, 1], got {min_seam_height}"
            )));
        }
        Ok(Self {
            direction,
            min_seam_height,
            discard_dark,
            full: Arc::new(Mesh::fullscreen()),
        })
    }

    pub fn direction(&self) -> SlideDirection {
        self.direction
    }

    /// Surface outline at clamped `progress`.
    pub fn geometry(&self, progress: f64) -> SlideGeometry {
        let p = clamp_progress(progress) as f32;
        let (left_x, right_x) = match self.direction {
            SlideDirection::Right => (-1.0 + 2.0 * p, 1.0),
            SlideDirection::Left => (-1.0, 1.0 - 2.0 * p),
        };
        SlideGeometry {
            left_x,
            right_x,
            seam_x: (left_x + right_x) * 0.5,
            seam_half_height: seam_height(p as f64, self.min_seam_height) as f32,
        }
    }

    fn frame_passes(
        &self,
        progress: f64,
        from_tex: TextureId,
        to_tex: TextureId,
    ) -> FoldResult<Vec<DrawPass>> {
        let geom = self.geometry(progress);
        let flap = FoldUniforms::flat().with_discard_dark(self.discard_dark);
        let [left, right] = geom.trapezoids()?;
        let mut passes = vec![
            DrawPass::background(self.full.clone(), to_tex),
            DrawPass::flap(Arc::new(left), from_tex, flap),
            DrawPass::flap(Arc::new(right), from_tex, flap),
        ];
        if geom.has_gap() {
            passes.push(DrawPass::fill(Arc::new(geom.gap()?), GAP_RGB));
        }
        Ok(passes)
    }
}

impl FoldAlgorithm for SlideFold {
    fn name(&self) -> &'static str {
        match self.direction {
            SlideDirection::Left => "slide-left",
            SlideDirection::Right => "slide-right",
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
            let passes = self.frame_passes(frame_progress(i, num_frames), from_tex, to_tex)?;
            frames.push(ctx.draw(passes)?);
        }
        Ok(frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fold/slide.rs"]
mod tests;
