use std::sync::Arc;

use crate::animation::shading::{QUARTER_TURN, fold_angle, frame_progress};
use crate::fold::{FoldAlgorithm, FoldContext, Requirements};
use crate::foundation::core::Axis;
use crate::foundation::error::{FoldError, FoldResult};
use crate::foundation::math::pixel_center_ndc;
use crate::geometry::mesh::Mesh;
use crate::geometry::region::FoldRegion;
use crate::render::backend::FrameRGB;
use crate::render::passes::DrawPass;
use crate::render::shader::FoldUniforms;

/// Eye-space offset keeping the destination background behind the folding surface.
pub const BACKGROUND_Z_OFFSET: f32 = -0.1;

/// Half of the source that folds away in phase 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoldEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl FoldEdge {
    fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::X,
            Self::Top | Self::Bottom => Axis::Y,
        }
    }

    // In NDC, "top" is +y.
    fn folds_low_half(self) -> bool {
        matches!(self, Self::Left | Self::Bottom)
    }
}

/// Two-phase single fold.
///
/// Phase 1 swings one half of `from` about the center seam toward the viewer, revealing `to`.
/// Phase 2 unfolds the other half of `to` from edge-on down over the remaining half of `from`.
#[derive(Clone, Debug)]
pub struct SingleFold {
    edge: FoldEdge,
    flap: FoldRegion,
    rest: FoldRegion,
    flap_mesh: Arc<Mesh>,
    rest_mesh: Arc<Mesh>,
    full: Arc<Mesh>,
}

impl SingleFold {
    pub fn new(edge: FoldEdge, segments: u32) -> FoldResult<Self> {
        let axis = edge.axis();
        let low = FoldRegion::new(axis, -1.0, 0.0, 0.0)?;
        let high = FoldRegion::new(axis, 0.0, 1.0, 0.0)?;
        let (flap, rest) = if edge.folds_low_half() {
            (low, high)
        } else {
            (high, low)
        };
        Ok(Self {
            edge,
            flap,
            rest,
            flap_mesh: Arc::new(flap.mesh(segments)?),
            rest_mesh: Arc::new(rest.mesh(segments)?),
            full: Arc::new(Mesh::fullscreen()),
        })
    }

    pub fn edge(&self) -> FoldEdge {
        self.edge
    }
}

impl FoldAlgorithm for SingleFold {
    fn name(&self) -> &'static str {
        match self.edge {
            FoldEdge::Left => "left",
            FoldEdge::Right => "right",
            FoldEdge::Top => "up",
            FoldEdge::Bottom => "down",
        }
    }

    fn requirements(&self) -> Requirements {
        Requirements {
            two_phase: true,
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
            let angle = fold_angle(frame_progress(i, num_frames), QUARTER_TURN) as f32;
            let passes = vec![
                DrawPass::background(self.full.clone(), to_tex)
                    .with_uniforms(FoldUniforms::flat().with_z_offset(BACKGROUND_Z_OFFSET)),
                DrawPass::surface(self.rest_mesh.clone(), from_tex, FoldUniforms::flat()),
                DrawPass::flap(
                    self.flap_mesh.clone(),
                    from_tex,
                    FoldUniforms::hinged(self.flap.hinge(angle, true)),
                ),
            ];
            frames.push(ctx.draw(passes)?);
        }
        Ok(frames)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(variant = self.name(), num_frames = num_frames))]
    fn render_phase2(
        &self,
        ctx: &mut FoldContext<'_>,
        from: &FrameRGB,
        to: &FrameRGB,
        num_frames: usize,
    ) -> FoldResult<Vec<FrameRGB>> {
        if num_frames == 0 {
            return Ok(Vec::new());
        }
        let composite = compose_halves(from, to, &self.flap)?;
        let to_tex = ctx.to_texture();
        ctx.with_texture(&composite, |ctx, composite_tex| {
            let mut frames = Vec::with_capacity(num_frames);
            for i in 0..num_frames {
                // Starts near edge-on and settles almost flat.
                let angle = fold_angle(1.0 - frame_progress(i, num_frames), QUARTER_TURN) as f32;
                let passes = vec![
                    DrawPass::background(self.full.clone(), composite_tex),
                    DrawPass::flap(
                        self.rest_mesh.clone(),
                        to_tex,
                        FoldUniforms::hinged(self.rest.hinge(angle, true)),
                    ),
                ];
                frames.push(ctx.draw(passes)?);
            }
            Ok(frames)
        })
    }
}

/// Frame showing `to` inside `region` and `from` everywhere else.
pub fn compose_halves(from: &FrameRGB, to: &FrameRGB, region: &FoldRegion) -> FoldResult<FrameRGB> {
    if from.resolution() != to.resolution() {
        return Err(FoldError::validation("compose_halves needs same-size images"));
    }
    let (w, h) = (from.width, from.height);
    let mut data = from.data.clone();
    for row in 0..h {
        // Row 0 is the top of the image, i.e. +y in NDC.
        let y = -pixel_center_ndc(row, h);
        for col in 0..w {
            let x = pixel_center_ndc(col, w);
            let (along, _) = region.axis.split(x, y);
            if along >= region.lo && along <= region.hi {
                let i = ((row as usize) * (w as usize) + col as usize) * 3;
                data[i..i + 3].copy_from_slice(&to.data[i..i + 3]);
            }
        }
    }
    FrameRGB::new(w, h, data)
}

#[cfg(test)]
#[path = "../../tests/unit/fold/single.rs"]
mod tests;
