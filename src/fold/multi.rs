use std::sync::Arc;

use crate::animation::ease::Ease;
use crate::animation::shading::{
    HALF_TURN, QUARTER_TURN, fold_angle, frame_progress_inclusive, lighting_factor,
};
use crate::fold::{FoldAlgorithm, FoldContext, Requirements};
use crate::foundation::core::Axis;
use crate::foundation::error::{FoldError, FoldResult};
use crate::geometry::mesh::Mesh;
use crate::geometry::region::FoldRegion;
use crate::render::backend::{FrameRGB, TextureId};
use crate::render::passes::DrawPass;
use crate::render::shader::FoldUniforms;
use crate::transition::descriptor::VariantOptions;

/// Order in which the quarters fold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MultiDirection {
    /// Rightmost quarter first; the stack ends against the left edge.
    Left,
    /// Leftmost quarter first; the stack ends against the right edge.
    Right,
}

/// One vertical quarter of the surface and how far it swings.
#[derive(Clone, Debug)]
pub struct Quarter {
    pub region: FoldRegion,
    /// Total rotation in radians.
    pub sweep: f64,
    mesh: Arc<Mesh>,
    reveal: Arc<Mesh>,
}

impl Quarter {
    fn new(lo: f32, hi: f32, seam: f32, sweep: f64, segments: u32) -> FoldResult<Self> {
        let region = FoldRegion::new(Axis::X, lo, hi, seam)?;
        Ok(Self {
            region,
            sweep,
            mesh: Arc::new(region.mesh(segments)?),
            reveal: Arc::new(Mesh::rect(lo, -1.0, hi, 1.0)?),
        })
    }
}

/// Frame budget of a multi-quadrant fold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultiTiming {
    /// Frames per quarter fold.
    pub per_fold: usize,
    /// Static frames between consecutive folds.
    pub pause: usize,
}

impl MultiTiming {
    /// Frames emitted: four folds and the three pauses between them.
    pub fn total_frames(&self) -> usize {
        4 * self.per_fold + 3 * self.pause
    }
}

/// Four chained quarter folds.
///
/// The first three quarters flip over onto their neighbour about the shared boundary, carrying
/// the stack along; the last one closes like a book against the outer edge. Each fold starts
/// from the previous fold's final frame, and `to` is revealed beneath every quarter that has
/// left.
#[derive(Clone, Debug)]
pub struct MultiQuadrantFold {
    direction: MultiDirection,
    quarters: Vec<Quarter>,
    full: Arc<Mesh>,
    ease: Ease,
    lighting: bool,
    lighting_strength: f64,
    min_frames_per_fold: usize,
    fold_divisor: usize,
    pause_divisor: usize,
}

impl MultiQuadrantFold {
    pub fn new(direction: MultiDirection, options: &VariantOptions) -> FoldResult<Self> {
        if options.fold_divisor == 0 || options.pause_divisor == 0 {
            return Err(FoldError::validation(
                "fold_divisor and pause_divisor must be at least 1",
            ));
        }
        let n = options.mesh_segments;
        let quarters = match direction {
            MultiDirection::Left => vec![
                Quarter::new(0.5, 1.0, 0.5, HALF_TURN, n)?,
                Quarter::new(0.0, 0.5, 0.0, HALF_TURN, n)?,
                Quarter::new(-0.5, 0.0, -0.5, HALF_TURN, n)?,
                Quarter::new(-1.0, -0.5, -1.0, QUARTER_TURN, n)?,
            ],
            MultiDirection::Right => vec![
                Quarter::new(-1.0, -0.5, -0.5, HALF_TURN, n)?,
                Quarter::new(-0.5, 0.0, 0.0, HALF_TURN, n)?,
                Quarter::new(0.0, 0.5, 0.5, HALF_TURN, n)?,
                Quarter::new(0.5, 1.0, 1.0, QUARTER_TURN, n)?,
            ],
        };
        Ok(Self {
            direction,
            quarters,
            full: Arc::new(Mesh::fullscreen()),
            ease: options.ease,
            lighting: options.lighting,
            lighting_strength: options.lighting_strength,
            min_frames_per_fold: options.min_frames_per_fold,
            fold_divisor: options.fold_divisor,
            pause_divisor: options.pause_divisor,
        })
    }

    pub fn direction(&self) -> MultiDirection {
        self.direction
    }

    /// Quarters in folding order.
    pub fn quarters(&self) -> &[Quarter] {
        &self.quarters
    }

    /// Split a budget of `num_frames` into per-fold and pause lengths.
    pub fn timing(&self, num_frames: usize) -> MultiTiming {
        MultiTiming {
            per_fold: self
                .min_frames_per_fold
                .max(num_frames / self.fold_divisor)
                .max(1),
            pause: (num_frames / self.pause_divisor).max(1),
        }
    }

    /// Brightness multiplier for a flap rotated by `angle`.
    pub fn shade(&self, angle: f64) -> f32 {
        if self.lighting {
            lighting_factor(angle, self.lighting_strength) as f32
        } else {
            1.0
        }
    }

    fn fold_quarter(
        &self,
        ctx: &mut FoldContext<'_>,
        quarter: &Quarter,
        background: TextureId,
        per_fold: usize,
        frames: &mut Vec<FrameRGB>,
    ) -> FoldResult<()> {
        let to_tex = ctx.to_texture();
        for i in 0..per_fold {
            let progress = self.ease.apply(frame_progress_inclusive(i, per_fold));
            let angle = fold_angle(progress, quarter.sweep);
            let flap = FoldUniforms::hinged(quarter.region.hinge(angle as f32, true))
                .with_shade(self.shade(angle));
            let passes = vec![
                DrawPass::background(self.full.clone(), background),
                DrawPass::surface(quarter.reveal.clone(), to_tex, FoldUniforms::flat()),
                DrawPass::flap(quarter.mesh.clone(), background, flap),
            ];
            frames.push(ctx.draw(passes)?);
        }
        Ok(())
    }

    fn fold_all(
        &self,
        ctx: &mut FoldContext<'_>,
        timing: MultiTiming,
        carried: &mut Option<TextureId>,
    ) -> FoldResult<Vec<FrameRGB>> {
        let mut frames: Vec<FrameRGB> = Vec::with_capacity(timing.total_frames());
        let mut background = ctx.from_texture();
        for (k, quarter) in self.quarters.iter().enumerate() {
            if k > 0 {
                let last = frames
                    .last()
                    .cloned()
                    .ok_or_else(|| FoldError::render("no frame to carry into the next fold"))?;
                frames.extend(std::iter::repeat_n(last.clone(), timing.pause));
                let next = ctx.upload(&last)?;
                if let Some(old) = carried.replace(next) {
                    ctx.release(old)?;
                }
                background = next;
            }
            tracing::trace!(quarter = k, seam = quarter.region.seam, "folding quarter");
            self.fold_quarter(ctx, quarter, background, timing.per_fold, &mut frames)?;
        }
        Ok(frames)
    }
}

impl FoldAlgorithm for MultiQuadrantFold {
    fn name(&self) -> &'static str {
        match self.direction {
            MultiDirection::Left => "multi-left",
            MultiDirection::Right => "multi-right",
        }
    }

    fn requirements(&self) -> Requirements {
        Requirements {
            two_phase: false,
            eased: true,
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
        let timing = self.timing(num_frames);
        tracing::debug!(
            per_fold = timing.per_fold,
            pause = timing.pause,
            total = timing.total_frames(),
            "multi-quadrant timing"
        );
        let mut carried = None;
        let result = self.fold_all(ctx, timing, &mut carried);
        let released = match carried {
            Some(id) => ctx.release(id),
            None => Ok(()),
        };
        let frames = result?;
        released?;
        Ok(frames)
    }

    fn phase1_output_len(&self, num_frames: usize) -> usize {
        self.timing(num_frames).total_frames()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fold/multi.rs"]
mod tests;
