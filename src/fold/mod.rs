//! Fold algorithm family.
//!
//! Each variant turns a `(from, to)` pair into frames by issuing draw passes through a
//! [`FoldContext`]. Dispatch is static through [`FoldVariant`].

use crate::foundation::core::Resolution;
use crate::foundation::error::{FoldError, FoldResult};
use crate::render::backend::{FrameRGB, RenderBackend, TextureId};
use crate::render::passes::{DrawPass, FramePlan};
use crate::transition::descriptor::{TransitionDescriptor, VariantId, VariantOptions};

/// Inward center fold (closing book).
pub mod center;
/// Opacity crossfade used as the fallback transition.
pub mod crossfade;
/// Four sequential quarter folds.
pub mod multi;
/// Single half-surface fold with a two-phase reveal.
pub mod single;
/// Trapezoid slide fold with a travelling seam.
pub mod slide;

pub use center::CenterFold;
pub use crossfade::Crossfade;
pub use multi::MultiQuadrantFold;
pub use single::SingleFold;
pub use slide::SlideFold;

/// What a variant needs from the caller and which options it honors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requirements {
    /// Produces a non-empty phase 2.
    pub two_phase: bool,
    /// Honors easing, lighting and multi-quadrant timing options.
    pub eased: bool,
    /// Honors `min_seam_height`.
    pub seam_shrink: bool,
    /// Honors `discard_dark`.
    pub discards_dark: bool,
}

/// Where rendered frames end up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    /// Frames stay in memory or are written as still images.
    Frames,
    /// Frames are encoded to a video file by `ffmpeg`.
    Video,
}

/// External tools present on this machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// `ffmpeg -version` runs.
    pub ffmpeg: bool,
}

impl Capabilities {
    /// Probe `PATH` for the tools a render may need.
    pub fn probe() -> Self {
        Self {
            ffmpeg: crate::encode::ffmpeg::is_ffmpeg_on_path(),
        }
    }
}

impl Requirements {
    /// Option names that differ from their defaults but that this variant never reads.
    pub fn ignored_options(&self, opts: &VariantOptions) -> Vec<&'static str> {
        let d = VariantOptions::default();
        let mut ignored = Vec::new();
        if !self.eased {
            let unread = [
                ("ease", opts.ease != d.ease),
                ("lighting", opts.lighting != d.lighting),
                ("lighting_strength", opts.lighting_strength != d.lighting_strength),
                ("min_frames_per_fold", opts.min_frames_per_fold != d.min_frames_per_fold),
                ("fold_divisor", opts.fold_divisor != d.fold_divisor),
                ("pause_divisor", opts.pause_divisor != d.pause_divisor),
            ];
            ignored.extend(unread.into_iter().filter(|(_, set)| *set).map(|(name, _)| name));
        }
        if !self.seam_shrink && opts.min_seam_height != d.min_seam_height {
            ignored.push("min_seam_height");
        }
        if !self.discards_dark && opts.discard_dark {
            ignored.push("discard_dark");
        }
        ignored
    }

    /// Fail early when `output` needs a tool `caps` does not have.
    ///
    /// Every variant renders on any backend; only video output depends on `ffmpeg`.
    pub fn check(&self, output: OutputKind, caps: &Capabilities) -> FoldResult<()> {
        if output == OutputKind::Video && !caps.ffmpeg {
            return Err(FoldError::encode(
                "video output needs 'ffmpeg' on PATH; render frames instead or install ffmpeg",
            ));
        }
        Ok(())
    }
}

/// Per-render state handed to every fold routine: the backend plus resident source textures.
pub struct FoldContext<'a> {
    backend: &'a mut dyn RenderBackend,
    resolution: Resolution,
    from: TextureId,
    to: TextureId,
}

impl<'a> FoldContext<'a> {
    /// Upload both source images. They must share a resolution.
    pub fn new(
        backend: &'a mut dyn RenderBackend,
        from: &FrameRGB,
        to: &FrameRGB,
    ) -> FoldResult<Self> {
        if from.resolution() != to.resolution() {
            return Err(FoldError::validation(format!(
                "from image is {} but to image is {}",
                from.resolution(),
                to.resolution()
            )));
        }
        let from_id = backend.upload_texture(from)?;
        let to_id = match backend.upload_texture(to) {
            Ok(id) => id,
            Err(e) => {
                let _ = backend.release_texture(from_id);
                return Err(e);
            }
        };
        tracing::debug!(backend = backend.name(), "source textures uploaded");
        Ok(Self {
            backend,
            resolution: from.resolution(),
            from: from_id,
            to: to_id,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn from_texture(&self) -> TextureId {
        self.from
    }

    pub fn to_texture(&self) -> TextureId {
        self.to
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Upload a scratch image; the caller must [`FoldContext::release`] it.
    pub fn upload(&mut self, image: &FrameRGB) -> FoldResult<TextureId> {
        if image.resolution() != self.resolution {
            return Err(FoldError::validation(format!(
                "scratch image is {} but transition renders at {}",
                image.resolution(),
                self.resolution
            )));
        }
        self.backend.upload_texture(image)
    }

    pub fn release(&mut self, id: TextureId) -> FoldResult<()> {
        self.backend.release_texture(id)
    }

    /// Run `f` with `image` resident, releasing it whether or not `f` succeeds.
    pub fn with_texture<T>(
        &mut self,
        image: &FrameRGB,
        f: impl FnOnce(&mut Self, TextureId) -> FoldResult<T>,
    ) -> FoldResult<T> {
        let id = self.upload(image)?;
        let out = f(self, id);
        let released = self.release(id);
        let out = out?;
        released?;
        Ok(out)
    }

    /// Render one frame from `passes`, in order.
    pub fn draw(&mut self, passes: Vec<DrawPass>) -> FoldResult<FrameRGB> {
        let plan = FramePlan {
            resolution: self.resolution,
            passes,
        };
        self.backend.render_frame(&plan)
    }

    /// Release the source textures.
    pub fn finish(self) -> FoldResult<()> {
        self.backend.release_texture(self.from)?;
        self.backend.release_texture(self.to)?;
        Ok(())
    }
}

/// Shared contract of every fold variant.
pub trait FoldAlgorithm {
    /// Stable variant name.
    fn name(&self) -> &'static str;

    fn requirements(&self) -> Requirements;

    /// Fold the source away over `num_frames` frames.
    fn render_phase1(
        &self,
        ctx: &mut FoldContext<'_>,
        from: &FrameRGB,
        to: &FrameRGB,
        num_frames: usize,
    ) -> FoldResult<Vec<FrameRGB>>;

    /// Unfold the destination into place. Single-phase variants return no frames.
    fn render_phase2(
        &self,
        _ctx: &mut FoldContext<'_>,
        _from: &FrameRGB,
        _to: &FrameRGB,
        _num_frames: usize,
    ) -> FoldResult<Vec<FrameRGB>> {
        Ok(Vec::new())
    }

    /// Frames `render_phase1` emits for a budget of `num_frames`.
    fn phase1_output_len(&self, num_frames: usize) -> usize {
        num_frames
    }
}

/// Statically dispatched fold variant.
#[derive(Clone, Debug)]
pub enum FoldVariant {
    Single(SingleFold),
    Center(CenterFold),
    Slide(SlideFold),
    Multi(MultiQuadrantFold),
    Crossfade(Crossfade),
}

impl FoldVariant {
    /// Build the variant named by `desc`, with its options applied.
    pub fn from_descriptor(desc: &TransitionDescriptor) -> FoldResult<Self> {
        use center::CenterAxis;
        use multi::MultiDirection;
        use single::FoldEdge;
        use slide::SlideDirection;

        let o = &desc.options;
        Ok(match desc.variant {
            VariantId::Left => Self::Single(SingleFold::new(FoldEdge::Left, o.mesh_segments)?),
            VariantId::Right => Self::Single(SingleFold::new(FoldEdge::Right, o.mesh_segments)?),
            VariantId::Up => Self::Single(SingleFold::new(FoldEdge::Top, o.mesh_segments)?),
            VariantId::Down => Self::Single(SingleFold::new(FoldEdge::Bottom, o.mesh_segments)?),
            VariantId::CenterHorizontal => Self::Center(CenterFold::new(
                CenterAxis::Horizontal,
                o.mesh_segments,
                o.min_seam_height,
                o.discard_dark,
            )?),
            VariantId::CenterVertical => Self::Center(CenterFold::new(
                CenterAxis::Vertical,
                o.mesh_segments,
                o.min_seam_height,
                o.discard_dark,
            )?),
            VariantId::SlideLeft => Self::Slide(SlideFold::new(
                SlideDirection::Left,
                o.min_seam_height,
                o.discard_dark,
            )?),
            VariantId::SlideRight => Self::Slide(SlideFold::new(
                SlideDirection::Right,
                o.min_seam_height,
                o.discard_dark,
            )?),
            VariantId::MultiLeft => {
                Self::Multi(MultiQuadrantFold::new(MultiDirection::Left, o)?)
            }
            VariantId::MultiRight => {
                Self::Multi(MultiQuadrantFold::new(MultiDirection::Right, o)?)
            }
            VariantId::Crossfade => Self::Crossfade(Crossfade::new()),
        })
    }
}

impl FoldAlgorithm for FoldVariant {
    fn name(&self) -> &'static str {
        match self {
            Self::Single(f) => f.name(),
            Self::Center(f) => f.name(),
            Self::Slide(f) => f.name(),
            Self::Multi(f) => f.name(),
            Self::Crossfade(f) => f.name(),
        }
    }

    fn requirements(&self) -> Requirements {
        match self {
            Self::Single(f) => f.requirements(),
            Self::Center(f) => f.requirements(),
            Self::Slide(f) => f.requirements(),
            Self::Multi(f) => f.requirements(),
            Self::Crossfade(f) => f.requirements(),
        }
    }

    fn render_phase1(
        &self,
        ctx: &mut FoldContext<'_>,
        from: &FrameRGB,
        to: &FrameRGB,
        num_frames: usize,
    ) -> FoldResult<Vec<FrameRGB>> {
        match self {
            Self::Single(f) => f.render_phase1(ctx, from, to, num_frames),
            Self::Center(f) => f.render_phase1(ctx, from, to, num_frames),
            Self::Slide(f) => f.render_phase1(ctx, from, to, num_frames),
            Self::Multi(f) => f.render_phase1(ctx, from, to, num_frames),
            Self::Crossfade(f) => f.render_phase1(ctx, from, to, num_frames),
        }
    }

    fn render_phase2(
        &self,
        ctx: &mut FoldContext<'_>,
        from: &FrameRGB,
        to: &FrameRGB,
        num_frames: usize,
    ) -> FoldResult<Vec<FrameRGB>> {
        match self {
            Self::Single(f) => f.render_phase2(ctx, from, to, num_frames),
            Self::Center(f) => f.render_phase2(ctx, from, to, num_frames),
            Self::Slide(f) => f.render_phase2(ctx, from, to, num_frames),
            Self::Multi(f) => f.render_phase2(ctx, from, to, num_frames),
            Self::Crossfade(f) => f.render_phase2(ctx, from, to, num_frames),
        }
    }

    fn phase1_output_len(&self, num_frames: usize) -> usize {
        match self {
            Self::Multi(f) => f.phase1_output_len(num_frames),
            _ => num_frames,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fold/mod.rs"]
mod tests;
