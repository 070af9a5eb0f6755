use std::path::Path;

use anyhow::Context;

use crate::animation::ease::Ease;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{FoldError, FoldResult};
use crate::geometry::mesh::DEFAULT_SEGMENTS;

/// Transition style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VariantId {
    /// Left half folds away, then the right half of `to` unfolds.
    Left,
    /// Right half folds away, then the left half of `to` unfolds.
    Right,
    /// Top half folds away, then the bottom half of `to` unfolds.
    Up,
    /// Bottom half folds away, then the top half of `to` unfolds.
    Down,
    /// Left and right flaps close about the vertical center line.
    CenterHorizontal,
    /// Top and bottom flaps close about the horizontal center line.
    CenterVertical,
    /// Seam travels to the left edge.
    SlideLeft,
    /// Seam travels to the right edge.
    SlideRight,
    /// Quarters fold in sequence toward the left edge.
    MultiLeft,
    /// Quarters fold in sequence toward the right edge.
    MultiRight,
    /// Opacity blend; also the fallback when a fold fails.
    Crossfade,
}

impl VariantId {
    /// Every variant, in listing order.
    pub const ALL: [VariantId; 11] = [
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::CenterHorizontal,
        Self::CenterVertical,
        Self::SlideLeft,
        Self::SlideRight,
        Self::MultiLeft,
        Self::MultiRight,
        Self::Crossfade,
    ];

    /// Canonical kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::CenterHorizontal => "center-horizontal",
            Self::CenterVertical => "center-vertical",
            Self::SlideLeft => "slide-left",
            Self::SlideRight => "slide-right",
            Self::MultiLeft => "multi-left",
            Self::MultiRight => "multi-right",
            Self::Crossfade => "crossfade",
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Self::Left => "left half folds toward the viewer, then the right half of the next image unfolds",
            Self::Right => "right half folds toward the viewer, then the left half of the next image unfolds",
            Self::Up => "top half folds toward the viewer, then the bottom half of the next image unfolds",
            Self::Down => "bottom half folds toward the viewer, then the top half of the next image unfolds",
            Self::CenterHorizontal => "left and right halves close inward like a book",
            Self::CenterVertical => "top and bottom halves close inward",
            Self::SlideLeft => "seam slides toward the left edge, squeezing the image into trapezoids",
            Self::SlideRight => "seam slides toward the right edge, squeezing the image into trapezoids",
            Self::MultiLeft => "four quarters fold one after another toward the left edge",
            Self::MultiRight => "four quarters fold one after another toward the right edge",
            Self::Crossfade => "plain opacity blend",
        }
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for VariantId {
    type Err = FoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = s.trim().to_ascii_lowercase().replace('_', "-");
        if kind.is_empty() {
            return Err(FoldError::validation("variant must be non-empty"));
        }
        match kind.as_str() {
            "left" | "left-fold" | "left-single-fold" => Ok(Self::Left),
            "right" | "right-fold" | "right-single-fold" => Ok(Self::Right),
            "up" | "up-fold" | "top" => Ok(Self::Up),
            "down" | "down-fold" | "bottom" => Ok(Self::Down),
            "center-horizontal" | "centerhoriz" | "center-fold-horizontal" => {
                Ok(Self::CenterHorizontal)
            }
            "center-vertical" | "centervert" | "center-fold-vertical" => Ok(Self::CenterVertical),
            "slide-left" | "slideleft" | "slide-fold-left" => Ok(Self::SlideLeft),
            "slide-right" | "slideright" | "slide-fold-right" => Ok(Self::SlideRight),
            "multi-left" | "multileft" | "multi-quadrant-left" => Ok(Self::MultiLeft),
            "multi-right" | "multiright" | "multi-quadrant-right" => Ok(Self::MultiRight),
            "crossfade" | "fade" => Ok(Self::Crossfade),
            other => Err(FoldError::validation(format!("unknown variant '{other}'"))),
        }
    }
}

impl TryFrom<String> for VariantId {
    type Error = FoldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VariantId> for String {
    fn from(value: VariantId) -> Self {
        value.name().to_string()
    }
}

/// Per-variant knobs. Variants ignore options their [`Requirements`] do not list.
///
/// [`Requirements`]: crate::fold::Requirements
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VariantOptions {
    /// Easing applied to each multi-quadrant fold.
    pub ease: Ease,
    /// Darken flaps as they turn edge-on (multi-quadrant).
    pub lighting: bool,
    /// Maximum darkening, in `[0, 1]`.
    pub lighting_strength: f64,
    /// Floor for the shrinking seam of center and slide folds, in `[0, 1]`.
    pub min_seam_height: f64,
    /// Drop near-black source pixels in center and slide folds.
    pub discard_dark: bool,
    /// Grid subdivisions per flap.
    pub mesh_segments: u32,
    /// Lower bound on frames per multi-quadrant fold.
    pub min_frames_per_fold: usize,
    /// Budget divisor for multi-quadrant fold length.
    pub fold_divisor: usize,
    /// Budget divisor for multi-quadrant pause length.
    pub pause_divisor: usize,
}

impl Default for VariantOptions {
    fn default() -> Self {
        Self {
            ease: Ease::Quad,
            lighting: true,
            lighting_strength: 0.6,
            min_seam_height: 0.75,
            discard_dark: false,
            mesh_segments: DEFAULT_SEGMENTS,
            min_frames_per_fold: 15,
            fold_divisor: 4,
            pause_divisor: 20,
        }
    }
}

impl VariantOptions {
    /// Range-check every option. `mesh_segments` is left to mesh generation.
    pub fn validate(&self) -> FoldResult<()> {
        if !(0.0..=1.0).contains(&self.lighting_strength) {
            return Err(FoldError::validation(format!(
                "lighting_strength must be within [0, 1], got {}",
                self.lighting_strength
            )));
        }
        if !(0.0..=1.0).contains(&self.min_seam_height) {
            return Err(FoldError::validation(format!(
                "min_seam_height must be within [0, 1], got {}",
                self.min_seam_height
            )));
        }
        if self.min_frames_per_fold == 0 {
            return Err(FoldError::validation("min_frames_per_fold must be > 0"));
        }
        if self.fold_divisor == 0 || self.pause_divisor == 0 {
            return Err(FoldError::validation(
                "fold_divisor and pause_divisor must be > 0",
            ));
        }
        Ok(())
    }
}

/// Immutable parameters of one transition render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionDescriptor {
    /// Length in seconds; must be positive.
    pub duration_secs: f64,
    /// Output frame rate.
    pub fps: Fps,
    /// Size of both inputs and every output frame.
    pub resolution: Resolution,
    /// Which fold to render.
    pub variant: VariantId,
    /// Variant knobs; missing fields take their defaults.
    #[serde(default)]
    pub options: VariantOptions,
}

impl TransitionDescriptor {
    /// Descriptor with default options.
    pub fn new(duration_secs: f64, fps: Fps, resolution: Resolution, variant: VariantId) -> Self {
        Self {
            duration_secs,
            fps,
            resolution,
            variant,
            options: VariantOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: VariantOptions) -> Self {
        self.options = options;
        self
    }

    /// Check duration, resolution and options, and that at least one frame results.
    pub fn validate(&self) -> FoldResult<()> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(FoldError::validation(format!(
                "duration must be a positive number of seconds, got {}",
                self.duration_secs
            )));
        }
        self.resolution.validate()?;
        self.options.validate()?;
        self.total_frames()?;
        Ok(())
    }

    /// `round(duration × fps)`; at least one frame is required.
    pub fn total_frames(&self) -> FoldResult<usize> {
        let n = self.fps.frames_for_secs(self.duration_secs);
        if n == 0 {
            return Err(FoldError::validation(format!(
                "{}s at {} fps yields no frames",
                self.duration_secs, self.fps
            )));
        }
        usize::try_from(n).map_err(|_| FoldError::validation("frame count overflows usize"))
    }

    /// Parse and validate a JSON descriptor.
    pub fn from_json_str(s: &str) -> FoldResult<Self> {
        let desc: Self = serde_json::from_str(s)
            .map_err(|e| FoldError::validation(format!("invalid transition descriptor: {e}")))?;
        desc.validate()?;
        Ok(desc)
    }

    /// Read and validate a JSON descriptor file.
    pub fn from_path(path: impl AsRef<Path>) -> FoldResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read transition descriptor {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Pretty-printed JSON, readable by [`TransitionDescriptor::from_json_str`].
    pub fn to_json_pretty(&self) -> FoldResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FoldError::Other(anyhow::Error::new(e).context("serialize descriptor")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/descriptor.rs"]
mod tests;
