//! Origami is a paper-fold transition renderer.
//!
//! Given two same-size RGB images and a [`TransitionDescriptor`], it synthesizes the frames of a
//! simulated 3D fold between them:
//!
//! - Build a [`TransitionDescriptor`] (or load one from JSON)
//! - Call [`render_transition`] to get the frame list, or [`render_to_sink`] to stream it
//! - Substitute a crossfade on failure with [`render_transition_with_fallback`]
#![forbid(unsafe_code)]

/// Easing curves, progress mapping and synthetic lighting.
pub mod animation;
/// Image decoding and letterboxing.
pub mod assets;
/// Frame sinks.
pub mod encode;
/// Fold algorithm variants.
pub mod fold;
/// Core value types, errors and numeric helpers.
pub mod foundation;
/// Meshes and fold regions.
pub mod geometry;
mod pipeline;
/// Render pipeline and backends.
pub mod render;
/// Transition descriptors and the phase orchestrator.
pub mod transition;

pub use crate::animation::ease::Ease;
pub use crate::assets::decode::{decode_image, fit_letterbox, load_image};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::fold::{
    Capabilities, FoldAlgorithm, FoldContext, FoldVariant, OutputKind, Requirements,
};
pub use crate::foundation::core::{Axis, Fps, Resolution};
pub use crate::foundation::error::{FoldError, FoldResult};
pub use crate::pipeline::{
    RenderOpts, Rendered, render_to_sink, render_transition, render_transition_with_fallback,
    render_with_backend, write_frames,
};
pub use crate::render::backend::{
    BackendKind, FrameRGB, RenderBackend, RenderSettings, SampleFilter, create_backend,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::transition::descriptor::{TransitionDescriptor, VariantId, VariantOptions};
pub use crate::transition::phase::{PhaseOrchestrator, PhasePlan, PhaseState};
