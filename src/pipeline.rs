use crate::encode::sink::{FrameSink, SinkConfig};
use crate::fold::{FoldAlgorithm, FoldContext, FoldVariant};
use crate::foundation::error::{FoldError, FoldResult};
use crate::render::backend::{BackendKind, FrameRGB, RenderBackend, RenderSettings, create_backend};
use crate::transition::descriptor::{TransitionDescriptor, VariantId};
use crate::transition::phase::PhaseOrchestrator;

/// Backend selection for the one-shot render entry points.
#[derive(Clone, Debug, Default)]
pub struct RenderOpts {
    /// Backend created for each render.
    pub backend: BackendKind,
    pub settings: RenderSettings,
}

/// Frames of one transition plus what actually produced them.
#[derive(Debug)]
pub struct Rendered {
    pub frames: Vec<FrameRGB>,
    /// Variant that rendered `frames`.
    pub variant: VariantId,
    /// Error of the requested variant when the crossfade was substituted.
    pub fallback_from: Option<FoldError>,
}

/// Render a transition on a backend created for this call and dropped before returning.
///
/// Pipeline:
/// 1. validate the descriptor and both images
/// 2. build the [`FoldVariant`] and acquire the backend
/// 3. run the [`PhaseOrchestrator`]
///
/// Any failure returns an error and no frames.
#[tracing::instrument(level = "info", skip_all, fields(variant = %desc.variant, backend = ?opts.backend))]
pub fn render_transition(
    from: &FrameRGB,
    to: &FrameRGB,
    desc: &TransitionDescriptor,
    opts: &RenderOpts,
) -> FoldResult<Vec<FrameRGB>> {
    check_inputs(from, to, desc)?;
    let variant = FoldVariant::from_descriptor(desc)?;
    let mut backend = create_backend(opts.backend, &opts.settings)?;
    run_variant(&variant, from, to, desc, backend.as_mut())
}

/// Render a transition on a caller-owned backend.
pub fn render_with_backend(
    from: &FrameRGB,
    to: &FrameRGB,
    desc: &TransitionDescriptor,
    backend: &mut dyn RenderBackend,
) -> FoldResult<Vec<FrameRGB>> {
    check_inputs(from, to, desc)?;
    let variant = FoldVariant::from_descriptor(desc)?;
    run_variant(&variant, from, to, desc, backend)
}

/// Render `desc`, substituting a software crossfade of the same length if the fold fails.
///
/// If the crossfade fails as well, the original error is returned.
pub fn render_transition_with_fallback(
    from: &FrameRGB,
    to: &FrameRGB,
    desc: &TransitionDescriptor,
    opts: &RenderOpts,
) -> FoldResult<Rendered> {
    let err = match render_transition(from, to, desc, opts) {
        Ok(frames) => {
            return Ok(Rendered {
                frames,
                variant: desc.variant,
                fallback_from: None,
            });
        }
        Err(e) => e,
    };
    tracing::warn!(variant = %desc.variant, error = %err, "fold failed; substituting crossfade");

    let mut fallback = desc.clone();
    fallback.variant = VariantId::Crossfade;
    let cpu = RenderOpts {
        backend: BackendKind::Cpu,
        settings: opts.settings.clone(),
    };
    match render_transition(from, to, &fallback, &cpu) {
        Ok(frames) => Ok(Rendered {
            frames,
            variant: VariantId::Crossfade,
            fallback_from: Some(err),
        }),
        Err(fallback_err) => {
            tracing::warn!(error = %fallback_err, "crossfade fallback failed too");
            Err(err)
        }
    }
}

/// Render a transition and stream it into `sink`. Returns the number of frames written.
///
/// Nothing reaches the sink unless the whole transition rendered.
pub fn render_to_sink(
    from: &FrameRGB,
    to: &FrameRGB,
    desc: &TransitionDescriptor,
    opts: &RenderOpts,
    sink: &mut dyn FrameSink,
) -> FoldResult<usize> {
    let frames = render_transition(from, to, desc, opts)?;
    write_frames(&frames, desc, sink)?;
    Ok(frames.len())
}

/// Push `frames` through the full `begin`/`push_frame`/`end` sequence of `sink`.
pub fn write_frames(
    frames: &[FrameRGB],
    desc: &TransitionDescriptor,
    sink: &mut dyn FrameSink,
) -> FoldResult<()> {
    sink.begin(SinkConfig {
        width: desc.resolution.width,
        height: desc.resolution.height,
        fps: desc.fps,
    })?;
    for (idx, frame) in frames.iter().enumerate() {
        sink.push_frame(idx, frame)?;
    }
    sink.end()
}

fn check_inputs(from: &FrameRGB, to: &FrameRGB, desc: &TransitionDescriptor) -> FoldResult<()> {
    desc.validate()?;
    for (label, img) in [("from", from), ("to", to)] {
        if img.resolution() != desc.resolution {
            return Err(FoldError::validation(format!(
                "{label} image is {} but the transition renders at {}",
                img.resolution(),
                desc.resolution
            )));
        }
    }
    Ok(())
}

fn run_variant(
    variant: &FoldVariant,
    from: &FrameRGB,
    to: &FrameRGB,
    desc: &TransitionDescriptor,
    backend: &mut dyn RenderBackend,
) -> FoldResult<Vec<FrameRGB>> {
    let ignored = variant.requirements().ignored_options(&desc.options);
    if !ignored.is_empty() {
        tracing::warn!(variant = variant.name(), ?ignored, "options have no effect on this variant");
    }

    let mut orchestrator = PhaseOrchestrator::for_descriptor(desc, variant)?;
    let plan = orchestrator.plan();
    tracing::debug!(
        backend = backend.name(),
        total = plan.total,
        phase1 = plan.phase1,
        phase2 = plan.phase2,
        "rendering transition"
    );

    let mut ctx = FoldContext::new(backend, from, to)?;
    let result = orchestrator.run(variant, &mut ctx, from, to);
    let released = ctx.finish();
    let frames = result?;
    released?;

    tracing::debug!(frames = frames.len(), variant = variant.name(), "transition rendered");
    Ok(frames)
}
