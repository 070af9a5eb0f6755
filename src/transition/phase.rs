//! Phase plan and the two-phase state machine driving a fold variant.

use crate::fold::{FoldAlgorithm, FoldContext};
use crate::foundation::error::{FoldError, FoldResult};
use crate::render::backend::FrameRGB;
use crate::transition::descriptor::TransitionDescriptor;

/// Share of the frame budget given to phase 1 in two-phase variants.
pub const PHASE1_SHARE: f64 = 0.55;

/// Frame budget split between the two phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhasePlan {
    /// Frames requested for the whole transition.
    pub total: usize,
    /// Frames handed to the phase-1 routine.
    pub phase1: usize,
    /// Frames handed to the phase-2 routine; `total - phase1`.
    pub phase2: usize,
}

impl PhasePlan {
    /// 55/45 split: `phase1 = max(1, round(total × 0.55))`, never more than `total`.
    pub fn two_phase(total: usize) -> Self {
        let phase1 = ((total as f64 * PHASE1_SHARE).round() as usize)
            .max(1)
            .min(total);
        Self {
            total,
            phase1,
            phase2: total - phase1,
        }
    }

    /// Whole budget in phase 1; phase 2 is empty.
    pub fn single_phase(total: usize) -> Self {
        Self {
            total,
            phase1: total,
            phase2: 0,
        }
    }

    /// Two-phase or single-phase plan, as `algo` requires.
    pub fn for_algorithm<A: FoldAlgorithm + ?Sized>(algo: &A, total: usize) -> Self {
        if algo.requirements().two_phase {
            Self::two_phase(total)
        } else {
            Self::single_phase(total)
        }
    }
}

/// Orchestrator state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseState {
    /// Not started.
    Idle,
    /// Rendering phase 1, or failed there.
    Phase1,
    /// Rendering phase 2, or failed there.
    Phase2,
    /// Both phases rendered; terminal.
    Done,
}

/// Drives one fold variant through `Idle → Phase1 → Phase2 → Done`.
#[derive(Debug)]
pub struct PhaseOrchestrator {
    plan: PhasePlan,
    state: PhaseState,
}

impl PhaseOrchestrator {
    /// Idle orchestrator for `plan`.
    pub fn new(plan: PhasePlan) -> Self {
        Self {
            plan,
            state: PhaseState::Idle,
        }
    }

    /// Plan `desc.total_frames()` frames for `algo`.
    pub fn for_descriptor<A: FoldAlgorithm + ?Sized>(
        desc: &TransitionDescriptor,
        algo: &A,
    ) -> FoldResult<Self> {
        Ok(Self::new(PhasePlan::for_algorithm(algo, desc.total_frames()?)))
    }

    pub fn plan(&self) -> PhasePlan {
        self.plan
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    /// Frames [`PhaseOrchestrator::run`] returns for `algo`.
    pub fn output_len<A: FoldAlgorithm + ?Sized>(&self, algo: &A) -> usize {
        algo.phase1_output_len(self.plan.phase1) + self.plan.phase2
    }

    fn enter(&mut self, next: PhaseState) {
        tracing::debug!(from = ?self.state, to = ?next, "phase transition");
        self.state = next;
    }

    /// Render both phases and concatenate them. Any failure discards every frame.
    #[tracing::instrument(level = "debug", skip_all, fields(variant = algo.name(), total = self.plan.total))]
    pub fn run<A: FoldAlgorithm + ?Sized>(
        &mut self,
        algo: &A,
        ctx: &mut FoldContext<'_>,
        from: &FrameRGB,
        to: &FrameRGB,
    ) -> FoldResult<Vec<FrameRGB>> {
        if self.state != PhaseState::Idle {
            return Err(FoldError::render(format!(
                "orchestrator already ran (state {:?})",
                self.state
            )));
        }
        let plan = self.plan;

        self.enter(PhaseState::Phase1);
        let mut frames = algo.render_phase1(ctx, from, to, plan.phase1)?;
        let expected = algo.phase1_output_len(plan.phase1);
        if frames.len() != expected {
            return Err(FoldError::render(format!(
                "{} phase 1 produced {} frames, expected {expected}",
                algo.name(),
                frames.len()
            )));
        }

        self.enter(PhaseState::Phase2);
        let phase2 = algo.render_phase2(ctx, from, to, plan.phase2)?;
        if phase2.len() != plan.phase2 {
            return Err(FoldError::render(format!(
                "{} phase 2 produced {} frames, expected {}",
                algo.name(),
                phase2.len(),
                plan.phase2
            )));
        }
        frames.extend(phase2);

        self.enter(PhaseState::Done);
        Ok(frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/phase.rs"]
mod tests;
