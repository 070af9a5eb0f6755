use super::*;
use crate::fold::Requirements;
use crate::foundation::core::{Fps, Resolution};
use crate::render::backend::RenderSettings;
use crate::render::cpu::CpuBackend;
use crate::transition::descriptor::VariantId;

/// Emits copies of `from` (phase 1) and `to` (phase 2), optionally miscounting or failing.
struct Stub {
    two_phase: bool,
    extra_phase1: usize,
    fail_phase2: bool,
}

impl Stub {
    fn new(two_phase: bool) -> Self {
        Self {
            two_phase,
            extra_phase1: 0,
            fail_phase2: false,
        }
    }
}

impl FoldAlgorithm for Stub {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn requirements(&self) -> Requirements {
        Requirements {
            two_phase: self.two_phase,
            eased: false,
            seam_shrink: false,
            discards_dark: false,
        }
    }

    fn render_phase1(
        &self,
        _ctx: &mut FoldContext<'_>,
        from: &FrameRGB,
        _to: &FrameRGB,
        num_frames: usize,
    ) -> FoldResult<Vec<FrameRGB>> {
        Ok(vec![from.clone(); num_frames + self.extra_phase1])
    }

    fn render_phase2(
        &self,
        _ctx: &mut FoldContext<'_>,
        _from: &FrameRGB,
        to: &FrameRGB,
        num_frames: usize,
    ) -> FoldResult<Vec<FrameRGB>> {
        if self.fail_phase2 {
            return Err(FoldError::render("stub phase 2 failed"));
        }
        Ok(vec![to.clone(); num_frames])
    }
}

fn images() -> (FrameRGB, FrameRGB) {
    let r = Resolution::new(2, 2).unwrap();
    (
        FrameRGB::solid(r, [1, 2, 3]).unwrap(),
        FrameRGB::solid(r, [4, 5, 6]).unwrap(),
    )
}

fn run(algo: &Stub, plan: PhasePlan) -> (PhaseOrchestrator, FoldResult<Vec<FrameRGB>>) {
    let (from, to) = images();
    let mut backend = CpuBackend::new(RenderSettings::default());
    let mut ctx = FoldContext::new(&mut backend, &from, &to).unwrap();
    let mut orch = PhaseOrchestrator::new(plan);
    let out = orch.run(algo, &mut ctx, &from, &to);
    ctx.finish().unwrap();
    (orch, out)
}

#[test]
fn two_phase_split_is_55_45() {
    assert_eq!(
        PhasePlan::two_phase(25),
        PhasePlan {
            total: 25,
            phase1: 14,
            phase2: 11
        }
    );
    assert_eq!(PhasePlan::two_phase(100).phase1, 55);
    assert_eq!(PhasePlan::two_phase(1).phase1, 1);
    assert_eq!(PhasePlan::two_phase(1).phase2, 0);
    assert_eq!(PhasePlan::two_phase(2).phase1, 1);
    for total in 1..200 {
        let p = PhasePlan::two_phase(total);
        assert_eq!(p.phase1 + p.phase2, total);
        assert!(p.phase1 >= 1);
    }
}

#[test]
fn single_phase_keeps_whole_budget() {
    let p = PhasePlan::single_phase(30);
    assert_eq!((p.phase1, p.phase2), (30, 0));
    assert_eq!(PhasePlan::for_algorithm(&Stub::new(false), 30), p);
    assert_eq!(PhasePlan::for_algorithm(&Stub::new(true), 30).phase1, 17);
}

#[test]
fn concatenates_phases_in_order() {
    let (from, to) = images();
    let (orch, out) = run(&Stub::new(true), PhasePlan::two_phase(25));
    let frames = out.unwrap();
    assert_eq!(frames.len(), 25);
    assert!(frames[..14].iter().all(|f| *f == from));
    assert!(frames[14..].iter().all(|f| *f == to));
    assert_eq!(orch.state(), PhaseState::Done);
}

#[test]
fn miscounted_phase_is_rejected() {
    let algo = Stub {
        extra_phase1: 1,
        ..Stub::new(true)
    };
    let (orch, out) = run(&algo, PhasePlan::two_phase(10));
    assert!(matches!(out, Err(FoldError::Render(_))));
    assert_eq!(orch.state(), PhaseState::Phase1);
}

#[test]
fn failing_phase_returns_no_frames() {
    let algo = Stub {
        fail_phase2: true,
        ..Stub::new(true)
    };
    let (orch, out) = run(&algo, PhasePlan::two_phase(10));
    assert!(out.is_err());
    assert_eq!(orch.state(), PhaseState::Phase2);
}

#[test]
fn orchestrator_runs_once() {
    let (from, to) = images();
    let mut backend = CpuBackend::new(RenderSettings::default());
    let mut ctx = FoldContext::new(&mut backend, &from, &to).unwrap();
    let mut orch = PhaseOrchestrator::new(PhasePlan::single_phase(3));
    let algo = Stub::new(false);
    assert_eq!(orch.run(&algo, &mut ctx, &from, &to).unwrap().len(), 3);
    assert!(orch.run(&algo, &mut ctx, &from, &to).is_err());
}

#[test]
fn plan_from_descriptor() {
    let desc = TransitionDescriptor::new(
        1.0,
        Fps::whole(25).unwrap(),
        Resolution::new(4, 4).unwrap(),
        VariantId::Left,
    );
    let orch = PhaseOrchestrator::for_descriptor(&desc, &Stub::new(true)).unwrap();
    assert_eq!(orch.plan().phase1, 14);
    assert_eq!(orch.output_len(&Stub::new(true)), 25);
    assert_eq!(orch.state(), PhaseState::Idle);
}

#[test]
fn drives_the_variant_enum_and_trait_objects_alike() {
    use crate::fold::FoldVariant;

    let desc = TransitionDescriptor::new(
        1.0,
        Fps::whole(20).unwrap(),
        Resolution::new(8, 4).unwrap(),
        VariantId::MultiRight,
    );
    let r = desc.resolution;
    let from = FrameRGB::solid(r, [200, 30, 30]).unwrap();
    let to = FrameRGB::solid(r, [30, 30, 200]).unwrap();
    let variant = FoldVariant::from_descriptor(&desc).unwrap();

    let mut backend = CpuBackend::new(RenderSettings::default());
    let mut ctx = FoldContext::new(&mut backend, &from, &to).unwrap();
    let mut orch = PhaseOrchestrator::for_descriptor(&desc, &variant).unwrap();
    let frames = orch.run(&variant, &mut ctx, &from, &to).unwrap();
    assert_eq!(frames.len(), orch.output_len(&variant));
    assert_eq!(frames.len(), 4 * 15 + 3);

    let boxed: Box<dyn FoldAlgorithm> = Box::new(Stub::new(true));
    let mut orch = PhaseOrchestrator::for_descriptor(&desc, boxed.as_ref()).unwrap();
    assert_eq!(orch.run(boxed.as_ref(), &mut ctx, &from, &to).unwrap().len(), 20);
    ctx.finish().unwrap();
}
