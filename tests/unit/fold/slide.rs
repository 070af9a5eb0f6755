use super::*;
use crate::foundation::core::Resolution;
use crate::render::backend::RenderSettings;
use crate::render::cpu::CpuBackend;

const ORANGE: [u8; 3] = [240, 140, 20];
const TEAL: [u8; 3] = [20, 140, 160];
const BLACK: [u8; 3] = [0, 0, 0];

fn render(fold: &SlideFold, n: usize) -> Vec<FrameRGB> {
    let r = Resolution::new(16, 16).unwrap();
    let from = FrameRGB::solid(r, ORANGE).unwrap();
    let to = FrameRGB::solid(r, TEAL).unwrap();
    let mut backend = CpuBackend::new(RenderSettings::default());
    let mut ctx = FoldContext::new(&mut backend, &from, &to).unwrap();
    let frames = fold.render_phase1(&mut ctx, &from, &to, n).unwrap();
    ctx.finish().unwrap();
    frames
}

#[test]
fn geometry_pins_one_edge_and_moves_the_seam() {
    let right = SlideFold::new(SlideDirection::Right, 0.75, false).unwrap();
    let g = right.geometry(0.0);
    assert_eq!((g.left_x, g.right_x, g.seam_x), (-1.0, 1.0, 0.0));
    assert_eq!(g.seam_half_height, 1.0);
    assert!(!g.has_gap());

    let g = right.geometry(0.5);
    assert_eq!((g.left_x, g.right_x, g.seam_x), (0.0, 1.0, 0.5));
    assert_eq!(g.seam_half_height, 0.75);
    assert!(g.has_gap());

    let left = SlideFold::new(SlideDirection::Left, 0.75, false).unwrap();
    let g = left.geometry(0.5);
    assert_eq!((g.left_x, g.right_x, g.seam_x), (-1.0, 0.0, -0.5));
}

#[test]
fn geometry_clamps_progress() {
    let fold = SlideFold::new(SlideDirection::Right, 0.0, false).unwrap();
    let g = fold.geometry(5.0);
    assert!(g.right_x - g.left_x > 0.0);
    assert!(g.seam_half_height > 0.0);
    assert!(g.trapezoids().is_ok());
    assert!(g.gap().is_ok());
}

#[test]
fn first_frame_is_source() {
    let fold = SlideFold::new(SlideDirection::Right, 0.75, false).unwrap();
    let frames = render(&fold, 4);
    assert_eq!(frames.len(), 4);
    assert!(frames[0].data.chunks(3).all(|px| px == ORANGE));
}

#[test]
fn midpoint_fills_seam_gap_with_black() {
    let mid = &render(&SlideFold::new(SlideDirection::Right, 0.75, false).unwrap(), 3)[1];
    assert_eq!(mid.pixel(4, 8), TEAL);
    assert_eq!(mid.pixel(12, 8), ORANGE);
    assert_eq!(mid.pixel(12, 0), BLACK);
    assert_eq!(mid.pixel(12, 15), BLACK);
    assert_eq!(mid.pixel(8, 0), ORANGE);

    let mid = &render(&SlideFold::new(SlideDirection::Left, 0.75, false).unwrap(), 3)[1];
    assert_eq!(mid.pixel(12, 8), TEAL);
    assert_eq!(mid.pixel(3, 8), ORANGE);
    assert_eq!(mid.pixel(3, 0), BLACK);
}

#[test]
fn last_frame_mostly_reveals_destination() {
    let last = render(&SlideFold::new(SlideDirection::Left, 0.75, false).unwrap(), 5)
        .pop()
        .unwrap();
    assert_eq!(last.pixel(4, 8), TEAL);
    assert_eq!(last.pixel(15, 8), TEAL);
}

#[test]
fn names_and_requirements() {
    let fold = SlideFold::new(SlideDirection::Left, 0.75, false).unwrap();
    assert_eq!(fold.name(), "slide-left");
    assert!(fold.requirements().seam_shrink);
    assert!(!fold.requirements().two_phase);
}

#[test]
fn seam_floor_outside_unit_range_is_rejected() {
    for bad in [-0.1, 1.5] {
        assert!(matches!(
            SlideFold::new(SlideDirection::Right, bad, false),
            Err(FoldError::Validation(_))
        ));
    }
    assert!(SlideFold::new(SlideDirection::Left, 1.0, false).is_ok());
}
