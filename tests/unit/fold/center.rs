use super::*;
use crate::foundation::core::Resolution;
use crate::render::backend::RenderSettings;
use crate::render::cpu::CpuBackend;

const GREEN: [u8; 3] = [30, 200, 60];
const GREY: [u8; 3] = [128, 128, 128];

fn pair(w: u32, h: u32, from_rgb: [u8; 3]) -> (FrameRGB, FrameRGB) {
    let r = Resolution::new(w, h).unwrap();
    (
        FrameRGB::solid(r, from_rgb).unwrap(),
        FrameRGB::solid(r, GREY).unwrap(),
    )
}

fn render(fold: &CenterFold, from: &FrameRGB, to: &FrameRGB, n: usize) -> Vec<FrameRGB> {
    let mut backend = CpuBackend::new(RenderSettings::default());
    let mut ctx = FoldContext::new(&mut backend, from, to).unwrap();
    let frames = fold.render_phase1(&mut ctx, from, to, n).unwrap();
    ctx.finish().unwrap();
    frames
}

#[test]
fn seam_never_drops_below_floor() {
    let fold = CenterFold::new(CenterAxis::Horizontal, 20, 0.75, false).unwrap();
    assert_eq!(fold.seam_height_at(1.0), 0.75);
    assert_eq!(fold.seam_height_at(0.0), 1.0);
    assert!((fold.seam_height_at(0.1) - 0.9).abs() < 1e-12);
}

#[test]
fn rejects_out_of_range_floor() {
    assert!(CenterFold::new(CenterAxis::Horizontal, 20, 1.5, false).is_err());
    assert!(CenterFold::new(CenterAxis::Vertical, 20, -0.1, false).is_err());
    assert!(CenterFold::new(CenterAxis::Vertical, 0, 0.5, false).is_err());
}

#[test]
fn first_frame_is_source_and_last_is_nearly_closed() {
    let (from, to) = pair(16, 8, GREEN);
    let fold = CenterFold::new(CenterAxis::Horizontal, 20, 0.75, false).unwrap();
    let frames = render(&fold, &from, &to, 6);
    assert_eq!(frames.len(), 6);
    assert_eq!(frames[0], from);
    let last = &frames[5];
    assert_eq!(last.pixel(0, 4), GREY);
    assert_eq!(last.pixel(4, 4), GREY);
    assert_eq!(last.pixel(11, 4), GREY);
    assert_eq!(last.pixel(15, 4), GREY);
}

#[test]
fn seam_shrink_exposes_destination_near_center_edges() {
    let (from, to) = pair(16, 16, GREEN);
    let fold = CenterFold::new(CenterAxis::Horizontal, 20, 0.75, false).unwrap();
    // Three frames: the middle one sits at progress 0.5.
    let mid = &render(&fold, &from, &to, 3)[1];
    assert_eq!(mid.pixel(8, 0), GREY);
    assert_eq!(mid.pixel(8, 15), GREY);
    assert_eq!(mid.pixel(8, 8), GREEN);
    assert_eq!(mid.pixel(0, 8), GREY);
}

#[test]
fn vertical_axis_closes_rows() {
    let (from, to) = pair(8, 16, GREEN);
    let fold = CenterFold::new(CenterAxis::Vertical, 20, 0.75, false).unwrap();
    let last = render(&fold, &from, &to, 4).pop().unwrap();
    assert_eq!(last.pixel(4, 0), GREY);
    assert_eq!(last.pixel(4, 15), GREY);
    assert_eq!(fold.name(), "center-vertical");
}

#[test]
fn discard_drops_black_source_pixels() {
    let (from, to) = pair(8, 8, [0, 0, 0]);
    let keep = CenterFold::new(CenterAxis::Horizontal, 4, 0.75, false).unwrap();
    assert_eq!(render(&keep, &from, &to, 1)[0], from);
    let discard = CenterFold::new(CenterAxis::Horizontal, 4, 0.75, true).unwrap();
    assert_eq!(render(&discard, &from, &to, 1)[0], to);
}

#[test]
fn is_single_phase() {
    let fold = CenterFold::new(CenterAxis::Horizontal, 4, 0.75, false).unwrap();
    assert!(!fold.requirements().two_phase);
    assert!(fold.requirements().seam_shrink);
    let (from, to) = pair(4, 4, GREEN);
    let mut backend = CpuBackend::new(RenderSettings::default());
    let mut ctx = FoldContext::new(&mut backend, &from, &to).unwrap();
    assert!(fold.render_phase2(&mut ctx, &from, &to, 10).unwrap().is_empty());
}
