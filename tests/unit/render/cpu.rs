use std::sync::Arc;

use super::*;
use crate::foundation::core::Axis;
use crate::geometry::mesh::Mesh;
use crate::render::passes::{FramePlan, execute_plan};
use crate::render::shader::Hinge;

fn gradient(w: u32, h: u32) -> FrameRGB {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 100]);
        }
    }
    FrameRGB::new(w, h, data).unwrap()
}

fn res(w: u32, h: u32) -> Resolution {
    Resolution::new(w, h).unwrap()
}

#[test]
fn fullscreen_texture_round_trips_pixel_exact() {
    for filter in [SampleFilter::Nearest, SampleFilter::Bilinear] {
        let mut be = CpuBackend::new(RenderSettings {
            filter,
            ..RenderSettings::default()
        });
        let img = gradient(8, 6);
        let tex = be.upload_texture(&img).unwrap();
        let plan = FramePlan {
            resolution: res(8, 6),
            passes: vec![DrawPass::background(Arc::new(Mesh::fullscreen()), tex)],
        };
        let out = be.render_frame(&plan).unwrap();
        assert_eq!(out, img, "{filter:?}");
    }
}

#[test]
fn raw_buffer_is_bottom_up_and_readback_flips_it() {
    let mut be = CpuBackend::new(RenderSettings::default());
    be.begin_frame(res(2, 2), [0, 0, 0]).unwrap();
    // Top half of the screen in NDC.
    let top = Mesh::rect(-1.0, 0.0, 1.0, 1.0).unwrap();
    be.exec_pass(&DrawPass::fill(Arc::new(top), [255, 0, 0]))
        .unwrap();
    let raw = be.readback().unwrap();
    assert_eq!(raw.origin, ReadOrigin::BottomLeft);
    assert_eq!(&raw.rows[0..3], &[0, 0, 0]);
    assert_eq!(&raw.rows[6..9], &[255, 0, 0]);

    let frame = raw.into_frame().unwrap();
    assert_eq!(frame.pixel(0, 0), [255, 0, 0]);
    assert_eq!(frame.pixel(0, 1), [0, 0, 0]);
}

#[test]
fn clear_color_applies_to_uncovered_pixels() {
    let mut be = CpuBackend::new(RenderSettings {
        clear_rgb: [1, 2, 3],
        ..RenderSettings::default()
    });
    let plan = FramePlan {
        resolution: res(3, 3),
        passes: vec![],
    };
    let out = be.render_frame(&plan).unwrap();
    assert!(out.data.chunks_exact(3).all(|p| p == [1, 2, 3]));
}

#[test]
fn shared_edges_cover_each_pixel_once() {
    let mut be = CpuBackend::new(RenderSettings::default());
    be.begin_frame(res(16, 16), [0, 0, 0]).unwrap();
    let grid = Mesh::grid(7, Axis::X, -1.0, 1.0).unwrap();
    let pass = DrawPass::fill(Arc::new(grid), [255, 255, 255])
        .with_uniforms(FoldUniforms::flat().with_opacity(0.5));
    be.exec_pass(&pass).unwrap();
    let frame = be.readback().unwrap().into_frame().unwrap();
    // A double-covered pixel would blend twice and come out brighter.
    assert!(frame.data.iter().all(|v| *v == 128), "{:?}", frame.data);
}

#[test]
fn opacity_blends_over_destination() {
    let mut be = CpuBackend::new(RenderSettings::default());
    be.begin_frame(res(2, 2), [0, 0, 0]).unwrap();
    let full = Arc::new(Mesh::fullscreen());
    be.exec_pass(&DrawPass::fill(full.clone(), [200, 100, 0]))
        .unwrap();
    be.exec_pass(
        &DrawPass::fill(full, [0, 0, 200])
            .with_uniforms(FoldUniforms::flat().with_opacity(0.25)),
    )
    .unwrap();
    let frame = be.readback().unwrap().into_frame().unwrap();
    assert_eq!(frame.pixel(1, 1), [150, 75, 50]);
}

#[test]
fn discard_keeps_destination() {
    let mut be = CpuBackend::new(RenderSettings::default());
    be.begin_frame(res(2, 2), [9, 9, 9]).unwrap();
    let pass = DrawPass::fill(Arc::new(Mesh::fullscreen()), [0, 0, 0])
        .with_uniforms(FoldUniforms::flat().with_discard_dark(true));
    be.exec_pass(&pass).unwrap();
    let frame = be.readback().unwrap().into_frame().unwrap();
    assert_eq!(frame.pixel(0, 0), [9, 9, 9]);
}

#[test]
fn hinged_flap_foreshortens_toward_seam() {
    let mut be = CpuBackend::new(RenderSettings::default());
    be.begin_frame(res(20, 4), [0, 0, 0]).unwrap();
    let right = Mesh::grid(4, Axis::X, 0.0, 1.0).unwrap();
    let hinge = Hinge {
        axis: Axis::X,
        seam: 0.0,
        angle: std::f32::consts::FRAC_PI_3,
        seam_scale: 1.0,
        extent: 1.0,
        push: 0.0,
    };
    let pass = DrawPass::fill(Arc::new(right), [255, 255, 255])
        .with_uniforms(FoldUniforms::hinged(hinge));
    be.exec_pass(&pass).unwrap();
    let frame = be.readback().unwrap().into_frame().unwrap();
    // cos(60°) = 0.5: the right half shrinks to a quarter of the width.
    let lit: Vec<u32> = (0..20).filter(|x| frame.pixel(*x, 2)[0] == 255).collect();
    assert_eq!(lit, (10..15).collect::<Vec<_>>());
}

#[test]
fn texture_lifecycle() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let a = be.upload_texture(&gradient(2, 2)).unwrap();
    let b = be.upload_texture(&gradient(2, 2)).unwrap();
    assert_ne!(a, b);
    assert_eq!(be.texture_count(), 2);
    be.release_texture(a).unwrap();
    assert!(be.release_texture(a).is_err());
    assert_eq!(be.texture_count(), 1);

    be.begin_frame(res(2, 2), [0, 0, 0]).unwrap();
    let err = be
        .exec_pass(&DrawPass::background(Arc::new(Mesh::fullscreen()), a))
        .unwrap_err();
    assert!(matches!(err, FoldError::Render(_)));
}

#[test]
fn passes_outside_a_frame_fail() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let pass = DrawPass::fill(Arc::new(Mesh::fullscreen()), [0, 0, 0]);
    assert!(be.exec_pass(&pass).is_err());
    assert!(be.readback().is_err());
    let plan = FramePlan {
        resolution: res(2, 2),
        passes: vec![pass],
    };
    execute_plan(&mut be, &plan, [0, 0, 0]).unwrap();
    assert!(be.readback().is_err());
}
