use super::*;

#[test]
fn seam_must_lie_within_bounds() {
    assert!(FoldRegion::new(Axis::X, -1.0, 0.0, 0.0).is_ok());
    assert!(FoldRegion::new(Axis::X, -1.0, 0.0, 0.5).is_err());
    assert!(FoldRegion::new(Axis::X, 0.5, 0.5, 0.5).is_err());
    assert!(FoldRegion::new(Axis::Y, -1.5, 0.0, 0.0).is_err());
}

#[test]
fn regions_on_opposite_sides_rotate_oppositely() {
    let left = FoldRegion::new(Axis::X, -1.0, 0.0, 0.0).unwrap();
    let right = FoldRegion::new(Axis::X, 0.0, 1.0, 0.0).unwrap();
    assert_eq!(left.side(), SeamSide::Below);
    assert_eq!(right.side(), SeamSide::Above);
    for toward in [true, false] {
        assert_eq!(left.rotation_sign(toward), -right.rotation_sign(toward));
    }
    assert_eq!(left.rotation_sign(true), -left.rotation_sign(false));
}

#[test]
fn hinge_carries_signed_angle_and_extent() {
    let quarter = FoldRegion::new(Axis::X, 0.5, 1.0, 0.5).unwrap();
    let hinge = quarter.hinge(0.3, true);
    assert_eq!(hinge.seam, 0.5);
    assert_eq!(hinge.angle, 0.3);
    assert_eq!(hinge.extent, 0.5);

    let book = FoldRegion::new(Axis::X, -1.0, -0.5, -1.0).unwrap();
    assert_eq!(book.side(), SeamSide::Above);
    assert_eq!(book.extent(), 0.5);
}

#[test]
fn toward_viewer_lifts_flap_out_of_the_screen() {
    use crate::render::shader::{FoldUniforms, transform_vertex};
    for region in [
        FoldRegion::new(Axis::X, -1.0, 0.0, 0.0).unwrap(),
        FoldRegion::new(Axis::X, 0.0, 1.0, 0.0).unwrap(),
        FoldRegion::new(Axis::Y, 0.0, 1.0, 0.0).unwrap(),
    ] {
        let outer = if region.side() == SeamSide::Below {
            region.lo
        } else {
            region.hi
        };
        let (x, y) = region.axis.join(outer, 0.0);
        let toward = FoldUniforms::hinged(region.hinge(0.5, true));
        let away = FoldUniforms::hinged(region.hinge(0.5, false));
        let z_toward = transform_vertex([x, y, 0.0], &toward).z;
        let z_away = transform_vertex([x, y, 0.0], &away).z;
        assert!(z_toward > 0.0, "{region:?}");
        assert!(z_away < 0.0, "{region:?}");
    }
}

#[test]
fn region_mesh_matches_bounds() {
    let r = FoldRegion::new(Axis::Y, -1.0, 0.0, 0.0).unwrap();
    let mesh = r.mesh(5).unwrap();
    assert!(mesh.positions.iter().all(|p| p[1] >= -1.0 && p[1] <= 0.0));
}
