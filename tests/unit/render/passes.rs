use super::*;
use crate::render::backend::ReadOrigin;

#[derive(Default)]
struct MockBackend {
    calls: Vec<String>,
    size: (u32, u32),
}

impl PassBackend for MockBackend {
    fn begin_frame(&mut self, resolution: Resolution, _clear_rgb: [u8; 3]) -> FoldResult<()> {
        self.size = (resolution.width, resolution.height);
        self.calls.push("begin_frame".to_string());
        Ok(())
    }

    fn exec_pass(&mut self, pass: &DrawPass) -> FoldResult<()> {
        self.calls.push(format!("exec_pass:{:?}", pass.role));
        Ok(())
    }

    fn readback(&mut self) -> FoldResult<Readback> {
        self.calls.push("readback".to_string());
        let (w, h) = self.size;
        // Bottom row white, everything else black.
        let mut rows = vec![0u8; (w * h * 3) as usize];
        rows[..(w * 3) as usize].fill(255);
        Ok(Readback {
            width: w,
            height: h,
            rows,
            origin: ReadOrigin::BottomLeft,
        })
    }
}

fn plan(roles: &[PassRole]) -> FramePlan {
    let mesh = Arc::new(Mesh::fullscreen());
    FramePlan {
        resolution: Resolution::new(4, 3).unwrap(),
        passes: roles
            .iter()
            .map(|role| match role {
                PassRole::Background => DrawPass::background(mesh.clone(), TextureId(0)),
                PassRole::Surface => {
                    DrawPass::surface(mesh.clone(), TextureId(1), FoldUniforms::flat())
                }
                PassRole::Flap => DrawPass::flap(mesh.clone(), TextureId(1), FoldUniforms::flat()),
                PassRole::Fill => DrawPass::fill(mesh.clone(), [0, 0, 0]),
            })
            .collect(),
    }
}

#[test]
fn execute_plan_calls_in_expected_order() {
    let mut backend = MockBackend::default();
    let plan = plan(&[PassRole::Background, PassRole::Surface, PassRole::Flap]);
    let frame = execute_plan(&mut backend, &plan, [0, 0, 0]).unwrap();
    assert_eq!(
        backend.calls,
        vec![
            "begin_frame",
            "exec_pass:Background",
            "exec_pass:Surface",
            "exec_pass:Flap",
            "readback",
        ]
    );
    assert_eq!((frame.width, frame.height), (4, 3));
    // The white bottom row of the raw buffer ends up as the last output row.
    assert_eq!(frame.pixel(0, 2), [255, 255, 255]);
    assert_eq!(frame.pixel(0, 0), [0, 0, 0]);
}

#[test]
fn background_after_flap_is_rejected_before_drawing() {
    let mut backend = MockBackend::default();
    let plan = plan(&[PassRole::Flap, PassRole::Background]);
    let err = execute_plan(&mut backend, &plan, [0, 0, 0]).unwrap_err();
    assert!(matches!(err, FoldError::Render(_)));
    assert!(backend.calls.is_empty());
}

#[test]
fn stacked_backgrounds_are_allowed() {
    plan(&[PassRole::Background, PassRole::Background, PassRole::Fill])
        .validate()
        .unwrap();
}

#[test]
fn empty_plan_still_clears_and_reads_back() {
    let mut backend = MockBackend::default();
    let frame = execute_plan(&mut backend, &plan(&[]), [0, 0, 0]).unwrap();
    assert_eq!(frame.data.len(), 4 * 3 * 3);
    assert_eq!(backend.calls, vec!["begin_frame", "readback"]);
}
