//! Vertex and fragment stages of the fold pipeline.
//!
//! The software backend calls [`transform_vertex`] and [`shade_fragment`] directly; the GPU
//! backend runs [`FOLD_WGSL`], which implements the same math.

use crate::foundation::core::Axis;

/// Eye-space depth is scaled by this factor before it becomes rasterization depth.
pub const DEPTH_SCALE: f32 = 0.1;

/// Rasterization depth of an unrotated surface; keeps folded geometry inside `[0, 1]`.
pub const DEPTH_BIAS: f32 = 0.5;

/// Channel threshold below which a sample counts as black padding.
pub const DARK_THRESHOLD: f32 = 0.02;

/// Rotation of a flap about its seam line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hinge {
    /// Fold axis; the seam is the line `axis = seam`.
    pub axis: Axis,
    /// Seam coordinate along the axis.
    pub seam: f32,
    /// Signed rotation in radians. Positive angles lift geometry above the seam toward the
    /// viewer.
    pub angle: f32,
    /// Cross-axis scale applied at the seam, easing back to 1 at `extent` from it.
    pub seam_scale: f32,
    /// Distance from the seam at which `seam_scale` has fully relaxed.
    pub extent: f32,
    /// Depth pushed into the screen after rotation.
    pub push: f32,
}

/// Per-pass shader parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldUniforms {
    /// Hinge rotation; `None` draws the mesh flat.
    pub hinge: Option<Hinge>,
    /// Constant eye-space depth offset.
    pub z_offset: f32,
    /// Brightness multiplier applied to sampled color.
    pub shade: f32,
    /// Blend weight against what is already in the color buffer.
    pub opacity: f32,
    /// Drop fragments whose sample is near-black.
    pub discard_dark: bool,
}

impl Default for FoldUniforms {
    fn default() -> Self {
        Self {
            hinge: None,
            z_offset: 0.0,
            shade: 1.0,
            opacity: 1.0,
            discard_dark: false,
        }
    }
}

impl FoldUniforms {
    /// Uniforms for an unrotated, fully opaque draw.
    pub fn flat() -> Self {
        Self::default()
    }

    /// Uniforms for a hinged flap.
    pub fn hinged(hinge: Hinge) -> Self {
        Self {
            hinge: Some(hinge),
            ..Self::default()
        }
    }

    /// Set the eye-space depth offset.
    pub fn with_z_offset(mut self, z_offset: f32) -> Self {
        self.z_offset = z_offset;
        self
    }

    /// Set the brightness multiplier.
    pub fn with_shade(mut self, shade: f32) -> Self {
        self.shade = shade;
        self
    }

    /// Set the blend opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Enable or disable near-black discard.
    pub fn with_discard_dark(mut self, discard: bool) -> Self {
        self.discard_dark = discard;
        self
    }

    /// Pack into the 16-float uniform block read by [`FOLD_WGSL`].
    pub fn to_gpu_block(&self, solid: Option<[u8; 3]>) -> [f32; 16] {
        let (axis, seam, angle, seam_scale, extent, push, hinged) = match self.hinge {
            Some(h) => (
                match h.axis {
                    Axis::X => 0.0,
                    Axis::Y => 1.0,
                },
                h.seam,
                h.angle,
                h.seam_scale,
                h.extent,
                h.push,
                1.0,
            ),
            None => (0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0),
        };
        let (textured, rgb) = match solid {
            Some(c) => (0.0, c.map(|v| v as f32 / 255.0)),
            None => (1.0, [0.0; 3]),
        };
        [
            axis,
            seam,
            angle,
            seam_scale,
            extent,
            push,
            self.z_offset,
            self.shade,
            self.opacity.clamp(0.0, 1.0),
            if self.discard_dark { 1.0 } else { 0.0 },
            textured,
            hinged,
            rgb[0],
            rgb[1],
            rgb[2],
            0.0,
        ]
    }
}

/// Output of the vertex stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipVertex {
    /// Clip-space x.
    pub x: f32,
    /// Clip-space y.
    pub y: f32,
    /// Eye-space depth; positive values are closer to the viewer.
    pub z: f32,
    /// Rasterization depth, `DEPTH_BIAS - z * DEPTH_SCALE`.
    pub depth: f32,
}

/// Vertex stage: rotate about the hinge, shrink toward the seam, push into the screen.
pub fn transform_vertex(pos: [f32; 3], u: &FoldUniforms) -> ClipVertex {
    let [x, y, mut z] = pos;
    let (mut x, mut y) = (x, y);
    if let Some(h) = u.hinge {
        let (along, across) = h.axis.split(x, y);
        let o = along - h.seam;
        let (s, c) = h.angle.sin_cos();
        let along = h.seam + o * c - z * s;
        z = o * s + z * c;
        let t = if h.extent > 0.0 {
            (o.abs() / h.extent).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let across = across * (h.seam_scale + (1.0 - h.seam_scale) * t);
        z -= h.push;
        (x, y) = h.axis.join(along, across);
    }
    z += u.z_offset;
    ClipVertex {
        x,
        y,
        z,
        depth: DEPTH_BIAS - z * DEPTH_SCALE,
    }
}

/// Fragment stage: optional near-black discard, then brightness post-multiply.
///
/// Returns `None` for discarded fragments.
pub fn shade_fragment(rgb: [f32; 3], u: &FoldUniforms) -> Option<[f32; 3]> {
    if u.discard_dark && rgb.iter().all(|c| *c < DARK_THRESHOLD) {
        return None;
    }
    Some(rgb.map(|c| (c * u.shade).clamp(0.0, 1.0)))
}

/// WGSL source for the GPU backend. Entry points are `vs` and `fs`.
pub const FOLD_WGSL: &str = r#"
struct Fold {
  hinge: vec4<f32>, // axis, seam, angle, seam_scale
  depth: vec4<f32>, // extent, push, z_offset, shade
  flags: vec4<f32>, // opacity, discard_dark, textured, hinged
  solid: vec4<f32>,
};

@group(0) @binding(0) var<uniform> fold: Fold;
@group(0) @binding(1) var t_src: texture_2d<f32>;
@group(0) @binding(2) var s_src: sampler;

struct VsIn {
  @location(0) pos: vec3<f32>,
  @location(1) uv: vec2<f32>,
};

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) uv: vec2<f32>,
};

@vertex
fn vs(in: VsIn) -> VsOut {
  let vertical = fold.hinge.x > 0.5;
  var along = in.pos.x;
  var across = in.pos.y;
  if (vertical) {
    along = in.pos.y;
    across = in.pos.x;
  }
  var z = in.pos.z;
  if (fold.flags.w > 0.5) {
    let o = along - fold.hinge.y;
    let s = sin(fold.hinge.z);
    let c = cos(fold.hinge.z);
    along = fold.hinge.y + o * c - z * s;
    z = o * s + z * c;
    var t = 1.0;
    if (fold.depth.x > 0.0) {
      t = clamp(abs(o) / fold.depth.x, 0.0, 1.0);
    }
    across = across * mix(fold.hinge.w, 1.0, t);
    z = z - fold.depth.y;
  }
  z = z + fold.depth.z;
  var p = vec2<f32>(along, across);
  if (vertical) {
    p = vec2<f32>(across, along);
  }
  var out: VsOut;
  out.pos = vec4<f32>(p, 0.5 - z * 0.1, 1.0);
  out.uv = in.uv;
  return out;
}

@fragment
fn fs(in: VsOut) -> @location(0) vec4<f32> {
  let sampled = textureSample(t_src, s_src, in.uv).rgb;
  var rgb = fold.solid.rgb;
  if (fold.flags.z > 0.5) {
    rgb = sampled;
  }
  if (fold.flags.y > 0.5 && all(rgb < vec3<f32>(0.02))) {
    discard;
  }
  return vec4<f32>(clamp(rgb * fold.depth.w, vec3<f32>(0.0), vec3<f32>(1.0)), fold.flags.x);
}
"#;

#[cfg(test)]
#[path = "../../tests/unit/render/shader.rs"]
mod tests;
