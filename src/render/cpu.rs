use std::collections::HashMap;

use crate::foundation::core::Resolution;
use crate::foundation::error::{FoldError, FoldResult};
use crate::foundation::math::{from_unorm8, to_unorm8};
use crate::render::backend::{
    FrameRGB, ReadOrigin, Readback, RenderBackend, RenderSettings, SampleFilter, TextureId,
};
use crate::render::passes::{DrawPass, PassBackend, PassSource};
use crate::render::shader::{FoldUniforms, shade_fragment, transform_vertex};

/// Software rasterizer.
///
/// The color buffer is stored bottom row first, like a GL framebuffer, so readback goes through
/// the same vertical flip as a hardware context. There is no depth buffer; passes composite in
/// submission order.
pub struct CpuBackend {
    settings: RenderSettings,
    width: u32,
    height: u32,
    color: Vec<u8>,
    frame_open: bool,
    textures: HashMap<TextureId, FrameRGB>,
    next_texture: u32,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            width: 0,
            height: 0,
            color: Vec::new(),
            frame_open: false,
            textures: HashMap::new(),
            next_texture: 0,
        }
    }
}

impl PassBackend for CpuBackend {
    fn begin_frame(&mut self, resolution: Resolution, clear_rgb: [u8; 3]) -> FoldResult<()> {
        let len = resolution.rgb_len()?;
        self.width = resolution.width;
        self.height = resolution.height;
        self.color.clear();
        self.color.reserve(len);
        for _ in 0..len / 3 {
            self.color.extend_from_slice(&clear_rgb);
        }
        self.frame_open = true;
        Ok(())
    }

    fn exec_pass(&mut self, pass: &DrawPass) -> FoldResult<()> {
        if !self.frame_open {
            return Err(FoldError::render("exec_pass called outside of a frame"));
        }
        pass.mesh
            .validate()
            .map_err(|e| FoldError::render(format!("{:?} pass mesh rejected: {e}", pass.role)))?;

        let source = match pass.source {
            PassSource::Texture(id) => Source::Texture(
                self.textures
                    .get(&id)
                    .ok_or_else(|| FoldError::render(format!("texture {id:?} is not resident")))?,
            ),
            PassSource::Solid(rgb) => Source::Solid(rgb.map(from_unorm8)),
        };

        let (w, h) = (self.width as f32, self.height as f32);
        let verts: Vec<ScreenVertex> = pass
            .mesh
            .positions
            .iter()
            .zip(&pass.mesh.uvs)
            .map(|(p, uv)| {
                let v = transform_vertex(*p, &pass.uniforms);
                ScreenVertex {
                    x: (v.x + 1.0) * 0.5 * w,
                    y: (v.y + 1.0) * 0.5 * h,
                    uv: *uv,
                }
            })
            .collect();

        let mut target = Target {
            color: &mut self.color,
            width: self.width,
            height: self.height,
        };
        let raster = Raster {
            source,
            filter: self.settings.filter,
            uniforms: &pass.uniforms,
        };
        for tri in pass.mesh.indices.chunks_exact(3) {
            raster.triangle(
                &mut target,
                verts[tri[0] as usize],
                verts[tri[1] as usize],
                verts[tri[2] as usize],
            );
        }
        Ok(())
    }

    fn readback(&mut self) -> FoldResult<Readback> {
        if !self.frame_open {
            return Err(FoldError::render("readback called outside of a frame"));
        }
        self.frame_open = false;
        Ok(Readback {
            width: self.width,
            height: self.height,
            rows: self.color.clone(),
            origin: ReadOrigin::BottomLeft,
        })
    }
}

impl RenderBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn upload_texture(&mut self, image: &FrameRGB) -> FoldResult<TextureId> {
        let id = TextureId(self.next_texture);
        self.next_texture = self
            .next_texture
            .checked_add(1)
            .ok_or_else(|| FoldError::gpu_context("texture id overflow"))?;
        self.textures.insert(id, image.clone());
        Ok(id)
    }

    fn release_texture(&mut self, id: TextureId) -> FoldResult<()> {
        self.textures
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| FoldError::render(format!("texture {id:?} released twice")))
    }

    fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}

impl Drop for CpuBackend {
    fn drop(&mut self) {
        tracing::debug!(textures = self.textures.len(), "cpu backend released");
    }
}

#[derive(Clone, Copy, Debug)]
struct ScreenVertex {
    x: f32,
    y: f32,
    uv: [f32; 2],
}

enum Source<'a> {
    Texture(&'a FrameRGB),
    Solid([f32; 3]),
}

struct Target<'a> {
    color: &'a mut [u8],
    width: u32,
    height: u32,
}

struct Raster<'a> {
    source: Source<'a>,
    filter: SampleFilter,
    uniforms: &'a FoldUniforms,
}

impl Raster<'_> {
    fn triangle(&self, target: &mut Target<'_>, a: ScreenVertex, b: ScreenVertex, c: ScreenVertex) {
        let mut area = edge(a, b, c.x, c.y);
        if !area.is_finite() || area.abs() < 1e-12 {
            return;
        }
        // No culling: a flap rotated past 90° shows its back face.
        let (b, c) = if area < 0.0 {
            area = -area;
            (c, b)
        } else {
            (b, c)
        };

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as u32).min(target.width);
        let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as u32).min(target.height);

        let tl_bc = is_top_left(b, c);
        let tl_ca = is_top_left(c, a);
        let tl_ab = is_top_left(a, b);

        let opacity = self.uniforms.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }

        for py in min_y..max_y {
            let cy = py as f32 + 0.5;
            for px in min_x..max_x {
                let cx = px as f32 + 0.5;
                let w0 = edge(b, c, cx, cy);
                let w1 = edge(c, a, cx, cy);
                let w2 = edge(a, b, cx, cy);
                if !(covers(w0, tl_bc) && covers(w1, tl_ca) && covers(w2, tl_ab)) {
                    continue;
                }
                let (l0, l1, l2) = (w0 / area, w1 / area, w2 / area);
                let uv = [
                    a.uv[0] * l0 + b.uv[0] * l1 + c.uv[0] * l2,
                    a.uv[1] * l0 + b.uv[1] * l1 + c.uv[1] * l2,
                ];
                let rgb = match &self.source {
                    Source::Texture(tex) => sample(tex, uv, self.filter),
                    Source::Solid(rgb) => *rgb,
                };
                let Some(rgb) = shade_fragment(rgb, self.uniforms) else {
                    continue;
                };
                let i = ((py as usize) * (target.width as usize) + px as usize) * 3;
                let dst = &mut target.color[i..i + 3];
                for (d, s) in dst.iter_mut().zip(rgb) {
                    *d = if opacity >= 1.0 {
                        to_unorm8(s)
                    } else {
                        to_unorm8(s * opacity + from_unorm8(*d) * (1.0 - opacity))
                    };
                }
            }
        }
    }
}

fn edge(a: ScreenVertex, b: ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

// Counter-clockwise in a y-up frame: top edges run toward -x, left edges run downward.
fn is_top_left(a: ScreenVertex, b: ScreenVertex) -> bool {
    (a.y == b.y && b.x < a.x) || b.y < a.y
}

fn covers(w: f32, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

fn sample(tex: &FrameRGB, uv: [f32; 2], filter: SampleFilter) -> [f32; 3] {
    let (w, h) = (tex.width as i64, tex.height as i64);
    let u = uv[0].clamp(0.0, 1.0) * tex.width as f32 - 0.5;
    let v = uv[1].clamp(0.0, 1.0) * tex.height as f32 - 0.5;
    let texel = |x: i64, y: i64| -> [f32; 3] {
        tex.pixel(x.clamp(0, w - 1) as u32, y.clamp(0, h - 1) as u32)
            .map(from_unorm8)
    };
    match filter {
        SampleFilter::Nearest => texel((u + 0.5).floor() as i64, (v + 0.5).floor() as i64),
        SampleFilter::Bilinear => {
            let (x0, y0) = (u.floor(), v.floor());
            let (fx, fy) = (u - x0, v - y0);
            let (x0, y0) = (x0 as i64, y0 as i64);
            let p00 = texel(x0, y0);
            let p10 = texel(x0 + 1, y0);
            let p01 = texel(x0, y0 + 1);
            let p11 = texel(x0 + 1, y0 + 1);
            let mut out = [0.0; 3];
            for ch in 0..3 {
                let top = p00[ch] + (p10[ch] - p00[ch]) * fx;
                let bottom = p01[ch] + (p11[ch] - p01[ch]) * fx;
                out[ch] = top + (bottom - top) * fy;
            }
            out
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
