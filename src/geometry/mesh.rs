use crate::foundation::core::Axis;
use crate::foundation::error::{FoldError, FoldResult};

/// Segment count used by every fold unless overridden.
pub const DEFAULT_SEGMENTS: u32 = 20;

const MIN_TRIANGLE_AREA: f32 = 1e-9;

/// Triangle mesh in normalized device coordinates.
///
/// Positions have `x, y ∈ [-1, 1]` and start flat (`z = 0`). Texture coordinates follow the
/// image convention: `u` grows to the right, `v = 0` is the top row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Texture coordinates, parallel to `positions`.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list; counter-clockwise in a y-up frame.
    pub indices: Vec<u32>,
}

/// Texture coordinate of an NDC point within the full-frame texture.
pub fn texcoord(x: f32, y: f32) -> [f32; 2] {
    [(x + 1.0) * 0.5, 1.0 - (y + 1.0) * 0.5]
}

impl Mesh {
    /// Build a planar `(N+1) × (N+1)` grid spanning `[lo, hi]` along `axis` and the full
    /// `[-1, 1]` across it.
    ///
    /// UVs are mapped into the full-frame texture, so a half-width grid samples the matching
    /// half of the image rather than a stretched copy of the whole.
    pub fn grid(segments: u32, axis: Axis, lo: f32, hi: f32) -> FoldResult<Self> {
        if segments < 1 {
            return Err(FoldError::geometry("mesh segment count must be >= 1"));
        }
        if !lo.is_finite() || !hi.is_finite() {
            return Err(FoldError::geometry("mesh bounds must be finite"));
        }
        if lo >= hi {
            return Err(FoldError::geometry(format!(
                "mesh interval [{lo}, {hi}] is empty"
            )));
        }
        if lo < -1.0 || hi > 1.0 {
            return Err(FoldError::geometry(format!(
                "mesh interval [{lo}, {hi}] exceeds [-1, 1]"
            )));
        }

        let n = segments as usize;
        let stride = n + 1;
        let count = stride
            .checked_mul(stride)
            .filter(|c| *c <= u32::MAX as usize)
            .ok_or_else(|| FoldError::geometry("mesh segment count too large"))?;

        let mut positions = Vec::with_capacity(count);
        let mut uvs = Vec::with_capacity(count);
        for j in 0..stride {
            let across = -1.0 + 2.0 * (j as f32) / (n as f32);
            for i in 0..stride {
                // Pin the last column to `hi` exactly so adjacent flaps share their seam.
                let along = if i == n {
                    hi
                } else {
                    lo + (hi - lo) * (i as f32) / (n as f32)
                };
                let (x, y) = axis.join(along, across);
                positions.push([x, y, 0.0]);
                uvs.push(texcoord(x, y));
            }
        }

        let mut indices = Vec::with_capacity(n * n * 6);
        for j in 0..n {
            for i in 0..n {
                let a = (j * stride + i) as u32;
                let b = a + 1;
                let d = a + stride as u32;
                let e = d + 1;
                match axis {
                    Axis::X => indices.extend_from_slice(&[a, b, e, a, e, d]),
                    // Swapping axes mirrors the grid, so flip winding to stay counter-clockwise.
                    Axis::Y => indices.extend_from_slice(&[a, e, b, a, d, e]),
                }
            }
        }

        Ok(Self {
            positions,
            uvs,
            indices,
        })
    }

    /// Two-triangle quad from four counter-clockwise corners and their texture coordinates.
    pub fn quad(corners: [[f32; 2]; 4], uvs: [[f32; 2]; 4]) -> FoldResult<Self> {
        let mesh = Self {
            positions: corners.iter().map(|c| [c[0], c[1], 0.0]).collect(),
            uvs: uvs.to_vec(),
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Axis-aligned quad covering `[x0, x1] × [y0, y1]`, textured from the matching window.
    pub fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> FoldResult<Self> {
        let corners = [[x0, y0], [x1, y0], [x1, y1], [x0, y1]];
        Self::quad(corners, corners.map(|[x, y]| texcoord(x, y)))
    }

    /// Quad covering the whole frame.
    pub fn fullscreen() -> Self {
        let corners: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
        Self {
            positions: corners.iter().map(|c| [c[0], c[1], 0.0]).collect(),
            uvs: corners.iter().map(|c| texcoord(c[0], c[1])).collect(),
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// Untextured triangle list; each triple of corners is one counter-clockwise triangle.
    pub fn triangles(corners: &[[f32; 2]]) -> FoldResult<Self> {
        if corners.is_empty() || corners.len() % 3 != 0 {
            return Err(FoldError::geometry(
                "triangle list needs a non-zero multiple of 3 corners",
            ));
        }
        let mesh = Self {
            positions: corners.iter().map(|c| [c[0], c[1], 0.0]).collect(),
            uvs: corners.iter().map(|c| texcoord(c[0], c[1])).collect(),
            indices: (0..corners.len() as u32).collect(),
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Signed area of triangle `t` in the xy plane (positive when counter-clockwise).
    pub fn signed_area(&self, t: usize) -> f32 {
        let i = &self.indices[t * 3..t * 3 + 3];
        let a = self.positions[i[0] as usize];
        let b = self.positions[i[1] as usize];
        let c = self.positions[i[2] as usize];
        0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]))
    }

    /// Check the structural invariants: parallel attribute lists, in-range indices and
    /// non-degenerate counter-clockwise triangles.
    pub fn validate(&self) -> FoldResult<()> {
        if self.positions.len() != self.uvs.len() {
            return Err(FoldError::geometry(format!(
                "mesh has {} positions but {} texcoords",
                self.positions.len(),
                self.uvs.len()
            )));
        }
        if self.indices.is_empty() || self.indices.len() % 3 != 0 {
            return Err(FoldError::geometry(
                "mesh index count must be a non-zero multiple of 3",
            ));
        }
        let count = self.positions.len();
        if let Some(bad) = self.indices.iter().find(|i| **i as usize >= count) {
            return Err(FoldError::geometry(format!(
                "mesh index {bad} out of range for {count} vertices"
            )));
        }
        for t in 0..self.triangle_count() {
            if self.signed_area(t) <= MIN_TRIANGLE_AREA {
                return Err(FoldError::geometry(format!(
                    "mesh triangle {t} is degenerate or clockwise"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mesh.rs"]
mod tests;
