use crate::foundation::core::Axis;
use crate::foundation::error::{FoldError, FoldResult};
use crate::geometry::mesh::Mesh;
use crate::render::shader::Hinge;

/// Which side of its seam a region lies on, measured along the fold axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeamSide {
    /// Region coordinates are `<=` the seam (left of a vertical seam, below a horizontal one).
    Below,
    /// Region coordinates are `>=` the seam.
    Above,
}

/// Rectangular flap of the surface plus the hinge it rotates about.
///
/// The region spans `[lo, hi]` along `axis` and the full `[-1, 1]` across it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldRegion {
    /// Fold axis; the seam is perpendicular to it.
    pub axis: Axis,
    /// Lower bound along the axis.
    pub lo: f32,
    /// Upper bound along the axis.
    pub hi: f32,
    /// Hinge coordinate along the axis; lies within `[lo, hi]`.
    pub seam: f32,
}

impl FoldRegion {
    /// Create a validated region.
    pub fn new(axis: Axis, lo: f32, hi: f32, seam: f32) -> FoldResult<Self> {
        let region = Self { axis, lo, hi, seam };
        region.validate()?;
        Ok(region)
    }

    /// Check bounds ordering and seam placement.
    pub fn validate(&self) -> FoldResult<()> {
        if !(self.lo.is_finite() && self.hi.is_finite() && self.seam.is_finite()) {
            return Err(FoldError::geometry("fold region bounds must be finite"));
        }
        if self.lo >= self.hi || self.lo < -1.0 || self.hi > 1.0 {
            return Err(FoldError::geometry(format!(
                "fold region [{}, {}] must be a non-empty sub-interval of [-1, 1]",
                self.lo, self.hi
            )));
        }
        if self.seam < self.lo || self.seam > self.hi {
            return Err(FoldError::geometry(format!(
                "seam {} lies outside fold region [{}, {}]",
                self.seam, self.lo, self.hi
            )));
        }
        Ok(())
    }

    /// Side of the seam the bulk of the region lies on.
    pub fn side(&self) -> SeamSide {
        if (self.lo + self.hi) * 0.5 < self.seam {
            SeamSide::Below
        } else {
            SeamSide::Above
        }
    }

    /// Sign applied to a fold angle so the flap swings toward (`true`) or away from the
    /// viewer. Regions on opposite sides of a seam get opposite signs.
    pub fn rotation_sign(&self, toward_viewer: bool) -> f32 {
        let base = match self.side() {
            SeamSide::Below => -1.0,
            SeamSide::Above => 1.0,
        };
        if toward_viewer { base } else { -base }
    }

    /// Largest distance from the seam to either region bound.
    pub fn extent(&self) -> f32 {
        (self.hi - self.seam).max(self.seam - self.lo)
    }

    /// Grid mesh covering the region.
    pub fn mesh(&self, segments: u32) -> FoldResult<Mesh> {
        Mesh::grid(segments, self.axis, self.lo, self.hi)
    }

    /// Hinge for a rotation of `magnitude` radians in the requested direction.
    pub fn hinge(&self, magnitude: f32, toward_viewer: bool) -> Hinge {
        Hinge {
            axis: self.axis,
            seam: self.seam,
            angle: magnitude * self.rotation_sign(toward_viewer),
            seam_scale: 1.0,
            extent: self.extent(),
            push: 0.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/region.rs"]
mod tests;
