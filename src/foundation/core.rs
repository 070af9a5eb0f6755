use crate::foundation::error::{FoldError, FoldResult};

/// Frames-per-second represented as a rational `num/den`.
///
/// Deserializes from either a bare integer (`25`) or an object (`{"num": 30000, "den": 1001}`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "FpsRepr")]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> FoldResult<Self> {
        if num == 0 {
            return Err(FoldError::validation("fps numerator must be > 0"));
        }
        if den == 0 {
            return Err(FoldError::validation("fps denominator must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Integer frame rate (`den == 1`).
    pub fn whole(num: u32) -> FoldResult<Self> {
        Self::new(num, 1)
    }

    /// Convert to floating-point frames-per-second.
    pub fn as_f64(self) -> f64 {
        (self.num as f64) / (self.den as f64)
    }

    /// Number of frames covering `secs` seconds, rounded to nearest with ties to even.
    pub fn frames_for_secs(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round_ties_even().max(0.0) as u64
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl std::str::FromStr for Fps {
    type Err = FoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| FoldError::validation(format!("invalid fps '{s}'")))
        };
        match s.split_once('/') {
            Some((num, den)) => Self::new(parse(num)?, parse(den)?),
            None => Self::whole(parse(s)?),
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum FpsRepr {
    Whole(u32),
    Rational { num: u32, den: u32 },
}

impl TryFrom<FpsRepr> for Fps {
    type Error = FoldError;

    fn try_from(value: FpsRepr) -> Result<Self, Self::Error> {
        match value {
            FpsRepr::Whole(num) => Self::whole(num),
            FpsRepr::Rational { num, den } => Self::new(num, den),
        }
    }
}

/// Output raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a validated resolution.
    pub fn new(width: u32, height: u32) -> FoldResult<Self> {
        let out = Self { width, height };
        out.validate()?;
        Ok(out)
    }

    /// Reject empty rasters and sizes whose RGB byte length would overflow `usize`.
    pub fn validate(self) -> FoldResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FoldError::validation("resolution width/height must be > 0"));
        }
        self.rgb_len().map(|_| ())
    }

    /// Byte length of a tightly packed RGB8 raster of this size.
    pub fn rgb_len(self) -> FoldResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(3))
            .ok_or_else(|| FoldError::validation("resolution byte size overflow"))
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Resolution {
    type Err = FoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| FoldError::validation(format!("resolution '{s}' must look like WxH")))?;
        let w = w
            .trim()
            .parse::<u32>()
            .map_err(|_| FoldError::validation(format!("invalid resolution width in '{s}'")))?;
        let h = h
            .trim()
            .parse::<u32>()
            .map_err(|_| FoldError::validation(format!("invalid resolution height in '{s}'")))?;
        Self::new(w, h)
    }
}

/// Axis of normalized device space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal (`x`).
    X,
    /// Vertical (`y`).
    Y,
}

impl Axis {
    /// Split an `(x, y)` pair into `(along, across)` for this axis.
    pub fn split(self, x: f32, y: f32) -> (f32, f32) {
        match self {
            Self::X => (x, y),
            Self::Y => (y, x),
        }
    }

    /// Inverse of [`Axis::split`].
    pub fn join(self, along: f32, across: f32) -> (f32, f32) {
        match self {
            Self::X => (along, across),
            Self::Y => (across, along),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
