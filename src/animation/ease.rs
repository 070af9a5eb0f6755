use crate::foundation::error::FoldError;

/// Easing functions used to map normalized fold progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in (`p²`).
    #[default]
    Quad,
    /// Cubic ease-in (`p³`).
    Cubic,
    /// Ease-out with overshoot before settling at 1.
    Back,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in/out.
    InOutCubic,
}

const BACK_C1: f64 = 1.70158;
const BACK_C3: f64 = BACK_C1 + 1.0;

impl Ease {
    /// All easing kinds, in declaration order.
    pub const ALL: [Ease; 6] = [
        Self::Linear,
        Self::Quad,
        Self::Cubic,
        Self::Back,
        Self::InOutQuad,
        Self::InOutCubic,
    ];

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    ///
    /// Input is clamped; [`Ease::Back`] may return values slightly above 1.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Quad => t * t,
            Self::Cubic => t * t * t,
            Self::Back => {
                let u = t - 1.0;
                1.0 + BACK_C3 * u.powi(3) + BACK_C1 * u.powi(2)
            }
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }

    /// Stable kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quad => "quad",
            Self::Cubic => "cubic",
            Self::Back => "back",
            Self::InOutQuad => "in-out-quad",
            Self::InOutCubic => "in-out-cubic",
        }
    }
}

impl std::str::FromStr for Ease {
    type Err = FoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        match norm.as_str() {
            "linear" | "none" => Ok(Self::Linear),
            "quad" | "in-quad" => Ok(Self::Quad),
            "cubic" | "in-cubic" => Ok(Self::Cubic),
            "back" | "out-back" => Ok(Self::Back),
            "in-out-quad" | "inoutquad" => Ok(Self::InOutQuad),
            "in-out-cubic" | "inoutcubic" => Ok(Self::InOutCubic),
            _ => Err(FoldError::validation(format!("unknown easing '{s}'"))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
