/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map a normalized channel value to an 8-bit unorm byte.
pub fn to_unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Map an 8-bit unorm byte to `[0, 1]`.
pub fn from_unorm8(v: u8) -> f32 {
    (v as f32) / 255.0
}

/// NDC coordinate of the center of pixel `i` out of `n` along one axis.
pub fn pixel_center_ndc(i: u32, n: u32) -> f32 {
    ((i as f32 + 0.5) / n as f32) * 2.0 - 1.0
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
