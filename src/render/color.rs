//! Packed `0xRRGGBBAA` pixels.
use glam::Vec3;

pub type Pixel = u32;

/// Fallback for missing textures and the horizon row.
pub const NEUTRAL_GRAY: Pixel = 0x8080_80FF;

#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Pixel {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32
}

#[inline]
pub const fn channels(p: Pixel) -> [u8; 4] {
    p.to_be_bytes()
}

#[inline]
pub const fn alpha(p: Pixel) -> u8 {
    (p & 0xFF) as u8
}

/// Multiplies r, g, b by `factor`, rounding and clamping to `[0, 255]`.
/// Alpha is copied unchanged.
#[inline]
pub fn scale_pixel(p: Pixel, factor: Vec3) -> Pixel {
    let [r, g, b, a] = channels(p);
    let ch = |c: u8, f: f32| -> u8 { (c as f32 * f).round().clamp(0.0, 255.0) as u8 };
    rgba(ch(r, factor.x), ch(g, factor.y), ch(b, factor.z), a)
}

/// Linear mix of two pixels, `t` in `[0, 255]` (0 = `a`).
#[inline]
pub fn mix(a: Pixel, b: Pixel, t: u8) -> Pixel {
    let ta = t as u16;
    let na = 255u16 - ta;
    let [ar, ag, ab, aa] = channels(a);
    let [br, bg, bb, ba] = channels(b);
    let m = |x: u8, y: u8| -> u8 { ((x as u16 * na + y as u16 * ta) / 255) as u8 };
    rgba(m(ar, br), m(ag, bg), m(ab, bb), m(aa, ba))
}
