//! Fixed-point waveform helpers.
//!
//! Every 8-bit waveform completes exactly one period over the full `u8`
//! domain (and the 16-bit ones over `u16`), so a wrapping counter fed into
//! them loops without a visible seam.

use std::f32::consts::TAU;

/// Sine over one byte-sized period. `sin8(0) == 128`, peak at 64, trough at 192.
pub fn sin8(theta: u8) -> u8 {
    let s = (f32::from(theta) * TAU / 256.0).sin();
    (128.0 + s * 127.5).round().clamp(0.0, 255.0) as u8
}

pub fn cos8(theta: u8) -> u8 {
    sin8(theta.wrapping_add(64))
}

/// Triangle wave: rises 0..=254 over the first half period and falls back.
pub fn triwave8(theta: u8) -> u8 {
    let folded = if theta & 0x80 != 0 { 255 - theta } else { theta };
    folded << 1
}

/// Multiplication that saturates at 255 instead of wrapping.
pub fn qmul8(i: u8, j: u8) -> u8 {
    (u16::from(i) * u16::from(j)).min(255) as u8
}

/// Scales `value` by `scale / 256`; a scale of 255 is the identity.
pub fn scale8(value: u8, scale: u8) -> u8 {
    ((u16::from(value) * (1 + u16::from(scale))) >> 8) as u8
}

/// Sine over one `u16` period, returning `-32767..=32767`.
pub fn sin16(theta: u16) -> i16 {
    let s = (f32::from(theta) * TAU / 65_536.0).sin();
    (s * 32_767.0).round() as i16
}

pub fn cos16(theta: u16) -> i16 {
    sin16(theta.wrapping_add(16_384))
}

/// Integer linear re-map with truncating division, unclamped.
pub fn map_range(value: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Narrows a derived float to a byte the way an integer cast chain would:
/// truncate toward zero, then keep the low eight bits.
pub fn wrap8(value: f32) -> u8 {
    (value as i64) as u8
}

/// Truncates a derived float and clamps it into `min..=max`.
pub fn clamp_trunc(value: f32, min: i32, max: i32) -> i32 {
    (value as i32).clamp(min, max)
}
