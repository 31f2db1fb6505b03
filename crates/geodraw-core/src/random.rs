//! Random color source.
//!
//! Colors are drawn from a per-thread generator so that a seeded test is not
//! disturbed by other threads drawing colors at the same time.

use std::cell::RefCell;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

thread_local! {
    static RNG: RefCell<StdRng> = RefCell::new(StdRng::from_entropy());
}

/// Reseeds the calling thread's color generator.
pub fn seed_random(seed: u64) {
    RNG.with(|rng| *rng.borrow_mut() = StdRng::seed_from_u64(seed));
}

/// Returns a fresh, saturated and bright color.
pub fn random_color() -> Vec3 {
    RNG.with(|rng| random_color_with(&mut *rng.borrow_mut()))
}

/// Returns a fresh, saturated and bright color drawn from `rng`.
///
/// Hue is uniform; saturation and value stay high so that colors are well
/// separated from each other and never black.
pub fn random_color_with<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let hue = rng.gen_range(0.0..360.0);
    let saturation = rng.gen_range(0.5..1.0);
    let value = rng.gen_range(0.6..1.0);
    hsv_to_rgb(hue, saturation, value)
}

/// Converts HSV (hue in degrees) to RGB in `[0, 1]`.
fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Vec3 {
    let c = value * saturation;
    let h = (hue / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = value - c;
    Vec3::new(r + m, g + m, b + m)
}
