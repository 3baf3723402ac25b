// src/utilities/color.rs
//
// Deterministic tints for tiles and the selection UI.
// The same content id always produces the same colour.

use nannou::color::{Hsl, Rgb};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub color: Rgb,
}

impl Tint {
    /// Empty cells.
    pub fn neutral() -> Self {
        Self {
            color: Rgb::new(0.35, 0.35, 0.38),
        }
    }

    /// Hue is hashed from the id, saturation and lightness are fixed.
    pub fn for_id(id: &str) -> Self {
        let hue = (fnv1a(id) % 360) as f32;
        Self {
            color: Rgb::from(Hsl::new(hue, 0.55, 0.5)),
        }
    }

    /// Same hue, lightness raised by `amount` (0..1).
    pub fn highlighted(self, amount: f32) -> Self {
        let hsl = Hsl::from(self.color);
        let lifted = Hsl::new(
            hsl.hue,
            hsl.saturation,
            (hsl.lightness + amount.max(0.0)).min(1.0),
        );
        Self {
            color: Rgb::from(lifted),
        }
    }
}

fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in s.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_is_stable_per_id() {
        assert_eq!(Tint::for_id("post-17"), Tint::for_id("post-17"));
        assert_ne!(Tint::for_id("post-17"), Tint::for_id("post-18"));
    }

    #[test]
    fn test_tint_keeps_fixed_saturation_and_lightness() {
        let hsl = Hsl::from(Tint::for_id("post-17").color);
        assert!((hsl.saturation - 0.55).abs() < 1e-3);
        assert!((hsl.lightness - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_highlight_lightens_without_shifting_hue() {
        let base = Tint::for_id("post-17");
        let lit = base.highlighted(0.25);
        let (before, after) = (Hsl::from(base.color), Hsl::from(lit.color));
        assert!((after.lightness - 0.75).abs() < 1e-3);
        let drift = (after.hue.to_positive_degrees() - before.hue.to_positive_degrees()).abs();
        assert!(drift < 0.5 || drift > 359.5);

        let capped = Hsl::from(base.highlighted(2.0).color);
        assert!(capped.lightness <= 1.0);
    }
}
