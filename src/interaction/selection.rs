// src/interaction/selection.rs
//
// Selection pops the chosen tile out of the wall.
// Progress moves linearly at a fixed rate; offsets use the eased value.

use glam::{Quat, Vec3};
use serde::Deserialize;

use crate::models::Transform3D;
use crate::utilities::easing::{approach, EasingType};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Progress units per second
    pub rate: f32,
    pub lift: f32,
    pub pop_out: f32,
    /// Turn toward the viewer, radians
    pub tilt: f32,
    /// Extra scale at full selection
    pub scale: f32,
    pub easing: EasingType,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            rate: 4.0,
            lift: 0.2,
            pop_out: 1.2,
            tilt: 0.25,
            scale: 0.25,
            easing: EasingType::EaseInOut,
        }
    }
}

pub fn step_progress(progress: f32, selected: bool, rate: f32, dt: f32) -> f32 {
    let target = if selected { 1.0 } else { 0.0 };
    approach(progress, target, rate.max(0.0), dt.max(0.0)).clamp(0.0, 1.0)
}

pub fn offset(progress: f32, config: &SelectionConfig) -> Transform3D {
    let eased = config.easing.apply(progress);
    Transform3D {
        translation: Vec3::new(0.0, config.lift * eased, config.pop_out * eased),
        rotation: Quat::from_rotation_y(config.tilt * eased),
        scale: 1.0 + config.scale * eased,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_progress_rises_and_decays() {
        let mut progress = 0.0;
        for _ in 0..10 {
            progress = step_progress(progress, true, 4.0, 0.05);
        }
        assert_abs_diff_eq!(progress, 1.0);
        progress = step_progress(progress, true, 4.0, 0.05);
        assert_eq!(progress, 1.0);

        let next = step_progress(progress, false, 4.0, 0.05);
        assert_abs_diff_eq!(next, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_offsets_follow_eased_progress() {
        let config = SelectionConfig::default();
        let rest = offset(0.0, &config);
        assert_eq!(rest, Transform3D::default());

        let full = offset(1.0, &config);
        assert_abs_diff_eq!(full.translation.z, config.pop_out);
        assert_abs_diff_eq!(full.scale, 1.0 + config.scale);

        let half = offset(0.5, &config);
        assert!(half.translation.z > 0.0 && half.translation.z < full.translation.z);
    }
}
