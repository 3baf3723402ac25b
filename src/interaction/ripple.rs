// src/interaction/ripple.rs
//
// Ripple: a lift / hold / return pulse spreading out from a triggered cell.
// Strength falls off with grid distance; the most recent trigger on a cell
// replaces whatever ripple it was running.

use glam::{Quat, Vec3};
use serde::Deserialize;

use crate::models::{InteractionPhase, Transform3D};
use crate::utilities::easing::{ease_in_out, ease_out_cubic};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Reach in grid cells
    pub radius: f32,
    /// Maximum lift toward the viewer
    pub lift: f32,
    /// Maximum tilt in radians
    pub tilt: f32,
    pub lift_duration: f32,
    pub hold_duration: f32,
    pub return_duration: f32,
    /// Impulse handed to simulated bodies at full strength
    pub impulse: f32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            lift: 0.6,
            tilt: 0.35,
            lift_duration: 0.25,
            hold_duration: 0.4,
            return_duration: 0.6,
            impulse: 1.5,
        }
    }
}

/// Falloff `(1 - d/r)²`. None when the cell is out of reach.
pub fn falloff(distance: f32, radius: f32) -> Option<f32> {
    if distance <= 0.0 {
        return Some(1.0);
    }
    if radius <= 0.0 || distance >= radius {
        return None;
    }
    let t = 1.0 - distance / radius;
    Some(t * t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleState {
    phase: InteractionPhase,
    elapsed: f32,
    strength: f32,
}

impl RippleState {
    pub fn new(strength: f32) -> Self {
        Self {
            phase: InteractionPhase::Lift,
            elapsed: 0.0,
            strength: strength.clamp(0.0, 1.0),
        }
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    fn duration(&self, config: &RippleConfig) -> Option<f32> {
        match self.phase {
            InteractionPhase::Lift => Some(config.lift_duration),
            InteractionPhase::Hold => Some(config.hold_duration),
            InteractionPhase::Return => Some(config.return_duration),
            InteractionPhase::Idle => None,
        }
    }

    /// Advances through the phases. Returns false once the ripple is over.
    pub fn advance(&mut self, dt: f32, config: &RippleConfig) -> bool {
        self.elapsed += dt.max(0.0);
        while let Some(duration) = self.duration(config) {
            let duration = duration.max(0.0);
            if self.elapsed < duration {
                return true;
            }
            self.elapsed -= duration;
            self.phase = match self.phase {
                InteractionPhase::Lift => InteractionPhase::Hold,
                InteractionPhase::Hold => InteractionPhase::Return,
                _ => InteractionPhase::Idle,
            };
        }
        self.elapsed = 0.0;
        false
    }

    /// Current pulse height, 0..=strength.
    pub fn value(&self, config: &RippleConfig) -> f32 {
        let progress = |duration: f32| {
            if duration > 0.0 {
                (self.elapsed / duration).clamp(0.0, 1.0)
            } else {
                1.0
            }
        };
        let shape = match self.phase {
            InteractionPhase::Lift => ease_out_cubic(progress(config.lift_duration)),
            InteractionPhase::Hold => 1.0,
            InteractionPhase::Return => 1.0 - ease_in_out(progress(config.return_duration)),
            InteractionPhase::Idle => 0.0,
        };
        shape * self.strength
    }

    pub fn offset(&self, config: &RippleConfig) -> Transform3D {
        let value = self.value(config);
        Transform3D {
            translation: Vec3::Z * config.lift * value,
            rotation: Quat::from_rotation_x(-config.tilt * value),
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_falloff() {
        assert_eq!(falloff(0.0, 3.0), Some(1.0));
        assert_abs_diff_eq!(falloff(1.5, 3.0).unwrap(), 0.25);
        assert_eq!(falloff(3.0, 3.0), None);
        assert_eq!(falloff(4.0, 3.0), None);
        assert_eq!(falloff(1.0, 0.0), None);
    }

    #[test]
    fn test_phases_run_in_order() {
        let config = RippleConfig::default();
        let mut ripple = RippleState::new(1.0);
        assert_eq!(ripple.phase(), InteractionPhase::Lift);

        assert!(ripple.advance(0.3, &config));
        assert_eq!(ripple.phase(), InteractionPhase::Hold);
        assert_abs_diff_eq!(ripple.value(&config), 1.0);

        assert!(ripple.advance(0.4, &config));
        assert_eq!(ripple.phase(), InteractionPhase::Return);

        assert!(!ripple.advance(1.0, &config));
        assert_eq!(ripple.phase(), InteractionPhase::Idle);
        assert_eq!(ripple.value(&config), 0.0);
    }

    #[test]
    fn test_large_step_skips_phases() {
        let config = RippleConfig::default();
        let mut ripple = RippleState::new(1.0);
        assert!(!ripple.advance(10.0, &config));
    }

    #[test]
    fn test_value_scales_with_strength() {
        let config = RippleConfig::default();
        let mut ripple = RippleState::new(0.25);
        ripple.advance(config.lift_duration + 0.01, &config);
        assert_eq!(ripple.phase(), InteractionPhase::Hold);
        let offset = ripple.offset(&config);
        assert_abs_diff_eq!(offset.translation.z, 0.25 * config.lift, epsilon = 1e-6);
    }
}
