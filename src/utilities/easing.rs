//src/utilities/easing.rs

// easing functions for selection and ripple motion
// all curves map 0.0..=1.0 onto 0.0..=1.0

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    Linear,
    #[default]
    EaseInOut,
    EaseIn,
    EaseOut,
    EaseOutCubic,
}

impl EasingType {
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::EaseInOut => ease_in_out(t),
            EasingType::EaseIn => ease_in(t),
            EasingType::EaseOut => ease_out(t),
            EasingType::EaseOutCubic => ease_out_cubic(t),
        }
    }
}

pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

pub fn ease_in(t: f32) -> f32 {
    t * t
}

pub fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

// moves `current` toward `target` by at most `rate * dt`
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let step = rate * dt;
    if (target - current).abs() <= step {
        target
    } else if target > current {
        current + step
    } else {
        current - step
    }
}

// frame-rate independent smoothing factor for exponential follow
pub fn follow_factor(rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 {
        1.0
    } else {
        1.0 - (-rate * dt).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_endpoints() {
        for easing in [
            EasingType::Linear,
            EasingType::EaseInOut,
            EasingType::EaseIn,
            EasingType::EaseOut,
            EasingType::EaseOutCubic,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_apply_clamps_input() {
        assert_eq!(EasingType::Linear.apply(-1.0), 0.0);
        assert_eq!(EasingType::Linear.apply(3.0), 1.0);
    }

    #[test]
    fn test_approach_does_not_overshoot() {
        assert_eq!(approach(0.0, 1.0, 2.0, 0.25), 0.5);
        assert_eq!(approach(0.9, 1.0, 2.0, 0.25), 1.0);
        assert_eq!(approach(1.0, 0.0, 2.0, 0.25), 0.5);
    }

    #[test]
    fn test_follow_factor_zero_rate_snaps() {
        assert_eq!(follow_factor(0.0, 0.016), 1.0);
        let f = follow_factor(10.0, 0.016);
        assert!(f > 0.0 && f < 1.0);
    }
}
