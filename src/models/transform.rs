// src/models/transform.rs
//
// Per-cell transform handed to the renderer.

use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl Transform3D {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    // combine two transforms, other is applied on top of self
    pub fn combine(&self, other: &Transform3D) -> Transform3D {
        Transform3D {
            translation: self.translation + other.translation,
            rotation: other.rotation * self.rotation,
            scale: self.scale * other.scale,
        }
    }

    pub fn lerp(&self, other: &Transform3D, t: f32) -> Transform3D {
        Transform3D {
            translation: self.translation.lerp(other.translation, t),
            rotation: self.rotation.slerp(other.rotation, t),
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transform() {
        let transform = Transform3D::default();
        assert_eq!(transform.translation, Vec3::ZERO);
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert_eq!(transform.scale, 1.0);
    }

    #[test]
    fn test_combine_transforms() {
        let t1 = Transform3D {
            translation: Vec3::new(1.0, 2.0, 0.0),
            rotation: Quat::IDENTITY,
            scale: 2.0,
        };
        let t2 = Transform3D {
            translation: Vec3::new(3.0, 4.0, 1.0),
            rotation: Quat::IDENTITY,
            scale: 3.0,
        };

        let combined = t1.combine(&t2);
        assert_eq!(combined.translation, Vec3::new(4.0, 6.0, 1.0));
        assert_eq!(combined.scale, 6.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Transform3D::from_translation(Vec3::ZERO);
        let b = Transform3D::from_translation(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(a.lerp(&b, 0.0).translation, Vec3::ZERO);
        assert!(a.lerp(&b, 1.0).translation.abs_diff_eq(b.translation, 1e-6));
        assert!(a
            .lerp(&b, 0.5)
            .translation
            .abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
    }
}
