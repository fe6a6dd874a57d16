use glam::{EulerRot, Quat, Vec3};
use serde::Deserialize;

/// Rotation axis of a spinning object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Position plus per-axis rotation angles in radians.
///
/// Angles compose in Y, X, Z order (yaw, pitch, roll); the object's own
/// forward axis is local +Z. Angles are never wrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Vec3::ZERO }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self { position, ..Default::default() }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.rotation.y, self.rotation.x, self.rotation.z)
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::Z
    }

    pub fn angle(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.rotation.x,
            Axis::Y => self.rotation.y,
            Axis::Z => self.rotation.z,
        }
    }

    /// Advance exactly one rotation component.
    pub fn rotate_about(&mut self, axis: Axis, delta: f32) {
        match axis {
            Axis::X => self.rotation.x += delta,
            Axis::Y => self.rotation.y += delta,
            Axis::Z => self.rotation.z += delta,
        }
    }

    /// Turn local +Z toward `target`. Returns false and leaves the rotation
    /// alone when the target sits on the object's position.
    pub fn look_at(&mut self, target: Vec3) -> bool {
        let Some(dir) = (target - self.position).try_normalize() else {
            return false;
        };
        self.rotation = Vec3::new(-dir.y.clamp(-1.0, 1.0).asin(), dir.x.atan2(dir.z), 0.0);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_about_touches_one_component() {
        let mut t = Transform::default();
        t.rotation = Vec3::new(0.1, 0.2, 0.3);
        t.rotate_about(Axis::Z, 1.0);
        assert_eq!(t.rotation, Vec3::new(0.1, 0.2, 1.3));
    }

    #[test]
    fn test_look_at_aims_forward_axis() {
        let targets = [
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(-3.0, 4.0, -7.0),
            Vec3::new(0.0, -10.0, 0.5),
            Vec3::new(0.0, 0.0, -1.0),
        ];
        for target in targets {
            let mut t = Transform::at(Vec3::new(0.5, -1.0, 2.0));
            assert!(t.look_at(target));
            let dir = (target - t.position).normalize();
            assert!(t.forward().dot(dir) > 0.9999, "target {target:?}, forward {:?}", t.forward());
        }
    }

    #[test]
    fn test_look_at_own_position_keeps_rotation() {
        let mut t = Transform::at(Vec3::ONE);
        t.rotation = Vec3::new(0.4, 0.0, 0.0);
        assert!(!t.look_at(Vec3::ONE));
        assert_eq!(t.rotation, Vec3::new(0.4, 0.0, 0.0));
    }
}
