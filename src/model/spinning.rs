use glam::Vec3;
use slotmap::new_key_type;

use super::{Axis, Transform};

new_key_type! {
    /// Handle to a model in the animated set.
    pub struct ModelKey;
}

/// A loaded mesh that turns about one axis at a fixed rate.
#[derive(Debug, Clone)]
pub struct SpinningObject {
    pub name: String,
    pub transform: Transform,
    pub color: [u8; 3],
    pub axis: Axis,
    /// Radians per tick
    pub speed: f32,
}

impl SpinningObject {
    pub fn new(name: impl Into<String>, position: Vec3, axis: Axis, speed: f32) -> Self {
        Self {
            name: name.into(),
            transform: Transform::at(position),
            color: [0x77, 0x77, 0xff],
            axis,
            speed,
        }
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn tick(&mut self) {
        self.transform.rotate_about(self.axis, self.speed);
    }

    /// Current angle about the declared axis.
    pub fn angle(&self) -> f32 {
        self.transform.angle(self.axis)
    }
}
