use glam::{Mat4, Vec3};

/// Eye position and yaw/pitch orientation captured at startup, restored on reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

pub struct Camera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
    home: CameraPose,
}

impl Camera {
    /// Yaw of -PI/2 with zero pitch looks down -Z.
    pub fn new(home: CameraPose, width: u32, height: u32) -> Self {
        Self {
            eye: home.eye,
            yaw: home.yaw,
            pitch: home.pitch,
            up: Vec3::Y,
            fov_y: 75f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            z_near: 0.1,
            z_far: 5000.0,
            home,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let cy = self.yaw;
        let cp = self.pitch.clamp(-1.5533, 1.5533); // Slightly less than π/2 to avoid gimbal lock
        Vec3::new(cy.cos() * cp.cos(), cp.sin(), cy.sin() * cp.cos()).normalize()
    }

    pub fn target(&self) -> Vec3 { self.eye + self.forward() }

    pub fn set_aspect(&mut self, width: u32, height: u32) { self.aspect = width as f32 / height.max(1) as f32; }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target(), self.up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * view
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose { eye: self.eye, yaw: self.yaw, pitch: self.pitch }
    }

    pub fn home(&self) -> CameraPose {
        self.home
    }

    /// Restore the pose captured at construction.
    pub fn reset(&mut self) {
        self.eye = self.home.eye;
        self.yaw = self.home.yaw;
        self.pitch = self.home.pitch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn home() -> CameraPose {
        CameraPose { eye: Vec3::new(0.0, 1.6, 5.0), yaw: -FRAC_PI_2, pitch: 0.0 }
    }

    #[test]
    fn test_home_orientation_faces_negative_z() {
        let cam = Camera::new(home(), 800, 600);
        let f = cam.forward();
        assert!((f - Vec3::NEG_Z).length() < 1e-5, "forward was {f:?}");
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut cam = Camera::new(home(), 800, 600);
        cam.eye = Vec3::new(-40.0, 12.0, 3.5);
        cam.yaw = 1.2;
        cam.pitch = -0.7;

        cam.reset();
        let once = cam.pose();
        cam.reset();

        assert_eq!(once, home());
        assert_eq!(cam.pose(), home());
    }

    #[test]
    fn test_view_proj_centres_point_ahead() {
        let cam = Camera::new(home(), 800, 600);
        let clip = cam.view_proj() * glam::Vec4::new(0.0, 1.6, -5.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_zero_height_does_not_divide_by_zero() {
        let mut cam = Camera::new(home(), 800, 0);
        assert!(cam.aspect.is_finite());
        cam.set_aspect(1024, 0);
        assert!(cam.aspect.is_finite());
    }
}
