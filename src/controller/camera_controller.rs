use glam::Vec3;
use crate::controller::input::MovementIntent;
use crate::model::Camera;

/// Handles camera movement and orientation
///
/// Movement is a fixed step per tick, so effective speed follows the frame
/// rate. Strafing shifts along world X rather than the camera's right vector.
pub struct CameraController {
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
}

impl CameraController {
    pub fn new(move_speed: f32, mouse_sensitivity: f32) -> Self {
        Self {
            move_speed,
            mouse_sensitivity,
        }
    }

    /// Apply mouse look delta to camera
    pub fn apply_look(&self, camera: &mut Camera, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        camera.yaw += dx * self.mouse_sensitivity;
        let pi_half = std::f32::consts::PI / 2.0;
        camera.pitch = (camera.pitch - dy * self.mouse_sensitivity).clamp(-pi_half, pi_half);
    }

    /// Displacement for one tick. Active intents add up without normalisation.
    pub fn displacement(&self, forward: Vec3, intent: &MovementIntent) -> Vec3 {
        let speed = self.move_speed;
        let mut cam_move = Vec3::ZERO;

        if intent.forward {
            cam_move += forward * speed;
        }
        if intent.backward {
            cam_move += forward * -speed;
        }
        if intent.left {
            cam_move.x -= speed;
        }
        if intent.right {
            cam_move.x += speed;
        }
        if intent.up {
            cam_move.y += speed;
        }
        if intent.down {
            cam_move.y -= speed;
        }

        cam_move
    }

    /// Move the camera for one tick based on held intents
    pub fn fly_move(&self, camera: &mut Camera, intent: &MovementIntent) {
        if intent.is_idle() {
            return;
        }
        camera.eye += self.displacement(camera.forward(), intent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CameraPose;
    use std::f32::consts::FRAC_PI_2;

    fn camera() -> Camera {
        Camera::new(
            CameraPose { eye: Vec3::new(0.0, 1.6, 5.0), yaw: -FRAC_PI_2, pitch: 0.0 },
            800,
            600,
        )
    }

    fn only(set: impl Fn(&mut MovementIntent)) -> MovementIntent {
        let mut intent = MovementIntent::default();
        set(&mut intent);
        intent
    }

    #[test]
    fn test_single_intent_moves_exactly_move_speed() {
        let controller = CameraController::new(0.8, 0.002);
        let cases: [(MovementIntent, Vec3); 4] = [
            (only(|i| i.left = true), Vec3::new(-0.8, 0.0, 0.0)),
            (only(|i| i.right = true), Vec3::new(0.8, 0.0, 0.0)),
            (only(|i| i.up = true), Vec3::new(0.0, 0.8, 0.0)),
            (only(|i| i.down = true), Vec3::new(0.0, -0.8, 0.0)),
        ];
        for (intent, expected) in cases {
            let mut cam = camera();
            let start = cam.pose();
            controller.fly_move(&mut cam, &intent);
            assert!((cam.eye - start.eye - expected).length() < 1e-5, "{intent:?}");
            assert_eq!((cam.yaw, cam.pitch), (start.yaw, start.pitch));
        }
    }

    #[test]
    fn test_forward_and_backward_follow_view_direction() {
        let controller = CameraController::new(1.0, 0.002);
        let mut cam = camera();
        cam.yaw = 0.3;
        cam.pitch = 0.5;
        let forward = cam.forward();
        let start = cam.eye;

        controller.fly_move(&mut cam, &only(|i| i.forward = true));
        assert!((cam.eye - (start + forward)).length() < 1e-5);
        assert!(((cam.eye - start).length() - 1.0).abs() < 1e-5);

        controller.fly_move(&mut cam, &only(|i| i.backward = true));
        assert!((cam.eye - start).length() < 1e-5);
    }

    #[test]
    fn test_strafe_stays_on_world_x_when_turned() {
        let controller = CameraController::new(0.5, 0.002);
        let mut cam = camera();
        cam.yaw = 0.0; // looking down +X, camera right is +Z
        let start = cam.eye;
        controller.fly_move(&mut cam, &only(|i| i.right = true));
        assert_eq!(cam.eye - start, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_diagonal_is_not_normalised() {
        let controller = CameraController::new(1.0, 0.002);
        let intent = MovementIntent { forward: true, right: true, ..Default::default() };
        let d = controller.displacement(Vec3::NEG_Z, &intent);
        assert!((d - Vec3::new(1.0, 0.0, -1.0)).length() < 1e-6);
        assert!(d.length() > 1.4);
    }

    #[test]
    fn test_opposite_intents_cancel() {
        let controller = CameraController::new(0.8, 0.002);
        let intent = MovementIntent { up: true, down: true, left: true, right: true, ..Default::default() };
        assert_eq!(controller.displacement(Vec3::NEG_Z, &intent), Vec3::ZERO);
    }

    #[test]
    fn test_look_clamps_pitch() {
        let controller = CameraController::new(0.5, 0.002);
        let mut cam = camera();
        controller.apply_look(&mut cam, 100.0, -10_000.0);
        assert!((cam.yaw - (-FRAC_PI_2 + 0.2)).abs() < 1e-5);
        assert_eq!(cam.pitch, FRAC_PI_2);
    }
}
