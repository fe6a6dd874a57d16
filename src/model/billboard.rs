use glam::Vec3;

use super::Transform;

/// Source of the image shown on the billboard's face.
///
/// Decoding and playback belong to the implementor; the scene only asks
/// whether a fresh frame is available this tick.
pub trait VideoFeed {
    fn has_current_frame(&self) -> bool;
}

/// `HTMLMediaElement.readyState` value at which the current frame can be drawn.
pub const HAVE_CURRENT_DATA: u16 = 2;

/// Whether a media element in `ready_state` has image data for the current position.
pub fn has_frame_data(ready_state: u16) -> bool {
    ready_state >= HAVE_CURRENT_DATA
}

/// A feed that never produces frames, used until a real one is attached.
pub struct NoVideo;

impl VideoFeed for NoVideo {
    fn has_current_frame(&self) -> bool {
        false
    }
}

/// Flat surface circling the origin at a fixed height while facing the camera.
#[derive(Debug, Clone)]
pub struct OrbitingBillboard {
    pub transform: Transform,
    pub radius: f32,
    pub angle: f32,
    /// Radians per tick
    pub angular_speed: f32,
    pub height: f32,
    texture_dirty: bool,
}

impl OrbitingBillboard {
    pub fn new(radius: f32, height: f32, angular_speed: f32) -> Self {
        let mut billboard = Self {
            transform: Transform::default(),
            radius,
            angle: 0.0,
            angular_speed,
            height,
            texture_dirty: false,
        };
        billboard.transform.position = billboard.orbit_position();
        billboard
    }

    pub fn orbit_position(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.angle.cos(),
            self.height,
            self.radius * self.angle.sin(),
        )
    }

    /// Advance along the orbit, then turn to face `viewer`.
    pub fn tick(&mut self, viewer: Vec3) {
        self.angle += self.angular_speed;
        self.transform.position = self.orbit_position();
        self.transform.look_at(viewer);
    }

    pub fn refresh_texture(&mut self, feed: &dyn VideoFeed) {
        if feed.has_current_frame() {
            self.texture_dirty = true;
        }
    }

    /// Returns whether the renderer should re-upload the video texture, and clears the flag.
    pub fn take_texture_dirty(&mut self) -> bool {
        std::mem::take(&mut self.texture_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Playing;

    impl VideoFeed for Playing {
        fn has_current_frame(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_four_ticks_of_slow_orbit() {
        let mut b = OrbitingBillboard::new(1000.0, 60.0, 0.0005);
        let viewer = Vec3::new(0.0, 1.6, 5.0);
        for _ in 0..4 {
            b.tick(viewer);
        }

        assert!((b.angle - 0.002).abs() < 1e-7);
        let p = b.transform.position;
        assert!((p.x - 999.998).abs() < 1e-2, "x was {}", p.x);
        assert_eq!(p.y, 60.0);
        assert!((p.z - 2.0).abs() < 1e-3, "z was {}", p.z);
    }

    #[test]
    fn test_faces_viewer_every_tick() {
        let mut b = OrbitingBillboard::new(20.0, 3.0, 0.3);
        let mut viewer = Vec3::new(0.0, 1.6, 5.0);
        for i in 0..30 {
            viewer.x += 0.5 * i as f32;
            b.tick(viewer);
            let dir = (viewer - b.transform.position).normalize();
            assert!(b.transform.forward().dot(dir) > 0.9999);
            assert!((b.transform.position.length_squared() - (400.0 + 9.0)).abs() < 1e-2);
        }
    }

    #[test]
    fn test_ready_state_threshold() {
        // HAVE_NOTHING, HAVE_METADATA
        assert!(!has_frame_data(0));
        assert!(!has_frame_data(1));
        // HAVE_CURRENT_DATA, HAVE_FUTURE_DATA, HAVE_ENOUGH_DATA
        assert!(has_frame_data(2));
        assert!(has_frame_data(3));
        assert!(has_frame_data(4));
    }

    #[test]
    fn test_texture_refresh_follows_feed() {
        let mut b = OrbitingBillboard::new(10.0, 0.0, 0.1);
        b.refresh_texture(&NoVideo);
        assert!(!b.take_texture_dirty());

        b.refresh_texture(&Playing);
        assert!(b.take_texture_dirty());
        assert!(!b.take_texture_dirty());
    }
}
