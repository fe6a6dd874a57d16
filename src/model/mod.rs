// MODEL: Scene objects and camera state
pub mod camera;
pub mod transform;
pub mod spinning;
pub mod billboard;
pub mod particles;

pub use camera::{Camera, CameraPose};
pub use transform::{Axis, Transform};
pub use spinning::{ModelKey, SpinningObject};
pub use billboard::{has_frame_data, NoVideo, OrbitingBillboard, VideoFeed, HAVE_CURRENT_DATA};
pub use particles::ParticleField;
