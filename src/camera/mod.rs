mod builder;
#[cfg(all(target_os = "linux", feature = "camera"))]
mod pipeline;
mod interface;
pub mod mock;
mod still_command;
#[cfg(test)]
mod tests;

pub use builder::{build_frame_source, CameraInterfaceBuilder};
#[cfg(all(target_os = "linux", feature = "camera"))]
pub use pipeline::GstCamera;
pub use interface::FrameSource;
pub use still_command::StillCommandCamera;
