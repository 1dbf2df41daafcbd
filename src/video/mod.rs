pub mod decoder;
pub mod error;
pub mod frame;

pub use decoder::{probe_video, FrameStream, VideoInfo};
pub use error::VideoError;
pub use frame::{luma_from_rgb, Frame};
