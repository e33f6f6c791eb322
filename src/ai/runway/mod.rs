pub mod client;
pub mod types;
pub mod video;

pub use client::RunwayHttpClient;
pub use video::RunwayVideoClient;
