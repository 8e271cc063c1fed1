use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the window and presentation layer. The renderer itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("could not create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("could not create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no graphics adapter compatible with the window surface")]
    NoAdapter,

    #[error("could not acquire device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface does not support the adapter")]
    UnsupportedSurface,

    #[error("snapshot encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
