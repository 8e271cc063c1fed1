pub mod application;
pub mod camera;
pub mod controls;
pub mod error;
pub mod present;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod shading;
pub mod texture;
pub mod tracer;
pub mod util;
