use std::path::PathBuf;
use std::time::Duration;

use glam::{UVec2, Vec2};

use crate::scene::MAX_BLOBS;

/// Driver configuration. Everything else about the scene is fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub title: String,
    /// Initial number of blobs, kept in `1..=MAX_BLOBS`.
    pub num_balls: usize,
    /// Fraction of the window resolution traced on the CPU, in `(0, 1]`.
    pub render_scale: f32,
    /// Frames arriving later than this after the previous one count as dropped.
    pub frame_budget: Duration,
    pub snapshot_dir: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            title: "metaballs".to_owned(),
            num_balls: 5,
            render_scale: 0.5,
            frame_budget: Duration::from_secs_f64(1.0 / 30.0),
            snapshot_dir: PathBuf::from("."),
        }
    }
}

impl RenderSettings {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_num_balls(mut self, num_balls: usize) -> Self {
        self.num_balls = clamp_balls(num_balls);
        self
    }

    pub fn with_render_scale(mut self, scale: f32) -> Self {
        self.render_scale = if scale.is_finite() && scale > 0.0 {
            scale.min(1.0)
        } else {
            Self::default().render_scale
        };
        self
    }

    pub fn with_frame_budget(mut self, budget: Duration) -> Self {
        self.frame_budget = budget;
        self
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    /// CPU render resolution for a window of `window` pixels, at least 1x1.
    pub fn render_resolution(&self, window: UVec2) -> UVec2 {
        (window.as_vec2() * self.render_scale)
            .round()
            .as_uvec2()
            .max(UVec2::ONE)
    }

    /// Maps a window cursor position into render pixels.
    pub fn render_cursor(&self, window_cursor: Vec2) -> Vec2 {
        window_cursor * self.render_scale
    }
}

pub fn clamp_balls(num_balls: usize) -> usize {
    num_balls.clamp(1, MAX_BLOBS)
}
