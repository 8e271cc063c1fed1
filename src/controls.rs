use glam::{UVec2, Vec2};
use winit::event::{ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

use crate::renderer::FrameInputs;
use crate::settings::{clamp_balls, RenderSettings};

/// Operator input: blob count and last known cursor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameControls {
    pub num_balls: usize,
    /// Window pixels, origin top-left; `(0, 0)` until the pointer moves.
    pub cursor: Vec2,
}

impl FrameControls {
    pub fn new(num_balls: usize) -> Self {
        Self {
            num_balls: clamp_balls(num_balls),
            cursor: Vec2::ZERO,
        }
    }

    /// Returns true when the event changed the controls.
    pub fn process_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(keycode),
                        ..
                    },
                ..
            } => self.process_key(*keycode),
            _ => false,
        }
    }

    pub fn process_key(&mut self, keycode: VirtualKeyCode) -> bool {
        let num_balls = match keycode {
            VirtualKeyCode::Key1 => 1,
            VirtualKeyCode::Key2 => 2,
            VirtualKeyCode::Key3 => 3,
            VirtualKeyCode::Key4 => 4,
            VirtualKeyCode::Key5 => 5,
            VirtualKeyCode::Key6 => 6,
            VirtualKeyCode::Key7 => 7,
            VirtualKeyCode::Key8 => 8,
            VirtualKeyCode::Up => self.num_balls + 1,
            VirtualKeyCode::Down => self.num_balls.saturating_sub(1),
            _ => return false,
        };
        let num_balls = clamp_balls(num_balls);
        if num_balls == self.num_balls {
            return false;
        }
        self.num_balls = num_balls;
        tracing::debug!(num_balls, "ball count changed");
        true
    }

    /// Per-frame inputs at render resolution for a window of `window_size` pixels.
    pub fn frame_inputs(
        &self,
        elapsed: f32,
        window_size: UVec2,
        settings: &RenderSettings,
    ) -> FrameInputs {
        FrameInputs {
            elapsed,
            resolution: settings.render_resolution(window_size),
            cursor: settings.render_cursor(self.cursor),
            num_balls: self.num_balls,
        }
    }
}
