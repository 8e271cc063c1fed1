use glam::{UVec2, Vec2, Vec3, Vec4};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::error::Result;
use crate::scene::{BlobField, MAX_BLOBS};
use crate::shading;
use crate::tracer::SphereTracer;

/// Everything the core needs from the driver for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub elapsed: f32,
    pub resolution: UVec2,
    /// Cursor in render pixels, origin at the top-left corner.
    pub cursor: Vec2,
    pub num_balls: usize,
}

impl Default for FrameInputs {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            resolution: UVec2::new(1, 1),
            cursor: Vec2::ZERO,
            num_balls: 5,
        }
    }
}

/// Row-major RGBA pixels, top row first, alpha always one.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec4::W; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resolution(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y` counted from the top.
    pub fn pixel(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Reallocates only when the resolution changed.
    pub fn resize(&mut self, resolution: UVec2) {
        if resolution != self.resolution() {
            *self = Self::new(resolution.x, resolution.y);
        }
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width, self.height);
        for (pixel, color) in img.pixels_mut().zip(&self.pixels) {
            *pixel = Rgba(convert_rgba(*color));
        }
        img
    }

    /// Writes the frame as a PNG file.
    pub fn save_png(&self, path: &std::path::Path) -> Result<()> {
        self.to_rgba_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

fn convert_rgba(color: Vec4) -> [u8; 4] {
    let c = color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
    [
        c.x.round() as u8,
        c.y.round() as u8,
        c.z.round() as u8,
        c.w.round() as u8,
    ]
}

/// Traces every pixel of a frame against the blob field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameRenderer {
    pub camera: Camera,
    pub tracer: SphereTracer,
}

impl FrameRenderer {
    /// Blob field for the frame: animated blobs with blob 0 under the cursor.
    pub fn field_for(&self, inputs: &FrameInputs) -> BlobField {
        let num_balls = inputs.num_balls.clamp(1, MAX_BLOBS);
        let mouse_center = self.camera.cursor_to_plane(inputs.resolution, inputs.cursor);
        BlobField::at(num_balls, inputs.elapsed, mouse_center)
    }

    pub fn render(&self, inputs: &FrameInputs) -> Frame {
        let mut frame = Frame::new(inputs.resolution.x, inputs.resolution.y);
        self.render_into(inputs, &mut frame);
        frame
    }

    /// Renders into `frame`, resizing it to the input resolution first.
    pub fn render_into(&self, inputs: &FrameInputs, frame: &mut Frame) {
        frame.resize(inputs.resolution);
        let field = self.field_for(inputs);
        self.render_field(&field, inputs.elapsed, frame);
    }

    /// Renders a fixed field; the field is shared read-only by all rows.
    pub fn render_field(&self, field: &BlobField, time: f32, frame: &mut Frame) {
        let resolution = frame.resolution();
        let width = frame.width as usize;
        if width == 0 {
            return;
        }

        frame
            .pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, line)| {
                // framebuffer rows run top-down, fragment coordinates bottom-up
                let y = resolution.y as f32 - row as f32 - 0.5;
                for (column, pixel) in line.iter_mut().enumerate() {
                    let frag_coord = Vec2::new(column as f32 + 0.5, y);
                    *pixel = self.shade_pixel(field, time, resolution, frag_coord).extend(1.0);
                }
            });
    }

    /// Color of the fragment at `frag_coord`, measured from the bottom-left corner.
    pub fn shade_pixel(
        &self,
        field: &BlobField,
        time: f32,
        resolution: UVec2,
        frag_coord: Vec2,
    ) -> Vec3 {
        let ray = self.camera.primary_ray(resolution, frag_coord);
        let sample = self.tracer.trace(field, &ray);
        if !sample.hit {
            let uv = frag_coord / resolution.as_vec2() * 2.0 - 1.0;
            return shading::background(uv);
        }
        shading::shade(sample.point, sample.normal, self.camera.eye, time)
    }
}

#[cfg(test)]
mod tests {
    use glam::{UVec2, Vec2, Vec4};

    use super::*;

    #[test]
    fn frame_resize_keeps_matching_buffer() {
        let mut frame = Frame::new(4, 3);
        frame.pixels[0] = Vec4::ONE;
        frame.resize(UVec2::new(4, 3));
        assert_eq!(frame.pixel(0, 0), Vec4::ONE);
        frame.resize(UVec2::new(2, 2));
        assert_eq!(frame.pixels().len(), 4);
        assert_eq!(frame.pixel(0, 0), Vec4::W);
    }

    #[test]
    fn snapshot_round_trips_through_png() {
        let mut frame = Frame::new(3, 2);
        frame.pixels[4] = Vec4::new(1.0, 0.5, 0.0, 1.0);
        let path = std::env::temp_dir().join(format!("metaballs-test-{}.png", std::process::id()));
        frame.save_png(&path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(decoded, frame.to_rgba_image());
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 128, 0, 255]);
    }

    #[test]
    fn rgba_conversion_saturates() {
        assert_eq!(convert_rgba(Vec4::new(2.0, -1.0, 0.5, 1.0)), [255, 0, 128, 255]);
    }

    #[test]
    fn rendered_pixels_are_opaque_and_in_range() {
        let renderer = FrameRenderer::default();
        let inputs = FrameInputs {
            elapsed: 1.5,
            resolution: UVec2::new(24, 16),
            cursor: Vec2::new(12.0, 8.0),
            num_balls: 8,
        };
        let frame = renderer.render(&inputs);
        assert_eq!(frame.pixels().len(), 24 * 16);
        for pixel in frame.pixels() {
            assert_eq!(pixel.w, 1.0);
            assert!(pixel.cmpge(Vec4::ZERO).all() && pixel.cmple(Vec4::ONE).all());
        }
    }

    #[test]
    fn cursor_at_center_puts_a_blob_under_it() {
        let renderer = FrameRenderer::default();
        let inputs = FrameInputs {
            elapsed: 0.0,
            resolution: UVec2::new(32, 32),
            cursor: Vec2::new(16.0, 16.0),
            num_balls: 1,
        };
        let frame = renderer.render(&inputs);
        let center = frame.pixel(16, 16);
        let background = shading::background(Vec2::new(0.03, 0.0)).extend(1.0);
        assert_ne!(center, background);
    }

    #[test]
    fn field_for_clamps_ball_count() {
        let renderer = FrameRenderer::default();
        let inputs = FrameInputs {
            num_balls: 0,
            ..FrameInputs::default()
        };
        assert_eq!(renderer.field_for(&inputs).len(), 1);
        let inputs = FrameInputs {
            num_balls: 20,
            ..FrameInputs::default()
        };
        assert_eq!(renderer.field_for(&inputs).len(), MAX_BLOBS);
    }
}
