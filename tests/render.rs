use approx::assert_relative_eq;
use glam::{UVec2, Vec2, Vec3};
use metaballs_lib::{
    camera::Camera,
    renderer::{Frame, FrameInputs, FrameRenderer},
    scene::{Blob, BlobField},
    shading,
    tracer::SphereTracer,
};

fn lone_blob() -> BlobField {
    BlobField::from_blobs(&[Blob::new(Vec3::ZERO, 2.0)])
}

#[test]
fn center_ray_hits_single_blob() {
    let camera = Camera::default();
    let tracer = SphereTracer::default();
    let field = lone_blob();

    let ray = camera.primary_ray(UVec2::new(100, 100), Vec2::new(50.0, 50.0));
    let sample = tracer.trace(&field, &ray);

    assert!(sample.hit);
    // the blended surface sits inside the bounding sphere, between t = 3 and the center
    assert!(sample.distance > 3.0 && sample.distance < 5.0, "{}", sample.distance);
    assert_relative_eq!(field.distance(sample.point), 0.0, epsilon = 1e-3);
    assert_relative_eq!(sample.normal.z, 1.0, epsilon = 1e-4);
}

#[test]
fn corner_pixel_shows_background() {
    let renderer = FrameRenderer::default();
    let field = lone_blob();
    let mut frame = Frame::new(100, 100);
    renderer.render_field(&field, 0.0, &mut frame);

    // top-left pixel of the framebuffer
    let corner = frame.pixel(0, 0);
    let uv = Vec2::new(0.5, 99.5) / 50.0 - 1.0;
    let expected = shading::background(uv);
    assert_relative_eq!(corner.x, expected.x, epsilon = 1e-6);
    assert_relative_eq!(corner.y, expected.y, epsilon = 1e-6);
    assert_relative_eq!(corner.z, expected.z, epsilon = 1e-6);
    assert_eq!(corner.w, 1.0);

    let center = frame.pixel(50, 50);
    assert!(center.x > expected.x, "center pixel should be lit: {center}");
}

#[test]
fn animated_frame_is_deterministic() {
    let renderer = FrameRenderer::default();
    let inputs = FrameInputs {
        elapsed: 4.2,
        resolution: UVec2::new(40, 30),
        cursor: Vec2::new(10.0, 12.0),
        num_balls: 6,
    };
    assert_eq!(renderer.render(&inputs), renderer.render(&inputs));
}

#[test]
fn frame_converts_to_image() {
    let renderer = FrameRenderer::default();
    let inputs = FrameInputs {
        elapsed: 0.5,
        resolution: UVec2::new(20, 10),
        cursor: Vec2::new(10.0, 5.0),
        num_balls: 3,
    };
    let image = renderer.render(&inputs).to_rgba_image();
    assert_eq!(image.dimensions(), (20, 10));
    assert!(image.pixels().all(|p| p.0[3] == 255));
}
