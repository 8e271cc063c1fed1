use std::time::Instant;

use glam::UVec2;
use metaballs_lib::{
    application::{AppState, Application, Layer, Screen},
    controls::FrameControls,
    error::Error,
    present::Presenter,
    renderer::{Frame, FrameRenderer},
    settings::RenderSettings,
};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
};

struct MetaballsLayer {
    renderer: FrameRenderer,
    controls: FrameControls,
    presenter: Presenter,
    frame: Frame,
    window_size: UVec2,
}

impl MetaballsLayer {
    fn save_snapshot(&self, app: &AppState) {
        let file_name = format!("metaballs-{:.0}ms.png", app.elapsed() * 1000.0);
        let path = app.settings().snapshot_dir.join(file_name);
        match self.frame.save_png(&path) {
            Ok(()) => tracing::info!(path = %path.display(), "snapshot written"),
            Err(e) => tracing::error!(path = %path.display(), "snapshot failed: {e}"),
        }
    }
}

impl Layer for MetaballsLayer {
    type LayerErr = Error;

    fn start(screen: &mut Screen, app: &AppState) -> Self {
        let size = screen.size();
        let window_size = UVec2::new(size.width, size.height);
        let resolution = app.settings().render_resolution(window_size);
        tracing::info!(
            width = resolution.x,
            height = resolution.y,
            num_balls = app.settings().num_balls,
            "starting metaballs"
        );

        Self {
            renderer: FrameRenderer::default(),
            controls: FrameControls::new(app.settings().num_balls),
            presenter: Presenter::new(screen, resolution.x, resolution.y),
            frame: Frame::new(resolution.x, resolution.y),
            window_size,
        }
    }

    fn process_event(&mut self, event: &Event<()>, app: &AppState, _screen: &mut Screen) {
        let Event::WindowEvent { event, .. } = event else {
            return;
        };
        if self.controls.process_events(event) {
            return;
        }
        if let WindowEvent::KeyboardInput {
            input:
                KeyboardInput {
                    state: ElementState::Pressed,
                    virtual_keycode: Some(VirtualKeyCode::F12),
                    ..
                },
            ..
        } = event
        {
            self.save_snapshot(app);
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>, _app: &AppState, _screen: &mut Screen) {
        if new_size.width > 0 && new_size.height > 0 {
            self.window_size = UVec2::new(new_size.width, new_size.height);
            tracing::info!(width = new_size.width, height = new_size.height, "resized");
        }
    }

    fn update(&mut self, app: &AppState, screen: &mut Screen) {
        let inputs = self
            .controls
            .frame_inputs(app.elapsed(), self.window_size, app.settings());

        let started = Instant::now();
        self.renderer.render_into(&inputs, &mut self.frame);
        self.presenter.upload(screen, &self.frame);
        tracing::debug!(
            render_ms = started.elapsed().as_secs_f64() * 1000.0,
            dropped = app.dropped_frames(),
            "frame rendered"
        );
    }

    fn render(&mut self, _app: &AppState, screen: &mut Screen) -> Result<(), wgpu::SurfaceError> {
        self.presenter.draw(screen)
    }

    fn shutdown(&mut self, app: &AppState, _screen: &mut Screen) -> Result<(), Self::LayerErr> {
        tracing::info!(
            elapsed = app.elapsed(),
            dropped_frames = app.dropped_frames(),
            num_balls = self.controls.num_balls,
            "exiting"
        );
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let settings = RenderSettings::default();
    if let Err(e) = pollster::block_on(Application::<MetaballsLayer>::init(settings)) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
