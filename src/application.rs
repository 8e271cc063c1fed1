use std::time::{Duration, Instant};

use wgpu::SurfaceError;
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

use crate::error::{Error, Result};
use crate::settings::RenderSettings;

/// Frame clock shared with the layer.
///
/// Late frames are never caught up on: the next frame renders at the
/// current time and the skipped ones are only counted.
#[derive(Debug)]
pub struct AppState {
    settings: RenderSettings,
    start_time: Instant,
    previous_time: Instant,
    elapsed_time: f32,
    frame_time: Duration,
    dropped_frames: u64,
}

impl AppState {
    pub fn new(settings: RenderSettings) -> Self {
        let now = Instant::now();
        Self {
            settings,
            start_time: now,
            previous_time: now,
            elapsed_time: 0.0,
            frame_time: Duration::ZERO,
            dropped_frames: 0,
        }
    }

    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    pub fn update_at(&mut self, now: Instant) {
        self.frame_time = now.saturating_duration_since(self.previous_time);
        self.elapsed_time = now.saturating_duration_since(self.start_time).as_secs_f32();
        self.previous_time = now;

        let missed = self.missed_deadlines(self.frame_time);
        if missed > 0 {
            self.dropped_frames += missed;
            tracing::warn!(
                missed,
                frame_ms = self.frame_time.as_secs_f64() * 1000.0,
                "frame deadline missed, skipping ahead"
            );
        }
    }

    fn missed_deadlines(&self, frame_time: Duration) -> u64 {
        let budget = self.settings.frame_budget;
        if budget.is_zero() || frame_time <= budget {
            return 0;
        }
        (frame_time.as_nanos() / budget.as_nanos()).saturating_sub(1).max(1) as u64
    }

    /// Seconds since start, the animation clock.
    pub fn elapsed(&self) -> f32 {
        self.elapsed_time
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}

pub struct Application<L: Layer + 'static> {
    layer: Option<L>,
    screen: Screen,
    state: AppState,
}

impl<L: Layer + 'static> Application<L> {
    pub fn new(screen: Screen, settings: RenderSettings) -> Self {
        Self {
            screen,
            layer: None,
            state: AppState::new(settings),
        }
    }

    fn shutdown(&mut self, control_flow: &mut ControlFlow) {
        control_flow.set_exit_with_code(0);
        if let Some(layer) = self.layer.as_mut() {
            if let Err(e) = layer.shutdown(&self.state, &mut self.screen) {
                tracing::error!("shutdown failed: {e}");
                control_flow.set_exit_with_code(1);
            }
        }
    }

    fn run(
        &mut self,
        event: Event<()>,
        _event_loop: &EventLoopWindowTarget<()>,
        control_flow: &mut ControlFlow,
    ) {
        control_flow.set_wait();

        if let Some(layer) = self.layer.as_mut() {
            layer.process_event(&event, &self.state, &mut self.screen);
        }

        match event {
            Event::NewEvents(StartCause::Init) => {
                self.layer = Some(L::start(&mut self.screen, &self.state));
            }
            Event::WindowEvent {
                window_id,
                ref event,
            } if self.screen.window().id() == window_id => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                    ..
                } => self.shutdown(control_flow),
                WindowEvent::Resized(physical_size) => {
                    self.resize(*physical_size);
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    self.resize(**new_inner_size);
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                self.screen.window().request_redraw();
            }
            Event::RedrawRequested(window_id) if self.screen.window().id() == window_id => {
                let Some(layer) = self.layer.as_mut() else {
                    return;
                };
                self.state.update();
                layer.update(&self.state, &mut self.screen);

                match layer.render(&self.state, &mut self.screen) {
                    Ok(_) => {}
                    Err(SurfaceError::Lost) => self.screen.resize_to_current(),
                    Err(SurfaceError::OutOfMemory) => control_flow.set_exit_with_code(137),
                    Err(e) => tracing::error!("{:?}", e),
                }
            }
            _ => {}
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.screen.resize(new_size);
        if let Some(layer) = self.layer.as_mut() {
            layer.resize(new_size, &self.state, &mut self.screen);
        }
    }

    pub async fn init(settings: RenderSettings) -> Result<()> {
        let event_loop = EventLoop::new();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let screen = Screen::new(&event_loop, &instance, &settings.title).await?;
        let mut application = Self::new(screen, settings);
        event_loop.run(move |event, event_loop, control_flow| {
            application.run(event, event_loop, control_flow);
        });
    }
}

pub struct Screen {
    pub surface: wgpu::Surface,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    window: Window,
}

impl Screen {
    pub async fn new(
        event_loop: &EventLoopWindowTarget<()>,
        instance: &wgpu::Instance,
        title: &str,
    ) -> Result<Self> {
        let window = WindowBuilder::new().with_title(title).build(event_loop)?;

        // SAFETY:
        // The surface needs to live as long as the window that created it.
        // Screen owns the window so this should be safe.
        let surface = unsafe { instance.create_surface(&window) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(Error::NoAdapter)?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await?;
        let size = window.inner_size();
        let config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(Error::UnsupportedSurface)?;
        surface.configure(&device, &config);
        tracing::info!(
            adapter = ?adapter.get_info().name,
            format = ?config.format,
            width = config.width,
            height = config.height,
            "surface configured"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    /// Resize the screen to new window size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Resize the screen to current window inner size.
    pub fn resize_to_current(&mut self) {
        self.resize(self.window.inner_size());
    }
}

pub trait Layer: Sized {
    type LayerErr: std::error::Error + 'static;

    fn start(screen: &mut Screen, app: &AppState) -> Self;
    fn process_event(&mut self, event: &Event<()>, app: &AppState, screen: &mut Screen);
    fn resize(&mut self, new_size: PhysicalSize<u32>, app: &AppState, screen: &mut Screen);
    fn update(&mut self, app: &AppState, screen: &mut Screen);
    fn render(&mut self, app: &AppState, screen: &mut Screen)
        -> std::result::Result<(), SurfaceError>;
    fn shutdown(&mut self, app: &AppState, screen: &mut Screen)
        -> std::result::Result<(), Self::LayerErr>;
}
