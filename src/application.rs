use std::{
    process::Termination,
    time::{Duration, Instant},
};

use wgpu::SurfaceError;
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct AppState {
    report_started: Instant,
    frames_since_report: u32,
}

impl AppState {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            report_started: now,
            frames_since_report: 0,
        }
    }

    /// Count a presented frame. Returns the frame rate once per interval.
    pub fn frame_presented(&mut self) -> Option<f32> {
        self.frame_presented_at(Instant::now())
    }

    fn frame_presented_at(&mut self, now: Instant) -> Option<f32> {
        self.frames_since_report += 1;
        let window = now.duration_since(self.report_started);
        if window < FPS_REPORT_INTERVAL {
            return None;
        }

        let fps = self.frames_since_report as f32 / window.as_secs_f32();
        self.frames_since_report = 0;
        self.report_started = now;
        Some(fps)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub size: PhysicalSize<u32>,
}

pub struct Application<L: Layer + 'static> {
    layer: Option<L>,
    pending_config: Option<L::Config>,
    screen: Screen,
    state: AppState,
}

impl<L: Layer + 'static> Application<L> {
    pub fn new(screen: Screen, config: L::Config) -> Self {
        Self {
            screen,
            layer: None,
            pending_config: Some(config),
            state: AppState::new(),
        }
    }

    fn shutdown(&mut self, control_flow: &mut ControlFlow) {
        control_flow.set_exit_with_code(0);
        if let Some(layer) = self.layer.as_mut() {
            if layer.shutdown(&self.state, &mut self.screen).is_err() {
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
            layer.process_event(&event, &mut self.screen);
        }

        match event {
            Event::NewEvents(StartCause::Init) => {
                if let Some(config) = self.pending_config.take() {
                    self.layer = Some(L::start(config, &mut self.screen, &self.state));
                }
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
                    self.screen.resize(*physical_size);
                    if let Some(layer) = self.layer.as_mut() {
                        layer.resize(*physical_size, &self.state, &mut self.screen);
                    }
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    self.screen.resize(**new_inner_size);
                    if let Some(layer) = self.layer.as_mut() {
                        layer.resize(**new_inner_size, &self.state, &mut self.screen);
                    }
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
                layer.update(&self.state, &mut self.screen);

                match layer.render(&self.state, &mut self.screen) {
                    Ok(_) => {
                        if let Some(fps) = self.state.frame_presented() {
                            layer.fps_updated(fps, &mut self.screen);
                        }
                    }
                    Err(SurfaceError::Lost) => self.screen.resize_to_current(),
                    Err(SurfaceError::OutOfMemory) => control_flow.set_exit_with_code(137),
                    Err(e) => tracing::error!("{:?}", e),
                }
            }
            _ => {}
        }
    }

    pub async fn init(window: WindowConfig, config: L::Config) -> crate::Result<()> {
        let event_loop = EventLoop::new();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let screen = Screen::new(&event_loop, &instance, &window).await?;
        L::check_config(&config, &screen)?;
        let mut application = Self::new(screen, config);
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
        window_config: &WindowConfig,
    ) -> crate::Result<Self> {
        let window = WindowBuilder::new()
            .with_title(window_config.title.clone())
            .with_inner_size(window_config.size)
            .build(event_loop)?;

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
            .ok_or(crate::Error::NoAdapter)?;
        tracing::info!(adapter = ?adapter.get_info().name, "graphics adapter selected");
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: adapter.features(),
                    limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await?;
        let size = window.inner_size();
        let config = surface
            .get_default_config(&adapter, size.width, size.height)
            .ok_or(crate::Error::UnsupportedSurface)?;
        surface.configure(&device, &config);

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
    type Config;
    type LayerErr: Termination + 'static;

    /// Reject a configuration the device cannot present, before the loop starts.
    fn check_config(_config: &Self::Config, _screen: &Screen) -> crate::Result<()> {
        Ok(())
    }

    fn start(config: Self::Config, screen: &mut Screen, app: &AppState) -> Self;
    fn process_event(&mut self, event: &Event<()>, screen: &mut Screen);
    fn resize(&mut self, new_size: PhysicalSize<u32>, app: &AppState, screen: &mut Screen);
    fn update(&mut self, app: &AppState, screen: &mut Screen);
    fn render(&mut self, app: &AppState, screen: &mut Screen) -> Result<(), SurfaceError>;
    fn fps_updated(&mut self, fps: f32, screen: &mut Screen);
    fn shutdown(&mut self, app: &AppState, screen: &mut Screen) -> Result<(), Self::LayerErr>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_is_reported_once_per_interval() {
        let start = Instant::now();
        let mut state = AppState::starting_at(start);

        for frame in 1..30 {
            let at = start + Duration::from_millis(frame * 30);
            assert_eq!(state.frame_presented_at(at), None);
        }
        let fps = state
            .frame_presented_at(start + Duration::from_secs(1))
            .unwrap();
        assert!((fps - 30.0).abs() < 1e-3);

        // the next interval starts empty
        assert_eq!(
            state.frame_presented_at(start + Duration::from_millis(1500)),
            None
        );
        let fps = state
            .frame_presented_at(start + Duration::from_secs(3))
            .unwrap();
        assert!((fps - 1.0).abs() < 1e-3);
    }
}
