//! Main entry point for the orbit viewer.
//!
//! Opens a window, uploads the chosen demo and runs the frame loop:
//! - Mouse drag: orbit the camera (orbit demos only)
//! - Mouse wheel: zoom
//! - Q/Escape: stop the loop and exit
//! - Window resize: reconfigure the surface and projection
//!
//! With `--headless N` no window is opened; N frames are rendered into an
//! in-memory backend at a fixed cadence and their matrices logged.

use clap::Parser;
use orbit_viewer::{
    backend::RecordingBackend,
    demos::{Demo, DemoCamera, DemoKind},
    transform::DepthRange,
    wgpu_backend::{WgpuBackend, WGPU_DEPTH_RANGE},
    PointerInput, RenderBackend, Scene, Viewer, ViewerError, Viewport,
};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

const WINDOW_TITLE: &str = "Orbit Viewer";
const HEADLESS_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "orbit-viewer")]
#[command(about = "Transform and orbit camera demos")]
struct Args {
    /// Demo scene to show
    #[arg(long, value_enum, default_value_t = DemoKind::OrbitCube)]
    demo: DemoKind,

    /// Window width in pixels (default: 800)
    #[arg(long, default_value = "800")]
    width: u32,

    /// Window height in pixels (default: 600)
    #[arg(long, default_value = "600")]
    height: u32,

    /// Override the perspective field of view, in degrees
    #[arg(long)]
    fov: Option<f32>,

    /// Render this many frames without a window and log the matrices
    #[arg(long)]
    headless: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut demo = Demo::new(args.demo)?;
    if let Some(fov) = args.fov {
        demo.projection.fov_radians = fov.to_radians();
    }

    match args.headless {
        Some(frames) => run_headless(&demo, &args, frames),
        None => run_windowed(&demo, &args),
    }
}

fn run_headless(demo: &Demo, args: &Args, frames: u32) -> anyhow::Result<()> {
    log::info!("rendering {} headless frames of {:?}", frames, demo.kind);

    let mut backend = RecordingBackend::new();
    let scene = upload_scene(&mut backend, demo)?;

    let start = Instant::now();
    let mut viewer = demo.viewer(Viewport::new(args.width, args.height), start, DepthRange::ZeroToOne);

    for frame in 0..frames {
        let now = start + HEADLESS_FRAME_INTERVAL * frame;
        if let Some(uniforms) = viewer.render(now, &mut backend, &scene)? {
            log::info!(
                "frame {} at {:.3}s\n  view: {:?}\n  model: {:?}",
                frame,
                uniforms.elapsed.as_secs_f32(),
                uniforms.view,
                uniforms.model
            );
        }
    }

    viewer.stop();
    log::info!("recorded {} draws", backend.draws().len());
    Ok(())
}

fn run_windowed(demo: &Demo, args: &Args) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(format!("{} - {:?}", WINDOW_TITLE, demo.kind))
            .with_inner_size(PhysicalSize::new(args.width, args.height))
            .build(&event_loop)?,
    );

    let mut backend = pollster::block_on(WgpuBackend::new(window.clone()))?;
    let scene = upload_scene(&mut backend, demo)?;

    let (width, height) = backend.surface_size();
    let mut viewer = demo.viewer(Viewport::new(width, height), Instant::now(), WGPU_DEPTH_RANGE);
    let mut cursor = PhysicalPosition::new(0.0, 0.0);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::AboutToWait => {
                if viewer.is_running() {
                    window.request_redraw();
                }
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => stop(&mut viewer, elwt),
                WindowEvent::Resized(size) => {
                    handle_resize(&mut viewer, &mut backend, size);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    handle_mouse_input(&mut viewer, state, button, cursor);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = position;
                    viewer.handle_input(PointerInput::Move {
                        x: position.x as f32,
                        y: position.y as f32,
                    });
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    viewer.handle_input(wheel_input(delta));
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(KeyCode::KeyQ | KeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => stop(&mut viewer, elwt),
                WindowEvent::RedrawRequested => {
                    handle_redraw(&mut viewer, &mut backend, &scene, elwt);
                }
                _ => {}
            },
            _ => {}
        }
    })?;

    Ok(())
}

fn upload_scene<B: RenderBackend>(backend: &mut B, demo: &Demo) -> Result<Scene, ViewerError> {
    Scene::upload(
        backend,
        &demo.vertices,
        demo.vertex_shader,
        demo.fragment_shader,
        demo.primitive,
    )
}

fn stop(viewer: &mut Viewer<DemoCamera>, elwt: &EventLoopWindowTarget<()>) {
    viewer.stop();
    elwt.exit();
}

fn handle_resize(viewer: &mut Viewer<DemoCamera>, backend: &mut WgpuBackend, size: PhysicalSize<u32>) {
    // Minimized windows report a zero size; keep the last usable viewport.
    if size.width > 0 && size.height > 0 {
        backend.resize(size.width, size.height);
        viewer.resize(size.width, size.height);
    }
}

fn handle_mouse_input(
    viewer: &mut Viewer<DemoCamera>,
    state: ElementState,
    button: MouseButton,
    cursor: PhysicalPosition<f64>,
) {
    if button != MouseButton::Left {
        return;
    }
    let input = match state {
        ElementState::Pressed => PointerInput::Down {
            x: cursor.x as f32,
            y: cursor.y as f32,
        },
        ElementState::Released => PointerInput::Up,
    };
    viewer.handle_input(input);
}

fn wheel_input(delta: MouseScrollDelta) -> PointerInput {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => PointerInput::wheel_lines(y),
        MouseScrollDelta::PixelDelta(pos) => PointerInput::Wheel { delta_y: pos.y as f32 },
    }
}

fn handle_redraw(
    viewer: &mut Viewer<DemoCamera>,
    backend: &mut WgpuBackend,
    scene: &Scene,
    elwt: &EventLoopWindowTarget<()>,
) {
    match viewer.render(Instant::now(), backend, scene) {
        Ok(_) => {}
        Err(e @ ViewerError::InvalidViewport { .. }) => log::warn!("skipping frame: {}", e),
        Err(e) => {
            log::error!("render failed: {}", e);
            stop(viewer, elwt);
        }
    }
}
