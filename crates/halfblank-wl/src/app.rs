//! Client state and Wayland event handlers
//!
//! Everything lives in one [`App`]. Events are handled synchronously from the
//! pump; handlers never block and record failures in `App::failure` for the
//! main loop to pick up.

use halfblank::{BlankSettings, Extent, Plan, StopFlag};
use tracing::{debug, info, warn};
use wayland_client::protocol::{
    wl_buffer::WlBuffer, wl_callback, wl_callback::WlCallback, wl_compositor::WlCompositor,
    wl_output, wl_output::WlOutput, wl_registry, wl_registry::WlRegistry, wl_shm::WlShm,
    wl_shm_pool::WlShmPool, wl_surface::WlSurface,
};
use wayland_client::{Connection, Dispatch, Proxy, QueueHandle, WEnum, delegate_noop};
use wayland_protocols_wlr::layer_shell::v1::client::{
    zwlr_layer_shell_v1, zwlr_layer_shell_v1::ZwlrLayerShellV1, zwlr_layer_surface_v1,
    zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
};

use crate::buffer::{self, ShmBuffer};
use crate::error::{WlError, WlResult};
use crate::layer::{self, LayerGeometry};

const COMPOSITOR_VERSION: u32 = 4;
const SHM_VERSION: u32 = 1;
const LAYER_SHELL_VERSION: u32 = 4;
const OUTPUT_VERSION: u32 = 4;

/// `wl_surface.set_buffer_scale` appeared in version 3.
const SURFACE_SCALE_SINCE: u32 = 3;
/// `wl_output.done` and `wl_output.scale` appeared in version 2.
const OUTPUT_DONE_SINCE: u32 = 2;
/// `wl_output.release` and `zwlr_layer_shell_v1.destroy` appeared in version 3.
const RELEASE_SINCE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingGlobals,
    AwaitingOutputMode,
    SurfaceCreated,
    SteadyState,
}

#[derive(Debug)]
pub struct App {
    pub stop: StopFlag,
    pub settings: BlankSettings,
    pub phase: Phase,
    pub failure: Option<WlError>,

    globals_done: bool,
    compositor: Option<WlCompositor>,
    shm: Option<WlShm>,
    layer_shell: Option<ZwlrLayerShellV1>,
    output: Option<WlOutput>,

    mode: Option<Extent>,
    output_done: bool,
    scale: i32,

    plan: Option<Plan>,
    surface: Option<WlSurface>,
    layer_surface: Option<ZwlrLayerSurfaceV1>,
    buffer: Option<ShmBuffer>,
}

impl App {
    pub fn new(settings: BlankSettings, stop: StopFlag) -> Self {
        Self {
            stop,
            settings,
            phase: Phase::AwaitingGlobals,
            failure: None,
            globals_done: false,
            compositor: None,
            shm: None,
            layer_shell: None,
            output: None,
            mode: None,
            output_done: false,
            scale: 1,
            plan: None,
            surface: None,
            layer_surface: None,
            buffer: None,
        }
    }

    /// Keep pumping while this holds.
    pub fn waiting(&self) -> bool {
        match self.phase {
            Phase::AwaitingGlobals => !self.globals_done,
            Phase::AwaitingOutputMode => !self.output_ready(),
            Phase::SurfaceCreated | Phase::SteadyState => true,
        }
    }

    pub fn should_exit(&self) -> bool {
        self.stop.is_set() || self.failure.is_some()
    }

    /// All four globals bound, or the first one that is missing.
    pub fn check_globals(&mut self) -> WlResult<()> {
        if self.compositor.is_none() {
            return Err(WlError::MissingGlobal("wl_compositor"));
        }
        if self.shm.is_none() {
            return Err(WlError::MissingGlobal("wl_shm"));
        }
        if self.layer_shell.is_none() {
            return Err(WlError::MissingGlobal("zwlr_layer_shell_v1"));
        }
        if self.output.is_none() {
            return Err(WlError::MissingGlobal("wl_output"));
        }
        self.phase = Phase::AwaitingOutputMode;
        Ok(())
    }

    fn output_ready(&self) -> bool {
        let needs_done = self
            .output
            .as_ref()
            .is_some_and(|o| o.version() >= OUTPUT_DONE_SINCE);
        self.mode.is_some() && (self.output_done || !needs_done)
    }

    /// Device-pixel size of the output's current mode.
    pub fn mode(&self) -> Option<Extent> {
        self.mode
    }

    pub fn scale(&self) -> u32 {
        u32::try_from(self.scale).unwrap_or(1).max(1)
    }

    /// Create the overlay for `plan` and commit it without a buffer, which
    /// asks the compositor for the first configure.
    pub fn create_surface(&mut self, plan: Plan, qh: &QueueHandle<App>) -> WlResult<()> {
        let (Some(compositor), Some(layer_shell), Some(output)) =
            (&self.compositor, &self.layer_shell, &self.output)
        else {
            return Err(WlError::MissingGlobal("wl_compositor"));
        };

        let surface = compositor.create_surface(qh, ());
        let layer_surface = layer_shell.get_layer_surface(
            &surface,
            Some(output),
            zwlr_layer_shell_v1::Layer::Overlay,
            self.settings.name.clone(),
            qh,
            (),
        );

        let geometry = LayerGeometry::for_plan(&plan);
        layer_surface.set_size(geometry.width, geometry.height);
        layer_surface.set_anchor(layer::anchor(plan.side));
        layer_surface.set_exclusive_zone(geometry.exclusive_zone);
        layer_surface
            .set_keyboard_interactivity(zwlr_layer_surface_v1::KeyboardInteractivity::None);
        surface.commit();

        info!(
            "Blanking {} of {} ({} px, scale {})",
            plan.side, plan.extent, plan.exclusive_size, plan.scale
        );
        debug!(?geometry, "Layer surface requested");

        self.plan = Some(plan);
        self.surface = Some(surface);
        self.layer_surface = Some(layer_surface);
        self.phase = Phase::SurfaceCreated;
        Ok(())
    }

    fn configure(&mut self, width: u32, height: u32, qh: &QueueHandle<App>) -> WlResult<()> {
        let (Some(plan), Some(surface), Some(shm)) = (&self.plan, &self.surface, &self.shm) else {
            return Ok(());
        };

        let (device_w, device_h) = layer::buffer_size(plan, width, height);
        if surface.version() >= SURFACE_SCALE_SINCE {
            surface.set_buffer_scale(layer::buffer_scale(plan));
        }

        let current = self.buffer.as_ref().map(ShmBuffer::size);
        if buffer::needs_realloc(current, (device_w, device_h)) {
            let buffer = ShmBuffer::new(shm, qh, device_w, device_h)?;
            if let Some(old) = self.buffer.replace(buffer) {
                old.destroy();
            }
        }

        if let Some(buffer) = &self.buffer {
            surface.attach(Some(buffer.wl_buffer()), 0, 0);
        }
        surface.damage(0, 0, i32::MAX, i32::MAX);
        surface.commit();
        self.phase = Phase::SteadyState;
        Ok(())
    }

    /// Destroy everything bound, most dependent object first.
    pub fn teardown(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.destroy();
        }
        if let Some(layer_surface) = self.layer_surface.take() {
            layer_surface.destroy();
        }
        if let Some(surface) = self.surface.take() {
            surface.destroy();
        }
        if let Some(output) = self.output.take() {
            if output.version() >= RELEASE_SINCE {
                output.release();
            }
        }
        if let Some(layer_shell) = self.layer_shell.take() {
            if layer_shell.version() >= RELEASE_SINCE {
                layer_shell.destroy();
            }
        }
        self.shm = None;
        self.compositor = None;
        debug!("Released Wayland objects");
    }
}

impl Dispatch<WlRegistry, ()> for App {
    fn event(
        state: &mut Self,
        registry: &WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        let wl_registry::Event::Global {
            name,
            interface,
            version,
        } = event
        else {
            return;
        };

        match interface.as_str() {
            "wl_compositor" if state.compositor.is_none() => {
                state.compositor =
                    Some(registry.bind(name, version.min(COMPOSITOR_VERSION), qh, ()));
            }
            "wl_shm" if state.shm.is_none() => {
                state.shm = Some(registry.bind(name, version.min(SHM_VERSION), qh, ()));
            }
            "zwlr_layer_shell_v1" if state.layer_shell.is_none() => {
                state.layer_shell =
                    Some(registry.bind(name, version.min(LAYER_SHELL_VERSION), qh, ()));
            }
            "wl_output" if state.output.is_none() => {
                state.output = Some(registry.bind(name, version.min(OUTPUT_VERSION), qh, ()));
            }
            _ => return,
        }
        debug!("Bound {} v{}", interface, version);
    }
}

impl Dispatch<WlCallback, ()> for App {
    fn event(
        state: &mut Self,
        _: &WlCallback,
        event: wl_callback::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_callback::Event::Done { .. } = event {
            state.globals_done = true;
        }
    }
}

impl Dispatch<WlOutput, ()> for App {
    fn event(
        state: &mut Self,
        _: &WlOutput,
        event: wl_output::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_output::Event::Mode {
                flags,
                width,
                height,
                ..
            } => {
                let current = match flags {
                    WEnum::Value(mode) => mode.contains(wl_output::Mode::Current),
                    WEnum::Unknown(_) => false,
                };
                if current && width > 0 && height > 0 {
                    let extent = Extent::new(width as u32, height as u32);
                    if state.plan.is_some() && state.mode != Some(extent) {
                        warn!("Output mode changed to {}, keeping the current layout", extent);
                    }
                    debug!("Output mode {}", extent);
                    state.mode = Some(extent);
                }
            }
            wl_output::Event::Scale { factor } => {
                debug!("Output scale {}", factor);
                if let Some(plan) = &state.plan {
                    if u32::try_from(factor).ok() != Some(plan.scale) {
                        warn!("Output scale changed to {}, keeping scale {}", factor, plan.scale);
                    }
                }
                state.scale = factor.max(1);
            }
            wl_output::Event::Done => state.output_done = true,
            _ => {}
        }
    }
}

impl Dispatch<ZwlrLayerSurfaceV1, ()> for App {
    fn event(
        state: &mut Self,
        layer_surface: &ZwlrLayerSurfaceV1,
        event: zwlr_layer_surface_v1::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            zwlr_layer_surface_v1::Event::Configure {
                serial,
                width,
                height,
            } => {
                debug!("Configure {}x{} (serial {})", width, height, serial);
                layer_surface.ack_configure(serial);
                if let Err(e) = state.configure(width, height, qh) {
                    state.failure.get_or_insert(e);
                }
            }
            zwlr_layer_surface_v1::Event::Closed => {
                info!("Compositor closed the overlay");
                state.stop.trigger();
            }
            _ => {}
        }
    }
}

delegate_noop!(App: WlCompositor);
delegate_noop!(App: WlShmPool);
delegate_noop!(App: ZwlrLayerShellV1);
delegate_noop!(App: ignore WlShm);
delegate_noop!(App: ignore WlBuffer);
delegate_noop!(App: ignore WlSurface);
