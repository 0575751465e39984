//! Bubble Tap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, PointerEvent};

    use bubble_tap::Settings;
    use bubble_tap::audio::AudioManager;
    use bubble_tap::consts::SIM_DT;
    use bubble_tap::platform::{FrameClock, LoopControl, client_to_surface};
    use bubble_tap::renderer::{DrawList, RenderState, draw_scene};
    use bubble_tap::sim::{GameState, pointer_down, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        frame: DrawList,
        clock: FrameClock,
        audio: AudioManager,
        settings: Settings,
        control: LoopControl,
    }

    impl Game {
        fn new(seed: u64, surface: Vec2, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed, surface, settings.sim_config()),
                render_state: None,
                frame: DrawList::new(),
                clock: FrameClock::new(),
                audio: AudioManager::new(&settings, seed ^ 0x9e37_79b9),
                settings,
                control: LoopControl::new(),
            }
        }

        /// Run however many fixed ticks the elapsed time calls for
        fn update(&mut self, time: f64) {
            let steps = self.clock.advance(time);
            for _ in 0..steps {
                tick(&mut self.state, SIM_DT);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            draw_scene(&self.state, &mut self.frame);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (size, logical) = (render_state.size, render_state.logical_size);
                        render_state.resize(size, logical);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// A press landed on the canvas (surface-local pixels)
        fn press(&mut self, at: Vec2) {
            // First gesture unlocks audio
            self.audio.unlock();
            pointer_down(&mut self.state, at);
            for event in self.state.drain_events() {
                self.audio.handle_event(&event);
            }
        }

        fn apply_settings(&mut self, settings: Settings) {
            let settings = settings.sanitized();
            settings.save();
            self.state.apply_config(settings.sim_config());
            self.audio.apply_settings(&settings);
            self.settings = settings;
        }
    }

    /// Canvas size in CSS pixels and in physical pixels
    fn canvas_sizes(canvas: &HtmlCanvasElement) -> (Vec2, (u32, u32)) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let logical = Vec2::new(client_w as f32, client_h as f32);
        let physical = (
            (client_w as f64 * dpr) as u32,
            (client_h as f64 * dpr) as u32,
        );
        (logical, physical)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // A second init only fails if a logger already exists
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Bubble Tap starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (logical, physical) = canvas_sizes(&canvas);
        canvas.set_width(physical.0);
        canvas.set_height(physical.1);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, logical, settings.clone())));

        log::info!("Game initialized with seed: {}", seed);

        match init_gpu(&canvas, physical, logical).await {
            Some(render_state) => game.borrow_mut().render_state = Some(render_state),
            None => log::error!("WebGPU unavailable, running without rendering"),
        }

        write_settings_panel(&document, &settings);
        setup_input_handlers(&canvas, game.clone());
        setup_settings_panel(&document, game.clone());
        setup_lifecycle(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Bubble Tap running!");
        Ok(())
    }

    async fn init_gpu(
        canvas: &HtmlCanvasElement,
        physical: (u32, u32),
        logical: Vec2,
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| log::error!("Failed to create surface: {}", e))
            .ok()?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| log::error!("Failed to get adapter: {}", e))
            .ok()?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, physical, (logical.x, logical.y))
            .await
            .map_err(|e| log::error!("Failed to get device: {}", e))
            .ok()
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer down covers mouse, pen and touch
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            event.prevent_default();
            let rect = canvas_clone.get_bounding_client_rect();
            let at = client_to_surface(
                Vec2::new(event.client_x() as f32, event.client_y() as f32),
                Vec2::new(rect.left() as f32, rect.top() as f32),
            );
            game.borrow_mut().press(at);
        });
        let _ = canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_lifecycle(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Resize: new surface for both the simulation and the renderer
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (logical, physical) = canvas_sizes(&canvas);
                canvas.set_width(physical.0);
                canvas.set_height(physical.1);
                let mut g = game.borrow_mut();
                g.state.resize(logical);
                if let Some(ref mut render_state) = g.render_state {
                    render_state.resize(physical, (logical.x, logical.y));
                }
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Page going away: stop scheduling frames
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let g = game.borrow();
                if let Some(handle) = g.control.stop() {
                    if let Some(window) = web_sys::window() {
                        let _ = window.cancel_animation_frame(handle);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Back from the page cache: start again
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let stopped = !game.borrow().control.is_running();
                if stopped {
                    {
                        let mut g = game.borrow_mut();
                        g.control.resume();
                        g.clock.reset();
                    }
                    request_animation_frame(game.clone());
                }
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if !game.borrow().control.is_running() {
            return;
        }
        let game_clone = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game_clone, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => game.borrow().control.set_frame(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.control.take_frame();
            if !g.control.is_running() {
                return;
            }

            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }

    // === Settings panel ===

    const BGM_ID: &str = "setting-bgm";
    const FEEDBACK_ID: &str = "setting-sound-feedback";
    const VOLUME_ID: &str = "setting-volume";
    const MAX_TAPS_ID: &str = "setting-max-taps";
    const SPEED_ID: &str = "setting-speed";
    const SIZE_ID: &str = "setting-size";
    const SPAWN_INTERVAL_ID: &str = "setting-spawn-interval";
    const MAX_BUBBLES_ID: &str = "setting-max-bubbles";

    const CHECKBOXES: [&str; 2] = [BGM_ID, FEEDBACK_ID];
    const SLIDERS: [&str; 6] = [
        VOLUME_ID,
        MAX_TAPS_ID,
        SPEED_ID,
        SIZE_ID,
        SPAWN_INTERVAL_ID,
        MAX_BUBBLES_ID,
    ];

    fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Build settings from the panel, keeping `current` for missing inputs
    fn read_settings_panel(document: &Document, current: &Settings) -> Settings {
        let checked = |id: &str, fallback: bool| input(document, id).map_or(fallback, |el| el.checked());
        let number = |id: &str, fallback: f64| {
            input(document, id)
                .map(|el| el.value_as_number())
                .filter(|v| v.is_finite())
                .unwrap_or(fallback)
        };
        let level = |id: &str, fallback: u32| number(id, f64::from(fallback)).round().max(0.0) as u32;

        Settings {
            bgm: checked(BGM_ID, current.bgm),
            sound_feedback: checked(FEEDBACK_ID, current.sound_feedback),
            // Slider is in percent
            volume: (number(VOLUME_ID, f64::from(current.volume) * 100.0) / 100.0) as f32,
            max_taps_to_pop: level(MAX_TAPS_ID, current.max_taps_to_pop),
            bubble_speed: level(SPEED_ID, current.bubble_speed),
            bubble_size: level(SIZE_ID, current.bubble_size),
            spawn_interval_ms: level(SPAWN_INTERVAL_ID, current.spawn_interval_ms),
            max_bubbles: level(MAX_BUBBLES_ID, current.max_bubbles),
        }
        .sanitized()
    }

    fn write_settings_panel(document: &Document, settings: &Settings) {
        let set_checked = |id: &str, value: bool| {
            if let Some(el) = input(document, id) {
                el.set_checked(value);
            }
        };
        let set_number = |id: &str, value: f64| {
            if let Some(el) = input(document, id) {
                el.set_value_as_number(value);
            }
        };

        set_checked(BGM_ID, settings.bgm);
        set_checked(FEEDBACK_ID, settings.sound_feedback);
        set_number(VOLUME_ID, (f64::from(settings.volume) * 100.0).round());
        set_number(MAX_TAPS_ID, f64::from(settings.max_taps_to_pop));
        set_number(SPEED_ID, f64::from(settings.bubble_speed));
        set_number(SIZE_ID, f64::from(settings.bubble_size));
        set_number(SPAWN_INTERVAL_ID, f64::from(settings.spawn_interval_ms));
        set_number(MAX_BUBBLES_ID, f64::from(settings.max_bubbles));
    }

    fn setup_settings_panel(document: &Document, game: Rc<RefCell<Game>>) {
        // Every input pushes the whole panel
        for (id, event) in CHECKBOXES
            .iter()
            .map(|id| (*id, "change"))
            .chain(SLIDERS.iter().map(|id| (*id, "input")))
        {
            let Some(el) = document.get_element_by_id(id) else {
                log::warn!("Settings input #{} missing", id);
                continue;
            };
            let game = game.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let settings = read_settings_panel(&document, &g.settings);
                if settings != g.settings {
                    g.apply_settings(settings);
                }
            });
            let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset button
        if let Some(btn) = document.get_element_by_id("settings-reset") {
            let game = game.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let defaults = Settings::reset();
                write_settings_panel(&document, &defaults);
                game.borrow_mut().apply_settings(defaults);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Gear button shows/hides the panel
        if let (Some(btn), Some(panel)) = (
            document.get_element_by_id("settings-toggle"),
            document.get_element_by_id("settings-panel"),
        ) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let _ = panel.class_list().toggle("hidden");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bubble Tap (native) starting...");
    log::info!("Native mode runs a headless session - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let summary = demo::run(seed, demo::DEMO_SECONDS);
    println!("{summary}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session: bubbles spawn, a bot taps the highest one now and
/// then, and the totals are reported
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::fmt;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use bubble_tap::Settings;
    use bubble_tap::audio::cues_for_event;
    use bubble_tap::consts::SIM_DT;
    use bubble_tap::platform::FrameClock;
    use bubble_tap::renderer::{DrawList, draw_scene};
    use bubble_tap::sim::{GameEvent, GameState, pointer_down, tick};

    pub const DEMO_SECONDS: u32 = 30;
    /// Host frame interval (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// The bot taps every this many frames
    const TAP_EVERY: u32 = 12;

    #[derive(Debug, Default)]
    pub struct Summary {
        pub seed: u64,
        pub ticks: u64,
        pub spawned: u32,
        pub pops: u64,
        pub taps: u64,
        pub partial_taps: u32,
        pub sound_cues: usize,
        pub peak_bubbles: usize,
        pub peak_particles: usize,
        pub last_frame_circles: usize,
    }

    impl fmt::Display for Summary {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "seed {} ran {} ticks", self.seed, self.ticks)?;
            writeln!(f, "  bubbles spawned:  {}", self.spawned)?;
            writeln!(f, "  taps landed:      {} ({} partial)", self.taps, self.partial_taps)?;
            writeln!(f, "  bubbles popped:   {}", self.pops)?;
            writeln!(f, "  sound cues:       {}", self.sound_cues)?;
            writeln!(f, "  peak bubbles:     {}", self.peak_bubbles)?;
            writeln!(f, "  peak particles:   {}", self.peak_particles)?;
            write!(f, "  last frame draws: {} circles", self.last_frame_circles)
        }
    }

    pub fn run(seed: u64, seconds: u32) -> Summary {
        let settings = Settings {
            max_taps_to_pop: 3,
            spawn_interval_ms: 600,
            ..Default::default()
        };
        let mut state = GameState::new(seed, Vec2::new(800.0, 600.0), settings.sim_config());
        let mut clock = FrameClock::new();
        let mut frame = DrawList::new();
        let mut cue_rng = Pcg32::seed_from_u64(seed);
        let mut summary = Summary {
            seed,
            ..Default::default()
        };

        let frames = (f64::from(seconds) * 1000.0 / FRAME_MS) as u32;
        let mut max_id = 0;
        for n in 0..frames {
            for _ in 0..clock.advance(f64::from(n) * FRAME_MS) {
                tick(&mut state, SIM_DT);
            }
            if let Some(newest) = state.bubbles.iter().map(|b| b.id).max() {
                max_id = max_id.max(newest);
            }

            if n % TAP_EVERY == 0 {
                // Aim at the bubble closest to escaping
                let target = state
                    .bubbles
                    .iter()
                    .filter(|b| !b.is_popping && b.pos.y < state.surface.y)
                    .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map(|b| b.pos);
                if let Some(at) = target {
                    pointer_down(&mut state, at);
                }
            }

            for event in state.drain_events() {
                if matches!(event, GameEvent::PartialTap { .. }) {
                    summary.partial_taps += 1;
                }
                summary.sound_cues += cues_for_event(&mut cue_rng, &event, settings.sound_feedback).len();
            }

            summary.peak_bubbles = summary.peak_bubbles.max(state.bubbles.len());
            summary.peak_particles = summary.peak_particles.max(state.particles.len());
            draw_scene(&state, &mut frame);
        }

        summary.ticks = state.time_ticks;
        summary.spawned = max_id;
        summary.pops = state.pops;
        summary.taps = state.taps;
        summary.last_frame_circles = frame.circles().count();
        log::info!("Demo finished: {} pops in {} ticks", summary.pops, summary.ticks);
        summary
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_demo_is_deterministic() {
            let a = run(7, 5);
            let b = run(7, 5);
            assert_eq!(a.pops, b.pops);
            assert_eq!(a.taps, b.taps);
            assert_eq!(a.ticks, b.ticks);
        }

        #[test]
        fn test_demo_pops_bubbles() {
            let summary = run(42, 20);
            assert!(summary.spawned > 0);
            assert!(summary.taps > 0);
            assert!(summary.pops > 0);
            assert!(summary.pops <= summary.taps);
        }
    }
}
