//! Canvas Life entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement, KeyboardEvent};

    use canvas_life::consts::RESIZE_DEBOUNCE_MS;
    use canvas_life::platform::SetupError;
    use canvas_life::platform::web::{
        BrowserFrames, CanvasPainter, FrameCallback, fit_canvas, window_viewport,
    };
    use canvas_life::{CellShape, GameLoop, GameOptions, LoopPhases, Simulation, Stats};

    type SharedSim = Rc<RefCell<Simulation>>;
    type SharedLoop = Rc<RefCell<GameLoop<BrowserFrames>>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Canvas Life starting...");

        // Without a surface there is nothing to recover to
        if let Err(e) = setup() {
            log::error!("Setup failed, simulation not started: {}", e);
        }
    }

    fn setup() -> Result<(), SetupError> {
        let window = web_sys::window().ok_or(SetupError::NoWindow)?;
        let document = window.document().ok_or(SetupError::NoDocument)?;
        let (canvas, painter) = CanvasPainter::from_document(&window, "canvas")?;

        let viewport = window_viewport(&window);
        fit_canvas(&canvas, viewport);

        let options = GameOptions::load();
        let now = now_ms();
        let seed = js_sys::Date::now() as u64;
        let sim: SharedSim = Rc::new(RefCell::new(Simulation::new(
            options.clone(),
            viewport,
            seed,
            now,
        )));
        let painter = Rc::new(RefCell::new(painter));

        let phases = LoopPhases::new(
            {
                let sim = sim.clone();
                let window = window.clone();
                move |time: f64| {
                    let viewport = window_viewport(&window);
                    fit_canvas(&canvas, viewport);
                    sim.borrow_mut()
                        .draw_fitted(&mut *painter.borrow_mut(), viewport, now_ms(), time);
                }
            },
            {
                let sim = sim.clone();
                move |time: f64| {
                    let stats = sim.borrow_mut().update(time);
                    update_status(&stats);
                }
            },
            {
                let sim = sim.clone();
                move |time: f64| sim.borrow_mut().tick(time)
            },
        );

        // The frame closure keeps the loop alive for the page lifetime
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let host = BrowserFrames::new(window.clone(), callback.clone());
        let game_loop: SharedLoop = Rc::new(RefCell::new(GameLoop::new(host, phases, &options)));
        {
            let game_loop = game_loop.clone();
            *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
                game_loop.borrow_mut().frame(time);
            }));
        }

        sync_checkboxes(&document, &options);
        setup_controls(&document, sim.clone(), game_loop.clone());
        setup_keyboard(sim.clone(), game_loop.clone());
        setup_resize(game_loop.clone());
        setup_storage_sync(sim.clone(), game_loop.clone());

        update_status(&sim.borrow().stats());
        game_loop.borrow_mut().start();

        log::info!("Canvas Life running!");
        Ok(())
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    /// Register a click handler on `#id`, if the element exists
    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("No #{} element, control disabled", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| handler());
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn set_checked(document: &Document, id: &str, checked: bool) {
        if let Some(input) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_checked(checked);
        }
    }

    fn sync_checkboxes(document: &Document, options: &GameOptions) {
        set_checked(document, "toggle-grid", options.show_grid);
        set_checked(document, "toggle-fade", options.fade_dead_cells);
        set_checked(document, "toggle-shape", options.cell_shape == CellShape::Square);
    }

    /// Mutate options, save them, and redraw if paused
    fn change_options(sim: &SharedSim, game_loop: &SharedLoop, change: impl FnOnce(&mut Simulation)) {
        {
            let mut sim = sim.borrow_mut();
            change(&mut sim);
            sim.options().save();
        }
        game_loop.borrow_mut().draw_last_frame();
    }

    fn toggle_running(game_loop: &SharedLoop) {
        let mut gl = game_loop.borrow_mut();
        gl.toggle();
        log::info!("{}", if gl.is_running() { "Resumed" } else { "Paused" });
    }

    fn reset(sim: &SharedSim, game_loop: &SharedLoop) {
        sim.borrow_mut().reset(now_ms());
        update_status(&sim.borrow().stats());
        game_loop.borrow_mut().draw_last_frame();
    }

    fn step(sim: &SharedSim, game_loop: &SharedLoop) {
        game_loop.borrow_mut().step_once();
        log::debug!("Stepped to generation {}", sim.borrow().stats().generation);
    }

    fn setup_controls(document: &Document, sim: SharedSim, game_loop: SharedLoop) {
        {
            let (sim, game_loop) = (sim.clone(), game_loop.clone());
            on_click(document, "toggle-grid", move || {
                change_options(&sim, &game_loop, |s| {
                    s.toggle_grid();
                })
            });
        }
        {
            let (sim, game_loop) = (sim.clone(), game_loop.clone());
            on_click(document, "toggle-fade", move || {
                change_options(&sim, &game_loop, |s| {
                    s.toggle_fade();
                })
            });
        }
        {
            let (sim, game_loop) = (sim.clone(), game_loop.clone());
            on_click(document, "toggle-shape", move || {
                change_options(&sim, &game_loop, |s| {
                    let shape = s.options().cell_shape.toggled();
                    s.set_cell_shape(shape);
                })
            });
        }
        {
            let game_loop = game_loop.clone();
            on_click(document, "start-btn", move || game_loop.borrow_mut().start());
        }
        {
            let game_loop = game_loop.clone();
            on_click(document, "stop-btn", move || game_loop.borrow_mut().stop());
        }
        {
            let (sim, game_loop) = (sim.clone(), game_loop.clone());
            on_click(document, "next-btn", move || step(&sim, &game_loop));
        }
        on_click(document, "reset-btn", move || reset(&sim, &game_loop));
    }

    fn setup_keyboard(sim: SharedSim, game_loop: SharedLoop) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match event.key().as_str() {
                " " => toggle_running(&game_loop),
                "n" | "N" => step(&sim, &game_loop),
                "r" | "R" => reset(&sim, &game_loop),
                "g" | "G" => {
                    change_options(&sim, &game_loop, |s| {
                        s.toggle_grid();
                    });
                    sync_checkboxes(&document, sim.borrow().options());
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Redraw at the new size straight away when paused; the draw phase
    /// picks up the viewport itself
    ///
    /// A resize that lands inside the debounce window is picked up by one
    /// more redraw once the window has passed.
    fn setup_resize(game_loop: SharedLoop) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let listener_window = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game_loop.borrow_mut().draw_last_frame();

            let game_loop = game_loop.clone();
            let trailing = Closure::once_into_js(move || game_loop.borrow_mut().draw_last_frame());
            let _ = listener_window.set_timeout_with_callback_and_timeout_and_arguments_0(
                trailing.unchecked_ref(),
                RESIZE_DEBOUNCE_MS as i32 + 1,
            );
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Pick up options saved by another tab
    fn setup_storage_sync(sim: SharedSim, game_loop: SharedLoop) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let options = GameOptions::load();
            sync_checkboxes(&document, &options);
            game_loop.borrow_mut().set_intervals(&options);
            sim.borrow_mut().set_options(options);
            game_loop.borrow_mut().draw_last_frame();
        });
        let _ = window.add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Update status elements in DOM
    fn update_status(stats: &Stats) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(el) = document.get_element_by_id("stat-generation") {
            el.set_text_content(Some(&stats.generation.to_string()));
        }
        if let Some(el) = document.get_element_by_id("stat-alive") {
            el.set_text_content(Some(&stats.alive.to_string()));
        }
        if let Some(el) = document.get_element_by_id("stat-population") {
            el.set_text_content(Some(&format!("{:.1}%", stats.population_percent)));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Canvas Life (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the canvas version");

    let seconds = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(30.0);
    headless::run(seconds);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use canvas_life::consts::FRAME_MS;
    use canvas_life::platform::ManualFrames;
    use canvas_life::render::recording::RecordingPainter;
    use canvas_life::sim::RefreshOutcome;
    use canvas_life::{GameLoop, GameOptions, LoopPhases, Simulation, Viewport};

    /// Drive the loop with synthetic 60 Hz timestamps for `seconds`
    pub fn run(seconds: f64) {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let options = GameOptions::load();
        let sim = Rc::new(RefCell::new(Simulation::new(
            options.clone(),
            Viewport::new(1280.0, 720.0),
            seed,
            0.0,
        )));
        let painter = Rc::new(RefCell::new(RecordingPainter::default()));
        let refreshes = Rc::new(RefCell::new(0u32));

        let phases = LoopPhases::new(
            {
                let (sim, painter, refreshes) = (sim.clone(), painter.clone(), refreshes.clone());
                move |time: f64| {
                    let mut painter = painter.borrow_mut();
                    painter.clear();
                    let report = sim.borrow_mut().draw(&mut *painter, time);
                    if report.refresh == RefreshOutcome::Applied {
                        *refreshes.borrow_mut() += 1;
                    }
                }
            },
            {
                let sim = sim.clone();
                move |time: f64| {
                    let stats = sim.borrow_mut().update(time);
                    log::debug!(
                        "t={:.0}ms generation={} alive={} ({:.1}%)",
                        time,
                        stats.generation,
                        stats.alive,
                        stats.population_percent
                    );
                }
            },
            {
                let sim = sim.clone();
                move |time: f64| sim.borrow_mut().tick(time)
            },
        );

        let mut game_loop = GameLoop::new(ManualFrames::default(), phases, &options);
        game_loop.start();

        let end = seconds * 1000.0;
        let mut time = FRAME_MS;
        let mut frames = 0u64;
        while time <= end {
            game_loop.frame(time);
            time += FRAME_MS;
            frames += 1;
        }
        game_loop.stop();

        let stats = sim.borrow().stats();
        println!(
            "{} frames, {} generations, {} alive ({:.1}%), {} refreshes, {} paints in last frame",
            frames,
            stats.generation,
            stats.alive,
            stats.population_percent,
            refreshes.borrow(),
            painter.borrow().paints.len()
        );
    }
}
