//! Horse Derby entry point
//!
//! Web: wires the DOM controls to the game and animates on requestAnimationFrame.
//! Native: runs a full program headlessly and logs the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;

    use horse_derby::animation::FrameHandle;
    use horse_derby::format::{color_name, result_line, round_label};
    use horse_derby::platform::BrowserFrames;
    use horse_derby::sim::{GamePhase, RaceEvent};
    use horse_derby::{Game, Settings};

    /// Game instance plus browser-side settings
    struct App {
        game: Game,
        settings: Settings,
    }

    /// Frame scheduler whose callbacks route back into `app`
    fn frames(app: &Rc<RefCell<App>>) -> BrowserFrames {
        let weak: Weak<RefCell<App>> = Rc::downgrade(app);
        BrowserFrames::new(Rc::new(move |handle: FrameHandle, now: f64| {
            if let Some(app) = weak.upgrade() {
                on_frame(&app, handle, now);
            }
        }))
    }

    fn on_frame(app: &Rc<RefCell<App>>, handle: FrameHandle, now: f64) {
        let mut scheduler = frames(app);
        app.borrow_mut()
            .game
            .on_animation_frame(handle, now, &mut scheduler);
        update_hud(app);
    }

    pub async fn run() {
        console_error_panic_hook::set_once();

        let settings = Settings::default();
        let level = settings
            .level_filter()
            .ok()
            .and_then(|filter| filter.to_level())
            .unwrap_or(log::Level::Info);
        console_log::init_with_level(level).expect("Failed to init logger");

        log::info!("Horse Derby starting...");

        let seed = settings.resolve_seed(js_sys::Date::now() as u64);
        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed),
            settings,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_controls(&app);
        setup_auto_pause(&app);
        update_hud(&app);

        log::info!("Horse Derby running!");
    }

    /// Attach a click handler to the element with `id`
    fn on_click(id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Missing control #{}", id);
        }
    }

    fn setup_controls(app: &Rc<RefCell<App>>) {
        {
            let app = app.clone();
            on_click("generate-btn", move |_event| {
                app.borrow_mut().game.generate_program();
                update_hud(&app);
            });
        }
        {
            let app = app.clone();
            on_click("start-btn", move |_event| {
                let mut scheduler = frames(&app);
                app.borrow_mut()
                    .game
                    .start(js_sys::Date::now(), &mut scheduler);
                update_hud(&app);
            });
        }
        {
            let app = app.clone();
            on_click("pause-btn", move |_event| {
                let mut scheduler = frames(&app);
                app.borrow_mut()
                    .game
                    .pause(js_sys::Date::now(), &mut scheduler);
                update_hud(&app);
            });
        }
        {
            let app = app.clone();
            on_click("reset-btn", move |_event| {
                let mut scheduler = frames(&app);
                app.borrow_mut().game.reset(&mut scheduler);
                update_hud(&app);
            });
        }
    }

    fn setup_auto_pause(app: &Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let app = app.clone();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() != web_sys::VisibilityState::Hidden {
                return;
            }
            let mut scheduler = frames(&app);
            let mut a = app.borrow_mut();
            if a.settings.auto_pause && a.game.is_racing() {
                a.game.pause(js_sys::Date::now(), &mut scheduler);
                log::info!("Auto-paused (tab hidden)");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Update HUD elements in DOM
    fn update_hud(app: &Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let mut a = app.borrow_mut();

        for event in a.game.drain_events() {
            if let RaceEvent::RaceCompleted { round_index, results } = event {
                let lines: Vec<String> = results.iter().map(result_line).collect();
                log::info!("{} round results:\n{}", round_label(round_index as u32 + 1), lines.join("\n"));
            }
        }

        let game = &a.game;
        let phase = match game.phase() {
            GamePhase::Idle => "Idle",
            GamePhase::ProgramGenerated => "Ready",
            GamePhase::Racing => "Racing",
            GamePhase::Paused => "Paused",
            GamePhase::Completed => "Finished",
        };
        if let Some(el) = document.get_element_by_id("hud-phase") {
            el.set_text_content(Some(phase));
        }

        if let Some(el) = document.get_element_by_id("hud-round") {
            let text = game
                .current_race()
                .map(|race| format!("{} Lap - {}m", round_label(race.round_number), race.distance))
                .unwrap_or_default();
            el.set_text_content(Some(&text));
        }

        if let Some(el) = document.get_element_by_id("track") {
            let text = game
                .current_race()
                .map(|race| {
                    race.horses
                        .iter()
                        .map(|h| format!("{:<22}{:<10}{:>5.1}%", h.name, color_name(&h.color), h.position))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .unwrap_or_default();
            el.set_text_content(Some(&text));
        }

        if let Some(el) = document.get_element_by_id("results") {
            let text = game
                .completed_races()
                .iter()
                .map(|race| {
                    let lines: Vec<String> = race
                        .results
                        .iter()
                        .flatten()
                        .map(result_line)
                        .collect();
                    format!("{} Lap - {}m\n{}", round_label(race.round_number), race.distance, lines.join("\n"))
                })
                .collect::<Vec<_>>()
                .join("\n\n");
            el.set_text_content(Some(&text));
        }

        set_enabled(&document, "generate-btn", game.can_generate());
        set_enabled(&document, "start-btn", game.can_start() && !game.is_racing());
        set_enabled(&document, "pause-btn", game.is_racing());
    }

    fn set_enabled(document: &web_sys::Document, id: &str, enabled: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if enabled {
                el.remove_attribute("disabled")
            } else {
                el.set_attribute("disabled", "")
            };
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use horse_derby::settings::SETTINGS_ENV;
    use horse_derby::{ConfigError, Settings};

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(SETTINGS_ENV).ok());
    let loaded: Result<Settings, ConfigError> = match &path {
        Some(path) => Settings::load(path),
        None => Ok(Settings::default()),
    };
    let (settings, load_error) = match loaded {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    env_logger::Builder::new()
        .filter_level(settings.level_filter().unwrap_or(log::LevelFilter::Info))
        .parse_default_env()
        .init();

    if let (Some(path), Some(e)) = (&path, load_error) {
        log::error!("Could not load settings from {}: {} (using defaults)", path, e);
    }

    log::info!("Horse Derby (headless) starting...");
    run_headless(&settings);
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless(settings: &horse_derby::Settings) {
    use horse_derby::Game;
    use horse_derby::format::{color_name, result_line, round_label};
    use horse_derby::platform::HeadlessDriver;
    use horse_derby::sim::RaceEvent;

    let fallback_seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let seed = settings.resolve_seed(fallback_seed);
    let mut game = Game::new(seed);
    let mut driver = HeadlessDriver::new(settings);
    log::info!("Game initialized with seed: {}", seed);

    for horse in game.all_horses() {
        log::debug!(
            "#{:<3}{:<22}condition {:>3}  {}",
            horse.id,
            horse.name,
            horse.condition,
            color_name(&horse.color)
        );
    }

    game.generate_program();
    driver.start(&mut game);

    while driver.frames_run() < settings.max_frames && driver.step(&mut game) {
        for event in game.drain_events() {
            if let RaceEvent::RaceCompleted { round_index, results } = event {
                let distance = game
                    .race_program()
                    .get(round_index)
                    .map_or(0, |race| race.distance);
                log::info!("{} Lap - {}m", round_label(round_index as u32 + 1), distance);
                for result in &results {
                    log::info!("  {}", result_line(result));
                }
            }
        }
    }

    log::info!(
        "Finished in phase {:?}: {} races, {} frames, {:.1}s of race time",
        game.phase(),
        game.completed_races().len(),
        driver.frames_run(),
        driver.now() / 1000.0
    );
}
