use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;
use tracing::{error, info};

use crate::canvas::{BACKGROUND, Canvas};
use crate::error::Result;
use crate::math::Point;
use crate::page::{IntroPhase, PageController, PageEvent};

/// Radius of the clickable "enter" area around the canvas center.
pub const HOTSPOT_RADIUS: f64 = 80.0;

const LABEL: &str = "enter";
const LABEL_SCALE: usize = 4;
const LABEL_COLOR: u32 = 0xE0E0E0;

#[derive(Clone, Copy, Debug)]
pub struct WindowSettings {
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
}

pub fn in_hotspot(center: Point, x: f64, y: f64) -> bool {
    center.dist_sq(Point::new(x, y)) <= HOTSPOT_RADIUS * HOTSPOT_RADIUS
}

pub fn spawn_visualizer(
    page: Arc<Mutex<PageController>>,
    settings: WindowSettings,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = run_window(page, settings) {
            error!("visualizer stopped: {e}");
        }
    })
}

fn run_window(page: Arc<Mutex<PageController>>, settings: WindowSettings) -> Result<()> {
    let WindowSettings { width, height, target_fps } = settings;
    let mut window = Window::new("Book Nebula", width, height, WindowOptions::default())?;
    window.set_target_fps(target_fps);

    let mut canvas = Canvas::new(width, height, BACKGROUND);
    let center = Point::new(width as f64 / 2.0, height as f64 / 2.0);
    let mut hovering = false;
    let mut was_down = false;

    info!(width, height, "visualizer open");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let over = window
            .get_mouse_pos(MouseMode::Discard)
            .is_some_and(|(x, y)| in_hotspot(center, x as f64, y as f64));
        let down = window.get_mouse_down(MouseButton::Left);
        let space = window.is_key_pressed(Key::Space, KeyRepeat::No);

        let (phase, paused) = {
            let mut page = page.lock().unwrap_or_else(PoisonError::into_inner);
            if over != hovering {
                let event = if over { PageEvent::PointerEnter } else { PageEvent::PointerLeave };
                page.dispatch(event, now);
                hovering = over;
            }
            if over && down && !was_down {
                page.dispatch(PageEvent::Activate, now);
            }
            if space {
                page.dispatch(PageEvent::TogglePause, now);
            }
            page.render_frame(now, &mut canvas);
            (page.phase(), page.field().is_paused())
        };
        was_down = down;

        if phase == IntroPhase::Intro {
            let x = (width.saturating_sub(Canvas::text_width(LABEL, LABEL_SCALE))) / 2;
            let y = (height.saturating_sub(5 * LABEL_SCALE)) / 2;
            canvas.draw_text(x, y, LABEL, LABEL_COLOR, LABEL_SCALE);
        } else if paused {
            canvas.draw_text(10, 10, "paused", LABEL_COLOR, 2);
        }

        window.update_with_buffer(canvas.pixels(), width, height)?;
    }

    info!("visualizer closed");
    Ok(())
}
