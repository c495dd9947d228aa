use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use book_nebula::{
    Config, DataSource, IntroPhase, PageController, PageEvent, PageView, ParticleField,
    ResultArea, WindowSettings, spawn_visualizer,
};

/// How often page timers are checked.
const TICK: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "nebula", about = "Book search page with a black hole intro")]
struct Cli {
    /// Config file (defaults to ./nebula.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset file path or http(s) URL
    #[arg(long)]
    data: Option<String>,

    /// Base URL a relative dataset name is fetched from
    #[arg(long)]
    base_url: Option<String>,

    /// Run without the animation window
    #[arg(long)]
    headless: bool,

    /// Seed for star placement and typing jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose debug output
    #[arg(long)]
    verbose: bool,
}

enum Input {
    Event(PageEvent),
    State,
    Help,
    Quit,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn lock(page: &Mutex<PageController>) -> MutexGuard<'_, PageController> {
    page.lock().unwrap_or_else(PoisonError::into_inner)
}

fn parse_input(line: &str) -> Option<Input> {
    if !line.starts_with('/') {
        return Some(Input::Event(PageEvent::SearchInput(line.to_string())));
    }

    let input = match line.trim() {
        "/clear" => Input::Event(PageEvent::ClearSearch),
        "/focus" => Input::Event(PageEvent::InputFocus),
        "/blur" => Input::Event(PageEvent::InputBlur),
        "/hover" => Input::Event(PageEvent::PointerEnter),
        "/leave" => Input::Event(PageEvent::PointerLeave),
        "/enter" => Input::Event(PageEvent::Activate),
        "/pause" => Input::Event(PageEvent::TogglePause),
        "/quotes-hover" => Input::Event(PageEvent::CarouselHoverEnter),
        "/quotes-leave" => Input::Event(PageEvent::CarouselHoverLeave),
        "/state" => Input::State,
        "/help" => Input::Help,
        "/quit" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

fn print_banner() {
    println!("\n╭──────────────────────────────────────────╮");
    println!("│               book nebula                │");
    println!("│                                          │");
    println!("│ type to search titles by prefix          │");
    println!("│ empty line shows the quote carousel      │");
    println!("│                                          │");
    println!("│ /enter        - open the page            │");
    println!("│ /hover /leave - pointer over the hole    │");
    println!("│ /pause        - pause/resume animation   │");
    println!("│ /clear        - clear the search         │");
    println!("│ /focus /blur  - search field focus       │");
    println!("│ /quotes-hover /quotes-leave              │");
    println!("│ /state  /help  /quit                     │");
    println!("╰──────────────────────────────────────────╯\n");
}

fn print_state(view: &PageView, mode: &str) {
    println!("phase: {:?} ({mode})", view.phase);
    println!("content visible: {}", view.content_visible);
    match view.pause_control {
        Some(true) => println!("animation: paused"),
        Some(false) => println!("animation: running"),
        None => println!("animation: intro"),
    }
    println!("query: {:?}", view.query);
    println!("placeholder: {}", view.placeholder);
    println!("clear button: {}", if view.clear_button_visible { "shown" } else { "hidden" });
    println!("\n{}\n", view.results);
}

fn spawn_loader(page: Arc<Mutex<PageController>>, source: DataSource) {
    tokio::spawn(async move {
        let event = match source.load().await {
            Ok(library) => PageEvent::DatasetLoaded(library),
            Err(e) => {
                error!("Failed to connect to the Data Nebula: {e}");
                PageEvent::DatasetFailed(e.to_string())
            }
        };

        let results = {
            let mut page = lock(&page);
            page.dispatch(event, Instant::now());
            page.results()
        };
        println!("\n{results}\n");
    });
}

fn spawn_timers(page: Arc<Mutex<PageController>>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(TICK);
        loop {
            ticker.tick().await;

            let (report, phase, results) = {
                let mut page = lock(&page);
                let report = page.poll(Instant::now());
                (report, page.phase(), page.results())
            };

            if report.entered_backdrop {
                info!("intro finished");
            }
            if report.carousel_rotated
                && phase != IntroPhase::Intro
                && matches!(results, ResultArea::Carousel(Some(_)))
            {
                println!("\n{results}\n");
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(data) = cli.data {
        config.data = data;
    }
    if cli.base_url.is_some() {
        config.base_url = cli.base_url;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.headless |= cli.headless;

    let source = DataSource::resolve(&config.data, config.base_url.as_deref())
        .context("invalid dataset source")?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let field = ParticleField::new(
        config.width,
        config.height,
        config.particle_count,
        Instant::now(),
        &mut rng,
    );
    let page = Arc::new(Mutex::new(PageController::new(config.timings(), field, rng)));

    if !config.headless {
        spawn_visualizer(
            Arc::clone(&page),
            WindowSettings {
                width: config.width,
                height: config.height,
                target_fps: config.target_fps,
            },
        );
    }

    spawn_loader(Arc::clone(&page), source);
    spawn_timers(Arc::clone(&page));

    print_banner();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let placeholder = lock(&page).view().placeholder;
        print!("search [{placeholder}]: ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else { break };

        let input = match parse_input(&line) {
            Some(input) => input,
            None => {
                println!("unknown command, try /help\n");
                continue;
            }
        };

        let event = match input {
            Input::Quit => break,
            Input::Help => {
                print_banner();
                continue;
            }
            Input::State => {
                let page = lock(&page);
                print_state(&page.view(), &format!("{:?}", page.field().mode()));
                continue;
            }
            Input::Event(event) => event,
        };

        let shows_results = matches!(
            event,
            PageEvent::SearchInput(_) | PageEvent::ClearSearch | PageEvent::CarouselHoverLeave
        );

        let (view, mode) = {
            let mut page = lock(&page);
            page.dispatch(event, Instant::now());
            (page.view(), page.field().mode())
        };

        if shows_results {
            if !view.content_visible {
                println!("(page hidden until /enter)");
            }
            println!("\n{}\n", view.results);
        } else {
            println!("{:?} · {:?}\n", view.phase, mode);
        }
    }

    info!("bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_search_input() {
        match parse_input("  Du ") {
            Some(Input::Event(PageEvent::SearchInput(text))) => assert_eq!(text, "  Du "),
            _ => panic!("expected search input"),
        }
        assert!(matches!(
            parse_input(""),
            Some(Input::Event(PageEvent::SearchInput(_)))
        ));
    }

    #[test]
    fn commands_map_to_events() {
        assert!(matches!(parse_input("/enter"), Some(Input::Event(PageEvent::Activate))));
        assert!(matches!(parse_input("/pause"), Some(Input::Event(PageEvent::TogglePause))));
        assert!(matches!(
            parse_input("/quotes-hover"),
            Some(Input::Event(PageEvent::CarouselHoverEnter))
        ));
        assert!(matches!(parse_input("/quit"), Some(Input::Quit)));
        assert!(parse_input("/bogus").is_none());
    }
}
