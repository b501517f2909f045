//! minigfx - demo and smoke test for the minigfx drawing library
//!
//! Opens a window, draws a small scene with every primitive and then echoes
//! the code of each key or mouse press until `q` or Escape is pressed.
//!
//! # Quick Start
//!
//! ```text
//! minigfx                      # Window from ~/.minigfx/config.toml
//! minigfx -W 800 -H 600        # Custom size
//! minigfx --palette            # Force colormap allocation
//! minigfx --headless           # Scripted run without an X server
//! ```

use std::env;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use minigfx::input::NAV_CODE_BASE;
use minigfx::{
    ColorModePreference, Config, Display, HeadlessDisplay, KeyPress, LineStyle, NativeEvent,
    NavKey, Session,
};

/// Command line options
#[derive(Default)]
struct Options {
    width: Option<u32>,
    height: Option<u32>,
    title: Option<String>,
    color_mode: Option<ColorModePreference>,
    headless: bool,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Escape key code
const ESCAPE: u32 = 27;

fn print_version() {
    eprintln!("minigfx {}", VERSION);
}

fn print_help() {
    eprintln!("minigfx {} - A tiny single-window drawing library for X11", VERSION);
    eprintln!();
    eprintln!("Usage: minigfx [OPTIONS]");
    eprintln!();
    eprintln!("Window options:");
    eprintln!("  -W, --width <PX>      Window width");
    eprintln!("  -H, --height <PX>     Window height");
    eprintln!("  -t, --title <TEXT>    Window title");
    eprintln!();
    eprintln!("Color options:");
    eprintln!("  (default)             Pick from the display's visual");
    eprintln!("  --fast                Pack RGB directly into pixels");
    eprintln!("  --palette             Allocate every color from the colormap");
    eprintln!();
    eprintln!("Other options:");
    eprintln!("  --headless            Run a scripted session without an X server");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys: q or Esc quits; other keys and mouse buttons print their code.");
    eprintln!();
    eprintln!("Configuration: ~/.minigfx/config.toml");
    eprintln!("Log file:      ~/.minigfx/minigfx.log");
}

fn parse_number(args: &[String], i: usize, name: &str) -> Result<u32, String> {
    let value = args
        .get(i)
        .ok_or_else(|| format!("Missing {} argument", name))?;
    value
        .parse()
        .map_err(|_| format!("Invalid {}: {}", name, value))
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-W" | "--width" => {
                i += 1;
                options.width = Some(parse_number(&args, i, "width")?);
            }
            "-H" | "--height" => {
                i += 1;
                options.height = Some(parse_number(&args, i, "height")?);
            }
            "-t" | "--title" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing title argument".to_string());
                }
                options.title = Some(args[i].clone());
            }
            "--fast" => {
                options.color_mode = Some(ColorModePreference::Fast);
            }
            "--palette" => {
                options.color_mode = Some(ColorModePreference::Palette);
            }
            "--headless" => {
                options.headless = true;
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Apply command line overrides on top of the config file
fn merge(mut config: Config, options: &Options) -> Config {
    if let Some(width) = options.width {
        config.window.width = width;
    }
    if let Some(height) = options.height {
        config.window.height = height;
    }
    if let Some(title) = &options.title {
        config.window.title = title.clone();
    }
    if let Some(mode) = options.color_mode {
        config.colors.mode = mode;
    }
    config
}

fn init_logging(config: &Config) {
    let log_path = Config::config_dir()
        .map(|dir| dir.join("minigfx.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("minigfx.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let config = merge(Config::load(), &options);
    init_logging(&config);

    info!("minigfx {} starting...", VERSION);

    if options.headless {
        return run_headless(&config);
    }

    #[cfg(unix)]
    {
        run_window(&config)?;
    }

    #[cfg(not(unix))]
    {
        eprintln!("minigfx needs an X11 display. Running in headless mode...");
        run_headless(&config)?;
    }

    Ok(())
}

/// Run against the X server
#[cfg(unix)]
fn run_window(config: &Config) -> anyhow::Result<()> {
    use minigfx::X11Display;

    // No display means nothing to draw on: report and exit
    let display = match X11Display::connect() {
        Ok(display) => display,
        Err(e) => {
            error!("Failed to connect: {}", e);
            eprintln!("minigfx: unable to open the graphics window: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = Session::open_configured(display, config).context("Failed to open window")?;
    info!("Window size: {}x{}", session.xsize(), session.ysize());

    draw_scene(&mut session);
    run_input_loop(&mut session)?;

    session.close();
    Ok(())
}

/// Scripted run with no display server
fn run_headless(config: &Config) -> anyhow::Result<()> {
    println!("=== minigfx Headless Mode ===\n");

    let display = HeadlessDisplay::new().palette_capacity(16);
    let mut session = Session::open_configured(display, config)?;

    draw_scene(&mut session);

    let script = [
        NativeEvent::Configure { width: 800, height: 600 },
        NativeEvent::KeyPress(KeyPress::new(12, 34, b"a", 0x61)),
        // Shift alone has no code and is skipped
        NativeEvent::KeyPress(KeyPress::new(12, 34, b"", 0xffe1)),
        NativeEvent::KeyPress(KeyPress::new(12, 34, b"", NavKey::Left.keysym())),
        NativeEvent::button(100, 120, 1),
        NativeEvent::KeyPress(KeyPress::new(0, 0, b"q", 0x71)),
    ];
    for event in script {
        session.display_mut().push_event(event);
    }

    run_input_loop(&mut session)?;

    println!("\nDrawing requests:");
    print!("{}", session.display().render_log());
    println!("\nHeadless run complete. Run without --headless on an X11 desktop.");
    Ok(())
}

/// One of each primitive
fn draw_scene<D: Display>(session: &mut Session<D>) {
    let (w, h) = (session.xsize() as i32, session.ysize() as i32);

    session.set_color(255, 255, 255);
    session.rectangle(10, 10, (w - 20).max(0) as u32, (h - 20).max(0) as u32);

    session.set_color(255, 80, 80);
    session.fill_rectangle(30, 40, 80, 50);

    session.set_color(80, 200, 80);
    session.set_line_style(3, LineStyle::Dashed);
    session.line(30, h - 40, w - 30, 40);
    session.set_line_style(0, LineStyle::Solid);

    session.set_color(80, 120, 255);
    session.fill_segment(w / 2 - 40, h / 2 - 40, 80, 0, 360);
    session.set_color(255, 255, 0);
    session.arc(w / 2 - 60, h / 2 - 50, 120, 100, 30, 120);

    session.set_color(200, 100, 255);
    session.triangle(w - 120, h - 30, w - 40, h - 30, w - 80, h - 100);
    session.fill_triangle(w - 220, h - 30, w - 140, h - 30, w - 180, h - 100);

    session.set_color(255, 255, 255);
    session.point(w / 2, h / 2);
    session.text(20, 30, b"minigfx: press q or Esc to quit");

    session.flush();
}

/// Print each code until q or Escape
fn run_input_loop<D: Display>(session: &mut Session<D>) -> anyhow::Result<()> {
    loop {
        let code = session.wait().context("Lost the display connection")?;
        info!(
            "code {} at ({}, {}), window {}x{}",
            code,
            session.xpos(),
            session.ypos(),
            session.xsize(),
            session.ysize()
        );
        println!("{} at ({}, {}) {}", code, session.xpos(), session.ypos(), describe(code));

        if code == u32::from(b'q') || code == ESCAPE {
            break;
        }

        // Button numbers overlap the control-key codes; mark the spot either way
        if (1..=5).contains(&code) {
            session.set_color(255, 255, 255);
            session.fill_segment(session.xpos() - 3, session.ypos() - 3, 6, 0, 360);
        }
    }
    Ok(())
}

fn describe(code: u32) -> String {
    match code {
        1..=5 => format!("(mouse button {})", code),
        c if (NAV_CODE_BASE..NAV_CODE_BASE + 9).contains(&c) => {
            format!("(navigation key {})", c - NAV_CODE_BASE)
        }
        32..=126 => format!("({:?})", char::from(code as u8)),
        _ => String::new(),
    }
}
