use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::env;
use std::io::{stdout, BufWriter};
use std::time::{Duration, Instant};

mod canvas;
mod card;
mod color;
mod scene;

use canvas::{Canvas, CELL_PX};
use color::Rgb;
use scene::{Phase, Scene};

struct Options {
    message: String,
    launch_window: f64,
    bg_color: Rgb,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            message: String::from("Happy Birthday!"),
            launch_window: 10.0,
            bg_color: (0, 0, 0),
        }
    }
}

fn print_usage() {
    eprintln!("greetsaver - Fireworks greeting for the terminal");
    eprintln!();
    eprintln!("Usage: greetsaver [OPTIONS]");
    eprintln!();
    eprintln!("Launches fireworks for a while, lets them burn out, then shows a");
    eprintln!("greeting card. Click anywhere to launch an extra one.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --message TEXT     Greeting shown on the card (default: Happy Birthday!)");
    eprintln!("  --duration SECS    Length of the launch window (default: 10)");
    eprintln!("  --bg-color RRGGBB  Night-sky color as hex (e.g., --bg-color 1a1b26)");
    eprintln!();
    eprintln!("Press 'q', ESC, or Ctrl+C to exit");
}

fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

fn run(opts: &Options) -> std::io::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(
        stdout,
        EnterAlternateScreen,
        Hide,
        Clear(ClearType::All),
        EnableMouseCapture
    )?;

    let (mut cols, mut rows) = terminal::size()?;
    let mut canvas = Canvas::new(cols as usize, rows as usize * 2, opts.bg_color);
    let mut scene = Scene::new(canvas.width(), canvas.height(), opts.launch_window);
    let mut card_shown = false;

    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f64;
    const FIXED_DT: f64 = 1.0 / 60.0;

    loop {
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break;
                    }
                }
                Event::Resize(new_cols, new_rows) => {
                    cols = new_cols;
                    rows = new_rows;
                    canvas = Canvas::new(cols as usize, rows as usize * 2, opts.bg_color);
                    scene.resize(canvas.width(), canvas.height());
                    execute!(stdout, Clear(ClearType::All))?;
                    if card_shown {
                        card::draw(&mut stdout, cols, rows, &opts.message)?;
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    scene.click(column as f64 * CELL_PX, row as f64 * 2.0 * CELL_PX);
                }
                _ => {}
            }
        }

        // The show is over; nothing left to animate, just wait for a key.
        if card_shown {
            continue;
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            scene.update(FIXED_DT);
            accumulator -= FIXED_DT;
        }

        if scene.phase() == Phase::Done {
            card::draw(&mut stdout, cols, rows, &opts.message)?;
            card_shown = true;
        } else {
            scene.draw(&mut canvas);
            canvas.present(&mut stdout)?;
        }
    }

    execute!(stdout, Show, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    Ok(())
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut opts = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--message" => {
                if i + 1 < args.len() {
                    opts.message = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("--message requires a value");
                    std::process::exit(1);
                }
            }
            "--duration" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse::<f64>() {
                        Ok(secs) if secs.is_finite() && secs >= 0.0 => {
                            opts.launch_window = secs;
                            i += 2;
                        }
                        _ => {
                            eprintln!("Invalid duration: {}", args[i + 1]);
                            eprintln!("Expected a non-negative number of seconds");
                            std::process::exit(1);
                        }
                    }
                } else {
                    eprintln!("--duration requires a value");
                    std::process::exit(1);
                }
            }
            "--bg-color" => {
                if i + 1 < args.len() {
                    if let Some(color) = parse_hex_color(&args[i + 1]) {
                        opts.bg_color = color;
                        i += 2;
                    } else {
                        eprintln!("Invalid hex color: {}", args[i + 1]);
                        eprintln!("Expected format: RRGGBB (e.g., 1a1b26)");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("--bg-color requires a hex color value");
                    std::process::exit(1);
                }
            }
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            arg => {
                eprintln!("Unknown option: {}", arg);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }

    run(&opts)
}
