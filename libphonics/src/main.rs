use anyhow::{Context, Result};
use clap::Parser;
use kurbo::Rect;
use libphonics::{Book, PhonicsConfig, PhonicsEngine, PointerSample, ReadingSession, SessionEvent};
use readalong_core::{AudioError, AudioOutput, ClipHandle, NavigationDecision};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Drive a reading session from the terminal.
///
/// Pages come from `--book` or from stdin (one page per line). Every word is
/// laid out on a virtual line and read with a simulated finger: a slider
/// drag at `--speed` px/ms, a tap, or auto-play.
#[derive(Parser)]
#[command(name = "readalong")]
struct Args {
    /// PhonicsConfig TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// CMU dictionary text (overrides the config)
    #[arg(long)]
    cmudict: Option<PathBuf>,

    /// Directory with lexicon.fst + lexicon.bincode (overrides the config)
    #[arg(long)]
    lexicon_dir: Option<PathBuf>,

    /// Book file (.toml or .json)
    #[arg(long)]
    book: Option<PathBuf>,

    /// Finger speed in px/ms; below the slow threshold words are sounded out
    #[arg(long, default_value_t = 0.1)]
    speed: f64,

    /// Rendered width of every word in px
    #[arg(long, default_value_t = 90.0)]
    word_width: f64,

    /// How each word is read
    #[arg(long, value_enum, default_value_t = Mode::Drag)]
    mode: Mode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Mode {
    Drag,
    Tap,
    Autoplay,
}

/// Frame interval of the simulated pointer.
const FRAME_MS: f64 = 16.0;

/// Prints every request instead of playing it.
struct ConsoleAudio;

impl AudioOutput for ConsoleAudio {
    fn speak(&mut self, text: &str, rate: f32) -> Result<(), AudioError> {
        println!("  🔊 \"{}\" (rate {:.2})", text, rate);
        Ok(())
    }

    fn play_clip(&mut self, clip: &ClipHandle) -> Result<(), AudioError> {
        println!("  🔊 clip {}", clip.0);
        Ok(())
    }

    fn cancel_all(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<PhonicsConfig> {
    let mut config = match &args.config {
        Some(path) => PhonicsConfig::load_toml(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PhonicsConfig::default(),
    };
    if args.cmudict.is_some() {
        config.cmudict_path = args.cmudict.clone();
        config.lexicon_dir = None;
    }
    if args.lexicon_dir.is_some() {
        config.lexicon_dir = args.lexicon_dir.clone();
    }
    Ok(config)
}

fn load_book(args: &Args) -> Result<Book> {
    if let Some(path) = &args.book {
        return Book::load(path).with_context(|| format!("reading book {}", path.display()));
    }
    println!("Type one page per line, then Ctrl+D.");
    let mut pages = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            pages.push(line);
        }
    }
    Ok(Book::new("stdin", pages))
}

fn print_events(session: &mut ReadingSession<PhonicsEngine>) {
    for event in session.take_events() {
        match event {
            SessionEvent::HelpOffered { .. } => {
                if let Some(help) = &session.context().help {
                    println!(
                        "  💡 {} | {} | {}",
                        help.syllables.join("-"),
                        help.sounds.join(" "),
                        help.hint
                    );
                }
            }
            other => println!("  · {:?}", other),
        }
    }
}

fn word_rect(index: usize, width: f64) -> Rect {
    let left = index as f64 * (width + 20.0);
    Rect::new(left, 100.0, left + width, 130.0)
}

/// Read one page; returns the clock after the page.
fn read_page(session: &mut ReadingSession<PhonicsEngine>, args: &Args, mut now: f64) -> f64 {
    let words: Vec<String> = session
        .page()
        .words()
        .iter()
        .map(|w| w.original_text.clone())
        .collect();

    if args.mode == Mode::Autoplay {
        session.start_autoplay(now);
        print_events(session);
        while session.is_autoplaying() {
            now += FRAME_MS;
            session.tick(now);
            print_events(session);
        }
        return now;
    }

    for (i, text) in words.iter().enumerate() {
        println!("▶ {}", text);
        let rect = word_rect(i, args.word_width);
        match args.mode {
            Mode::Tap => {
                session.tap(i, now);
            }
            _ => {
                let step = args.speed.max(0.001) * FRAME_MS;
                let mut x = rect.x0;
                session.pointer_down(i, PointerSample::new(x, 115.0, now), rect);
                while x < rect.x1 {
                    x = (x + step).min(rect.x1);
                    now += FRAME_MS;
                    session.pointer_drag(PointerSample::new(x, 115.0, now), rect);
                }
                session.pointer_up(PointerSample::new(x, 115.0, now));
            }
        }
        print_events(session);
        now += 400.0;
        session.tick(now);
        print_events(session);
    }
    now
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let book = load_book(&args)?;
    if book.page_count() == 0 {
        println!("Nothing to read.");
        return Ok(());
    }

    let mut session = libphonics::session_from_config(&config, Box::new(ConsoleAudio))?;
    session.open_book(book);
    session.take_events();

    let mut now = 0.0;
    loop {
        println!("═══ page {} ═══", session.page_index() + 1);
        now = read_page(&mut session, &args, now);

        now += config.base.page_complete_delay_ms;
        session.tick(now);
        print_events(&mut session);

        if session.advance_page() == NavigationDecision::EndOfBook {
            break;
        }
        session.take_events();
    }
    println!("The end.");
    Ok(())
}
