mod app;
mod command;
mod config;
mod engine;
mod input;
mod mode;
mod style;
mod ui;

use std::fs::File;
use std::io::{self, Write};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info, Level};
use tracing_subscriber::fmt::writer::MakeWriter;

use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::App;
use config::AppConfig;

/// Command line options
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    value: Option<f64>,
    theme: Option<String>,
    log: Option<PathBuf>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                parsed.config = Some(PathBuf::from(option_value(&args, i)));
                i += 2;
            }
            "-v" | "--value" => {
                parsed.value = Some(parse_value(option_value(&args, i)));
                i += 2;
            }
            "-t" | "--theme" => {
                parsed.theme = Some(option_value(&args, i).to_string());
                i += 2;
            }
            "-l" | "--log" => {
                parsed.log = Some(PathBuf::from(option_value(&args, i)));
                i += 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            arg => {
                eprintln!("Unknown option: {}", arg);
                std::process::exit(1);
            }
        }
    }

    parsed
}

fn option_value(args: &[String], i: usize) -> &str {
    match args.get(i + 1) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("Error: {} requires an argument", args[i]);
            std::process::exit(1);
        }
    }
}

fn parse_value(s: &str) -> f64 {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            eprintln!("Invalid value: '{}'. Expected a finite number.", s);
            std::process::exit(1);
        }
    }
}

/// Handle panics gracefully
fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        if let Some(location) = info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                "panic occurred"
            );
        } else {
            error!("panic occurred");
        }

        if let Some(s) = info.payload().downcast_ref::<&str>() {
            error!(message = %s);
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            error!(message = %s);
        }

        // logging passes through the alternate screen, so leave it last
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);

        default_hook(info);
    }));
}

/// A `MakeWriter` for `tracing` that logs to the **main screen** by leaving the alternate screen temporarily.
pub struct MainScreenWriter;

impl<'a> MakeWriter<'a> for MainScreenWriter {
    type Writer = MainScreenWriterHandle;

    fn make_writer(&'a self) -> Self::Writer {
        MainScreenWriterHandle
    }
}

/// A handle that writes to stdout outside the alternate screen
pub struct MainScreenWriterHandle;

impl Write for MainScreenWriterHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        execute!(io::stdout(), LeaveAlternateScreen)?;
        println!();
        execute!(io::stdout(), MoveToColumn(0))?;
        let result = io::stdout().write(buf);
        execute!(io::stdout(), MoveToColumn(0))?;
        io::stdout().flush()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Debug logs go to the file when one is given. Otherwise only errors are
/// printed, on the main screen, so the UI is not disturbed.
fn init_logging(log_path: Option<&Path>) -> io::Result<()> {
    match log_path {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_max_level(Level::DEBUG)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(MainScreenWriter)
                .with_max_level(Level::ERROR)
                .init();
        }
    }
    Ok(())
}

fn print_help() {
    eprintln!("tally - A calculator with undo and redo");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    tally [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -c, --config <FILE>  Load settings from a TOML file");
    eprintln!("    -v, --value <N>      Starting value (default 100)");
    eprintln!("    -t, --theme <NAME>   Theme: {}", style::Theme::builtin_names().join(", "));
    eprintln!("    -l, --log <FILE>     Write debug logs to FILE");
    eprintln!("    -h, --help           Print this help message");
    eprintln!();
    eprintln!("KEYS:");
    eprintln!("    0-9 .  edit operand     ~  negate operand");
    eprintln!("    + - * /  apply operand  u / r (Ctrl-r)  undo / redo once");
    eprintln!("    U / R  undo / redo all  :  command line (undo N, redo N, theme NAME, clear, q)");
}

/// Read the config file and apply command line overrides
fn load_config(args: &Args) -> Result<AppConfig, String> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(value) = args.value {
        config.initial_value = value;
    }
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
        config.theme_file = None;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> io::Result<()> {
    let args = parse_args();

    init_logging(args.log.as_deref())?;
    info!("Tally started");

    install_panic_hook();

    let startup = load_config(&args).and_then(|config| {
        let theme = config.resolve_theme()?;
        let keys = config.key_table()?;
        Ok((config, theme, keys))
    });
    let (config, theme, keys) = match startup {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        initial_value = config.initial_value,
        operand = config.operand,
        theme = %theme.name,
        "configuration loaded"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, theme, keys);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}
