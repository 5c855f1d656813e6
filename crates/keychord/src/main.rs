use std::env;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use keychord::{config, logging, translate, Modifiers};

mod app;

use app::{App, Editor};

fn print_version() {
    println!("keychord {}", env!("CARGO_PKG_VERSION"));
}

fn print_usage() {
    eprintln!("keychord - modal key chord editor");
    eprintln!();
    eprintln!("Usage: keychord [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]            File to edit (created on write)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help        Print this help message");
    eprintln!("  -V, --version     Print version information");
    eprintln!("      --debug-keys  Print each key event and the token it translates to");
    eprintln!();
    eprintln!("Environment Variables:");
    eprintln!("  KEYCHORD_CONFIG_DIR  Override the config directory");
    eprintln!("  KEYCHORD_LOG         Log filter (e.g. debug)");
    eprintln!("  KEYCHORD_LOG_FILE    Log file or directory");
    eprintln!();
    eprintln!("Configuration:");
    if let Some(path) = config::config_path() {
        eprintln!("  Config file: {}", path.display());
    }
    eprintln!();
    eprintln!("Press Esc for normal mode, i or a to insert, Space h for keys, Ctrl+Q to quit.");
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    if args.iter().any(|a| a == "-V" || a == "--version") {
        print_version();
        return Ok(());
    }

    if args.iter().any(|a| a == "--debug-keys") {
        return run_debug_keys();
    }

    let _log_guard = logging::init()
        .map_err(|e| eprintln!("Warning: Failed to initialize logging: {e}"))
        .ok();

    let cfg = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {:#}", e);
        config::Config::default()
    });

    let editor = match args.iter().skip(1).find(|a| !a.starts_with('-')) {
        Some(path) => Editor::open(PathBuf::from(path))?,
        None => Editor::new(Vec::new(), None),
    };

    // Keymap errors are fatal
    let mut app = App::with_config(&cfg, editor)?;

    let mut terminal =
        init_terminal().context("failed to initialize terminal; are you running in a real TTY?")?;

    let res = app.run(&mut terminal);

    restore_terminal(terminal)?;

    res
}

fn run_debug_keys() -> Result<()> {
    struct DebugTerminalGuard {
        stdout: Stdout,
    }

    impl DebugTerminalGuard {
        fn new() -> Result<Self> {
            enable_raw_mode()?;
            Ok(Self {
                stdout: io::stdout(),
            })
        }

        fn println(&mut self, line: &str) -> Result<()> {
            write!(self.stdout, "\r\n{line}")?;
            self.stdout.flush()?;
            Ok(())
        }
    }

    impl Drop for DebugTerminalGuard {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = self.stdout.flush();
        }
    }

    fn describe_modifiers(modifiers: Modifiers) -> String {
        modifiers
            .tokens()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join("+")
    }

    fn describe_key(key: &KeyEvent) -> String {
        match translate(key) {
            Some((token, modifiers)) if modifiers.is_empty() => format!("token={token}"),
            Some((token, modifiers)) => {
                format!("token={token} modifiers={}", describe_modifiers(modifiers))
            }
            None => "untranslated (passthrough)".to_string(),
        }
    }

    let mut guard = DebugTerminalGuard::new()?;
    guard.println("keychord --debug-keys (press Esc or Ctrl+C to exit)")?;

    loop {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                guard.println(&format!("{}    raw={key:?}", describe_key(&key)))?;

                let is_ctrl_c =
                    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
                if key.code == KeyCode::Esc || is_ctrl_c {
                    break;
                }
            }
            Event::Resize(w, h) => {
                guard.println(&format!("Resize: {w}x{h}"))?;
            }
            _ => {}
        }
    }

    Ok(())
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
