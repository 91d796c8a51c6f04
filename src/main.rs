// offside: token, tree and diagnostics viewer for indentation-sensitive source

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use offside::ui::App;
use offside::{parse_with, tokenize_with, ParseOptions, Recovery};

/// Command-line options
#[derive(Debug, Default)]
struct Cli {
    dump: bool,
    verbose: bool,
    conservative: bool,
    path: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut cli = Cli::default();

    for arg in args {
        match arg.as_str() {
            "--dump" => cli.dump = true,
            "-v" | "--verbose" => cli.verbose = true,
            "--conservative" => cli.conservative = true,
            flag if flag.starts_with('-') => return Err(format!("Unknown option '{}'", flag)),
            path => {
                if cli.path.is_some() {
                    return Err("Only one input file may be given".to_string());
                }
                cli.path = Some(path.to_string());
            }
        }
    }

    if cli.path.is_none() {
        return Err("No input file provided".to_string());
    }
    Ok(cli)
}

fn print_usage(program_name: &str) {
    eprintln!();
    eprintln!("Usage: {} [--dump [-v]] [--conservative] <file>", program_name);
    eprintln!();
    eprintln!("  <file>                  Open the interactive viewer");
    eprintln!("  --dump <file>           Print tokens, syntax tree and diagnostics");
    eprintln!("  -v, --verbose           Log pipeline events to stderr (with --dump)");
    eprintln!("  --conservative          Stop at the first syntax error");
}

/// Print tokens, tree and diagnostics; returns whether the source was clean.
fn dump(source: &str, options: &ParseOptions) -> bool {
    let (tokens, _) = tokenize_with(source, options);
    println!("== tokens ==");
    for token in &tokens {
        println!("{}", token.listing());
    }

    let output = parse_with(source, options);
    println!();
    println!("== syntax tree ==");
    print!("{}", output.module);

    println!();
    println!("== diagnostics ==");
    if output.errors.is_empty() {
        println!("(none)");
    }
    for err in &output.errors {
        println!("{}", err);
    }

    output.is_ok()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("offside");

    let cli = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage(program_name);
            std::process::exit(1);
        }
    };

    let path = cli.path.unwrap_or_default();
    if !Path::new(&path).exists() {
        eprintln!("Error: File '{}' not found", path);
        print_usage(program_name);
        std::process::exit(1);
    }

    let source = fs::read_to_string(&path)?;

    let recovery = if cli.conservative {
        Recovery::Conservative
    } else {
        Recovery::Permissive
    };
    let options = ParseOptions::default().with_recovery(recovery);

    if cli.dump {
        let level = if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();

        if !dump(&source, &options) {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(path, source, &options);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
