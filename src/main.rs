// barebones: Bare Bones interpreter with a time-travel variable viewer

use std::io;
use std::process;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use barebones::interpreter::constants::DEFAULT_SNAPSHOT_LIMIT;
use barebones::interpreter::engine::Interpreter;
use barebones::parser::parse::Parser;
use barebones::source::load_source;
use barebones::ui::App;
use barebones::{Error, RunConfig};

/// Command-line options
struct Options {
    path: String,
    max_steps: Option<u64>,
    tui: bool,
}

fn usage(program_name: &str) -> ! {
    eprintln!("Usage: {} <file.bb> [--max-steps N] [--tui]", program_name);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --max-steps N   Stop with an error after N execution steps");
    eprintln!("  --tui           Step through the execution history in a terminal UI");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  {} demos/multiply.bb --tui", program_name);
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("barebones");

    let mut path = None;
    let mut max_steps = None;
    let mut tui = false;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--tui" => tui = true,
            "--max-steps" => match rest.next().map(|n| n.parse::<u64>()) {
                Some(Ok(n)) => max_steps = Some(n),
                _ => {
                    eprintln!("Error: --max-steps expects a non-negative integer");
                    usage(program_name);
                }
            },
            "-h" | "--help" => usage(program_name),
            flag if flag.starts_with("--") => {
                eprintln!("Error: Unknown option '{}'", flag);
                usage(program_name);
            }
            file if path.is_none() => path = Some(file.to_string()),
            extra => {
                eprintln!("Error: Unexpected argument '{}'", extra);
                usage(program_name);
            }
        }
    }

    let Some(path) = path else {
        eprintln!("Error: No input file provided");
        eprintln!();
        usage(program_name);
    };

    Options {
        path,
        max_steps,
        tui,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args);

    let source = match load_source(&options.path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut config = RunConfig::new();
    if let Some(max_steps) = options.max_steps {
        config = config.with_max_steps(max_steps);
    }
    if options.tui {
        config = config.with_history(DEFAULT_SNAPSHOT_LIMIT);
    }

    info!("Parsing {}", options.path);
    let program = match Parser::new(&source).and_then(|mut parser| parser.parse_program()) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", Error::from(e));
            process::exit(1);
        }
    };
    info!(
        statements = program.statement_count(),
        depth = program.max_depth(),
        "Parsed successfully"
    );

    let mut interpreter = Interpreter::new(program, config);
    let result = interpreter.run();

    if !options.tui {
        return match result {
            Ok(bindings) => {
                for (name, value) in &bindings {
                    println!("{} = {}", name, value);
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", Error::from(e));
                process::exit(1);
            }
        };
    }

    match result {
        Ok(_) => info!(
            snapshots = interpreter.total_snapshots(),
            steps = interpreter.steps_executed(),
            "Execution completed successfully"
        ),
        Err(e) => {
            eprintln!("{}", Error::from(e));
            warn!("Entering TUI with partial execution history");
        }
    }

    // Rewind to the beginning for TUI
    if let Err(e) = interpreter.rewind_to_start() {
        warn!("Failed to rewind to start: {}", e);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    Ok(())
}
