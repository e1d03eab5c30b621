//! Event Code Recorder CLI Application
//!
//! This is the command-line front end for the event code decoder library.
//! It uses the library to interpret codes and adds:
//! - Session settings persisted between runs (selection, custom names)
//! - Feed snapshot loading
//! - Location hand-off for plays that need one
//! - JSON / CSV export

use anyhow::{bail, Context, Result};
use clap::Parser;
use event_code_decoder::{EventGrammar, Interpreter, Location, Renderer, SessionSnapshot};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

mod config;
mod feed;
mod report;
mod state;

use config::OutputFormat;
use state::EventLog;

/// Event Code Recorder - Turn typed event codes into exportable records
#[derive(Parser, Debug)]
#[command(name = "event-code-cli")]
#[command(about = "Interpret match event codes and export them (JSON, CSV)", long_about = None)]
#[command(version)]
struct Args {
    /// Session settings file (selection, custom player and team names)
    #[arg(short, long, value_name = "FILE", default_value = "session.toml")]
    session: PathBuf,

    /// Live feed snapshot (JSON) supplying the roster and elapsed time
    #[arg(short, long, value_name = "FILE")]
    feed: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Select the recorded player (0-5) and save it to the session file
    #[arg(long, value_name = "INDEX")]
    select: Option<usize>,

    /// Event code to record (can be repeated)
    #[arg(long = "code", value_name = "CODE")]
    codes: Vec<String>,

    /// File with one event code per line
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Location for the next play that needs one, as X,Y,Z (can be repeated)
    #[arg(
        short,
        long = "location",
        value_name = "X,Y,Z",
        value_parser = parse_location,
        allow_hyphen_values = true
    )]
    locations: Vec<Location>,

    /// Export format (overrides config)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (default: stdout, or output_dir from config)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Event Code Recorder CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", event_code_decoder::VERSION);

    let mut session = config::load_session(&args.session)?;
    if let Some(id) = args.select {
        session.select(id)?;
        config::save_session(&args.session, &session)?;
    }

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };

    // A replacement grammar is built once and borrowed for the whole run
    let custom_grammar = app_config
        .grammar
        .as_ref()
        .map(|g| g.build())
        .transpose()?;
    let interpreter = match &custom_grammar {
        Some(grammar) => Interpreter::new(grammar),
        None => Interpreter::standard(),
    };

    let codes = collect_codes(&args)?;
    if codes.is_empty() {
        print_summary(interpreter.grammar(), &session);
        return Ok(());
    }

    let feed_path = args
        .feed
        .as_ref()
        .context("A feed snapshot (--feed) is required to record codes")?;
    let snapshot = feed::load_feed(feed_path)?.session_snapshot(&session)?;

    let event_log = record_codes(&interpreter, &snapshot, &codes, &args.locations)?;

    let format = args.format.unwrap_or(app_config.output.format);
    let renderer = Renderer::new();

    match output_path(&args, &app_config, format)? {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            report::export(&event_log, &renderer, format, BufWriter::new(file))?;
            log::info!("Exported {} events to {:?}", event_log.len(), path);
        }
        None => {
            report::export(&event_log, &renderer, format, io::stdout().lock())?;
        }
    }

    Ok(())
}

/// Interpret codes in order. Each play that needs a location takes the next
/// unused one; running out is an error.
fn record_codes(
    interpreter: &Interpreter,
    snapshot: &SessionSnapshot,
    codes: &[String],
    locations: &[Location],
) -> Result<EventLog> {
    let mut event_log = EventLog::new();
    let mut locations = locations.iter().copied();

    for code in codes {
        let record = interpreter
            .interpret(code, snapshot)
            .with_context(|| format!("Rejected event code '{}'", code))?;
        event_log.record(record)?;

        if event_log.pending().is_some() {
            let Some(location) = locations.next() else {
                bail!("Event code '{}' needs a location but no --location is left", code);
            };
            event_log.complete_pending(location)?;
        }
    }

    let unused = locations.count();
    if unused > 0 {
        log::warn!("{} --location value(s) were not used", unused);
    }

    Ok(event_log)
}

/// Codes from --code followed by --input, skipping blanks and # comments
fn collect_codes(args: &Args) -> Result<Vec<String>> {
    let mut codes = args.codes.clone();

    if let Some(path) = &args.input {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {:?}", path))?;
        codes.extend(parse_code_lines(&content));
    }

    Ok(codes)
}

fn parse_code_lines(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

fn output_path(
    args: &Args,
    app_config: &config::AppConfig,
    format: OutputFormat,
) -> Result<Option<PathBuf>> {
    if let Some(path) = &args.output {
        return Ok(Some(path.clone()));
    }

    match &app_config.output.output_dir {
        Some(dir) => {
            ensure_dir(dir)?;
            let name = report::default_file_name(format, chrono::Local::now());
            Ok(Some(dir.join(name)))
        }
        None => Ok(None),
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create output directory: {:?}", dir))
}

fn parse_location(value: &str) -> std::result::Result<Location, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected X,Y,Z but got '{}'", value));
    };

    let axis = |s: &str| {
        s.parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {}", s, e))
    };
    Ok(Location::new(axis(*x)?, axis(*y)?, axis(*z)?))
}

fn print_summary(grammar: &EventGrammar, session: &config::SessionSettings) {
    println!("═══════════════════════════════════════════════");
    println!("  Event Code Recorder - No codes given");
    println!("═══════════════════════════════════════════════\n");

    let stats = grammar.stats();
    println!("📊 Event Grammar:");
    println!("  Events:   {}", stats.num_events);
    println!("  Outcomes: {}", stats.num_outcomes);
    for event in grammar.events() {
        let outcomes: Vec<String> = event
            .outcomes
            .iter()
            .map(|o| format!("{}={}", o.id, o.name))
            .collect();
        println!(
            "  {}  {:<20} [{}] {}",
            event.id,
            event.name,
            event.secondary,
            outcomes.join(", ")
        );
    }

    println!("\n👤 Session:");
    println!(
        "  Recording: {} (slot {})",
        session.players[session.selected_id], session.selected_id
    );
    println!("  Teams:     {}", session.teams.join(" vs "));

    println!("\nQuick Start:");
    println!("  event-code-cli --feed state.json --code cs3 --code gay");
    println!("  event-code-cli --feed state.json --code up --location 0,-1200,17 --format csv");
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
