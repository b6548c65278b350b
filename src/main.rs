//! VisionToy CLI
//!
//! Usage:
//!   visiontoy --frame "dog:0.6, bird:0.3"     # Single frame
//!   visiontoy --interactive                   # One frame per stdin line
//!   visiontoy --replay frames.txt             # Replay a recorded feed
//!   visiontoy --serve                         # HTTP API server
//!   visiontoy --frame "cat:0.9" --json        # JSON output

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, BufReader, Write};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use visiontoy::config::DemoConfig;
use visiontoy::core::{apply_utterance, run_server, ClassificationPipeline, ObservationParser, Speaker, TerminalSpeaker};
use visiontoy::types::CycleOutput;
use visiontoy::{RELOAD_TRANSITION_MS, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "visiontoy",
    version = VERSION,
    about = "VisionToy - live ranked classification list with spoken top label",
    long_about = "VisionToy turns classifier output into a continuously refreshed ranked list.\n\n\
                  Each accepted frame is cleaned (top 11, confidence >= 0.1, sorted),\n\
                  diffed against the previous list (deletions, insertions, moves,\n\
                  reloads) and its top label is announced unless it was just announced.\n\n\
                  Frame format:\n  \
                  label:confidence, other label:confidence\n  \
                  [{\"identifier\": \"cat\", \"confidence\": 0.9}]"
)]
struct Args {
    /// One frame to evaluate (single mode)
    #[arg(short, long)]
    frame: Option<String>,

    /// Interactive mode - each stdin line is one frame
    #[arg(short, long)]
    interactive: bool,

    /// Replay frames from a file, one per line
    #[arg(short, long)]
    replay: Option<String>,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// JSON configuration file
    #[arg(long)]
    config: Option<String>,

    /// Minimum time between analysed frames in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,

    /// Disable announcements
    #[arg(long)]
    mute: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show reload transitions
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    let result = if args.serve {
        run_serve(&args, config).await
    } else if let Some(ref path) = args.replay {
        run_replay(path, &args, config)
    } else if let Some(ref frame) = args.frame {
        run_single(frame, &args, config)
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args, config)
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays parseable; LOG_FORMAT=json for JSON logs
fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("visiontoy=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .with(env_filter)
            .init();
    }
}

/// Defaults ← config file ← CLI flags
fn load_config(args: &Args) -> Result<DemoConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => DemoConfig::from_file(path)?,
        None => DemoConfig::default(),
    };
    if let Some(period) = args.period_ms {
        config.analysis_period_ms = period;
    }
    if args.mute {
        config.audio_enabled = false;
    }
    config.validate()?;
    Ok(config)
}

/// Run single frame evaluation
fn run_single(frame: &str, args: &Args, config: DemoConfig) -> Result<(), Box<dyn std::error::Error>> {
    let parser = ObservationParser::new();
    let mut pipeline = ClassificationPipeline::new(&config);
    let mut speaker = TerminalSpeaker::new();

    let observations = parser.parse_frame(frame)?;
    let output = pipeline.run_cycle(&observations);
    print_output(&output, args, &mut speaker)?;
    Ok(())
}

/// Run interactive mode: each line is a frame, `mute`/`unmute` toggle audio
fn run_interactive(args: &Args, config: DemoConfig) -> Result<(), Box<dyn std::error::Error>> {
    let parser = ObservationParser::new();
    let mut pipeline = ClassificationPipeline::new(&config);
    let mut speaker = TerminalSpeaker::new();

    print_header("Interactive", args.no_color);
    println!("Enter one frame per line, e.g. 'dog:0.6, bird:0.3'.");
    println!("Commands: mute, unmute, reset, quit. An empty line means nothing recognised.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("[{}{}] > ", pipeline.cycle_count(), if pipeline.audio_enabled() { "" } else { " muted" });
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "quit" | "exit" => {
                println!("\nSession ended. Cycles: {}", pipeline.cycle_count());
                break;
            }
            "mute" => {
                if let Some(action) = pipeline.set_audio_enabled(false) {
                    apply_utterance(&mut speaker, &action);
                }
                continue;
            }
            "unmute" => {
                pipeline.set_audio_enabled(true);
                continue;
            }
            "reset" => {
                pipeline.reset();
                speaker.stop();
                continue;
            }
            _ => {}
        }

        let observations = match parser.parse_frame(line) {
            Ok(observations) => observations,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        // Interactive input is already human-paced; no throttle
        let output = pipeline.run_cycle(&observations);
        print_output(&output, args, &mut speaker)?;
    }

    Ok(())
}

/// Replay a recorded feed at the configured cadence
fn run_replay(path: &str, args: &Args, config: DemoConfig) -> Result<(), Box<dyn std::error::Error>> {
    let parser = ObservationParser::new();
    let file = std::fs::File::open(path)?;
    let frames = parser.read_frames(BufReader::new(file))?;
    info!(frames = frames.len(), path, "replaying feed");

    let period = Duration::from_millis(config.analysis_period_ms);
    let mut pipeline = ClassificationPipeline::new(&config);
    let mut speaker = TerminalSpeaker::new();

    let start = Instant::now();
    for (index, frame) in frames.iter().enumerate() {
        // Frames are spaced one period apart on a virtual clock
        let now = start + period * index as u32;
        if let Some(output) = pipeline.offer_frame(frame, now) {
            print_output(&output, args, &mut speaker)?;
        }
    }

    info!(cycles = pipeline.cycle_count(), "replay finished");
    Ok(())
}

/// Print one cycle in the selected format and hand the utterance to the speaker
fn print_output(
    output: &CycleOutput,
    args: &Args,
    speaker: &mut dyn Speaker,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", serde_json::to_string(output)?);
        return Ok(());
    }

    if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
    }

    if args.verbose {
        for stage in output.edits.reload_stages(&output.classifications) {
            println!(
                "    ↻ {:>2}. {} {:.3} → {:.3} over {}ms",
                stage.position + 1,
                stage.identifier,
                stage.from_confidence,
                stage.to_confidence,
                RELOAD_TRANSITION_MS
            );
        }
    }

    if let Some(action) = &output.utterance {
        apply_utterance(speaker, action);
    }
    Ok(())
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    let title = format!("VisionToy v{} - {}", VERSION, mode);
    if no_color {
        println!("========================================");
        println!("  {}", title);
        println!("========================================");
    } else {
        println!("{}", "════════════════════════════════════════".bold());
        println!("  {}", title.bold());
        println!("{}", "════════════════════════════════════════".bold());
    }
    println!();
}

/// Run HTTP API server
async fn run_serve(args: &Args, config: DemoConfig) -> Result<(), Box<dyn std::error::Error>> {
    print_header("API Server", args.no_color);
    run_server(&args.addr, config).await
}
