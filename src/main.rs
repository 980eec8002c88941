//! Typestress CLI
//!
//! Captures a typing session in the terminal, derives timing features, and
//! submits them to the stress prediction service.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::time::Duration;
use typestress::{
    check_input_gate, extract, render_report, BlockingPredictorClient, CaptureEvent, Config,
    FeatureVector, PredictorConfig, Session, TerminalCollector, VERSION,
};

#[derive(Parser)]
#[command(name = "typestress")]
#[command(version = VERSION)]
#[command(about = "Keystroke-timing capture and stress analysis client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a typing session interactively and analyze it
    Analyze {
        /// Prediction service host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Prediction service port (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Minimum typed characters before analysis is allowed
        #[arg(long)]
        min_chars: Option<usize>,
    },

    /// Submit an explicit feature vector without capturing
    Predict {
        /// Keys per second
        #[arg(long)]
        typing_speed: f64,

        /// Average pause in milliseconds
        #[arg(long)]
        avg_pause: f64,

        /// Backspaces per total keys (0-1)
        #[arg(long)]
        error_rate: f64,

        /// Prediction service host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Prediction service port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Check connectivity to the prediction service
    Check {
        /// Prediction service host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Prediction service port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            host,
            port,
            min_chars,
        } => cmd_analyze(host, port, min_chars),
        Commands::Predict {
            typing_speed,
            avg_pause,
            error_rate,
            host,
            port,
        } => cmd_predict(typing_speed, avg_pause, error_rate, host, port),
        Commands::Check { host, port } => cmd_check(host, port),
        Commands::Config => cmd_config(),
    }
}

/// Apply CLI overrides on top of the persisted configuration.
fn effective_config(host: Option<String>, port: Option<u16>) -> Config {
    let mut config = Config::load().unwrap_or_default();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config
}

fn make_client(config: &Config) -> BlockingPredictorClient {
    let predictor_config = PredictorConfig::new(config.host.clone(), config.port);
    match BlockingPredictorClient::new(predictor_config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating predictor client: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_analyze(host: Option<String>, port: Option<u16>, min_chars: Option<usize>) {
    let mut config = effective_config(host, port);
    if let Some(min_chars) = min_chars {
        config.min_chars = min_chars;
    }

    println!("Typestress v{VERSION}");
    println!();

    let client = make_client(&config);
    match client.test_connection() {
        Ok(true) => println!("Prediction service: OK ({}:{})", config.host, config.port),
        Ok(false) => eprintln!("Warning: prediction service health check failed"),
        Err(_) => eprintln!(
            "Warning: could not reach prediction service at {}:{}",
            config.host, config.port
        ),
    }

    println!();
    println!("Type freely in this terminal. At least {} characters are", config.min_chars);
    println!("needed for an analysis.");
    println!();
    println!("  Esc     analyze the current session");
    println!("  Ctrl+R  reset and start over");
    println!("  Ctrl+C  quit");
    println!();

    let mut collector = TerminalCollector::new();
    if let Err(e) = collector.start() {
        eprintln!("Error starting capture: {e}");
        std::process::exit(1);
    }
    let receiver = collector.receiver().clone();

    let mut session = Session::new();
    let mut text = String::new();

    loop {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(CaptureEvent::Key(stroke)) => {
                session.record_key_event(stroke.is_deletion, stroke.timestamp);
                if stroke.is_deletion {
                    text.pop();
                } else if let Some(c) = stroke.ch {
                    text.push(c);
                }
                print_live_stats(&session, &text);
            }
            Ok(CaptureEvent::Reset) => {
                session.reset();
                text.clear();
                raw_say("Session reset. Start typing whenever you are ready.");
            }
            Ok(CaptureEvent::Analyze) => {
                // Gate first, while capture keeps running: insufficient input
                // never stops the session.
                let char_count = text.chars().count();
                if let Err(e) = check_input_gate(char_count, config.min_chars, &session) {
                    raw_say(&format!("Cannot analyze yet: {e}"));
                    continue;
                }

                // Snapshot-then-suspend: freeze the input surface and compute
                // the feature vector before the network call begins.
                collector.stop();
                println!();

                let features = match extract(&session, Utc::now()) {
                    Ok(features) => features,
                    Err(e) => {
                        // Should be unreachable under the gate; treat as a
                        // logic error and keep the session for a retry.
                        eprintln!("Internal timing error during extraction: {e}");
                        if resume_prompt(&mut collector) {
                            continue;
                        }
                        break;
                    }
                };

                println!("Analyzing...");
                match client.predict(&features) {
                    Ok(prediction) => {
                        println!();
                        println!("{}", render_report(&prediction));
                        session.reset();
                        text.clear();
                        if !resume_prompt(&mut collector) {
                            break;
                        }
                        println!("New session started. Type away.");
                    }
                    Err(_) => {
                        // The session is untouched; the user can retry
                        // without retyping.
                        eprintln!("Analysis failed. The prediction service could not be reached");
                        eprintln!("or returned an unexpected response. Your session is intact.");
                        if !resume_prompt(&mut collector) {
                            break;
                        }
                        println!("Capture resumed. Press Esc to retry the analysis.");
                    }
                }
            }
            Ok(CaptureEvent::Quit) => {
                break;
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Capture thread disconnected unexpectedly");
                break;
            }
        }
    }

    collector.stop();
    println!();
    println!("Goodbye.");
}

/// Ask whether to continue, restarting capture if so. Returns false to quit.
fn resume_prompt(collector: &mut TerminalCollector) -> bool {
    println!();
    println!("Press Enter to continue (or type q then Enter to quit)");
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    if line.trim().eq_ignore_ascii_case("q") {
        return false;
    }
    if let Err(e) = collector.start() {
        eprintln!("Error restarting capture: {e}");
        return false;
    }
    true
}

/// Redraw the single live-stats line (terminal is in raw mode).
fn print_live_stats(session: &Session, text: &str) {
    let stats = session.live_stats(text.chars().count(), Utc::now());
    print!(
        "\r  chars: {:>4}  keys/sec: {:>6.2}  backspaces: {:>3} ",
        stats.char_count, stats.typing_speed_estimate, stats.backspace_count
    );
    let _ = std::io::stdout().flush();
}

/// Print a message line while the terminal is in raw mode.
fn raw_say(msg: &str) {
    print!("\r\n{msg}\r\n");
    let _ = std::io::stdout().flush();
}

fn cmd_predict(
    typing_speed: f64,
    avg_pause: f64,
    error_rate: f64,
    host: Option<String>,
    port: Option<u16>,
) {
    if typing_speed < 0.0 || avg_pause < 0.0 || error_rate < 0.0 {
        eprintln!("Error: feature values must be non-negative");
        std::process::exit(1);
    }

    let config = effective_config(host, port);
    let client = make_client(&config);

    let features = FeatureVector {
        typing_speed,
        avg_pause,
        error_rate,
    };

    match client.predict(&features) {
        Ok(prediction) => println!("{}", render_report(&prediction)),
        Err(e) => {
            eprintln!("Analysis failed: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_check(host: Option<String>, port: Option<u16>) {
    let config = effective_config(host, port);
    let client = make_client(&config);

    match client.test_connection() {
        Ok(true) => println!("Prediction service at {}:{} is up", config.host, config.port),
        Ok(false) => {
            eprintln!(
                "Prediction service at {}:{} responded with an error",
                config.host, config.port
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Could not reach prediction service: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}
