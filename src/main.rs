//! VPP settlement entry point: CLI wiring and config-driven engine construction.

use std::path::Path;
use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use vpp_settle::config::ScenarioConfig;
use vpp_settle::io::export::export_schedule_csv;
use vpp_settle::reporting::print_settlement;
use vpp_settle::settlement::{SettlementEngine, SettlementSummary};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    schedule_out: Option<String>,
    json: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("vpp-settle: Virtual Power Plant daily settlement");
    eprintln!();
    eprintln!("Usage: vpp-settle [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --schedule-out <path>    Export battery schedule to CSV");
    eprintln!("  --json                   Print result and summary as JSON");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after settlement");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

/// Returns the value following a flag or exits with an error.
fn flag_value(args: &[String], i: usize, flag: &str, expected: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires {expected}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        schedule_out: None,
        json: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(flag_value(&args, i, "--scenario", "a path argument"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(flag_value(&args, i, "--preset", "a name argument"));
            }
            "--schedule-out" => {
                i += 1;
                cli.schedule_out = Some(flag_value(&args, i, "--schedule-out", "a path argument"));
            }
            "--json" => {
                cli.json = true;
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = flag_value(&args, i, "--port", "a u16 argument");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --scenario and --preset are mutually exclusive; choose one source");
        process::exit(1);
    }

    cli
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = parse_args();
    init_logging();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let scenario = if let Some(ref path) = cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::baseline())
    };
    let scenario = scenario.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let net_positions = scenario.resolved_net_positions();
    info!(
        prosumers = scenario.prosumers.len(),
        generated = scenario.net_positions.is_empty(),
        "scenario loaded"
    );

    let engine = SettlementEngine::new(scenario.vpp.clone()).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let result = engine.optimize(&scenario.prosumers, &net_positions);
    let summary = SettlementSummary::from_result(&result, &net_positions);

    if cli.json {
        let body = serde_json::json!({ "result": &result, "summary": &summary });
        match serde_json::to_string_pretty(&body) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to serialize result: {e}");
                process::exit(1);
            }
        }
    } else {
        print_settlement(&result, &summary);
    }

    if let Some(ref path) = cli.schedule_out {
        if let Err(e) = export_schedule_csv(&result.battery_schedule, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path, "battery schedule written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(vpp_settle::api::AppState::new(
            scenario.prosumers,
            net_positions,
            engine,
        ));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(vpp_settle::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
