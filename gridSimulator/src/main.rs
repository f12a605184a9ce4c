use std::error::Error;
use std::io::Read;

use anyhow::Context;
use clap::Parser;

use marbles::cli::cli::Args;
use marbles::config::game_config::GameConfig;
use marbles::core::autopilot::{play_session, run_autoplay, Autopilot};
use marbles::core::commands::{parse_script, GameEvent};
use marbles::core::self_test::run_self_test;
use marbles::core::session::Session;
use marbles::utils::csv_export::CsvExporter;
use marbles::utils::logging::{self, FileIOType, OperationCategory};

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();

    logging::init_logging(args.enable_timing(), args.debug_logging())?;

    println!("Marbles energy grid game (headless)");

    if args.test() {
        let checks = run_self_test()?;
        for check in &checks {
            println!("  {:<16} committed {} GW  ok", check.tech.to_string(), check.committed);
        }
        println!("Self-test passed");
        return Ok(());
    }

    let config = load_config(args.config())?;
    let seed = args.seed().unwrap_or_else(rand::random);
    let exporter = match args.export_dir() {
        Some(dir) => Some(CsvExporter::new(dir)?),
        None => None,
    };

    if let Some(sessions) = args.autoplay() {
        let seeds: Vec<u64> = (0..sessions as u64).map(|i| seed.wrapping_add(i)).collect();
        let outcomes = run_autoplay(&config, &seeds, true);
        for outcome in &outcomes {
            println!(
                "seed {:>20}  score {:>8.2}  rounds {:>2}  unpowered {:>2}  smog {:.3}",
                outcome.seed, outcome.score, outcome.rounds, outcome.unpowered_rounds, outcome.final_smog_ratio
            );
        }
        if let Some(exporter) = &exporter {
            exporter.export_autoplay(&outcomes)?;
        }
        if args.json() {
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }
        logging::print_timing_report();
        return Ok(());
    }

    let session = match args.script() {
        Some(source) => play_script(&config, seed, source)?,
        None => {
            let (session, _) = play_session(&config, seed, Autopilot::default());
            session
        }
    };

    println!("\nFinal score: {} after {} rounds", session.score(), session.rounds().len());
    if let Some(exporter) = &exporter {
        exporter.export_rounds(&seed.to_string(), session.rounds())?;
    }
    if args.json() {
        println!("{}", serde_json::to_string_pretty(&session.view())?);
    }

    logging::print_timing_report();
    Ok(())
}

fn load_config(path: Option<&str>) -> anyhow::Result<GameConfig> {
    let _timing = logging::start_timing("load_config",
        OperationCategory::FileIO { subcategory: FileIOType::ConfigLoad });
    match path {
        Some(path) => GameConfig::load(path).with_context(|| format!("failed to load config from {}", path)),
        None => Ok(GameConfig::default()),
    }
}

fn read_script(source: &str) -> anyhow::Result<String> {
    let _timing = logging::start_timing("read_script",
        OperationCategory::FileIO { subcategory: FileIOType::ScriptLoad });
    let mut contents = String::new();
    if source == "-" {
        std::io::stdin().read_to_string(&mut contents).context("failed to read script from stdin")?;
    } else {
        contents = std::fs::read_to_string(source).with_context(|| format!("failed to read script {}", source))?;
    }
    Ok(contents)
}

fn play_script(config: &GameConfig, seed: u64, source: &str) -> anyhow::Result<Session> {
    let script = read_script(source)?;
    let commands = parse_script(&script).map_err(anyhow::Error::msg)?;
    let mut session = Session::new(config.clone(), seed);

    for command in commands {
        let mut events = session.apply(command);
        events.extend(session.run_transition());
        for event in &events {
            match event {
                GameEvent::RoundSettled { hour, .. } => {
                    println!("\n-- Hour {} --\n{}", hour, session.summary());
                }
                GameEvent::PhaseChanged { to, .. } => println!("[{}]", to),
                _ => {}
            }
        }
        if session.quit_requested() {
            break;
        }
    }
    Ok(session)
}
