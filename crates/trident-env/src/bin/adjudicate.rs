//! adjudicate: run one Trident Island episode between two scripted policies.
//!
//! Usage:
//!   adjudicate --legacy capture-rush --dynasty random --seed 7
//!   adjudicate --config env.json --replay-dir replays/

use std::path::PathBuf;
use std::process;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use trident_core::config::EnvConfig;
use trident_core::enums::Faction;
use trident_core::error::Result;
use trident_core::types::PerFaction;
use trident_env::policy::{self, Policy};
use trident_env::reward::ZeroShaping;
use trident_env::TridentEnv;
use trident_sim::SandboxFactory;

struct Options {
    legacy: String,
    dynasty: String,
    seed: u64,
    config: Option<PathBuf>,
    replay_dir: Option<PathBuf>,
    max_steps: Option<u64>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("a global tracing subscriber is already installed");
    }
}

fn print_usage() {
    eprintln!(
        "adjudicate: run one Trident Island episode between scripted policies\n\
         \n\
           --legacy <policy>    Legacy policy: noop, random, capture-rush (default: capture-rush)\n\
           --dynasty <policy>   Dynasty policy (default: random)\n\
           --seed <N>           Episode seed (default: 0)\n\
           --config <path>      Environment configuration JSON (optional)\n\
           --replay-dir <path>  Write a .w4a.json replay bundle here (optional)\n\
           --max-steps <N>      Stop after N steps even if undecided (optional)\n"
    );
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_options(args: &[String]) -> Option<Options> {
    let number = |name: &str| -> Option<Option<u64>> {
        match flag_value(args, name) {
            Some(v) => v.parse().ok().map(Some),
            None => Some(None),
        }
    };
    Some(Options {
        legacy: flag_value(args, "--legacy")
            .unwrap_or("capture-rush")
            .to_string(),
        dynasty: flag_value(args, "--dynasty").unwrap_or("random").to_string(),
        seed: number("--seed")?.unwrap_or(0),
        config: flag_value(args, "--config").map(PathBuf::from),
        replay_dir: flag_value(args, "--replay-dir").map(PathBuf::from),
        max_steps: number("--max-steps")?,
    })
}

fn run(opts: &Options) -> Result<()> {
    let config = match &opts.config {
        Some(path) => EnvConfig::from_json_file(path)?,
        None => EnvConfig::default(),
    };
    let build = |name: &str, seed: u64| {
        policy::by_name(name, seed, &config).unwrap_or_else(|| {
            eprintln!("Unknown policy: {name}");
            print_usage();
            process::exit(1);
        })
    };
    let mut policies: PerFaction<Box<dyn Policy>> = PerFaction::new(
        build(&opts.legacy, opts.seed),
        build(&opts.dynasty, opts.seed.wrapping_add(1)),
    );

    let mut env = TridentEnv::new(config.clone(), SandboxFactory::new());
    if opts.replay_dir.is_some() {
        env.enable_replay();
    }
    env.set_agents(ZeroShaping, ZeroShaping);

    let reset = env.reset(Some(opts.seed))?;
    let mut observations = reset.observations;
    let mut infos = reset.infos;
    let limit = opts
        .max_steps
        .unwrap_or_else(|| config.max_episode_steps());
    info!(
        legacy = policies.legacy.name(),
        dynasty = policies.dynasty.name(),
        seed = opts.seed,
        limit,
        "episode start"
    );

    let mut totals = PerFaction::new(0.0, 0.0);
    for _ in 0..limit {
        let actions = PerFaction::from_fn(|f: Faction| {
            policies[f].act(&observations[f], &infos[f])
        });
        let out = env.step(actions)?;
        totals.legacy += out.rewards.legacy;
        totals.dynasty += out.rewards.dynasty;
        observations = out.observations;
        infos = out.infos;
        if out.terminations.legacy || out.truncations.legacy {
            break;
        }
    }

    let mission = &infos.legacy.mission;
    println!("outcome:      {:?}", env.outcome());
    println!("cause:        {:?}", infos.legacy.termination_cause);
    println!("steps:        {}", env.step_count());
    println!("mission time: {:.0} s", env.time_elapsed());
    println!(
        "casualties:   legacy {} / dynasty {}",
        mission.casualties, mission.kills
    );
    println!(
        "rewards:      legacy {:+.1} / dynasty {:+.1}",
        totals.legacy, totals.dynasty
    );

    if let Some(dir) = &opts.replay_dir {
        let name = format!("trident_seed{}", opts.seed);
        let path = env.save_replay(dir, &name)?;
        println!("replay:       {}", path.display());
    }
    env.close();
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }
    init_logging();

    let Some(opts) = parse_options(args.get(1..).unwrap_or_default()) else {
        eprintln!("Invalid numeric argument");
        print_usage();
        process::exit(1);
    };
    if let Err(err) = run(&opts) {
        error!(%err, "adjudication failed");
        process::exit(1);
    }
}
