//! Lane Hopper entry point
//!
//! Headless driver: runs the autopilot against the fixed-timestep
//! simulation, optionally printing ASCII frames, then records the result in
//! the score table.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use lane_hopper::autopilot::choose_move;
use lane_hopper::consts::SIM_DT;
use lane_hopper::highscores::ScoreTableError;
use lane_hopper::settings::SettingsError;
use lane_hopper::sim::{GameEvent, GameState, end_game, handle_move, tick};
use lane_hopper::{ScoreTable, Settings};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    ScoreTable(#[from] ScoreTableError),
}

#[derive(Debug, Parser)]
#[command(name = "lane-hopper", version)]
#[command(about = "Endless lane-crossing game, played headless by the autopilot")]
struct Args {
    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many simulation ticks (60 per second)
    #[arg(long, default_value_t = 36_000)]
    ticks: u64,

    /// Two autopilot players instead of one
    #[arg(long)]
    two_player: bool,

    /// Print an ASCII frame every N ticks
    #[arg(long)]
    frame_every: Option<u64>,

    /// Pace ticks with the configured tick interval instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Settings file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    write_settings: bool,

    /// Score table file (overrides the settings file)
    #[arg(long)]
    ranking: Option<PathBuf>,

    /// Name recorded for player one
    #[arg(long)]
    name: Option<String>,
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = Settings::load(&args.settings);
    if let Some(name) = &args.name {
        settings.player_one_name = name.clone();
    }
    if let Some(path) = &args.ranking {
        settings.ranking_path = path.clone();
    }
    settings.two_player |= args.two_player;
    let settings = settings.sanitized();
    if args.write_settings {
        settings.save(&args.settings)?;
    }

    let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);
    log::info!("Lane Hopper starting (seed {seed})");

    let mut state = GameState::with_tuning(settings.tuning(), seed);
    state.set_two_player(settings.two_player);

    run(&mut state, &args, &settings);

    println!("{}", state.snapshot().to_text());
    record_results(&state, &settings)?;
    Ok(())
}

fn run(state: &mut GameState, args: &Args, settings: &Settings) {
    let pace = Duration::from_millis(settings.tick_ms);

    for t in 0..args.ticks {
        for id in 0..state.active_actors() {
            if let Some(dir) = choose_move(state, id) {
                handle_move(state, id, dir);
            }
        }
        tick(state, SIM_DT);

        for event in state.drain_events() {
            log_event(&event);
        }

        if args.frame_every.is_some_and(|n| n > 0 && t % n == 0) {
            println!("{}\n", state.snapshot().to_text());
        }

        if state.is_game_over() {
            break;
        }
        if args.realtime {
            std::thread::sleep(pace);
        }
    }

    if !state.is_game_over() {
        log::info!("Tick budget of {} reached", args.ticks);
        end_game(state);
        state.drain_events();
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Scrolled { world_head } => log::debug!("Scrolled, head {world_head}"),
        GameEvent::Scored { actor, score } => log::debug!("P{} scored ({score})", actor + 1),
        GameEvent::Died { actor, cause } => log::info!("P{} died: {cause:?}", actor + 1),
        GameEvent::Respawning { lives_left } => log::info!("Respawning, {lives_left} lives left"),
        GameEvent::Respawned => log::debug!("Back in play"),
        GameEvent::LifeCollected { lives } => log::info!("Extra life ({lives})"),
        GameEvent::GameOver => log::info!("Game over"),
    }
}

fn record_results(state: &GameState, settings: &Settings) -> Result<(), AppError> {
    let mut table = ScoreTable::load(&settings.ranking_path)?;

    for id in 0..state.active_actors() {
        let Some(entry) = state.result_entry(id, settings.player_name(id)) else {
            continue;
        };
        match table.add_entry(entry.clone()) {
            Some(rank) => println!("{}: {} points (rank #{rank})", entry.name, entry.score),
            None => println!("{}: {} points", entry.name, entry.score),
        }
    }
    if state.two_player {
        match state.winner() {
            Some(id) => println!("Winner: {}", settings.player_name(id)),
            None => println!("Draw"),
        }
    }

    table.save(&settings.ranking_path)?;

    println!("\n=== Top 10 ===");
    for (i, e) in table.top(10).iter().enumerate() {
        println!("{:>3}. {:<31} {:>6}", i + 1, e.name, e.score);
    }
    Ok(())
}
