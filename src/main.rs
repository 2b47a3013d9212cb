use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use gameday::competition::types::{ActivityKind, CompetitionState, ScoreInput};
use gameday::competition::{load_state, save_state};
use gameday::scoring::rules::ScoringRules;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_STATE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show standings, activity results, and the MVP (default if no subcommand)
    Standings,
    /// Create a competition from a setup file
    Init {
        /// Path to the setup YAML
        setup: PathBuf,

        /// Overwrite an existing competition file
        #[arg(long)]
        force: bool,
    },
    /// Enter scores for one activity (replaces any previous scores)
    Score {
        /// Activity name
        activity: String,

        /// Winning team, for win/loss scoring of a team activity
        #[arg(long, conflicts_with_all = ["team", "entry"])]
        winner: Option<String>,

        /// Custom team score as TEAM=VALUE (repeatable)
        #[arg(long = "team", value_name = "TEAM=VALUE")]
        team: Vec<String>,

        /// Individual score as PLAYER=VALUE (repeatable)
        #[arg(long = "entry", value_name = "PLAYER=VALUE", conflicts_with = "team")]
        entry: Vec<String>,
    },
    /// Show or change scoring rules; changes recompute all recorded points
    SetRules {
        #[arg(long)]
        team_win: Option<i64>,
        #[arg(long)]
        team_loss: Option<i64>,
        #[arg(long)]
        first_place: Option<i64>,
        #[arg(long)]
        second_place: Option<i64>,
        #[arg(long)]
        last_place: Option<i64>,
    },
    /// Delete an activity and all of its recorded points
    Delete {
        /// Activity name
        activity: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "gameday")]
#[command(about = "Scorekeeper for informal team competitions", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the competition file (defaults to ~/.config/gameday/competition.json)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Standings);
    let state_path = cli.file.unwrap_or_else(gameday::config::get_state_path);
    let use_colors = gameday::output::should_use_colors();

    match command {
        Commands::Init { setup, force } => {
            if state_path.exists() && !force {
                eprintln!(
                    "A competition already exists at {}. Pass --force to replace it.",
                    state_path.display()
                );
                process::exit(EXIT_STATE);
            }

            let setup = match gameday::config::load_setup(&setup) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Setup error: {:#}", e);
                    process::exit(EXIT_CONFIG);
                }
            };
            if let Err(errors) = gameday::scoring::validate_setup(&setup) {
                eprintln!("Setup errors:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                process::exit(EXIT_CONFIG);
            }

            let state = CompetitionState::from_setup(&setup);
            save_or_exit(&state_path, &state);

            println!(
                "Created '{}' with {} teams, {} participants, {} activities.",
                state.name,
                state.teams.len(),
                state.participants.len(),
                state.activities.len()
            );
        }

        Commands::Standings => {
            let state = load_or_exit(&state_path, cli.verbose);

            println!("{}", state.name);
            println!();
            println!("{}", gameday::output::format_standings(&state, use_colors));
            println!();
            for activity in &state.activities {
                println!(
                    "{}",
                    gameday::output::format_activity_line(&state, activity, use_colors)
                );
                if activity.completed && activity.kind == ActivityKind::Individual {
                    println!(
                        "{}",
                        gameday::output::format_individual_results(&state, activity, use_colors)
                    );
                }
            }
            if let Some(mvp) = state.mvp() {
                println!();
                println!("{}", gameday::output::format_mvp(&mvp, use_colors));
            }
        }

        Commands::Score {
            activity,
            winner,
            team,
            entry,
        } => {
            let mut state = load_or_exit(&state_path, cli.verbose);

            let activity_id = match state.activity_by_name(&activity) {
                Some(a) => a.id,
                None => {
                    eprintln!("No activity named '{}'.", activity);
                    process::exit(EXIT_INPUT);
                }
            };

            let input = if let Some(winner_name) = winner {
                let Some(winning_team) = state.team_by_name(&winner_name) else {
                    eprintln!("No team named '{}'.", winner_name);
                    process::exit(EXIT_INPUT);
                };
                ScoreInput::WinLoss {
                    winning_team: Some(winning_team.id),
                }
            } else if !team.is_empty() {
                match gameday::scoring::resolve_team_scores(&team, &state) {
                    Ok(scores) => ScoreInput::TeamTotals(scores),
                    Err(errors) => {
                        eprintln!("Score errors:");
                        for error in errors {
                            eprintln!("  - {}", error);
                        }
                        process::exit(EXIT_INPUT);
                    }
                }
            } else if !entry.is_empty() {
                match gameday::scoring::resolve_participant_scores(&entry, &state) {
                    Ok(scores) => ScoreInput::Individual(scores),
                    Err(errors) => {
                        eprintln!("Score errors:");
                        for error in errors {
                            eprintln!("  - {}", error);
                        }
                        process::exit(EXIT_INPUT);
                    }
                }
            } else {
                eprintln!("Nothing to score. Pass --winner, --team, or --entry.");
                process::exit(EXIT_INPUT);
            };

            let outcome = match state.save_scores(activity_id, &input) {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("Scoring error: {}", e);
                    let code = if e.is_inconsistent_state() {
                        EXIT_STATE
                    } else {
                        EXIT_INPUT
                    };
                    process::exit(code);
                }
            };
            save_or_exit(&state_path, &state);

            if cli.verbose {
                eprintln!("Wrote {} point records", outcome.records.len());
            }
            match outcome.winner_name {
                Some(name) => println!("Scored '{}'. Winner: {}", activity, name),
                None => println!("Scored '{}'. No winner declared.", activity),
            }
        }

        Commands::SetRules {
            team_win,
            team_loss,
            first_place,
            second_place,
            last_place,
        } => {
            let mut state = load_or_exit(&state_path, cli.verbose);

            let no_changes = team_win.is_none()
                && team_loss.is_none()
                && first_place.is_none()
                && second_place.is_none()
                && last_place.is_none();
            if no_changes {
                print_rules(&state.rules);
                process::exit(EXIT_SUCCESS);
            }

            let new_rules = ScoringRules {
                team_win: team_win.unwrap_or(state.rules.team_win),
                team_loss: team_loss.unwrap_or(state.rules.team_loss),
                first_place: first_place.unwrap_or(state.rules.first_place),
                second_place: second_place.unwrap_or(state.rules.second_place),
                last_place: last_place.unwrap_or(state.rules.last_place),
            };

            if let Err(e) = state.set_rules(new_rules) {
                eprintln!("Rules error: {}", e);
                process::exit(EXIT_STATE);
            }
            save_or_exit(&state_path, &state);

            println!("Rules updated; all recorded points recomputed.");
            print_rules(&state.rules);
        }

        Commands::Delete { activity } => {
            let mut state = load_or_exit(&state_path, cli.verbose);

            let activity_id = match state.activity_by_name(&activity) {
                Some(a) => a.id,
                None => {
                    eprintln!("No activity named '{}'.", activity);
                    process::exit(EXIT_INPUT);
                }
            };

            if let Err(e) = state.delete_activity(activity_id) {
                eprintln!("Delete error: {}", e);
                process::exit(EXIT_STATE);
            }
            save_or_exit(&state_path, &state);

            println!("Deleted '{}' and its point records.", activity);
        }
    }

    process::exit(EXIT_SUCCESS);
}

fn load_or_exit(path: &std::path::Path, verbose: bool) -> CompetitionState {
    match load_state(path) {
        Ok(state) => {
            if verbose {
                eprintln!(
                    "Loaded '{}': {} teams, {} activities, {} point records",
                    state.name,
                    state.teams.len(),
                    state.activities.len(),
                    state.point_records.len()
                );
            }
            state
        }
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(EXIT_STATE);
        }
    }
}

fn save_or_exit(path: &std::path::Path, state: &CompetitionState) {
    if let Err(e) = save_state(path, state) {
        eprintln!("Failed to save competition: {:#}", e);
        process::exit(EXIT_STATE);
    }
}

fn print_rules(rules: &ScoringRules) {
    println!("  team_win:     {:>4}", rules.team_win);
    println!("  team_loss:    {:>4}", rules.team_loss);
    println!("  first_place:  {:>4}", rules.first_place);
    println!("  second_place: {:>4}", rules.second_place);
    println!("  last_place:   {:>4}", rules.last_place);
}
