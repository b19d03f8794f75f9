use calpoint_core::charts::recent_heatmap;
use calpoint_core::export::{cleanup_processed_wals, compact_wal, export_logs_csv};
use calpoint_core::history::filter_by_range;
use calpoint_core::stats::StatsReport;
use calpoint_core::validation::{validate_log_input, validate_profile, validate_profile_input};
use calpoint_core::*;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "calpoint")]
#[command(about = "Calorie points tracker with goal projections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the profile
    Init {
        /// Height in cm
        #[arg(long)]
        height: f64,
        #[arg(long)]
        age: u32,
        /// male or female
        #[arg(long)]
        sex: Sex,
        /// Starting weight in kg
        #[arg(long)]
        starting_weight: f64,
        /// Goal weight in kg
        #[arg(long)]
        goal_weight: f64,
        /// Daily calorie target in kcal
        #[arg(long)]
        target_calories: i32,
        /// Defaults to today
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Use this TDEE instead of the computed one
        #[arg(long)]
        tdee: Option<i32>,
        /// Replace an existing profile
        #[arg(long)]
        force: bool,
    },

    /// Show the profile
    Profile {
        #[arg(long)]
        json: bool,
    },

    /// Edit profile fields
    Settings {
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        sex: Option<Sex>,
        #[arg(long)]
        starting_weight: Option<f64>,
        #[arg(long)]
        goal_weight: Option<f64>,
        #[arg(long)]
        current_weight: Option<f64>,
        #[arg(long)]
        target_calories: Option<i32>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Recompute TDEE from current weight (after other edits)
        #[arg(long)]
        recalc_tdee: bool,
    },

    /// Suggested calorie targets for the current TDEE
    Presets {
        /// Use this TDEE instead of the profile's
        #[arg(long)]
        tdee: Option<i32>,
    },

    /// Log a day
    Log {
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Calories eaten (kcal)
        #[arg(long)]
        calories: i32,
        /// Calories burned by exercise (kcal)
        #[arg(long, default_value_t = 0)]
        workout: i32,
        /// Weight measured that day (kg)
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Edit a logged day; omitted fields are kept
    Edit {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        calories: Option<i32>,
        #[arg(long)]
        workout: Option<i32>,
        #[arg(long, conflicts_with = "clear_weight")]
        weight: Option<f64>,
        #[arg(long)]
        clear_weight: bool,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a logged day
    Delete {
        #[arg(long)]
        date: NaiveDate,
    },

    /// List logs, newest first, with running totals
    History {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },

    /// Progress, pace and projection (default)
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Chart series as JSON
    Charts {
        /// Include every heatmap day instead of the configured window
        #[arg(long)]
        all_days: bool,
    },

    /// Export logs to CSV
    Export {
        /// Output file
        path: PathBuf,
    },

    /// Compact the log WAL
    Compact {
        /// Remove processed WAL files afterwards
        #[arg(long)]
        cleanup: bool,
    },
}

fn main() -> Result<()> {
    calpoint_core::logging::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let today = match cli.today {
        Some(today) => today,
        None => config.clock.today()?,
    };
    tracing::debug!("Data dir {:?}, today {}", data_dir, today);
    let book = LogBook::open(data_dir);

    match cli.command {
        Some(Commands::Init {
            height,
            age,
            sex,
            starting_weight,
            goal_weight,
            target_calories,
            start_date,
            tdee,
            force,
        }) => {
            let input = ProfileInput {
                height_cm: height,
                age,
                sex,
                starting_weight,
                goal_weight,
                target_calories,
                start_date: start_date.unwrap_or(today),
                tdee,
            };
            cmd_init(&book, input, force, &config)
        }
        Some(Commands::Profile { json }) => cmd_profile(&book, json),
        Some(Commands::Settings {
            height,
            age,
            sex,
            starting_weight,
            goal_weight,
            current_weight,
            target_calories,
            start_date,
            recalc_tdee,
        }) => {
            let profile = book.update_profile(|p| {
                if let Some(v) = height {
                    p.height_cm = v;
                }
                if let Some(v) = age {
                    p.age = v;
                }
                if let Some(v) = sex {
                    p.sex = v;
                }
                if let Some(v) = starting_weight {
                    p.starting_weight = v;
                }
                if let Some(v) = goal_weight {
                    p.goal_weight = v;
                }
                if let Some(v) = current_weight {
                    p.current_weight = v;
                }
                if let Some(v) = target_calories {
                    p.target_calories = v;
                }
                if let Some(v) = start_date {
                    p.start_date = v;
                }
                if recalc_tdee {
                    p.recalculate_tdee();
                }
                validate_profile(p)
            })?;
            println!("✓ Settings saved");
            print_profile(&profile);
            Ok(())
        }
        Some(Commands::Presets { tdee }) => {
            let tdee = match tdee {
                Some(tdee) => tdee,
                None => book.profile()?.tdee,
            };
            print_presets(tdee, &config);
            Ok(())
        }
        Some(Commands::Log {
            date,
            calories,
            workout,
            weight,
            notes,
        }) => {
            let input = LogInput {
                date: date.unwrap_or(today),
                calories_consumed: calories,
                workout_calories: workout,
                weight,
                notes,
            };
            validate_log_input(&input)?;
            let entry = book.create_log(input)?;
            println!("✓ Logged {}", entry.date);
            print_points(&entry);
            Ok(())
        }
        Some(Commands::Edit {
            date,
            calories,
            workout,
            weight,
            clear_weight,
            notes,
        }) => {
            let patch = LogPatch {
                calories_consumed: calories,
                workout_calories: workout,
                weight,
                clear_weight,
                notes,
            };
            if let Some(existing) = book.log_for(date)? {
                validate_log_input(&patch.apply(&existing))?;
            }
            let entry = book.update_log(date, &patch)?;
            println!("✓ Updated {}", entry.date);
            print_points(&entry);
            Ok(())
        }
        Some(Commands::Delete { date }) => {
            book.delete_log(date)?;
            println!("✓ Deleted log for {}", date);
            Ok(())
        }
        Some(Commands::History { from, to, json }) => cmd_history(&book, from, to, json),
        Some(Commands::Stats { json }) => cmd_stats(&book, today, json),
        Some(Commands::Charts { all_days }) => {
            let profile = book.profile()?;
            let mut series = compute_chart_series(&profile, &book.logs()?);
            if !all_days {
                series.heatmap_data =
                    recent_heatmap(&series.heatmap_data, config.report.heatmap_days).to_vec();
            }
            println!("{}", serde_json::to_string_pretty(&series)?);
            Ok(())
        }
        Some(Commands::Export { path }) => {
            let count = export_logs_csv(&book.logs()?, &path)?;
            println!("✓ Exported {} logs to {}", count, path.display());
            Ok(())
        }
        Some(Commands::Compact { cleanup }) => cmd_compact(&book, cleanup),
        None => cmd_stats(&book, today, false),
    }
}

fn cmd_init(book: &LogBook, input: ProfileInput, force: bool, config: &Config) -> Result<()> {
    if !force && UserProfile::load(&book.profile_path())?.is_some() {
        return Err(Error::Validation(
            "a profile already exists; use `settings` or pass --force".into(),
        ));
    }

    validate_profile_input(&input)?;
    let profile = UserProfile::from_input(input);
    book.save_profile(&profile)?;

    println!("✓ Profile created");
    print_profile(&profile);
    println!();
    println!(
        "  Points needed: {:.1}",
        total_points_needed(profile.starting_weight, profile.goal_weight)
    );
    print_presets(profile.tdee, config);
    Ok(())
}

fn cmd_profile(book: &LogBook, json: bool) -> Result<()> {
    let profile = book.profile()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile);
    }
    Ok(())
}

fn cmd_history(
    book: &LogBook,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let logs = filter_by_range(&book.logs()?, from, to);
    let rows = with_running_totals(&logs);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No logs yet.");
        return Ok(());
    }

    println!(
        "{:<10}  {:>6}  {:>6}  {:>7}  {:>7}  {:>7}  {:>8}  {:>6}",
        "date", "eaten", "burned", "diet", "workout", "total", "running", "kg"
    );
    for row in &rows {
        let e = &row.entry;
        println!(
            "{:<10}  {:>6}  {:>6}  {:>7.3}  {:>7.3}  {:>7.3}  {:>8.3}  {:>6}",
            e.date,
            e.calories_consumed,
            e.workout_calories,
            e.diet_points,
            e.workout_points,
            e.total_points,
            row.running_total,
            e.weight.map(|w| format!("{:.1}", w)).unwrap_or_default(),
        );
    }
    Ok(())
}

fn cmd_stats(book: &LogBook, today: NaiveDate, json: bool) -> Result<()> {
    let profile = book.profile()?;
    let report = compute_stats(&profile, &book.logs()?, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_stats(&report);
    }
    Ok(())
}

fn cmd_compact(book: &LogBook, cleanup: bool) -> Result<()> {
    if !book.wal_path().exists() {
        println!("No WAL file found - nothing to compact.");
        return Ok(());
    }

    let kept = compact_wal(book.wal_path())?;
    println!("✓ Compacted WAL to {} logs", kept);

    if cleanup {
        if let Some(wal_dir) = book.wal_path().parent() {
            let cleaned = cleanup_processed_wals(wal_dir)?;
            if cleaned > 0 {
                println!("✓ Cleaned up {} processed WAL files", cleaned);
            }
        }
    }
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!("  Height:          {} cm", profile.height_cm);
    println!("  Age:             {}", profile.age);
    println!("  Sex:             {:?}", profile.sex);
    println!(
        "  Weight:          {} → {} kg (now {} kg)",
        profile.starting_weight, profile.goal_weight, profile.current_weight
    );
    println!("  TDEE:            {} kcal", profile.tdee);
    println!("  Target calories: {} kcal", profile.target_calories);
    println!("  Start date:      {}", profile.start_date);
}

fn print_presets(tdee: i32, config: &Config) {
    println!();
    println!("  Suggested targets (TDEE {} kcal):", tdee);
    for preset in calorie_presets(tdee, &config.presets) {
        println!(
            "  → {:<14} {} kcal (-{} kcal/day)",
            preset.label, preset.calories, preset.deficit
        );
    }
}

fn print_points(entry: &DailyLogEntry) {
    println!(
        "  Diet {:.3} + workout {:.3} = {:.3} points",
        entry.diet_points, entry.workout_points, entry.total_points
    );
}

fn print_stats(report: &StatsReport) {
    let s = &report.summary;
    let p = &report.points;
    let pace = &report.pace;
    let c = &report.calories;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {:?} PROGRESS", report.mode);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Day {} since {} ({} logged)",
        s.days_elapsed, s.start_date, s.days_logged
    );
    println!(
        "  Weight: {} → {} kg, now {} kg ({:?} {} kg)",
        s.starting_weight, s.goal_weight, s.current_weight, s.weight_change.direction, s.weight_change.value
    );
    println!(
        "  Points: {} of {} ({}%), {} to go",
        p.collected, p.total_needed, p.progress_percent, p.remaining
    );
    println!();

    match pace.status {
        PaceStatus::Maintenance => {
            println!("  Maintenance mode: keep logging to hold your weight.");
        }
        PaceStatus::NoData => {
            println!("  Target pace: {} points/day. Log a day to see your pace.", pace.target_points_per_day);
        }
        PaceStatus::OnTrack | PaceStatus::Behind => {
            println!(
                "  Pace: {} points/day vs target {} ({:+}%) {}",
                pace.actual_avg_points_per_day,
                pace.target_points_per_day,
                pace.pace_difference_percent,
                if pace.on_track { "✓ on track" } else { "✗ behind" }
            );
        }
    }

    match (pace.days_to_goal, pace.projected_completion_date) {
        (Some(days), Some(date)) => println!("  Projected goal date: {} ({} days)", date, days),
        _ => println!("  Projected goal date: -"),
    }

    println!();
    println!(
        "  Calories: {} of {} kcal balance, avg {} kcal/day (plan {})",
        c.deficit_created, c.total_deficit_needed, c.avg_daily_deficit, c.planned_daily_deficit
    );
    println!();
}
