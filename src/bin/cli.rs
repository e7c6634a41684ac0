use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_planner::config::CONFIG_ENV_VAR;
use workout_planner::{
    Catalog, CategoryFilter, DragEffect, DragEvent, DragMachine, DragPayload, LoadOutcome,
    PlannerConfig, PlannerError, TemplateLevel, WeekDay, WeeklySchedule, WeeklyScheduleStore,
    WorkoutEntry, load_schedule_from_csv, load_schedule_from_json, save_schedule_to_csv,
    save_schedule_to_json,
};

const PLACEHOLDER: &str = "Drag workouts here";

#[derive(Parser, Debug)]
#[command(name = "workout-planner")]
#[command(about = "Plan a week of workouts from the terminal")]
#[command(version)]
struct Cli {
    /// Config file path (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage backend: memory, file or sqlite
    #[arg(long)]
    backend: Option<String>,

    /// Directory for saved schedules
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    Success,
    Error,
}

fn notify(kind: Notice, message: &str) {
    match kind {
        Notice::Success => println!("[ok] {message}"),
        Notice::Error => println!("[error] {message}"),
    }
}

fn render_schedule(schedule: &WeeklySchedule, marked: Option<WeekDay>) -> String {
    let rows: Vec<(String, Vec<String>)> = schedule
        .iter()
        .map(|(day, entries)| {
            let label = if marked == Some(day) {
                format!("{} *", day.label())
            } else {
                day.label().to_string()
            };
            let cells = if entries.is_empty() {
                vec![PLACEHOLDER.to_string()]
            } else {
                entries
                    .iter()
                    .map(|entry| format!("{} ({})", entry.name, entry.duration))
                    .collect()
            };
            (label, cells)
        })
        .collect();

    let day_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let cell_width = rows
        .iter()
        .flat_map(|(_, cells)| cells.iter().map(|c| c.chars().count()))
        .max()
        .unwrap_or(0);

    let mut sep = String::from("+");
    sep.push_str(&"-".repeat(day_width + 2));
    sep.push('+');
    sep.push_str(&"-".repeat(cell_width + 2));
    sep.push('+');

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    for (label, cells) in &rows {
        for (idx, cell) in cells.iter().enumerate() {
            let day_col = if idx == 0 { label.as_str() } else { "" };
            out.push_str(&format!(
                "| {}{} | {}{} |\n",
                day_col,
                " ".repeat(day_width - day_col.chars().count()),
                cell,
                " ".repeat(cell_width - cell.chars().count())
            ));
        }
        out.push_str(&sep);
        out.push('\n');
    }
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the weekly schedule\n  today                              Show today's workouts\n  catalog [category|all]             List available workouts, optionally filtered\n  add <day> <name> | <duration>      Add a workout to a day\n  remove <day> <name...>             Remove the first workout with that name\n  drag <workout...|json>             Pick up a catalog workout (or a JSON payload)\n  enter <day>                        Move the dragged workout over a day\n  leave                              Move the dragged workout off the day\n  drop                               Release the dragged workout\n  cancel                             Abort the drag\n  clear                              Clear the whole schedule (asks first)\n  templates                          List available templates\n  template <level>                   Replace the schedule with a template\n  save                               Save the schedule\n  load                               Reload the saved schedule\n  export <json|csv> <path>           Write the schedule to a file\n  import <json|csv> <path>           Replace the schedule with a file's contents\n  quit|exit                          Exit"
    );
}

fn print_templates() {
    println!("Available templates:");
    for (key, description) in TemplateLevel::variants() {
        println!("  {:<14} {}", key, description);
    }
}

fn print_catalog(catalog: &Catalog, filter: CategoryFilter) {
    for workout in catalog.filter(filter) {
        println!("  {:<18} {}", workout.name, workout.duration_label());
    }
}

fn print_drag_effects(effects: &[DragEffect]) {
    for effect in effects {
        match effect {
            DragEffect::MarkTarget(day) => println!("Drop target: {}", day.label()),
            DragEffect::UnmarkTarget(_) => {}
            DragEffect::Commit { day, entry } => {
                println!("Added {} to {}.", entry.name, day.label())
            }
        }
    }
}

/// Splits `<day> <rest of line>`.
fn split_day_and_rest(args: &str) -> Option<(&str, &str)> {
    let args = args.trim();
    let (day, rest) = args.split_once(char::is_whitespace)?;
    Some((day, rest.trim()))
}

fn drag_payload(catalog: &Catalog, arg: &str) -> Result<WorkoutEntry, PlannerError> {
    if arg.starts_with('{') {
        return DragPayload::decode(arg);
    }
    catalog
        .find(arg)
        .map(|workout| workout.to_entry())
        .ok_or_else(|| PlannerError::InvalidEntry(format!("no workout named '{arg}' in catalog")))
}

fn export_schedule(schedule: &WeeklySchedule, format: &str, path: &str) {
    let res = match format {
        "json" => save_schedule_to_json(schedule, path),
        "csv" => save_schedule_to_csv(schedule, path),
        _ => {
            println!("Usage: export <json|csv> <path>");
            return;
        }
    };
    match res {
        Ok(()) => notify(Notice::Success, &format!("Schedule exported to {path}")),
        Err(e) => notify(Notice::Error, &format!("Error exporting schedule: {e}")),
    }
}

fn import_schedule(store: &mut WeeklyScheduleStore, format: &str, path: &str) {
    let res = match format {
        "json" => load_schedule_from_json(path),
        "csv" => load_schedule_from_csv(path),
        _ => {
            println!("Usage: import <json|csv> <path>");
            return;
        }
    };
    match res {
        Ok(schedule) => {
            store.replace(schedule);
            notify(Notice::Success, &format!("Schedule imported from {path}"));
            println!("{}", render_schedule(store.schedule(), None));
        }
        Err(e) => notify(Notice::Error, &format!("Error importing schedule: {e}")),
    }
}

fn marked_day(machine: &DragMachine) -> Option<WeekDay> {
    match machine.state() {
        workout_planner::DragState::OverTarget { day, .. } => Some(*day),
        _ => None,
    }
}

fn load_config(cli: &Cli) -> Result<PlannerConfig, Box<dyn std::error::Error>> {
    let path = cli
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
    let mut config = match path {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };
    config.apply_env()?;
    config.apply_overrides(cli.backend.as_deref(), cli.data_dir.clone())?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let backend = config.open_backend()?;
    tracing::info!(backend = %config.storage.backend, "starting planner");
    let mut store = WeeklyScheduleStore::open(backend, config.snapshot_key.clone());
    let catalog = Catalog::default();
    let mut machine = DragMachine::new();

    println!("Workout Planner (CLI) - type 'help' for commands\n");
    println!("{}", render_schedule(store.schedule(), None));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, args) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        let args = args.trim();

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_schedule(store.schedule(), marked_day(&machine))),
            "today" => {
                let today = WeekDay::today();
                let entries = store.entries(today);
                if entries.is_empty() {
                    println!("Nothing planned for {}.", today.label());
                } else {
                    println!("{}:", today.label());
                    for entry in entries {
                        println!("  {} ({})", entry.name, entry.duration);
                    }
                }
            }
            "catalog" => {
                let filter = if args.is_empty() {
                    Ok(CategoryFilter::All)
                } else {
                    args.parse::<CategoryFilter>()
                };
                match filter {
                    Ok(filter) => print_catalog(&catalog, filter),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "add" => {
                let Some((day_s, rest)) = split_day_and_rest(args) else {
                    println!("Usage: add <day> <name> | <duration>");
                    continue;
                };
                let day = match day_s.parse::<WeekDay>() {
                    Ok(day) => day,
                    Err(e) => {
                        println!("Error: {e}");
                        continue;
                    }
                };
                let (name, duration) = rest.split_once('|').unwrap_or((rest, ""));
                match WorkoutEntry::try_new(name.trim(), duration.trim()) {
                    Ok(entry) => {
                        let placement = store.add_entry(day, entry);
                        println!("Added to {} at position {}.", day.label(), placement.index + 1);
                        println!("{}", render_schedule(store.schedule(), None));
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "remove" => {
                let Some((day_s, name)) = split_day_and_rest(args) else {
                    println!("Usage: remove <day> <name...>");
                    continue;
                };
                match day_s.parse::<WeekDay>() {
                    Ok(day) => match store.remove_entry(day, name) {
                        Some(_) => {
                            notify(Notice::Success, "Workout removed");
                            println!("{}", render_schedule(store.schedule(), None));
                        }
                        None => println!("No workout named '{name}' on {}.", day.label()),
                    },
                    Err(e) => println!("Error: {e}"),
                }
            }
            "drag" => {
                if args.is_empty() {
                    println!("Usage: drag <workout...|json>");
                    continue;
                }
                if !machine.is_idle() {
                    println!("Already dragging; drop or cancel first.");
                    continue;
                }
                match drag_payload(&catalog, args) {
                    Ok(entry) => {
                        println!("Dragging {}.", entry.name);
                        let effects = store.dispatch_drag(&mut machine, DragEvent::Start(entry));
                        print_drag_effects(&effects);
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "enter" => match args.parse::<WeekDay>() {
                Ok(day) => {
                    let effects = store.dispatch_drag(&mut machine, DragEvent::Enter(day));
                    print_drag_effects(&effects);
                }
                Err(e) => println!("Error: {e}"),
            },
            "leave" | "drop" | "cancel" => {
                let event = match cmd {
                    "leave" => DragEvent::Leave,
                    "drop" => DragEvent::Drop,
                    _ => DragEvent::End,
                };
                let effects = store.dispatch_drag(&mut machine, event);
                print_drag_effects(&effects);
                if effects
                    .iter()
                    .any(|effect| matches!(effect, DragEffect::Commit { .. }))
                {
                    println!("{}", render_schedule(store.schedule(), None));
                }
            }
            "clear" => {
                let mut gate = |prompt: &str| {
                    print!("{prompt} [y/N] ");
                    let _ = io::stdout().flush();
                    match lines.next() {
                        Some(Ok(answer)) => {
                            let answer = answer.trim();
                            answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
                        }
                        _ => false,
                    }
                };
                match store.clear_all(&mut gate) {
                    Ok(true) => {
                        notify(Notice::Success, "Schedule cleared");
                        println!("{}", render_schedule(store.schedule(), None));
                    }
                    Ok(false) => println!("Clear cancelled."),
                    Err(e) => notify(Notice::Error, &format!("Error clearing schedule: {e}")),
                }
            }
            "templates" => print_templates(),
            "template" => match store.load_template_named(args) {
                Ok(level) => {
                    notify(Notice::Success, &format!("{} template loaded!", level.label()));
                    println!("{}", render_schedule(store.schedule(), None));
                }
                Err(e) => notify(Notice::Error, &e.to_string()),
            },
            "save" => match store.persist() {
                Ok(()) => notify(Notice::Success, "Schedule saved successfully!"),
                Err(e) => {
                    tracing::error!(error = %e, "save failed");
                    notify(Notice::Error, "Error saving schedule");
                }
            },
            "load" => match store.load() {
                Ok(LoadOutcome::Loaded) => {
                    notify(Notice::Success, "Schedule loaded");
                    println!("{}", render_schedule(store.schedule(), None));
                }
                Ok(LoadOutcome::Absent) => println!("No saved schedule found."),
                Err(e) => notify(Notice::Error, &format!("Error loading schedule: {e}")),
            },
            "export" | "import" => {
                let mut parts = args.splitn(2, char::is_whitespace);
                match (parts.next(), parts.next()) {
                    (Some(format), Some(path)) if !format.is_empty() => {
                        let path = path.trim();
                        if cmd == "export" {
                            export_schedule(store.schedule(), format, path);
                        } else {
                            import_schedule(&mut store, format, path);
                        }
                    }
                    _ => println!("Usage: {cmd} <json|csv> <path>"),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }

    Ok(())
}
