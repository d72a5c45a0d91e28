use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::gesture::drag_session::DragPayload;
use crate::gesture::timeline::dropped_block;
use crate::io::config_io;
use crate::io::kv_store::FileStore;
use crate::io::persist;
use crate::model::palette::DEFAULT_BLOCK_COLOR;
use crate::model::planner::{
    BlockPatch, CELLS_PER_ROW, DailyInfoPatch, Dday, SubjectPatch, TIMELINE_START_MINUTE,
    TOTAL_HOURS, TodoPatch,
};
use crate::ops::planner_ops::{resolve_block, resolve_subject, resolve_todo};
use crate::store::PlannerStore;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let date = resolve_date(cli.date.as_deref())?;

    let Some(cmd) = cli.command else {
        return Err("no subcommand given (run `dp` without arguments for the TUI)".into());
    };

    if let Commands::Dates = cmd {
        return cmd_dates(&data_dir, json);
    }

    let mut store = PlannerStore::open(FileStore::open(&data_dir)?, date);
    match cmd {
        // Read commands
        Commands::Show => cmd_show(&store, json),
        Commands::Stats => cmd_stats(&store, json),
        Commands::Dates => Ok(()),

        // Write commands
        Commands::Subject(args) => cmd_subject(&mut store, args, json),
        Commands::Todo(args) => cmd_todo(&mut store, args, json),
        Commands::Block(args) => cmd_block(&mut store, args, json),
        Commands::Dday(args) => cmd_dday(&mut store, args),
        Commands::Quote(args) => cmd_quote(&mut store, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    config_io::data_dir(explicit.map(Path::new))
}

/// `--date` if given, else today in local time
pub fn resolve_date(arg: Option<&str>) -> Result<NaiveDate, String> {
    match arg {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

fn non_blank<'a>(s: &'a str, what: &str) -> Result<&'a str, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", what));
    }
    Ok(trimmed)
}

fn print_created<T: serde::Serialize>(id: &str, value: &T, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

/// Timeline row whose hour of day is `hour` (row 0 is 06:00)
fn row_for_hour(hour: u32) -> u32 {
    (hour + 24 - TIMELINE_START_MINUTE / 60) % TOTAL_HOURS
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(store: &PlannerStore<FileStore>, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(store.data())?);
        return Ok(());
    }
    for line in format_day(store.data()) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_stats(store: &PlannerStore<FileStore>, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(&stats_to_json(store.data()))?);
        return Ok(());
    }
    for line in format_stats(store.data()) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_dates(data_dir: &Path, json: bool) -> CmdResult {
    let store = FileStore::open(data_dir)?;
    let dates = persist::stored_dates(&store);
    if json {
        println!("{}", serde_json::to_string_pretty(&dates)?);
        return Ok(());
    }
    for date in dates {
        println!("{}", date);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subjects
// ---------------------------------------------------------------------------

fn cmd_subject(store: &mut PlannerStore<FileStore>, args: SubjectCmd, json: bool) -> CmdResult {
    match args.action {
        SubjectAction::Add(a) => {
            let name = non_blank(&a.name, "subject name")?;
            let subject = store.add_subject(name);
            print_created(&subject.id, &subject, json)
        }
        SubjectAction::Rename(a) => {
            let name = non_blank(&a.name, "subject name")?.to_string();
            let id = resolve_subject(store.data(), &a.subject)?.id.clone();
            store.update_subject(
                &id,
                SubjectPatch {
                    name: Some(name),
                    ..Default::default()
                },
            );
            Ok(())
        }
        SubjectAction::Rm(a) => {
            let id = resolve_subject(store.data(), &a.subject)?.id.clone();
            store.delete_subject(&id);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

fn cmd_todo(store: &mut PlannerStore<FileStore>, args: TodoCmd, json: bool) -> CmdResult {
    match args.action {
        TodoAction::Add(a) => {
            let content = non_blank(&a.content, "todo text")?;
            let subject_id = resolve_subject(store.data(), &a.subject)?.id.clone();
            let todo = store.add_todo(&subject_id, content)?;
            print_created(&todo.id, &todo, json)
        }
        TodoAction::Edit(a) => {
            let content = non_blank(&a.content, "todo text")?.to_string();
            let id = resolve_todo(store.data(), &a.todo)?.id.clone();
            store.update_todo(
                &id,
                TodoPatch {
                    content: Some(content),
                    ..Default::default()
                },
            );
            Ok(())
        }
        TodoAction::Toggle(a) => {
            let id = resolve_todo(store.data(), &a.todo)?.id.clone();
            store.toggle_todo_complete(&id);
            let done = store.data().todo(&id).is_some_and(|t| t.is_completed);
            println!("{}", if done { "done" } else { "open" });
            Ok(())
        }
        TodoAction::Rm(a) => {
            let id = resolve_todo(store.data(), &a.todo)?.id.clone();
            store.delete_todo(&id);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Timeline blocks
// ---------------------------------------------------------------------------

fn cmd_block(store: &mut PlannerStore<FileStore>, args: BlockCmd, json: bool) -> CmdResult {
    match args.action {
        BlockAction::Add(a) => {
            let kind = parse_block_kind(&a.kind)?;
            if a.hour >= 24 {
                return Err(format!("hour must be 0-23, got {}", a.hour).into());
            }
            let todo = resolve_todo(store.data(), &a.todo)?;
            let color = store
                .data()
                .subject(&todo.subject_id)
                .map(|s| s.color.clone())
                .unwrap_or_else(|| DEFAULT_BLOCK_COLOR.to_string());
            let payload = DragPayload {
                todo_id: todo.id.clone(),
                subject_id: todo.subject_id.clone(),
                color,
                content: todo.content.clone(),
            };
            let block = store.add_timeline_block(dropped_block(&payload, kind, row_for_hour(a.hour)));
            print_created(&block.id, &block, json)
        }
        BlockAction::Resize(a) => {
            if a.start >= CELLS_PER_ROW || a.span == 0 || a.span > CELLS_PER_ROW - a.start {
                return Err(format!(
                    "lanes {}+{} do not fit in a row of {}",
                    a.start, a.span, CELLS_PER_ROW
                )
                .into());
            }
            let id = resolve_block(store.data(), &a.block)?.id.clone();
            store.update_timeline_block(
                &id,
                BlockPatch {
                    cell_start: Some(a.start),
                    cell_span: Some(a.span),
                    ..Default::default()
                },
            );
            Ok(())
        }
        BlockAction::Rm(a) => {
            let id = resolve_block(store.data(), &a.block)?.id.clone();
            store.delete_timeline_block(&id);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Daily info
// ---------------------------------------------------------------------------

fn cmd_dday(store: &mut PlannerStore<FileStore>, args: DdayCmd) -> CmdResult {
    let dday = match args.action {
        DdayAction::Set(a) => Some(Dday {
            label: non_blank(&a.label, "d-day label")?.to_string(),
            target_date: parse_date(&a.target)?,
        }),
        DdayAction::Clear => None,
    };
    store.update_daily_info(DailyInfoPatch {
        dday: Some(dday),
        ..Default::default()
    });
    Ok(())
}

fn cmd_quote(store: &mut PlannerStore<FileStore>, args: QuoteArgs) -> CmdResult {
    store.update_daily_info(DailyInfoPatch {
        daily_quote: Some(args.text.trim().to_string()),
        ..Default::default()
    });
    Ok(())
}
