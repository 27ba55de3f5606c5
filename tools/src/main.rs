//! console-runner: headless runner for the lending admin console views.
//!
//! Usage:
//!   console-runner --view loans --filter riskCategory=HIGH --sort daysOverdue:desc
//!   console-runner --view agents --search kumar --seed 7
//!   console-runner --config console.json --ipc-mode

use anyhow::Result;
use lendops_core::{
    config::ConsoleConfig,
    console::{Console, ConsoleView},
    query::QueryParams,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    ListViews,
    GetView {
        view: String,
    },
    Query {
        view: String,
        #[serde(default)]
        params: QueryParams,
    },
    SetStatus {
        view: String,
        id: String,
        status: String,
    },
    BulkSetStatus {
        view: String,
        ids: Vec<String>,
        status: String,
    },
    Delete {
        view: String,
        id: String,
    },
    Refresh {
        view: String,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let view_name = flag_value(&args, "--view").unwrap_or("loans");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };
    if let Some(dir) = flag_value(&args, "--data-dir") {
        config.data_dir = Some(dir.to_string());
    }
    config.records_per_view = parse_arg(&args, "--records", config.records_per_view);

    let mut console = Console::build(&config, seed)?;

    if ipc_mode {
        return run_ipc_loop(&mut console);
    }

    let params = params_from_args(&args);
    let view = console.view_mut(view_name)?;
    if params != QueryParams::default() {
        view.apply_params(&params)?;
    }

    println!("Lending console: {view_name} (seed {seed})");
    println!();
    print_view(view);
    Ok(())
}

fn run_ipc_loop(console: &mut Console) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        let reply = match handle_command(console, cmd) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("IPC command failed: {e}");
                serde_json::json!({ "error": e.to_string() })
            }
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(console: &mut Console, cmd: IpcCommand) -> Result<serde_json::Value> {
    let view_name = match &cmd {
        IpcCommand::ListViews => return Ok(serde_json::json!({ "views": console.view_names() })),
        IpcCommand::Quit => return Ok(serde_json::Value::Null),
        IpcCommand::GetView { view }
        | IpcCommand::Query { view, .. }
        | IpcCommand::SetStatus { view, .. }
        | IpcCommand::BulkSetStatus { view, .. }
        | IpcCommand::Delete { view, .. }
        | IpcCommand::Refresh { view } => view.clone(),
    };
    let view = console.view_mut(&view_name)?;

    match cmd {
        IpcCommand::Query { params, .. } => view.apply_params(&params)?,
        IpcCommand::SetStatus { id, status, .. } => view.set_status(&id, &status)?,
        IpcCommand::BulkSetStatus { ids, status, .. } => {
            view.bulk_set_status(&ids, &status)?;
        }
        IpcCommand::Delete { id, .. } => view.delete(&id)?,
        IpcCommand::Refresh { .. } => view.refresh()?,
        IpcCommand::GetView { .. } | IpcCommand::ListViews | IpcCommand::Quit => {}
    }
    Ok(view.snapshot_json()?)
}

fn print_view(view: &dyn ConsoleView) {
    let table = view.table();

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.len()).collect();
    for row in &table.rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }
    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<width$}", width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(&table.headers));
    for row in &table.rows {
        println!("{}", line(row));
    }

    println!();
    println!("=== SUMMARY ===");
    for (name, value) in view.summary() {
        println!("  {name:<20} {value:.2}");
    }
    if let lendops_core::console::LoadState::Degraded { warning } = view.state() {
        println!();
        println!("  WARNING: {warning}");
    }
    println!("  rows shown:          {}", table.rows.len());
}

/// `--search`, repeatable `--filter field=value`, and `--sort field[:dir]`.
fn params_from_args(args: &[String]) -> QueryParams {
    let filters = args
        .windows(2)
        .filter(|w| w[0] == "--filter")
        .filter_map(|w| w[1].split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    QueryParams {
        search: flag_value(args, "--search").unwrap_or_default().to_string(),
        filters,
        sort: flag_value(args, "--sort").map(str::to_string),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
