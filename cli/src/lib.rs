//! Command implementations for the `wayline` binary.
//!
//! Each command returns data (a [`RunRecord`], a graph rendering, tool specs) and the
//! binary decides how to print it, so the logic is testable without a process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use wayline::workflows::code_review;
use wayline::{
    CompilationError, CompiledGraph, Executor, GraphDefinition, ReviewOptions, RunLimits,
    RunRecord, RunStatus, State, ToolRegistry, ToolSpec,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {}: {source}", path.display())]
    Definition {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid --state: {0}")]
    InitialState(String),
    #[error("invalid graph: {0}")]
    Graph(#[from] CompilationError),
    #[error("{0}")]
    Output(#[from] serde_json::Error),
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and compiles a JSON [`GraphDefinition`] against the builtin tools.
pub fn load_graph(path: &Path) -> Result<CompiledGraph, CliError> {
    let definition =
        GraphDefinition::from_json(&read(path)?).map_err(|source| CliError::Definition {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(definition.build(&ToolRegistry::with_builtin())?)
}

/// Parses `--state`: a JSON object, or nothing for an empty state.
pub fn parse_state(raw: Option<&str>) -> Result<State, CliError> {
    let Some(raw) = raw else {
        return Ok(State::new());
    };
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CliError::InitialState(e.to_string()))?;
    State::try_from(value).map_err(|e| CliError::InitialState(e.to_string()))
}

fn limits(max_iterations: Option<usize>) -> Result<Option<RunLimits>, CliError> {
    Ok(max_iterations.map(RunLimits::new).transpose()?)
}

/// `wayline run`
pub async fn run_definition(
    path: &Path,
    state: Option<&str>,
    max_iterations: Option<usize>,
) -> Result<RunRecord, CliError> {
    let graph = load_graph(path)?;
    let state = parse_state(state)?;
    let limits = limits(max_iterations)?;
    Ok(Executor::new().run(&graph, state, limits).await)
}

/// `wayline review`
pub async fn review_file(
    path: &Path,
    options: ReviewOptions,
    max_iterations: usize,
) -> Result<RunRecord, CliError> {
    let code = read(path)?;
    let graph = code_review::build(
        Arc::new(ToolRegistry::with_builtin()),
        options,
        RunLimits::new(max_iterations)?,
    )?;
    Ok(Executor::new()
        .run(&graph, options.initial_state(code), None)
        .await)
}

/// `wayline graph`: DOT when `dot`, else a text summary.
pub fn describe_graph(path: &Path, dot: bool) -> Result<String, CliError> {
    let graph = load_graph(path)?;
    Ok(if dot {
        wayline::generate_dot(&graph)
    } else {
        wayline::generate_text(&graph)
    })
}

/// `wayline tools`
pub fn list_tools() -> Vec<ToolSpec> {
    ToolRegistry::with_builtin().list()
}

/// Process exit code for a finished run: 0 only when it completed.
pub fn exit_code(record: &RunRecord) -> i32 {
    match record.status {
        RunStatus::Completed => 0,
        _ => 1,
    }
}

/// Human-readable run summary: one line per step, then the outcome and final state.
pub fn render_record(record: &RunRecord) -> Result<String, CliError> {
    let mut out = format!(
        "run {} graph={} status={} steps={}/{}\n",
        record.run_id,
        record.graph_name,
        serde_json::to_value(record.status)?
            .as_str()
            .unwrap_or_default(),
        record.steps,
        record.max_iterations,
    );
    for entry in &record.log {
        let signal = serde_json::to_value(&entry.signal)?;
        let mut line = format!(
            "  [{}] {} -> {}",
            entry.step,
            entry.node,
            signal["signal"].as_str().unwrap_or_default()
        );
        if let Some(target) = signal["node"].as_str() {
            line.push(' ');
            line.push_str(target);
        }
        out.push_str(&line);
        out.push('\n');
    }
    if let Some(failure) = &record.failure {
        out.push_str(&format!("failure: {}\n", failure));
    }
    if let Some(message) = record.latest_state().get_str("message") {
        out.push_str(&format!("message: {}\n", message));
    }
    out.push_str("final state:\n");
    out.push_str(&serde_json::to_string_pretty(record.latest_state())?);
    out.push('\n');
    Ok(out)
}

/// Tool list as `name: description` lines.
pub fn render_tools(tools: &[ToolSpec]) -> String {
    tools
        .iter()
        .map(|t| format!("{}: {}\n", t.name, t.description))
        .collect()
}
