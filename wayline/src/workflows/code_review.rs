//! Code-review workflow.
//!
//! `extract → check_complexity → detect_issues → suggest_improvements → check_loop`.
//! `check_loop` is the quality gate: while the score is below the threshold and
//! loop passes remain, it credits a simulated improvement and jumps back to
//! `check_complexity`; otherwise it halts with a summary message.
//!
//! State keys read: `code`, `quality_threshold`, `max_loop_iterations`.
//! State keys written: `extracted_functions`, `function_count`, `complexity`,
//! `lines_of_code`, `quality_score`, `issues`, `issue_count`, `suggestions`,
//! `suggestion_count`, `loop_count`, `quality_bonus`, `passed`, `message`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::NodeError;
use crate::graph::{CompilationError, CompiledGraph, Next, Node, RunContext, RunLimits, StateGraph};
use crate::state::State;
use crate::tools::ToolRegistry;

pub const GRAPH_NAME: &str = "code-review";
pub const DEFAULT_QUALITY_THRESHOLD: i64 = 70;
pub const DEFAULT_MAX_LOOP_ITERATIONS: i64 = 3;
/// Score credited per loop pass, capped at the remaining gap to the threshold.
pub const IMPROVEMENT_PER_PASS: i64 = 10;

/// Defaults used when the initial state does not carry its own values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewOptions {
    pub quality_threshold: i64,
    pub max_loop_iterations: i64,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
        }
    }
}

impl ReviewOptions {
    /// Initial state for reviewing `code` with these options.
    pub fn initial_state(&self, code: impl Into<String>) -> State {
        let mut state = State::new();
        state.set("code", code.into());
        state.set("quality_threshold", self.quality_threshold);
        state.set("max_loop_iterations", self.max_loop_iterations);
        state
    }
}

/// Calls `tool` on the registry, mapping its error to a node failure.
async fn call_tool(tools: &ToolRegistry, tool: &str, args: Value) -> Result<Value, NodeError> {
    tools
        .call(tool, args)
        .await
        .map_err(|e| NodeError::new(format!("tool {} failed: {}", tool, e)))
}

fn field(out: &Value, key: &str) -> Value {
    out.get(key).cloned().unwrap_or(Value::Null)
}

fn count(out: &Value, key: &str) -> i64 {
    out.get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn code_args(state: &State) -> Value {
    json!({ "code": state.get_str("code").unwrap_or_default() })
}

fn rating(score: i64) -> &'static str {
    match score {
        80.. => "excellent",
        60..=79 => "good",
        40..=59 => "needs simplification",
        _ => "complex",
    }
}

/// Lists the functions found in `code`.
struct ExtractNode {
    tools: Arc<ToolRegistry>,
}

#[async_trait]
impl Node for ExtractNode {
    fn id(&self) -> &str {
        "extract"
    }

    async fn run(&self, mut state: State, _ctx: &RunContext) -> Result<(State, Next), NodeError> {
        let out = call_tool(&self.tools, "extract_functions", code_args(&state)).await?;
        let n = count(&out, "function_count");
        state.set("extracted_functions", field(&out, "functions"));
        state.set("function_count", n);
        state.set("message", format!("Found {} function(s).", n));
        Ok((state, Next::Continue))
    }
}

/// Scores the code; the score includes improvement credited by earlier loop passes.
struct ComplexityNode {
    tools: Arc<ToolRegistry>,
}

#[async_trait]
impl Node for ComplexityNode {
    fn id(&self) -> &str {
        "check_complexity"
    }

    async fn run(&self, mut state: State, _ctx: &RunContext) -> Result<(State, Next), NodeError> {
        let out = call_tool(&self.tools, "check_complexity", code_args(&state)).await?;
        let complexity = count(&out, "complexity");
        let bonus = state.get_i64("quality_bonus").unwrap_or(0);
        let score = count(&out, "quality_score").saturating_add(bonus).clamp(0, 100);
        state.set("complexity", complexity);
        state.set("lines_of_code", field(&out, "lines_of_code"));
        state.set("quality_score", score);
        state.set(
            "message",
            format!(
                "Complexity: {}, quality score: {}/100 ({}).",
                complexity,
                score,
                rating(score)
            ),
        );
        Ok((state, Next::Continue))
    }
}

struct IssuesNode {
    tools: Arc<ToolRegistry>,
}

#[async_trait]
impl Node for IssuesNode {
    fn id(&self) -> &str {
        "detect_issues"
    }

    async fn run(&self, mut state: State, _ctx: &RunContext) -> Result<(State, Next), NodeError> {
        let out = call_tool(&self.tools, "detect_smells", code_args(&state)).await?;
        let n = count(&out, "issue_count");
        state.set("issues", field(&out, "issues"));
        state.set("issue_count", n);
        state.set("message", format!("Found {} potential issue(s).", n));
        Ok((state, Next::Continue))
    }
}

struct SuggestNode {
    tools: Arc<ToolRegistry>,
}

#[async_trait]
impl Node for SuggestNode {
    fn id(&self) -> &str {
        "suggest_improvements"
    }

    async fn run(&self, mut state: State, _ctx: &RunContext) -> Result<(State, Next), NodeError> {
        let args = json!({
            "issues": state.get("issues").cloned().unwrap_or_else(|| json!([])),
            "complexity": state.get_i64("complexity").unwrap_or(0),
            "quality_score": state.get_f64("quality_score").unwrap_or(0.0),
        });
        let out = call_tool(&self.tools, "suggest_improvements", args).await?;
        let n = count(&out, "suggestion_count");
        state.set("suggestions", field(&out, "suggestions"));
        state.set("suggestion_count", n);
        state.set("message", format!("{} suggestion(s) to improve the code.", n));
        Ok((state, Next::Continue))
    }
}

/// Quality gate: loops back to `check_complexity` or halts.
struct QualityGate {
    options: ReviewOptions,
}

#[async_trait]
impl Node for QualityGate {
    fn id(&self) -> &str {
        "check_loop"
    }

    async fn run(&self, mut state: State, ctx: &RunContext) -> Result<(State, Next), NodeError> {
        let score = state.get_i64("quality_score").unwrap_or(0);
        let threshold = state
            .get_i64("quality_threshold")
            .unwrap_or(self.options.quality_threshold);
        let max_loops = state
            .get_i64("max_loop_iterations")
            .unwrap_or(self.options.max_loop_iterations);
        let loops = state.get_i64("loop_count").unwrap_or(0);

        if score < threshold && loops < max_loops {
            let pass = loops.saturating_add(1);
            let bonus = state
                .get_i64("quality_bonus")
                .unwrap_or(0)
                .saturating_add(IMPROVEMENT_PER_PASS.min(threshold.saturating_sub(score)));
            state.set("quality_bonus", bonus);
            state.set("loop_count", pass);
            state.set(
                "message",
                format!(
                    "Quality score is {}, target is {}; improving (pass {}/{}).",
                    score,
                    threshold,
                    pass,
                    max_loops
                ),
            );
            tracing::debug!(run_id = %ctx.run_id, score, threshold, pass, "quality below threshold, looping");
            return Ok((state, Next::goto("check_complexity")));
        }

        let passed = score >= threshold;
        state.set("passed", passed);
        let message = if passed {
            format!("Quality score {} meets the threshold of {}.", score, threshold)
        } else {
            format!(
                "Final quality score {} is below the threshold of {} after {} pass(es).",
                score, threshold, loops
            )
        };
        state.set("message", message);
        Ok((state, Next::Halt))
    }
}

/// Builds the code-review graph against `tools` (which must hold the built-in analysis tools).
pub fn build(
    tools: Arc<ToolRegistry>,
    options: ReviewOptions,
    limits: RunLimits,
) -> Result<CompiledGraph, CompilationError> {
    let mut issues = Vec::new();
    for tool in [
        ("extract", "extract_functions"),
        ("check_complexity", "check_complexity"),
        ("detect_issues", "detect_smells"),
        ("suggest_improvements", "suggest_improvements"),
    ] {
        if !tools.contains(tool.1) {
            issues.push(CompilationError::UnknownTool {
                node: tool.0.to_string(),
                tool: tool.1.to_string(),
            });
        }
    }
    CompilationError::from_issues(issues)?;

    let mut graph = StateGraph::new(GRAPH_NAME);
    graph
        .add_node("extract", Arc::new(ExtractNode { tools: tools.clone() }))
        .add_node("check_complexity", Arc::new(ComplexityNode { tools: tools.clone() }))
        .add_node("detect_issues", Arc::new(IssuesNode { tools: tools.clone() }))
        .add_node("suggest_improvements", Arc::new(SuggestNode { tools }))
        .add_node("check_loop", Arc::new(QualityGate { options }))
        .add_edge("extract", "check_complexity")
        .add_edge("check_complexity", "detect_issues")
        .add_edge("detect_issues", "suggest_improvements")
        .add_edge("suggest_improvements", "check_loop")
        .set_entry("extract")
        .add_terminal("check_loop");
    graph.compile(limits)
}
