//! Built-in code-analysis tools.
//!
//! Lightweight text heuristics over a source string (`code` argument): function
//! extraction, a keyword-count complexity score, smell detection and improvement
//! suggestions. No parsing; the numbers are indicators, not measurements.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::r#trait::{Tool, ToolError, ToolSpec};

/// Lines above which a snippet counts as a long function.
pub const LONG_FUNCTION_LINES: usize = 50;
/// Nesting depth above which a snippet counts as deeply nested.
pub const MAX_NESTING: usize = 4;
/// Numbers with three or more digits are magic-number candidates; more than this many is a smell.
pub const MAX_MAGIC_NUMBERS: usize = 5;
/// Complexity above which a refactor is suggested.
pub const HIGH_COMPLEXITY: i64 = 20;
/// Quality score below which a general suggestion is added.
pub const LOW_QUALITY: f64 = 50.0;

const COMPLEXITY_KEYWORDS: [&str; 8] = ["if", "elif", "else", "for", "while", "except", "and", "or"];
const CONTROL_PREFIXES: [&str; 8] = ["if", "elif", "else", "for", "while", "try", "except", "with"];

static FUNCTION_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"def\s+(\w+)\s*\([^)]*\):").expect("function pattern"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("word pattern"));
static MAGIC_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3,}\b").expect("magic number pattern"));
static TODO_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(TODO|FIXME|XXX|HACK)").expect("todo pattern"));

fn parse<T: for<'de> Deserialize<'de>>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

fn to_value<T: Serialize>(out: &T) -> Result<Value, ToolError> {
    serde_json::to_value(out).map_err(|e| ToolError::Execution(e.to_string()))
}

#[derive(Deserialize)]
struct CodeInput {
    #[serde(default)]
    code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub code: String,
    pub line_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionsReport {
    pub functions: Vec<FunctionInfo>,
    pub function_count: usize,
}

/// Finds `def name(...):` definitions; each runs until the next definition or the end.
pub fn extract_functions(code: &str) -> FunctionsReport {
    let starts: Vec<(usize, String)> = FUNCTION_DEF
        .captures_iter(code)
        .filter_map(|c| Some((c.get(0)?.start(), c.get(1)?.as_str().to_string())))
        .collect();

    let functions: Vec<FunctionInfo> = starts
        .iter()
        .enumerate()
        .map(|(i, (start, name))| {
            let end = starts.get(i + 1).map(|(s, _)| *s).unwrap_or(code.len());
            let body = &code[*start..end];
            FunctionInfo {
                name: name.clone(),
                code: body.trim().to_string(),
                line_count: body.split('\n').count(),
            }
        })
        .collect();

    FunctionsReport {
        function_count: functions.len(),
        functions,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityReport {
    pub complexity: i64,
    pub lines_of_code: usize,
    pub total_lines: usize,
    /// `100 - 2 * complexity`, clamped to 0..=100.
    pub quality_score: i64,
}

/// Decision-point count: 1 plus, per line, each branching keyword present as a word.
pub fn check_complexity(code: &str) -> ComplexityReport {
    let lines: Vec<&str> = code.split('\n').collect();
    let mut complexity: i64 = 1;
    for line in &lines {
        let present: Vec<&str> = WORD.find_iter(line).map(|m| m.as_str()).collect();
        complexity += COMPLEXITY_KEYWORDS
            .iter()
            .filter(|k| present.contains(k))
            .count() as i64;
    }
    ComplexityReport {
        complexity,
        lines_of_code: lines.iter().filter(|l| !l.trim().is_empty()).count(),
        total_lines: lines.len(),
        quality_score: (100 - complexity * 2).clamp(0, 100),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub message: String,
}

impl Issue {
    fn new(kind: &str, severity: &str, message: String) -> Self {
        Self {
            kind: kind.to_string(),
            severity: severity.to_string(),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmellsReport {
    pub issues: Vec<Issue>,
    pub issue_count: usize,
}

fn is_control(line: &str) -> bool {
    CONTROL_PREFIXES.iter().any(|k| {
        line.strip_prefix(k)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', ':', '(', '{']))
    })
}

/// Deepest stack of control-flow lines, judged by indentation.
fn max_nesting(lines: &[&str]) -> usize {
    let mut open: Vec<usize> = Vec::new();
    let mut max = 0;
    for line in lines {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }
        let indent: usize = line[..line.len() - trimmed.len()]
            .chars()
            .map(|c| if c == '\t' { 4 } else { 1 })
            .sum();
        while open.last().is_some_and(|&w| w >= indent) {
            open.pop();
        }
        if is_control(trimmed) {
            open.push(indent);
            max = max.max(open.len());
        }
    }
    max
}

/// Long functions, deep nesting, magic numbers and TODO-style markers.
pub fn detect_smells(code: &str) -> SmellsReport {
    let lines: Vec<&str> = code.split('\n').collect();
    let mut issues = Vec::new();

    if lines.len() > LONG_FUNCTION_LINES {
        issues.push(Issue::new(
            "long_function",
            "medium",
            format!(
                "Code is {} lines long; consider splitting it into smaller functions.",
                lines.len()
            ),
        ));
    }

    let nesting = max_nesting(&lines);
    if nesting > MAX_NESTING {
        issues.push(Issue::new(
            "high_nesting",
            "high",
            format!(
                "Code has {} levels of nesting; extract functions or return early to flatten it.",
                nesting
            ),
        ));
    }

    let magic = MAGIC_NUMBER.find_iter(code).count();
    if magic > MAX_MAGIC_NUMBERS {
        issues.push(Issue::new(
            "magic_numbers",
            "low",
            format!(
                "Found {} potential magic numbers; replace them with named constants.",
                magic
            ),
        ));
    }

    let todos = TODO_MARKER.find_iter(code).count();
    if todos > 0 {
        issues.push(Issue::new(
            "todo_comments",
            "low",
            format!("Found {} TODO/FIXME markers.", todos),
        ));
    }

    SmellsReport {
        issue_count: issues.len(),
        issues,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: String,
    pub suggestion: String,
}

impl Suggestion {
    fn new(kind: &str, priority: &str, suggestion: String) -> Self {
        Self {
            kind: kind.to_string(),
            priority: priority.to_string(),
            suggestion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsReport {
    pub suggestions: Vec<Suggestion>,
    pub suggestion_count: usize,
}

/// One suggestion per known issue kind, plus complexity and quality remarks.
pub fn suggest_improvements(issues: &[Issue], complexity: i64, quality_score: f64) -> SuggestionsReport {
    let mut suggestions: Vec<Suggestion> = issues
        .iter()
        .filter_map(|issue| match issue.kind.as_str() {
            "long_function" => Some(Suggestion::new(
                "refactor",
                "medium",
                "Split the function so each piece does one thing.".to_string(),
            )),
            "high_nesting" => Some(Suggestion::new(
                "refactor",
                "high",
                "Reduce nesting with helper functions, early returns or guard clauses.".to_string(),
            )),
            "magic_numbers" => Some(Suggestion::new(
                "refactor",
                "low",
                "Replace literal numbers with named constants.".to_string(),
            )),
            _ => None,
        })
        .collect();

    if complexity > HIGH_COMPLEXITY {
        suggestions.push(Suggestion::new(
            "refactor",
            "high",
            format!(
                "Complexity is {}; break the code into smaller, simpler pieces.",
                complexity
            ),
        ));
    }
    if quality_score < LOW_QUALITY {
        suggestions.push(Suggestion::new(
            "general",
            "high",
            "Quality score is low; simplify logic, reduce nesting and shorten functions."
                .to_string(),
        ));
    }

    SuggestionsReport {
        suggestion_count: suggestions.len(),
        suggestions,
    }
}

fn code_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "code": { "type": "string", "description": "Source code to analyze" } },
        "required": ["code"]
    })
}

pub struct ExtractFunctionsTool;

#[async_trait]
impl Tool for ExtractFunctionsTool {
    fn name(&self) -> &str {
        "extract_functions"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Find function definitions in the code".to_string(),
            input_schema: code_schema(),
        }
    }

    async fn call(&self, args: Value) -> Result<Value, ToolError> {
        let input: CodeInput = parse(args)?;
        to_value(&extract_functions(&input.code))
    }
}

pub struct CheckComplexityTool;

#[async_trait]
impl Tool for CheckComplexityTool {
    fn name(&self) -> &str {
        "check_complexity"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Count decision points and derive a 0-100 quality score".to_string(),
            input_schema: code_schema(),
        }
    }

    async fn call(&self, args: Value) -> Result<Value, ToolError> {
        let input: CodeInput = parse(args)?;
        to_value(&check_complexity(&input.code))
    }
}

pub struct DetectSmellsTool;

#[async_trait]
impl Tool for DetectSmellsTool {
    fn name(&self) -> &str {
        "detect_smells"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Detect long functions, deep nesting, magic numbers and TODO markers"
                .to_string(),
            input_schema: code_schema(),
        }
    }

    async fn call(&self, args: Value) -> Result<Value, ToolError> {
        let input: CodeInput = parse(args)?;
        to_value(&detect_smells(&input.code))
    }
}

#[derive(Deserialize)]
struct SuggestInput {
    #[serde(default)]
    issues: Vec<Issue>,
    #[serde(default)]
    complexity: i64,
    #[serde(default)]
    quality_score: f64,
}

pub struct SuggestImprovementsTool;

#[async_trait]
impl Tool for SuggestImprovementsTool {
    fn name(&self) -> &str {
        "suggest_improvements"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Turn detected issues and metrics into prioritized suggestions"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "issues": { "type": "array" },
                    "complexity": { "type": "integer" },
                    "quality_score": { "type": "number" }
                }
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<Value, ToolError> {
        let input: SuggestInput = parse(args)?;
        to_value(&suggest_improvements(
            &input.issues,
            input.complexity,
            input.quality_score,
        ))
    }
}

/// The four built-in tools, ready for registration.
pub fn builtin() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ExtractFunctionsTool),
        Arc::new(CheckComplexityTool),
        Arc::new(DetectSmellsTool),
        Arc::new(SuggestImprovementsTool),
    ]
}
