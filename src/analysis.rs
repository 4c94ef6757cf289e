//! LLM-backed repository audit and per-node questions.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;
use crate::context::ServiceContext;
use crate::error::{LensError, Result};
use crate::hierarchy::{flatten, FileNode, NodeKind};
use crate::ports::CompletionRequest;

/// Longest file excerpt, in characters, sent along with a question.
pub const SNIPPET_CHARS: usize = 5000;

const CONFIG_SUFFIXES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "docker-compose.yml",
    "Dockerfile",
    ".env",
    "terraform.tf",
];

const CONFIG_FRAGMENTS: &[&str] = &[".github/workflows", "charts/"];

const AUDIT_SYSTEM: &str = "You are a senior software architect auditing repositories. \
                            Answer only with the JSON document requested.";

const ARCHITECT_SYSTEM: &str = "You are a lead architect. Use provided code context to explain \
                                logic, patterns, and optimization strategies.";

/// Technologies per architectural layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerBreakdown {
    /// Client-side entries.
    #[serde(default)]
    pub frontend: Vec<String>,
    /// Server-side entries.
    #[serde(default)]
    pub backend: Vec<String>,
    /// Build, CI and deployment entries.
    #[serde(default)]
    pub devops: Vec<String>,
    /// Data store entries.
    #[serde(default)]
    pub databases: Vec<String>,
}

/// A reference the model cited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    /// Display title.
    #[serde(default = "default_source_title")]
    pub title: String,
    /// Link target.
    #[serde(default = "default_source_uri")]
    pub uri: String,
}

fn default_source_title() -> String {
    "Documentation".to_string()
}

fn default_source_uri() -> String {
    "#".to_string()
}

/// Structured repository audit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Performance notes.
    pub performance: String,
    /// Architecture notes.
    pub architecture: String,
    /// Code quality notes.
    pub code_quality: String,
    /// Frameworks and platforms per layer.
    pub stack: LayerBreakdown,
    /// Notable libraries per layer.
    pub libraries: LayerBreakdown,
    /// References, if the model offered any.
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Paths in `tree` that reveal the stack: manifests, container and CI files.
#[must_use]
pub fn config_files(tree: &[FileNode]) -> Vec<String> {
    flatten(tree)
        .into_iter()
        .map(|node| node.path.as_str())
        .filter(|path| {
            CONFIG_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
                || CONFIG_FRAGMENTS.iter().any(|fragment| path.contains(fragment))
        })
        .map(str::to_string)
        .collect()
}

/// Builds the audit prompt for `repo_name` given its configuration files.
#[must_use]
pub fn analysis_prompt(repo_name: &str, config_files: &[String]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Analyze this project: {repo_name}.");
    let _ = writeln!(prompt, "Available configuration files: {}.\n", config_files.join(", "));
    prompt.push_str(
        "Identify the Tech Stack and Dependencies:\n\
         1. Frontend: framework (React, Vue, etc.) and main libraries from package.json.\n\
         2. Backend: framework (Flask, FastAPI, Django, Express, etc.) and libraries from \
         requirements.txt or pyproject.toml.\n\
         3. Databases: mentioned in .env or settings (MySQL, PostgreSQL, MongoDB, Redis, etc.).\n\
         4. DevOps: CI/CD (GitHub Actions), infrastructure (Terraform), containerization \
         (Docker, K8s, Helm).\n\
         Also provide a brief code audit (performance, architecture, quality) and cite \
         best-practice documentation for this stack.\n\n\
         Respond with JSON (no markdown fences):\n\
         {\n  \
           \"performance\": \"...\",\n  \
           \"architecture\": \"...\",\n  \
           \"codeQuality\": \"...\",\n  \
           \"stack\": {\"frontend\": [], \"backend\": [], \"devops\": [], \"databases\": []},\n  \
           \"libraries\": {\"frontend\": [], \"backend\": [], \"devops\": [], \"databases\": []},\n  \
           \"sources\": [{\"title\": \"...\", \"uri\": \"https://...\"}]\n\
         }\n",
    );
    prompt
}

/// Drops a surrounding markdown code fence, if any.
fn unfence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (`json`) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Decodes the model's audit reply.
///
/// # Errors
///
/// Returns [`LensError::EmptyResponse`] for a blank reply and
/// [`LensError::MalformedResponse`] when the reply is not the expected JSON.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult> {
    let body = unfence(text);
    if body.is_empty() {
        return Err(LensError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| LensError::MalformedResponse(e.to_string()))
}

async fn complete(ctx: &ServiceContext, config: &LlmConfig, system: &str, prompt: String) -> Result<String> {
    let request = CompletionRequest {
        model: config.model.clone(),
        system: Some(system.to_string()),
        prompt,
        max_tokens: config.max_tokens,
    };
    let response = ctx.llm.complete(&request).await.map_err(|e| LensError::Llm(e.to_string()))?;
    debug!(
        prompt_tokens = response.prompt_tokens,
        completion_tokens = response.completion_tokens,
        "completion received"
    );
    if response.text.trim().is_empty() {
        return Err(LensError::EmptyResponse);
    }
    Ok(response.text)
}

/// Runs the repository audit.
///
/// # Errors
///
/// Returns [`LensError::Llm`] if the LLM port fails, otherwise the errors of
/// [`parse_analysis`].
pub async fn analyze(ctx: &ServiceContext, config: &LlmConfig, repo_name: &str, tree: &[FileNode]) -> Result<AnalysisResult> {
    let files = config_files(tree);
    debug!(repo = repo_name, config_files = files.len(), "running repository audit");
    let text = complete(ctx, config, AUDIT_SYSTEM, analysis_prompt(repo_name, &files)).await?;
    parse_analysis(&text)
}

/// Builds the prompt asking for insights about one node.
#[must_use]
pub fn insight_prompt(repo_name: &str, node: &FileNode) -> String {
    format!(
        "Analyze file: \"{}\" in repo: \"{repo_name}\". Complexity: {}. Provide 2 precise \
         technical insights about its architectural role and potential technical debt.",
        node.path,
        node.complexity.as_str()
    )
}

/// Asks for a short architectural commentary on `node`.
///
/// # Errors
///
/// Returns [`LensError::Llm`] if the LLM port fails and
/// [`LensError::EmptyResponse`] if it answers with nothing.
pub async fn node_insight(ctx: &ServiceContext, config: &LlmConfig, repo_name: &str, node: &FileNode) -> Result<String> {
    complete(ctx, config, ARCHITECT_SYSTEM, insight_prompt(repo_name, node)).await
}

/// The first [`SNIPPET_CHARS`] characters of `content`.
#[must_use]
pub fn snippet(content: &str) -> &str {
    match content.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => &content[..cut],
        None => content,
    }
}

/// Builds the prompt for a free-form question about `node`.
#[must_use]
pub fn question_prompt(repo_name: &str, node: &FileNode, content: Option<&str>, question: &str) -> String {
    let mut prompt = format!("Context: Repository {repo_name}, Path: {}. ", node.path);
    if let Some(content) = content.filter(|c| !c.is_empty()) {
        let _ = write!(prompt, "Code snippet for context:\n\n{}\n\n", snippet(content));
    }
    let _ = write!(prompt, "\nUser Question: {question}");
    prompt
}

/// Answers `question` about `node`. File content is only attached for file
/// nodes, cut to [`SNIPPET_CHARS`].
///
/// # Errors
///
/// Returns [`LensError::Llm`] if the LLM port fails and
/// [`LensError::EmptyResponse`] if it answers with nothing.
pub async fn ask_about_node(
    ctx: &ServiceContext,
    config: &LlmConfig,
    repo_name: &str,
    node: &FileNode,
    content: Option<&str>,
    question: &str,
) -> Result<String> {
    let content = content.filter(|_| node.kind == NodeKind::File);
    complete(ctx, config, ARCHITECT_SYSTEM, question_prompt(repo_name, node, content, question)).await
}
