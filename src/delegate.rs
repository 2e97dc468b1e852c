//! Smart delegates consulted before the deterministic engine.
//!
//! `OpenAiDelegate` asks a chat model for a strict JSON verdict and enforces
//! an in-memory per-day call budget. `DisabledDelegate` always declines and
//! `FixedDelegate` replays a preset result (local runs and tests).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analyze::intensity::intensity;
use crate::analyzer::VibeAnalyzer;
use crate::config::ai::DelegateConfig;
use crate::item::NewsItem;
use crate::result::{AnalysisResult, SentimentScore, MAX_KEYWORDS};
use crate::vibe::Vibe;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MAX_RATIONALE_CHARS: usize = 280;
const MAX_PROMPT_ITEMS: usize = 20;

/// Always declines; used when the delegate is disabled.
pub struct DisabledDelegate;

#[async_trait]
impl VibeAnalyzer for DisabledDelegate {
    async fn analyze(&self, _items: &[NewsItem]) -> anyhow::Result<Option<AnalysisResult>> {
        Ok(None)
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Replays one preset verdict for every batch.
#[derive(Clone)]
pub struct FixedDelegate {
    result: AnalysisResult,
}

impl FixedDelegate {
    pub fn new(result: AnalysisResult) -> Self {
        Self { result }
    }
}

#[async_trait]
impl VibeAnalyzer for FixedDelegate {
    async fn analyze(&self, _items: &[NewsItem]) -> anyhow::Result<Option<AnalysisResult>> {
        Ok(Some(self.result.clone()))
    }
    fn name(&self) -> &'static str {
        "fixed"
    }
}

// ------------------------------------------------------------
// Daily call budget
// ------------------------------------------------------------

#[derive(Debug)]
struct DailyBudget {
    day: NaiveDate,
    used: u32,
    limit: u32,
}

impl DailyBudget {
    fn new(limit: u32) -> Self {
        Self {
            day: Local::now().date_naive(),
            used: 0,
            limit,
        }
    }

    /// Reserve one call for `today`. Rolls the counter over on a new day.
    fn try_take(&mut self, today: NaiveDate) -> bool {
        if self.day != today {
            self.day = today;
            self.used = 0;
        }
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }
}

// ------------------------------------------------------------
// OpenAI chat delegate
// ------------------------------------------------------------

pub struct OpenAiDelegate {
    http: reqwest::Client,
    api_key: String,
    model: String,
    budget: Mutex<DailyBudget>,
}

impl OpenAiDelegate {
    pub fn new(cfg: &DelegateConfig) -> anyhow::Result<Self> {
        if cfg.api_key.is_empty() {
            bail!("OpenAI delegate requires an API key");
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("news-vibe/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(cfg.timeout())
            .build()
            .context("building delegate http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            budget: Mutex::new(DailyBudget::new(cfg.daily_limit)),
        })
    }

    fn take_budget(&self) -> bool {
        let mut g = self.budget.lock().unwrap_or_else(|p| p.into_inner());
        g.try_take(Local::now().date_naive())
    }

    async fn complete(&self, user_prompt: &str) -> anyhow::Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct ResponseFormat {
            #[serde(rename = "type")]
            kind: &'static str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
            response_format: ResponseFormat,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let system = system_prompt();
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &system,
                },
                Msg {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: 0.2,
            max_tokens: 300,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("chat request")?
            .error_for_status()
            .context("chat status")?;
        let body: Resp = resp.json().await.context("chat body")?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("chat response had no choices")
    }
}

#[async_trait]
impl VibeAnalyzer for OpenAiDelegate {
    async fn analyze(&self, items: &[NewsItem]) -> anyhow::Result<Option<AnalysisResult>> {
        let prompt = user_prompt(items);
        if prompt.is_empty() {
            return Ok(None);
        }
        if !self.take_budget() {
            info!(target: "vibe::delegate", "daily delegate budget exhausted");
            return Ok(None);
        }
        let content = self.complete(&prompt).await?;
        debug!(target: "vibe::delegate", bytes = content.len(), "delegate replied");
        parse_verdict(&content, Utc::now()).map(Some)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

fn system_prompt() -> String {
    let tags: Vec<&str> = Vibe::ALL.iter().map(|v| v.tag()).collect();
    format!(
        "You classify the overall mood of a batch of news headlines. \
         Reply with ONE JSON object and nothing else: \
         {{\"vibe\": one of [{}], \"confidence\": 0..1, \"positivity\": 0..1, \
         \"energy\": 0..1, \"complexity\": 0..1, \"rationale\": one plain sentence, \
         \"keywords\": up to 5 lowercase words taken from the headlines}}.",
        tags.join(", ")
    )
}

fn user_prompt(items: &[NewsItem]) -> String {
    items
        .iter()
        .filter(|it| it.has_title())
        .take(MAX_PROMPT_ITEMS)
        .map(|it| format!("- {}", it.headline_text().trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Deserialize)]
struct Verdict {
    vibe: String,
    confidence: f32,
    positivity: f32,
    energy: f32,
    complexity: f32,
    rationale: String,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Parse a model reply into a result. Unknown vibe tags, missing fields,
/// non-finite numbers or an empty rationale are all malformed.
pub fn parse_verdict(content: &str, analyzed_at: DateTime<Utc>) -> anyhow::Result<AnalysisResult> {
    let json = strip_code_fence(content);
    let v: Verdict = serde_json::from_str(json).context("delegate reply is not a verdict object")?;

    let Some(vibe) = Vibe::from_tag(v.vibe.trim()) else {
        bail!("unknown vibe tag {:?}", v.vibe);
    };
    for (field, x) in [
        ("confidence", v.confidence),
        ("positivity", v.positivity),
        ("energy", v.energy),
        ("complexity", v.complexity),
    ] {
        if !x.is_finite() {
            bail!("non-finite {field}");
        }
    }
    let rationale = sanitize_rationale(&v.rationale);
    if rationale.is_empty() {
        bail!("empty rationale");
    }

    let keywords: Vec<String> = v
        .keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .take(MAX_KEYWORDS)
        .collect();
    let sentiment = SentimentScore::new(v.positivity, v.energy, v.complexity);
    let confidence = v.confidence.clamp(0.0, 1.0);
    let level = intensity(confidence, &sentiment);
    Ok(AnalysisResult::new(
        vibe,
        confidence,
        rationale,
        keywords,
        sentiment,
        analyzed_at,
        level,
    ))
}

fn strip_code_fence(s: &str) -> &str {
    let t = s.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Single ASCII line, whitespace collapsed, at most 280 chars.
fn sanitize_rationale(s: &str) -> String {
    let ascii: String = s
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { ' ' })
        .collect();
    let mut out = ascii.split_whitespace().collect::<Vec<_>>().join(" ");
    if out.len() > MAX_RATIONALE_CHARS {
        out.truncate(MAX_RATIONALE_CHARS);
        out = out.trim_end().to_string();
    }
    out
}

/// Factory: `None` when the delegate is disabled or cannot be built.
pub fn build_delegate(cfg: &DelegateConfig) -> Option<Arc<dyn VibeAnalyzer>> {
    if !cfg.enabled {
        return None;
    }
    match cfg.provider.as_str() {
        "openai" => match OpenAiDelegate::new(cfg) {
            Ok(d) => {
                info!(
                    target: "vibe::delegate",
                    model = %cfg.model,
                    daily_limit = cfg.daily_limit,
                    "OpenAI delegate enabled"
                );
                Some(Arc::new(d))
            }
            Err(e) => {
                warn!(target: "vibe::delegate", error = %format!("{e:#}"), "delegate unavailable");
                None
            }
        },
        other => {
            warn!(target: "vibe::delegate", provider = other, "unsupported delegate provider");
            None
        }
    }
}
