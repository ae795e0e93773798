use rca_core::error::AppError;

/// Capability-check result for one integration.
///
/// Configuration loading never aborts the process: an integration with
/// missing environment values is recorded as `Unavailable` (carrying the
/// error that names every absent variable) and command handlers query
/// readiness before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability<T> {
    Ready(T),
    Unavailable(AppError),
}

impl<T> Availability<T> {
    pub fn ready(&self) -> Result<&T, AppError> {
        match self {
            Availability::Ready(value) => Ok(value),
            Availability::Unavailable(err) => Err(err.clone()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Availability::Ready(_))
    }

    pub fn from_result(result: Result<T, AppError>) -> Self {
        match result {
            Ok(value) => Availability::Ready(value),
            Err(err) => Availability::Unavailable(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackConfig {
    pub bot_token: String,
    pub signing_secret: String,
    pub app_token: String,
    pub summary_channel: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub space_key: String,
    pub parent_page_id: Option<String>,
}

/// Per-integration availability, loaded once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub slack: Availability<SlackConfig>,
    pub llm: Availability<LlmConfig>,
    pub tracker: Availability<TrackerConfig>,
    pub wiki: Availability<WikiConfig>,
}

pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn get(env: EnvLookup<'_>, key: &str) -> Option<String> {
    // Empty values count as unset.
    env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn require(
    env: EnvLookup<'_>,
    key: &'static str,
    missing: &mut Vec<&'static str>,
) -> String {
    match get(env, key) {
        Some(value) => value,
        None => {
            missing.push(key);
            String::new()
        }
    }
}

fn missing_error(integration: &str, missing: Vec<&'static str>) -> AppError {
    AppError::new(
        "CONFIG_MISSING",
        format!("{integration} configuration missing"),
    )
    .with_details(format!("missing={}", missing.join(",")))
}

pub fn load_slack_config(env: EnvLookup<'_>) -> Result<SlackConfig, AppError> {
    let mut missing = Vec::new();
    let bot_token = require(env, "SLACK_BOT_TOKEN", &mut missing);
    let signing_secret = require(env, "SLACK_SIGNING_SECRET", &mut missing);
    let app_token = require(env, "SLACK_APP_TOKEN", &mut missing);
    let summary_channel = require(env, "SLACK_SUMMARY_CHANNEL_ID", &mut missing);
    if !missing.is_empty() {
        return Err(missing_error("Slack", missing));
    }
    Ok(SlackConfig {
        bot_token,
        signing_secret,
        app_token,
        summary_channel,
    })
}

pub fn load_llm_config(env: EnvLookup<'_>) -> Result<LlmConfig, AppError> {
    let mut missing = Vec::new();
    let api_key = require(env, "OPENAI_API_KEY", &mut missing);
    if !missing.is_empty() {
        return Err(missing_error("LLM", missing));
    }
    Ok(LlmConfig {
        api_key,
        model: get(env, "OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
        base_url: get(env, "OPENAI_BASE_URL")
            .unwrap_or_else(|| "https://api.openai.com".to_string()),
    })
}

pub fn load_tracker_config(env: EnvLookup<'_>) -> Result<TrackerConfig, AppError> {
    let mut missing = Vec::new();
    let base_url = require(env, "JIRA_BASE_URL", &mut missing);
    let email = require(env, "JIRA_EMAIL", &mut missing);
    let api_token = require(env, "JIRA_API_TOKEN", &mut missing);
    let project_key = require(env, "JIRA_PROJECT_KEY", &mut missing);
    if !missing.is_empty() {
        return Err(missing_error("Issue tracker", missing));
    }
    Ok(TrackerConfig {
        base_url,
        email,
        api_token,
        project_key,
    })
}

pub fn load_wiki_config(env: EnvLookup<'_>) -> Result<WikiConfig, AppError> {
    let mut missing = Vec::new();
    let base_url = require(env, "CONFLUENCE_BASE_URL", &mut missing);
    // Wiki email falls back to the tracker email when both live in the same
    // Atlassian site.
    let email = match get(env, "CONFLUENCE_EMAIL").or_else(|| get(env, "JIRA_EMAIL")) {
        Some(v) => v,
        None => {
            missing.push("CONFLUENCE_EMAIL");
            String::new()
        }
    };
    let api_token = require(env, "CONFLUENCE_API_TOKEN", &mut missing);
    let space_key = require(env, "CONFLUENCE_SPACE_KEY", &mut missing);
    if !missing.is_empty() {
        return Err(missing_error("Wiki", missing));
    }
    Ok(WikiConfig {
        base_url,
        email,
        api_token,
        space_key,
        parent_page_id: get(env, "CONFLUENCE_PARENT_PAGE_ID"),
    })
}

/// Load all integration configs. Unavailable integrations are logged as
/// warnings here; nothing is fatal.
pub fn load_bot_config(env: EnvLookup<'_>) -> BotConfig {
    let slack = Availability::from_result(load_slack_config(env));
    let llm = Availability::from_result(load_llm_config(env));
    let tracker = Availability::from_result(load_tracker_config(env));
    let wiki = Availability::from_result(load_wiki_config(env));

    for (name, available) in [
        ("slack", slack.is_ready()),
        ("llm", llm.is_ready()),
        ("tracker", tracker.is_ready()),
        ("wiki", wiki.is_ready()),
    ] {
        if !available {
            log::warn!("integration '{name}' is not configured and will be unavailable");
        }
    }

    BotConfig {
        slack,
        llm,
        tracker,
        wiki,
    }
}

pub fn from_process_env() -> BotConfig {
    load_bot_config(&|key| std::env::var(key).ok())
}
