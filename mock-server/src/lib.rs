use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    routing::post,
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};

/// The single account the mock accepts.
#[derive(Clone, Debug)]
pub struct Account {
    pub email: String,
    pub apikey: String,
    pub daily_limit: u32,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            email: "test@example.com".to_string(),
            apikey: "test-key".to_string(),
            daily_limit: 250,
        }
    }
}

struct MockState {
    account: Account,
    remaining: RwLock<u32>,
}

type Db = Arc<MockState>;

pub fn app() -> Router {
    app_with_account(Account::default())
}

pub fn app_with_account(account: Account) -> Router {
    let db: Db = Arc::new(MockState {
        remaining: RwLock::new(account.daily_limit),
        account,
    });
    Router::new()
        .route("/{method}", post(dispatch).get(dispatch))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_account(listener: TcpListener, account: Account) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_account(account)).await
}

async fn dispatch(
    State(db): State<Db>,
    Path(method): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> String {
    let reply = respond(&db, &method, &params, &body).await;
    tracing::info!(method = %method, failed = reply.starts_with("Failed:"), "handled request");
    reply
}

async fn respond(db: &MockState, method: &str, params: &HashMap<String, String>, text: &str) -> String {
    let param = |name: &str| params.get(name).map(String::as_str).unwrap_or_default();

    if param("email") != db.account.email || param("apikey") != db.account.apikey {
        return "Failed: Login error".to_string();
    }

    match method {
        "TestConnection" => "OK".to_string(),
        "QueryStats" => {
            let remaining = *db.remaining.read().await;
            if param("simple") == "1" {
                remaining.to_string()
            } else {
                format!(
                    "DailyLimit,{}|DailyRemaining,{remaining}|ExtendedQuota,0|BulkQuota,0",
                    db.account.daily_limit
                )
            }
        }
        "CalcWordDensity" | "GenerateSpin" | "GlobalSpin" => {
            let mut remaining = db.remaining.write().await;
            if *remaining == 0 {
                return "Failed: Quota exceeded".to_string();
            }
            let reply = match method {
                "CalcWordDensity" => match param("minlength").parse::<usize>() {
                    Ok(min) => word_density(text, min),
                    Err(_) => return "Failed: Invalid minlength".to_string(),
                },
                "GenerateSpin" => {
                    let pick = usize::from(param("dontincludeoriginal") == "1");
                    expand_spintax(text, pick)
                }
                _ => {
                    if text.trim().is_empty() {
                        return "Failed: Text is too short".to_string();
                    }
                    if param("rewrite") == "1" {
                        text.to_string()
                    } else {
                        markup(text)
                    }
                }
            };
            *remaining -= 1;
            reply
        }
        _ => "Failed: Unknown method".to_string(),
    }
}

/// `word,percent|...` for words of at least `min` characters, most frequent
/// first.
pub fn word_density(text: &str, min: usize) -> String {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && w.chars().count() >= min)
    {
        *counts.entry(word.to_lowercase()).or_default() += 1;
    }
    let total: usize = counts.values().sum();
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
        .iter()
        .map(|(word, count)| format!("{word},{:.2}", *count as f64 * 100.0 / total as f64))
        .collect::<Vec<_>>()
        .join("|")
}

/// Replace every `{a|b|...}` group with alternative `pick` (or the last one
/// if there are fewer). Unbalanced braces are copied through.
pub fn expand_spintax(text: &str, pick: usize) -> String {
    let mut out = String::new();
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let group = &rest[start..];
        let Some(end) = closing_brace(group) else {
            out.push_str(group);
            return out;
        };
        let options = split_top_level(&group[1..end]);
        let chosen = options.get(pick).or(options.last()).copied().unwrap_or_default();
        out.push_str(&expand_spintax(chosen, pick));
        rest = &group[end + 1..];
    }
    out.push_str(rest);
    out
}

fn closing_brace(group: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in group.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut from = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(&inner[from..i]);
                from = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[from..]);
    parts
}

/// Wrap each alphabetic word of four or more characters as `{w|w}`.
pub fn markup(text: &str) -> String {
    text.split(' ')
        .map(|w| {
            if w.chars().count() >= 4 && w.chars().all(char::is_alphabetic) {
                format!("{{{w}|{w}}}")
            } else {
                w.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
