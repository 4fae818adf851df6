use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::config::LoaderConfig;
use crate::error::SymptomMatchError;
use crate::sources::seed::SeedLocation;

#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthRow {
    pub source: String,
    pub status: String,
    pub detail: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthReport {
    pub healthy: usize,
    pub total: usize,
    pub rows: Vec<HealthRow>,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.healthy == self.total
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Symptomatch Health Check\n\n");
        out.push_str("| Source | Status | Detail |\n");
        out.push_str("|--------|--------|--------|\n");
        for row in &self.rows {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                row.source, row.status, row.detail
            ));
        }
        out.push_str(&format!(
            "\nStatus: {}/{} sources healthy\n",
            self.healthy, self.total
        ));
        out
    }
}

fn ok_row(source: &str, detail: String) -> HealthRow {
    HealthRow {
        source: source.to_string(),
        status: "ok".into(),
        detail,
    }
}

fn error_row(source: &str, detail: String) -> HealthRow {
    HealthRow {
        source: source.to_string(),
        status: "error".into(),
        detail,
    }
}

async fn check_url(client: reqwest::Client, source: &str, url: &str) -> HealthRow {
    let start = Instant::now();
    let resp = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await;

    match resp {
        Ok(resp) => {
            let status = resp.status();
            let elapsed = start.elapsed().as_millis();
            if status.is_success() {
                ok_row(source, format!("{elapsed}ms"))
            } else {
                error_row(source, format!("{elapsed}ms (HTTP {})", status.as_u16()))
            }
        }
        Err(err) => {
            let reason = if err.is_timeout() {
                "timeout"
            } else if err.is_connect() {
                "connect"
            } else {
                "error"
            };
            error_row(source, reason.into())
        }
    }
}

fn health_http_client() -> Result<reqwest::Client, SymptomMatchError> {
    static HEALTH_HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

    if let Some(client) = HEALTH_HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .user_agent(concat!("symptomatch/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(SymptomMatchError::HttpClientInit)?;

    match HEALTH_HTTP_CLIENT.set(client.clone()) {
        Ok(()) => Ok(client),
        Err(_) => HEALTH_HTTP_CLIENT
            .get()
            .cloned()
            .ok_or_else(|| SymptomMatchError::Api {
                api: "health".into(),
                message: "Health HTTP client initialization race".into(),
            }),
    }
}

fn check_bundled() -> HealthRow {
    match crate::sources::bundled::bundled_catalog() {
        Ok(records) => ok_row("Bundled dataset", format!("{} records", records.len())),
        Err(err) => error_row("Bundled dataset", err.to_string()),
    }
}

async fn check_seed(client: reqwest::Client, seed: &SeedLocation) -> HealthRow {
    match seed {
        SeedLocation::Url(url) => check_url(client, "Demo seed", url).await,
        SeedLocation::Embedded | SeedLocation::Path(_) => {
            match crate::sources::seed::fetch_seed(seed).await {
                Ok(records) => ok_row(
                    "Demo seed",
                    format!("{} records ({})", records.len(), seed.describe()),
                ),
                Err(err) => error_row("Demo seed", format!("{} ({err})", seed.describe())),
            }
        }
    }
}

async fn check_cache_dir() -> HealthRow {
    let start = Instant::now();
    let dir = crate::utils::cache::symptomatch_cache_dir();
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let probe = dir.join(format!(".symptomatch-healthcheck-{suffix}.tmp"));

    let result = async {
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(&probe, b"ok").await?;
        match tokio::fs::remove_file(&probe).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
    .await;

    let source = format!("Cache dir ({})", dir.display());
    match result {
        Ok(()) => ok_row(&source, format!("{}ms", start.elapsed().as_millis())),
        Err(err) => error_row(&source, format!("{:?}", err.kind())),
    }
}

/// Checks every configured data source plus the local cache directory.
///
/// # Errors
///
/// Returns an error when the health HTTP client cannot be created.
pub async fn check(config: &LoaderConfig) -> Result<HealthReport, SymptomMatchError> {
    let client = health_http_client()?;

    let mut rows = Vec::new();
    if let Some(base) = config.remote_base.as_deref() {
        let url = crate::sources::join_endpoint(base, "diseases");
        rows.push(check_url(client.clone(), "Remote service", &url).await);
    }
    if config.bundled {
        rows.push(check_bundled());
    }
    if let Some(demo) = &config.demo {
        rows.push(check_seed(client.clone(), &demo.seed).await);
    }
    rows.push(check_cache_dir().await);

    let healthy = rows.iter().filter(|r| r.status == "ok").count();
    Ok(HealthReport {
        healthy,
        total: rows.len(),
        rows,
    })
}
