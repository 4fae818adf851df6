//! Catalog loading with an ordered fallback chain.
//!
//! Each configured source is tried in precedence order (remote, bundled,
//! demo). The first one that yields a non-empty catalog wins; failures of the
//! sources tried before it are kept in the [`LoadReport`] so the caller can
//! show a degraded-mode banner.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::LoaderConfig;
use crate::entities::catalog::Catalog;
use crate::error::SymptomMatchError;
use crate::sources::remote::RemoteClient;
use crate::sources::seed::SeedLocation;

pub mod demo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Remote,
    Bundled,
    Demo,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Remote => "remote service",
            Self::Bundled => "bundled dataset",
            Self::Demo => "demo dataset",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// The highest-precedence configured source answered.
    Ready,
    /// A fallback source answered after a higher one failed.
    Degraded,
    /// Every configured source failed or none was configured.
    NoData,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub catalog: Catalog,
    pub source: Option<SourceKind>,
    pub failures: Vec<SourceFailure>,
}

impl LoadReport {
    pub fn status(&self) -> LoadStatus {
        match self.source {
            None => LoadStatus::NoData,
            Some(_) if self.failures.is_empty() => LoadStatus::Ready,
            Some(_) => LoadStatus::Degraded,
        }
    }
}

/// One way of producing a catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn load(&self) -> Result<Catalog, SymptomMatchError>;
}

pub struct RemoteSource {
    client: RemoteClient,
}

impl RemoteSource {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for RemoteSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Remote
    }

    async fn load(&self) -> Result<Catalog, SymptomMatchError> {
        Ok(self.client.diseases().await?.into_iter().collect())
    }
}

pub struct BundledSource;

#[async_trait]
impl CatalogSource for BundledSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Bundled
    }

    async fn load(&self) -> Result<Catalog, SymptomMatchError> {
        Ok(crate::sources::bundled::bundled_catalog()?
            .into_iter()
            .collect())
    }
}

pub struct DemoSource {
    seed: SeedLocation,
    target: usize,
}

impl DemoSource {
    pub fn new(seed: SeedLocation, target: usize) -> Self {
        Self { seed, target }
    }
}

#[async_trait]
impl CatalogSource for DemoSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Demo
    }

    async fn load(&self) -> Result<Catalog, SymptomMatchError> {
        let records = crate::sources::seed::fetch_seed(&self.seed).await?;
        // Duplicate seed names would produce colliding clone names.
        let seed: Catalog = records.into_iter().collect();
        let seed: Vec<_> = seed.iter().cloned().collect();
        Ok(demo::expand_seed(&seed, self.target).into_iter().collect())
    }
}

/// Runs the fallback chain. At most one load runs at a time per loader.
pub struct CatalogLoader {
    sources: Vec<Box<dyn CatalogSource>>,
    in_flight: Mutex<()>,
}

impl CatalogLoader {
    pub fn new(sources: Vec<Box<dyn CatalogSource>>) -> Self {
        Self {
            sources,
            in_flight: Mutex::new(()),
        }
    }

    /// Builds the precedence list from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the remote HTTP client cannot be created.
    pub fn from_config(config: &LoaderConfig) -> Result<Self, SymptomMatchError> {
        let mut sources: Vec<Box<dyn CatalogSource>> = Vec::new();
        if let Some(base) = config.remote_base.as_deref() {
            sources.push(Box::new(RemoteSource::new(RemoteClient::new(base)?)));
        }
        if config.bundled {
            sources.push(Box::new(BundledSource));
        }
        if let Some(demo) = &config.demo {
            sources.push(Box::new(DemoSource::new(demo.seed.clone(), demo.target)));
        }
        Ok(Self::new(sources))
    }

    pub fn source_kinds(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|s| s.kind()).collect()
    }

    /// Tries each source in order and returns the first non-empty catalog.
    ///
    /// Source failures never propagate; they are recorded in the report. When
    /// every source fails the report carries an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SymptomMatchError::LoadInProgress`] when another load on this
    /// loader has not finished.
    pub async fn load(&self) -> Result<LoadReport, SymptomMatchError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            return Err(SymptomMatchError::LoadInProgress);
        };

        let mut failures = Vec::new();
        for source in &self.sources {
            let kind = source.kind();
            match source.load().await {
                Ok(catalog) if !catalog.is_empty() => {
                    info!(source = %kind, records = catalog.len(), "Catalog loaded");
                    return Ok(LoadReport {
                        catalog,
                        source: Some(kind),
                        failures,
                    });
                }
                Ok(_) => {
                    warn!(source = %kind, "Source returned no usable records; falling back");
                    failures.push(SourceFailure {
                        source: kind,
                        reason: "no usable condition records".into(),
                    });
                }
                Err(err) => {
                    warn!(source = %kind, error = %err, "Source failed; falling back");
                    failures.push(SourceFailure {
                        source: kind,
                        reason: err.to_string(),
                    });
                }
            }
        }

        warn!(
            attempted = self.sources.len(),
            "No catalog source produced data"
        );
        Ok(LoadReport {
            catalog: Catalog::new(),
            source: None,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::entities::condition::ConditionRecord;

    struct FixedSource {
        kind: SourceKind,
        result: Result<Vec<ConditionRecord>, String>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedSource {
        fn ok(kind: SourceKind, names: &[&str]) -> Self {
            Self {
                kind,
                result: Ok(names
                    .iter()
                    .map(|n| ConditionRecord::new(*n).with_symptoms(["fever"]))
                    .collect()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(kind: SourceKind, reason: &str) -> Self {
            Self {
                kind,
                result: Err(reason.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for FixedSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn load(&self) -> Result<Catalog, SymptomMatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(records) => Ok(records.iter().cloned().collect()),
                Err(reason) => Err(SymptomMatchError::Api {
                    api: "test".into(),
                    message: reason.clone(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn first_successful_source_wins() {
        let bundled = FixedSource::ok(SourceKind::Bundled, &["Flu"]);
        let demo = FixedSource::ok(SourceKind::Demo, &["Cold"]);
        let demo_calls = demo.calls.clone();
        let loader = CatalogLoader::new(vec![Box::new(bundled), Box::new(demo)]);

        let report = loader.load().await.unwrap();
        assert_eq!(report.source, Some(SourceKind::Bundled));
        assert_eq!(report.status(), LoadStatus::Ready);
        assert!(report.catalog.contains("Flu"));
        assert_eq!(demo_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failures_and_empty_sources_fall_through_as_degraded() {
        let loader = CatalogLoader::new(vec![
            Box::new(FixedSource::failing(SourceKind::Remote, "HTTP 500")),
            Box::new(FixedSource::ok(SourceKind::Bundled, &[])),
            Box::new(FixedSource::ok(SourceKind::Demo, &["Cold"])),
        ]);

        let report = loader.load().await.unwrap();
        assert_eq!(report.source, Some(SourceKind::Demo));
        assert_eq!(report.status(), LoadStatus::Degraded);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].source, SourceKind::Remote);
        assert!(report.failures[0].reason.contains("HTTP 500"));
        assert_eq!(report.failures[1].reason, "no usable condition records");
    }

    #[tokio::test]
    async fn total_failure_reports_no_data() {
        let loader = CatalogLoader::new(vec![Box::new(FixedSource::failing(
            SourceKind::Remote,
            "connect",
        ))]);
        let report = loader.load().await.unwrap();
        assert_eq!(report.status(), LoadStatus::NoData);
        assert!(report.catalog.is_empty());
        assert_eq!(report.failures.len(), 1);

        let empty = CatalogLoader::new(Vec::new()).load().await.unwrap();
        assert_eq!(empty.status(), LoadStatus::NoData);
        assert!(empty.failures.is_empty());
    }

    struct GateSource {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl CatalogSource for GateSource {
        fn kind(&self) -> SourceKind {
            SourceKind::Remote
        }

        async fn load(&self) -> Result<Catalog, SymptomMatchError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok([ConditionRecord::new("Flu").with_symptoms(["fever"])]
                .into_iter()
                .collect())
        }
    }

    #[tokio::test]
    async fn concurrent_load_is_refused() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let loader = Arc::new(CatalogLoader::new(vec![Box::new(GateSource {
            started: started.clone(),
            release: release.clone(),
        })]));

        let first = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load().await }
        });
        started.notified().await;

        let second = loader.load().await;
        assert!(matches!(second, Err(SymptomMatchError::LoadInProgress)));

        release.notify_one();
        let report = first.await.unwrap().unwrap();
        assert_eq!(report.status(), LoadStatus::Ready);

        // Guard is released once the first load finishes.
        release.notify_one();
        assert!(loader.load().await.is_ok());
    }

    #[tokio::test]
    async fn remote_server_error_falls_back_to_bundled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/diseases"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = LoaderConfig {
            remote_base: Some(server.uri()),
            bundled: true,
            demo: None,
        };
        let loader = CatalogLoader::from_config(&config).unwrap();
        assert_eq!(
            loader.source_kinds(),
            vec![SourceKind::Remote, SourceKind::Bundled]
        );

        let report = loader.load().await.unwrap();
        assert_eq!(report.source, Some(SourceKind::Bundled));
        assert_eq!(report.status(), LoadStatus::Degraded);
        assert_eq!(report.failures[0].source, SourceKind::Remote);
        assert!(!report.catalog.is_empty());
    }

    #[tokio::test]
    async fn remote_outage_after_success_degrades_to_bundled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/diseases"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"diseases": [{"name": "Old Flu", "symptoms": ["fever"]}]}"#,
                "application/json",
            ))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/diseases"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = LoaderConfig {
            remote_base: Some(server.uri()),
            bundled: true,
            demo: None,
        };
        let loader = CatalogLoader::from_config(&config).unwrap();

        let first = loader.load().await.unwrap();
        assert_eq!(first.status(), LoadStatus::Ready);
        assert_eq!(first.source, Some(SourceKind::Remote));

        let second = loader.load().await.unwrap();
        assert_eq!(second.status(), LoadStatus::Degraded);
        assert_eq!(second.source, Some(SourceKind::Bundled));
        assert_eq!(second.failures[0].source, SourceKind::Remote);
        assert!(!second.catalog.contains("Old Flu"));
    }

    #[tokio::test]
    async fn remote_success_is_adopted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/diseases"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"diseases": [{"name": "Remote Flu", "symptoms": ["fever"]}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let config = LoaderConfig {
            remote_base: Some(server.uri()),
            bundled: true,
            demo: None,
        };
        let report = CatalogLoader::from_config(&config)
            .unwrap()
            .load()
            .await
            .unwrap();
        assert_eq!(report.source, Some(SourceKind::Remote));
        assert_eq!(report.status(), LoadStatus::Ready);
        assert_eq!(report.catalog.names().collect::<Vec<_>>(), vec!["Remote Flu"]);
    }

    #[tokio::test]
    async fn demo_source_expands_embedded_seed() {
        let source = DemoSource::new(SeedLocation::Embedded, 500);
        let catalog = source.load().await.unwrap();
        assert_eq!(catalog.len(), 500);
        assert!(catalog.contains("Influenza"));
        assert!(catalog.contains("Influenza #2"));
    }
}
