//! Data-source configuration.
//!
//! Resolved once at startup from command-line options, with environment
//! variables filling gaps, and then handed to the loader. Nothing below the
//! CLI reads the environment for source selection.

use crate::error::SymptomMatchError;
use crate::sources::remote::REMOTE_BASE_ENV;
use crate::sources::seed::SeedLocation;

pub const DEFAULT_DEMO_SIZE: usize = 500;
pub const SEED_ENV: &str = "SYMPTOMATCH_SEED";
pub const DEMO_SIZE_ENV: &str = "SYMPTOMATCH_DEMO_SIZE";

/// Raw data-source options as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct DataOptions {
    pub api_base: Option<String>,
    pub offline: bool,
    pub no_bundled: bool,
    pub demo: bool,
    pub seed: Option<String>,
    pub demo_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub seed: SeedLocation,
    pub target: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub remote_base: Option<String>,
    pub bundled: bool,
    pub demo: Option<DemoConfig>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            remote_base: None,
            bundled: true,
            demo: None,
        }
    }
}

impl LoaderConfig {
    /// Resolves options against the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the demo size is zero or not a number.
    pub fn resolve(options: &DataOptions) -> Result<Self, SymptomMatchError> {
        Self::resolve_with(options, crate::sources::env_value)
    }

    pub(crate) fn resolve_with<F>(options: &DataOptions, env: F) -> Result<Self, SymptomMatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let remote_base = if options.offline {
            None
        } else {
            options
                .api_base
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .or_else(|| env(REMOTE_BASE_ENV))
        };

        let demo = if options.demo {
            let seed = options
                .seed
                .as_deref()
                .and_then(SeedLocation::parse)
                .or_else(|| env(SEED_ENV).as_deref().and_then(SeedLocation::parse))
                .unwrap_or(SeedLocation::Embedded);
            let target = match options.demo_size {
                Some(size) => size,
                None => match env(DEMO_SIZE_ENV) {
                    Some(raw) => raw.parse::<usize>().map_err(|_| {
                        SymptomMatchError::InvalidArgument(format!(
                            "{DEMO_SIZE_ENV} must be a positive integer, got '{raw}'"
                        ))
                    })?,
                    None => DEFAULT_DEMO_SIZE,
                },
            };
            if target == 0 {
                return Err(SymptomMatchError::InvalidArgument(
                    "--demo-size must be at least 1".into(),
                ));
            }
            Some(DemoConfig { seed, target })
        } else {
            None
        };

        Ok(Self {
            remote_base,
            bundled: !options.no_bundled,
            demo,
        })
    }

    pub fn has_any_source(&self) -> bool {
        self.remote_base.is_some() || self.bundled || self.demo.is_some()
    }
}
