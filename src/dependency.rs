use tracing::{debug, info};

use crate::cache::Memo;
use crate::config::ResolverConfig;
use crate::errors::Result;
use crate::overrides::OverrideTable;
use crate::pom::{parse_scm_url, pom_url, HttpPomFetcher, PomFetcher};
use crate::types::*;

/// Result of probing a single candidate repository.
enum PomAttempt {
    /// The document was fetched and names a source repository.
    Scm(String),
    /// The document was fetched but has no `scm.url`.
    NoScm,
    /// Download or parsing failed.
    Failed(String),
}

/// Resolves declared dependencies to the repository, unit and version they
/// were built from.
///
/// Tiers are tried in order and the first applicable one wins:
/// 1. **Same project** -- the dependency's group equals the prefix of the
///    current unit's name; it is a sibling unit without a clone URL.
/// 2. **Override / known URL** -- the override table or the dependency's own
///    `repo_uri` supplies the clone URL.
/// 3. **Remote metadata** -- the POM is downloaded from each candidate
///    repository in turn and its `scm.url` is used.
///
/// Every outcome, failures included, is memoized by
/// `group:artifact:version:scope`.
pub struct DependencyResolver {
    unit_name: String,
    repositories: Vec<ArtifactRepository>,
    overrides: OverrideTable,
    fetcher: Box<dyn PomFetcher>,
    cache: Memo<String, DepResolution>,
}

impl DependencyResolver {
    /// Creates a resolver for dependencies declared by `unit_name`, fetching
    /// over HTTP with the configured timeout.
    pub fn new(unit_name: &str, config: &ResolverConfig, overrides: OverrideTable) -> Self {
        let fetcher = HttpPomFetcher::new(config.fetch_timeout());
        Self::with_fetcher(unit_name, config, overrides, Box::new(fetcher))
    }

    /// Creates a resolver that downloads POMs through `fetcher`.
    pub fn with_fetcher(
        unit_name: &str,
        config: &ResolverConfig,
        overrides: OverrideTable,
        fetcher: Box<dyn PomFetcher>,
    ) -> Self {
        Self {
            unit_name: unit_name.to_string(),
            repositories: config.candidate_repositories(),
            overrides,
            fetcher,
            cache: Memo::new(),
        }
    }

    /// Resolves a single dependency. Never fails; errors are carried in the
    /// returned `DepResolution`.
    pub fn resolve_raw_dep(&self, dep: &RawDependency) -> DepResolution {
        self.cache
            .get_or_compute(dep.cache_key(), || self.resolve_uncached(dep))
    }

    /// Resolves every dependency in order.
    pub fn resolve_all(&self, deps: &[RawDependency]) -> Vec<DepResolution> {
        deps.iter().map(|d| self.resolve_raw_dep(d)).collect()
    }

    /// Checks the override table for `group/artifact`.
    pub fn check_overrides(&self, lookup: &str) -> Option<String> {
        self.overrides.lookup(lookup)
    }

    /// Previously computed resolution for `dep`, if any.
    pub fn cached(&self, dep: &RawDependency) -> Option<DepResolution> {
        self.cache.get(&dep.cache_key())
    }

    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    // ------------------------------------------------------------------
    // Private helpers
    // ------------------------------------------------------------------

    fn resolve_uncached(&self, dep: &RawDependency) -> DepResolution {
        let unit = dep.unit_name();

        // Heuristic: a group equal to our own name prefix is assumed to be
        // another module of this project. An external group with the same
        // name is misclassified.
        if self.project_group() == dep.group_id {
            return DepResolution::resolved(dep.clone(), ResolvedTarget::sibling(&unit, &dep.version));
        }

        if let Some(clone_url) = self.check_overrides(&unit).or_else(|| dep.repo_uri.clone()) {
            return DepResolution::resolved(
                dep.clone(),
                ResolvedTarget::external(&clone_url, &unit, &dep.version),
            );
        }

        let resolution = self.resolve_remote(dep);
        if let Some(error) = resolution.error() {
            info!("Unable to resolve dependency {} - {}", dep, error);
        }
        resolution
    }

    /// Group prefix of the current unit (everything before the first `/`).
    fn project_group(&self) -> &str {
        self.unit_name.split('/').next().unwrap_or_default()
    }

    /// Probes candidate repositories in order. Stops at the first document
    /// that could be fetched, whether or not it names a repository; only a
    /// failed download moves on to the next candidate.
    fn resolve_remote(&self, dep: &RawDependency) -> DepResolution {
        let mut error = None;

        for repo in &self.repositories {
            let url = pom_url(&repo.url, dep);
            debug!("Trying to resolve dependency {} - {}", dep, url);

            match self.try_repository(repo, &url) {
                PomAttempt::Scm(clone_url) => {
                    return DepResolution::resolved(
                        dep.clone(),
                        ResolvedTarget::external(&clone_url, &dep.unit_name(), &dep.version),
                    );
                }
                PomAttempt::NoScm => {
                    let message = format!(
                        "{} does not have an associated SCM repository.",
                        dep.artifact_id
                    );
                    debug!("Unable to find SCM repository {} - {}", dep, message);
                    error = Some(message);
                    break;
                }
                PomAttempt::Failed(message) => {
                    let message = format!("Could not download file {}", message);
                    debug!(
                        "Unable to resolve dependency {} - {}, trying next server...",
                        dep, message
                    );
                    error = Some(message);
                }
            }
        }

        DepResolution::failed(
            dep.clone(),
            error.unwrap_or_else(|| "no artifact repositories to query".to_string()),
        )
    }

    fn try_repository(&self, repo: &ArtifactRepository, url: &str) -> PomAttempt {
        match self.fetch_scm_url(repo, url) {
            Ok(Some(clone_url)) => PomAttempt::Scm(clone_url),
            Ok(None) => PomAttempt::NoScm,
            Err(e) => PomAttempt::Failed(e.to_string()),
        }
    }

    fn fetch_scm_url(&self, repo: &ArtifactRepository, url: &str) -> Result<Option<String>> {
        let document = self.fetcher.fetch(url, repo.auth.as_ref())?;
        parse_scm_url(&document)
    }
}
