//! Retrieval and parsing of Maven POM documents.

use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use crate::errors::{ResolveError, Result};
use crate::types::{RawDependency, RepositoryAuth};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Fetches raw POM documents from artifact repositories.
///
/// Implementations must be safe to share across threads; the dependency
/// resolver calls them from whichever thread resolves a dependency.
pub trait PomFetcher: Send + Sync {
    /// Downloads the document at `url`, sending basic credentials when `auth`
    /// is given. Any transport failure, timeout or non-2xx status is an error.
    fn fetch(&self, url: &str, auth: Option<&RepositoryAuth>) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher backed by a shared `ureq` agent.
pub struct HttpPomFetcher {
    agent: ureq::Agent,
}

impl HttpPomFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl PomFetcher for HttpPomFetcher {
    fn fetch(&self, url: &str, auth: Option<&RepositoryAuth>) -> Result<Vec<u8>> {
        let mut request = self.agent.get(url);
        if let Some(auth) = auth {
            request = request.header("Authorization", auth.basic_header());
        }
        let mut response = request.call().map_err(|e| ResolveError::Fetch {
            message: e.to_string(),
            url: url.to_string(),
        })?;
        response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ResolveError::Fetch {
                message: e.to_string(),
                url: url.to_string(),
            })
    }
}

/// Builds `<base>/<group as dirs>/<artifact>/<version>/<artifact>-<version>.pom`.
pub fn pom_url(base: &str, dep: &RawDependency) -> String {
    let base = base.trim_end_matches('/');
    format!(
        "{}/{}/{}/{}/{}-{}.pom",
        base,
        dep.group_id.replace('.', "/"),
        dep.artifact_id,
        dep.version,
        dep.artifact_id,
        dep.version
    )
}

#[derive(Debug, Default, Deserialize)]
struct PomModel {
    #[serde(default)]
    scm: Option<PomScm>,
}

#[derive(Debug, Default, Deserialize)]
struct PomScm {
    #[serde(default)]
    url: Option<String>,
}

/// Parses a POM document and returns its `scm.url`, if present and
/// non-blank. A leading UTF-8 byte-order mark is ignored.
///
/// Documents whose root element is not `<project>` (an HTML error page
/// served with status 200, for instance) are rejected, so callers can tell
/// them apart from a real POM that lacks SCM information.
pub fn parse_scm_url(document: &[u8]) -> Result<Option<String>> {
    let document = document.strip_prefix(UTF8_BOM).unwrap_or(document);
    let text = std::str::from_utf8(document).map_err(|e| ResolveError::Pom {
        message: format!("document is not valid UTF-8: {}", e),
    })?;
    check_root_element(text)?;
    let model: PomModel = quick_xml::de::from_str(text).map_err(|e| ResolveError::Pom {
        message: e.to_string(),
    })?;

    Ok(model
        .scm
        .and_then(|scm| scm.url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty()))
}

/// Reads up to the first element and requires it to be `project`, with or
/// without a namespace prefix.
fn check_root_element(text: &str) -> Result<()> {
    let mut reader = Reader::from_str(text);
    loop {
        let event = reader.read_event().map_err(|e| ResolveError::Pom {
            message: e.to_string(),
        })?;
        match event {
            Event::Start(e) | Event::Empty(e) => {
                let name = e.local_name();
                if name.as_ref() == b"project" {
                    return Ok(());
                }
                return Err(ResolveError::Pom {
                    message: format!(
                        "root element is <{}>, not <project>",
                        String::from_utf8_lossy(name.as_ref())
                    ),
                });
            }
            Event::Eof => {
                return Err(ResolveError::Pom {
                    message: "document has no root element".to_string(),
                })
            }
            _ => {}
        }
    }
}
