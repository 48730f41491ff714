use std::fmt;
use std::path::PathBuf;

use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{ResolveError, Result};

/// Unit type reported for every target in the JVM ecosystem.
pub const DEFAULT_UNIT_TYPE: &str = "JavaArtifact";

/// Clone URL of the OpenJDK runtime sources.
pub const JDK_REPO: &str = "hg.openjdk.java.net/jdk8/jdk8/jdk";

/// Clone URL of the OpenJDK compiler tools sources.
pub const LANGTOOLS_REPO: &str = "hg.openjdk.java.net/jdk8/jdk8/langtools";

/// Clone URL of the Nashorn scripting engine sources.
pub const NASHORN_REPO: &str = "hg.openjdk.java.net/jdk8/jdk8/nashorn";

const JAR_SCHEME_PREFIX: &str = "jar:";

/// A reference to a code location, used as a resolution key.
///
/// `Packaged` origins point into an archive (`jar:file:/a/b.jar!/x/Y.class`),
/// `Local` origins are plain files (`file:/repo/core/Main.class`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    Packaged {
        /// URI of the archive itself, e.g. `file:/a/b.jar`.
        archive: String,
        /// Path inside the archive after the last `!`, if any.
        entry: Option<String>,
    },
    Local(PathBuf),
}

impl Origin {
    /// Parses a `jar:` or `file:` URI into an origin.
    pub fn parse(uri: &str) -> Result<Origin> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(ResolveError::Origin {
                message: "empty origin".to_string(),
                origin: String::new(),
            });
        }

        if let Some(rest) = uri.strip_prefix(JAR_SCHEME_PREFIX) {
            let (archive, entry) = match rest.rfind('!') {
                Some(pos) => (&rest[..pos], Some(rest[pos + 1..].to_string())),
                None => (rest, None),
            };
            if archive.is_empty() {
                return Err(ResolveError::Origin {
                    message: "missing archive location".to_string(),
                    origin: uri.to_string(),
                });
            }
            return Ok(Origin::Packaged {
                archive: archive.to_string(),
                entry,
            });
        }

        let url = Url::parse(uri).map_err(|e| ResolveError::Origin {
            message: e.to_string(),
            origin: uri.to_string(),
        })?;
        if url.scheme() != "file" {
            return Err(ResolveError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
                origin: uri.to_string(),
            });
        }
        let path = url.to_file_path().map_err(|_| ResolveError::Origin {
            message: "not a local file path".to_string(),
            origin: uri.to_string(),
        })?;
        Ok(Origin::Local(path))
    }

    /// Returns the origin with the in-archive entry stripped, so that every
    /// reference into the same archive shares one cache key.
    pub fn normalize(&self) -> Origin {
        match self {
            Origin::Packaged { archive, .. } => Origin::Packaged {
                archive: archive.clone(),
                entry: None,
            },
            Origin::Local(path) => Origin::Local(path.clone()),
        }
    }

    /// Returns the archive file on disk for a packaged origin, `None` for a
    /// local origin.
    ///
    /// Fails when the archive URI is not itself a `file:` URI. For nested
    /// archives (`/a.jar!/b.jar`) the outermost file is returned.
    pub fn archive_path(&self) -> Result<Option<PathBuf>> {
        let archive = match self {
            Origin::Packaged { archive, .. } => archive,
            Origin::Local(_) => return Ok(None),
        };
        let url = Url::parse(archive).map_err(|e| ResolveError::Origin {
            message: e.to_string(),
            origin: self.to_string(),
        })?;
        if url.scheme() != "file" {
            return Err(ResolveError::UnsupportedScheme {
                scheme: format!("jar:{}", url.scheme()),
                origin: self.to_string(),
            });
        }
        let path = url.to_file_path().map_err(|_| ResolveError::Origin {
            message: "archive is not a local file path".to_string(),
            origin: self.to_string(),
        })?;
        let path = path.to_string_lossy();
        let outer = path.split('!').next().unwrap_or_default();
        Ok(Some(PathBuf::from(outer)))
    }

    /// Path inside the archive, without a leading `/`.
    pub fn entry(&self) -> Option<&str> {
        match self {
            Origin::Packaged { entry, .. } => entry.as_deref().map(|e| e.trim_start_matches('/')),
            Origin::Local(_) => None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Packaged { archive, entry } => {
                write!(f, "{}{}", JAR_SCHEME_PREFIX, archive)?;
                if let Some(entry) = entry {
                    write!(f, "!{}", entry)?;
                }
                Ok(())
            }
            Origin::Local(path) => match Url::from_file_path(path) {
                Ok(url) => write!(f, "{}", url),
                Err(()) => write!(f, "file:{}", path.display()),
            },
        }
    }
}

/// A declared dependency as produced by the build tooling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawDependency {
    #[serde(rename = "GroupID")]
    pub group_id: String,
    #[serde(rename = "ArtifactID")]
    pub artifact_id: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Scope", default)]
    pub scope: String,
    /// Location of the resolved archive on disk, when the build tool knows it.
    #[serde(rename = "JarPath", default, skip_serializing_if = "Option::is_none")]
    pub jar_path: Option<String>,
    /// Clone URL already known for this dependency.
    #[serde(rename = "RepoURI", default, skip_serializing_if = "Option::is_none")]
    pub repo_uri: Option<String>,
}

impl RawDependency {
    pub fn new(group_id: &str, artifact_id: &str, version: &str, scope: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            scope: scope.to_string(),
            jar_path: None,
            repo_uri: None,
        }
    }

    /// Memo key: `group:artifact:version:scope`.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.group_id, self.artifact_id, self.version, self.scope
        )
    }

    /// Logical unit name: `group/artifact`.
    pub fn unit_name(&self) -> String {
        format!("{}/{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for RawDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// The unit, version and (for external targets) repository a reference
/// resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    #[serde(rename = "ToRepoCloneURL", default, skip_serializing_if = "Option::is_none")]
    pub repo_clone_url: Option<String>,
    #[serde(rename = "ToUnit")]
    pub unit: String,
    #[serde(rename = "ToUnitType")]
    pub unit_type: String,
    #[serde(rename = "ToVersionString")]
    pub version: String,
}

impl ResolvedTarget {
    /// A unit built from the same repository; carries no clone URL.
    pub fn sibling(unit: &str, version: &str) -> Self {
        Self {
            repo_clone_url: None,
            unit: unit.to_string(),
            unit_type: DEFAULT_UNIT_TYPE.to_string(),
            version: version.to_string(),
        }
    }

    /// A unit hosted in another repository.
    pub fn external(clone_url: &str, unit: &str, version: &str) -> Self {
        Self {
            repo_clone_url: Some(clone_url.to_string()),
            ..Self::sibling(unit, version)
        }
    }

    pub fn is_external(&self) -> bool {
        self.repo_clone_url.is_some()
    }

    /// Platform runtime classes (`jre/lib/*.jar`).
    pub fn jdk() -> Self {
        Self::external(JDK_REPO, "JDK", "")
    }

    /// Compiler tools classes (`tools.jar`).
    pub fn langtools() -> Self {
        Self::external(LANGTOOLS_REPO, "tools", "")
    }

    /// Scripting engine classes (`nashorn.jar`).
    pub fn nashorn() -> Self {
        Self::external(NASHORN_REPO, "nashorn", "")
    }
}

/// Outcome of resolving one `RawDependency`: either a target or an error,
/// never both. Only the `resolved`/`failed` constructors build one, so it is
/// serialized for output but not deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepResolution {
    #[serde(rename = "Raw")]
    raw: RawDependency,
    #[serde(rename = "Target", skip_serializing_if = "Option::is_none")]
    target: Option<ResolvedTarget>,
    #[serde(rename = "Error", skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DepResolution {
    pub fn resolved(raw: RawDependency, target: ResolvedTarget) -> Self {
        Self {
            raw,
            target: Some(target),
            error: None,
        }
    }

    pub fn failed(raw: RawDependency, error: impl Into<String>) -> Self {
        Self {
            raw,
            target: None,
            error: Some(error.into()),
        }
    }

    pub fn raw(&self) -> &RawDependency {
        &self.raw
    }

    pub fn target(&self) -> Option<&ResolvedTarget> {
        self.target.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }

    pub fn into_target(self) -> Option<ResolvedTarget> {
        self.target
    }
}

/// One source root of a unit: the unit it belongs to, its version, and its
/// directory (relative to the project root unless absolute).
///
/// Serialized as a `[unit, version, dir]` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String, String)", into = "(String, String, String)")]
pub struct SourcePathEntry {
    pub unit: String,
    pub version: String,
    pub dir: String,
}

impl SourcePathEntry {
    pub fn new(unit: &str, version: &str, dir: &str) -> Self {
        Self {
            unit: unit.to_string(),
            version: version.to_string(),
            dir: dir.to_string(),
        }
    }
}

impl From<(String, String, String)> for SourcePathEntry {
    fn from((unit, version, dir): (String, String, String)) -> Self {
        Self { unit, version, dir }
    }
}

impl From<SourcePathEntry> for (String, String, String) {
    fn from(entry: SourcePathEntry) -> Self {
        (entry.unit, entry.version, entry.dir)
    }
}

fn default_unit_type() -> String {
    DEFAULT_UNIT_TYPE.to_string()
}

/// A unit already discovered from the project's build files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// `group/artifact` name of the unit.
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type", default = "default_unit_type")]
    pub unit_type: String,
    #[serde(rename = "Dependencies", default)]
    pub dependencies: Vec<RawDependency>,
    #[serde(rename = "SourcePath", default)]
    pub source_path: Vec<SourcePathEntry>,
}

impl SourceUnit {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            unit_type: default_unit_type(),
            dependencies: Vec::new(),
            source_path: Vec::new(),
        }
    }
}

/// Credentials for a private artifact repository.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryAuth {
    pub username: String,
    pub password: String,
}

impl RepositoryAuth {
    /// Value of the `Authorization` header for HTTP basic authentication.
    pub fn basic_header(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }
}

impl fmt::Debug for RepositoryAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A remote artifact repository that serves POM documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRepository {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<RepositoryAuth>,
}

impl ArtifactRepository {
    pub fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            auth: None,
        }
    }
}
