use std::path::{Path, PathBuf};

use crate::errors::{ResolveError, Result};
use crate::types::{RawDependency, SourceUnit};

/// Scope assigned to dependencies inferred purely from an archive's location.
pub const DEFAULT_SCOPE: &str = "compile";

/// Maps archive files on disk back to the dependency that supplied them.
pub trait BuildModel: Send + Sync {
    /// Returns the dependency that owns `artifact`, or `None` if the archive
    /// is unknown to the build.
    fn dependency_for_artifact(&self, artifact: &Path) -> Result<Option<RawDependency>>;
}

/// Build model backed by a unit's declared dependencies and the on-disk
/// layout of local Maven and Gradle caches.
///
/// Lookup order:
/// 1. a declared dependency whose `jar_path` is exactly the archive;
/// 2. a path under one of the Maven-layout roots
///    (`<root>/<group dirs>/<artifact>/<version>/<artifact>-<version>*.jar`);
/// 3. a Gradle module cache path
///    (`.../modules-2/files-2.1/<group>/<artifact>/<version>/<hash>/<file>`).
///
/// Coordinates found by layout adopt the scope and known clone URL of a
/// declared dependency with the same group and artifact.
pub struct ProjectBuildModel {
    declared: Vec<RawDependency>,
    repository_roots: Vec<PathBuf>,
}

impl ProjectBuildModel {
    pub fn new(declared: Vec<RawDependency>, repository_roots: Vec<PathBuf>) -> Self {
        Self {
            declared,
            repository_roots,
        }
    }

    pub fn from_unit(unit: &SourceUnit, repository_roots: Vec<PathBuf>) -> Self {
        Self::new(unit.dependencies.clone(), repository_roots)
    }

    fn find_declared_jar(&self, artifact: &Path) -> Option<RawDependency> {
        self.declared
            .iter()
            .find(|d| d.jar_path.as_deref().map(Path::new) == Some(artifact))
            .cloned()
    }

    fn with_declared_metadata(&self, group: &str, artifact: &str, version: &str) -> RawDependency {
        let declared = self
            .declared
            .iter()
            .find(|d| d.group_id == group && d.artifact_id == artifact);
        match declared {
            Some(d) => RawDependency {
                version: version.to_string(),
                jar_path: None,
                ..d.clone()
            },
            None => RawDependency::new(group, artifact, version, DEFAULT_SCOPE),
        }
    }
}

impl BuildModel for ProjectBuildModel {
    fn dependency_for_artifact(&self, artifact: &Path) -> Result<Option<RawDependency>> {
        if let Some(dep) = self.find_declared_jar(artifact) {
            return Ok(Some(dep));
        }

        let parts = path_parts(artifact)?;

        for root in &self.repository_roots {
            let root_parts = path_parts(root)?;
            if let Some(rest) = parts.strip_prefix(root_parts.as_slice()) {
                if let Some((group, name, version)) = maven_coordinates(rest) {
                    return Ok(Some(self.with_declared_metadata(&group, name, version)));
                }
            }
        }

        if let Some((group, name, version)) = gradle_coordinates(&parts) {
            return Ok(Some(self.with_declared_metadata(group, name, version)));
        }

        Ok(None)
    }
}

fn path_parts(path: &Path) -> Result<Vec<&str>> {
    path.iter()
        .map(|c| {
            c.to_str().ok_or_else(|| ResolveError::BuildModel {
                message: "path is not valid UTF-8".to_string(),
                path: path.display().to_string(),
            })
        })
        .collect()
}

/// `<group dirs>/<artifact>/<version>/<artifact>-<version>*.jar`
fn maven_coordinates<'a>(parts: &[&'a str]) -> Option<(String, &'a str, &'a str)> {
    let n = parts.len();
    if n < 4 {
        return None;
    }
    let (file, version, artifact) = (parts[n - 1], parts[n - 2], parts[n - 3]);
    let prefix = format!("{}-{}", artifact, version);
    if !file.starts_with(&prefix) || !file.ends_with(".jar") {
        return None;
    }
    Some((parts[..n - 3].join("."), artifact, version))
}

/// `.../modules-2/files-2.1/<group>/<artifact>/<version>/<hash>/<file>`
fn gradle_coordinates<'a>(parts: &[&'a str]) -> Option<(&'a str, &'a str, &'a str)> {
    let pos = parts
        .windows(2)
        .position(|w| w[0] == "modules-2" && w[1] == "files-2.1")?;
    match &parts[pos + 2..] {
        [group, artifact, version, _hash, file] if file.ends_with(".jar") => {
            Some((*group, *artifact, *version))
        }
        _ => None,
    }
}
