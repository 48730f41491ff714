use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::build_model::BuildModel;
use crate::cache::Memo;
use crate::dependency::DependencyResolver;
use crate::platform::{AndroidSdkResolver, PlatformResolver, ANDROID_JAR};
use crate::types::*;

/// Path fragment identifying archives of the platform runtime.
const RUNTIME_LIB_MARKER: &str = "jre/lib/";

/// Archive of the compiler tools.
const TOOLS_JAR: &str = "tools.jar";

/// Archive of the scripting engine.
const NASHORN_JAR: &str = "nashorn.jar";

/// Archives that resolve without consulting the build model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialArchive {
    Runtime,
    LangTools,
    Scripting,
    MobilePlatform,
}

impl SpecialArchive {
    fn classify(archive: &Path) -> Option<SpecialArchive> {
        let normalized = archive.to_string_lossy().replace('\\', "/");
        if normalized.contains(RUNTIME_LIB_MARKER) {
            return Some(SpecialArchive::Runtime);
        }
        match archive.file_name().and_then(|n| n.to_str()) {
            Some(TOOLS_JAR) => Some(SpecialArchive::LangTools),
            Some(NASHORN_JAR) => Some(SpecialArchive::Scripting),
            Some(ANDROID_JAR) => Some(SpecialArchive::MobilePlatform),
            _ => None,
        }
    }
}

/// Resolves origins (class locations inside archives or local files) to
/// the unit and version that produced them.
///
/// Packaged origins are keyed by their archive alone, so every class in one
/// archive shares a single cache entry. Failed resolutions are cached too.
pub struct OriginResolver {
    deps: DependencyResolver,
    source_path: Vec<SourcePathEntry>,
    project_root: PathBuf,
    build_model: Box<dyn BuildModel>,
    platform: Box<dyn PlatformResolver>,
    cache: Memo<Origin, Option<ResolvedTarget>>,
}

impl OriginResolver {
    /// Creates a resolver for origins seen while analyzing `unit`.
    ///
    /// Relative source path directories are taken from `project_root`.
    pub fn new(
        unit: &SourceUnit,
        project_root: &Path,
        deps: DependencyResolver,
        build_model: Box<dyn BuildModel>,
    ) -> Self {
        Self {
            deps,
            source_path: unit.source_path.clone(),
            project_root: project_root.to_path_buf(),
            build_model,
            platform: Box::new(AndroidSdkResolver),
            cache: Memo::new(),
        }
    }

    /// Replaces the resolver used for mobile platform SDK archives.
    pub fn with_platform_resolver(mut self, platform: Box<dyn PlatformResolver>) -> Self {
        self.platform = platform;
        self
    }

    pub fn dependency_resolver(&self) -> &DependencyResolver {
        &self.deps
    }

    /// Parses and resolves an origin URI. Malformed URIs resolve to `None`.
    pub fn resolve_uri(&self, uri: &str) -> Option<ResolvedTarget> {
        match Origin::parse(uri) {
            Ok(origin) => self.resolve_origin(&origin),
            Err(e) => {
                warn!("Unable to parse origin '{}': {}", uri, e);
                None
            }
        }
    }

    /// Resolves an origin to its target, or `None` if it cannot be
    /// attributed to any known unit.
    pub fn resolve_origin(&self, origin: &Origin) -> Option<ResolvedTarget> {
        let normalized = origin.normalize();

        let archive = match origin.archive_path() {
            Ok(Some(archive)) => archive,
            Ok(None) => {
                return self
                    .cache
                    .get_or_compute(normalized, || self.resolve_file_origin(origin));
            }
            Err(e) => {
                warn!("Error getting archive path for origin {}: {}", normalized, e);
                return self.cache.get_or_compute(normalized, || None);
            }
        };

        match SpecialArchive::classify(&archive) {
            Some(SpecialArchive::Runtime) => {
                self.cache.get_or_compute(normalized, || Some(ResolvedTarget::jdk()))
            }
            Some(SpecialArchive::LangTools) => self
                .cache
                .get_or_compute(normalized, || Some(ResolvedTarget::langtools())),
            Some(SpecialArchive::Scripting) => self
                .cache
                .get_or_compute(normalized, || Some(ResolvedTarget::nashorn())),
            // Targets differ per class inside the SDK archive.
            Some(SpecialArchive::MobilePlatform) => self
                .cache
                .get_or_compute(origin.clone(), || self.platform.resolve(origin)),
            None => self
                .cache
                .get_or_compute(normalized, || self.resolve_archive(&archive)),
        }
    }

    // ------------------------------------------------------------------
    // Private helpers
    // ------------------------------------------------------------------

    fn resolve_archive(&self, archive: &Path) -> Option<ResolvedTarget> {
        let dep = match self.build_model.dependency_for_artifact(archive) {
            Ok(Some(dep)) => dep,
            Ok(None) => {
                debug!("No dependency found for archive {}", archive.display());
                return None;
            }
            Err(e) => {
                warn!(
                    "Error resolving archive {} to dependency: {}",
                    archive.display(),
                    e
                );
                return None;
            }
        };

        self.deps.resolve_raw_dep(&dep).into_target()
    }

    /// Attributes a local file to the first source root that contains it.
    fn resolve_file_origin(&self, origin: &Origin) -> Option<ResolvedTarget> {
        let file = match origin {
            Origin::Local(path) => normalize_path(path),
            Origin::Packaged { .. } => return None,
        };

        let entry = self.source_path.iter().find(|entry| {
            let root = normalize_path(&self.project_root.join(&entry.dir));
            file != root && file.starts_with(&root)
        });

        match entry {
            Some(entry) => Some(ResolvedTarget::sibling(&entry.unit, &entry.version)),
            None => {
                debug!("No source root contains {}", file.display());
                None
            }
        }
    }
}

/// Removes `.` and resolves `..` components without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
