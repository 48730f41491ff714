use crate::types::{Origin, ResolvedTarget};

/// Archive file name of the Android SDK platform classes.
pub const ANDROID_JAR: &str = "android.jar";

const AOSP: &str = "android.googlesource.com/platform";

/// Resolves classes packaged in a mobile platform SDK archive.
///
/// Receives the full origin, in-archive entry included, because one SDK
/// archive bundles classes from several source repositories.
pub trait PlatformResolver: Send + Sync {
    fn resolve(&self, origin: &Origin) -> Option<ResolvedTarget>;
}

/// Maps classes in `android.jar` to the AOSP repository that hosts them.
#[derive(Debug, Default, Clone, Copy)]
pub struct AndroidSdkResolver;

/// Package prefix to AOSP project, most specific first.
const ANDROID_PROJECTS: &[(&str, &str)] = &[
    ("org/apache/http/", "external/apache-http"),
    ("junit/", "external/junit"),
    ("android/", "frameworks/base"),
    ("java/", "libcore"),
    ("javax/", "libcore"),
    ("dalvik/", "libcore"),
    ("libcore/", "libcore"),
    ("org/json/", "libcore"),
    ("org/w3c/", "libcore"),
    ("org/xml/", "libcore"),
];

impl PlatformResolver for AndroidSdkResolver {
    fn resolve(&self, origin: &Origin) -> Option<ResolvedTarget> {
        let entry = origin.entry()?;
        let (_, project) = ANDROID_PROJECTS
            .iter()
            .find(|(prefix, _)| entry.starts_with(prefix))?;
        Some(ResolvedTarget::external(
            &format!("{}/{}", AOSP, project),
            "android",
            "",
        ))
    }
}
