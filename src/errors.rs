use thiserror::Error;

/// Errors that can occur while resolving origins and dependencies.
///
/// The public resolution entry points never return these; they are folded
/// into absent results or `DepResolution` errors. Configuration loading and
/// the collaborator traits do surface them.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid origin: {message} (origin: {origin})")]
    Origin { message: String, origin: String },

    #[error("unsupported scheme '{scheme}' (origin: {origin})")]
    UnsupportedScheme { scheme: String, origin: String },

    #[error("fetch error: {message} (url: {url})")]
    Fetch { message: String, url: String },

    #[error("pom error: {message}")]
    Pom { message: String },

    #[error("build model error: {message} (path: {path})")]
    BuildModel { message: String, path: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `ResolveError`.
pub type Result<T> = std::result::Result<T, ResolveError>;
