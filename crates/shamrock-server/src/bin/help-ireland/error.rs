//! Error types for the server binary.

/// Top-level startup error.
///
/// Each variant wraps one subsystem so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: shamrock_core::ConfigError,
    },

    /// The image judge could not be built.
    #[error("judge error: {source}")]
    Judge {
        /// The underlying verification error.
        #[from]
        source: shamrock_verify::VerifyError,
    },

    /// Opening the store or the session failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: shamrock_core::CoreError,
    },

    /// The HTTP server failed.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: shamrock_server::ServerError,
    },
}
