//! Error types produced by the parameter model and the invocation
//! controller.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while building parameters or invoking a tool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShelloutError {
    /// A validator rejected a value assignment; the previous value is
    /// retained unchanged.
    #[error("invalid value for parameter '{param}': {message}")]
    InvalidValue {
        /// Name of the parameter whose assignment was rejected.
        param: String,
        /// Rejection message produced by the validator.
        message: String,
    },

    /// An alias is not a legal bare identifier, is a reserved word, or
    /// collides with an existing name or alias.
    #[error("illegal alias '{alias}'")]
    InvalidAlias {
        /// The offending alias.
        alias: String,
    },

    /// Two parameters share a primary name.
    #[error("duplicate parameter name '{name}'")]
    DuplicateKey {
        /// The repeated primary name.
        name: String,
    },

    /// A lookup or update targeted a key that is neither a name nor an
    /// alias.
    #[error("unknown parameter key '{key}'")]
    UnknownKey {
        /// The unresolved key.
        key: String,
    },

    /// The external process terminated with a non-zero exit status.
    ///
    /// Raised only by [`check_exit_status`](crate::check_exit_status) and
    /// [`Invocation::ensure_success`](crate::Invocation::ensure_success),
    /// never by `invoke` itself.
    #[error("command finished with exit code {status}\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    ExecutionFailed {
        /// Exit code reported by the operating system (`-1` when the
        /// process was terminated by a signal).
        status: i32,
        /// Captured standard output, empty when discarded.
        stdout: String,
        /// Captured standard error, empty when discarded.
        stderr: String,
    },

    /// Failure to open or create a stream or scratch resource for an
    /// invocation.
    #[error("failed to open '{path}' for an invocation stream: {source}")]
    Resource {
        /// Path that failed to open; empty for anonymous scratch files.
        path: Utf8PathBuf,
        /// Underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// The external program could not be launched.
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        /// Program token of the command line.
        program: String,
        /// Underlying io error.
        #[source]
        source: std::io::Error,
    },
}
