//! The invocation controller: a base command, its [`Parameters`] and a
//! scoped-execution protocol around a blocking external process call.
//!
//! A [`Tool`] is created once per wrapped executable and reused across
//! many invocations. Persistent configuration goes through
//! [`Tool::update`]; per-call overrides go through [`Tool::invoke`],
//! which snapshots the parameters, applies the overrides, runs the
//! process and restores the snapshot on every exit path.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek};
use std::process::{Command, ExitStatus, Stdio};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::error::ShelloutError;
use crate::param::Param;
use crate::params::Parameters;
use crate::value::Value;

/// Where the child process reads its standard input from.
#[derive(Debug, Default)]
pub enum StdinSource {
    /// No input; reads see end-of-file immediately.
    #[default]
    Null,
    /// Inherit the parent's standard input.
    Inherit,
    /// Read from a file, opened read-only at invocation time.
    Path(Utf8PathBuf),
    /// An already-open stream supplied by the caller.
    Handle(File),
}

/// Where a child output stream (stdout or stderr) is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputSink {
    /// Capture into an anonymous scratch file, rewound after the process
    /// exits so the caller can read it back.
    #[default]
    Capture,
    /// Write to a file, opened read-write (created and truncated).
    Path(Utf8PathBuf),
    /// Discard the stream.
    Discard,
}

/// Streams and working directory for one invocation.
///
/// The default captures both output streams, supplies no input and runs
/// in the parent's working directory.
#[derive(Debug, Default)]
pub struct InvokeSpec {
    /// Working directory for the child, if different from the parent's.
    pub cwd: Option<Utf8PathBuf>,
    /// Standard input source.
    pub stdin: StdinSource,
    /// Standard output destination.
    pub stdout: OutputSink,
    /// Standard error destination.
    pub stderr: OutputSink,
}

/// A readable handle onto one captured output stream.
#[derive(Debug)]
pub enum OutputHandle {
    /// Backed by a file: an anonymous scratch file for
    /// [`OutputSink::Capture`], the named file for [`OutputSink::Path`].
    /// The file is closed when the handle is dropped.
    File(File),
    /// The stream was discarded; there is nothing to read.
    Discarded,
}

impl OutputHandle {
    /// Reads the entire stream content from the beginning.
    ///
    /// Rewinds before reading, so repeated calls return the same text.
    /// Discarded streams read as the empty string.
    ///
    /// # Errors
    ///
    /// Propagates io errors from the underlying file.
    pub fn read_to_string(&mut self) -> std::io::Result<String> {
        match self {
            Self::File(file) => {
                file.rewind()?;
                let mut content = String::new();
                file.read_to_string(&mut content)?;
                Ok(content)
            }
            Self::Discarded => Ok(String::new()),
        }
    }
}

/// Outcome of one [`Tool::invoke`] call.
///
/// Holds the exit status and handles onto the two output streams. Any
/// scratch files backing the handles are released when the `Invocation`
/// is dropped.
#[derive(Debug)]
pub struct Invocation {
    status: ExitStatus,
    stdout: OutputHandle,
    stderr: OutputHandle,
}

impl Invocation {
    /// Exit status of the external process.
    #[must_use]
    pub const fn status(&self) -> ExitStatus {
        self.status
    }

    /// Reads the captured standard output (empty when discarded).
    ///
    /// # Errors
    ///
    /// Propagates io errors from the backing file.
    pub fn read_stdout(&mut self) -> std::io::Result<String> {
        self.stdout.read_to_string()
    }

    /// Reads the captured standard error (empty when discarded).
    ///
    /// # Errors
    ///
    /// Propagates io errors from the backing file.
    pub fn read_stderr(&mut self) -> std::io::Result<String> {
        self.stderr.read_to_string()
    }

    /// Checks the exit status, embedding both captured streams in the
    /// error on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::ExecutionFailed`] for a non-zero exit
    /// status, or [`ShelloutError::Resource`] when a captured stream
    /// cannot be read back.
    pub fn ensure_success(&mut self) -> Result<(), ShelloutError> {
        let stdout = self.read_stdout().map_err(anonymous_resource)?;
        let stderr = self.read_stderr().map_err(anonymous_resource)?;
        check_exit_status(self.status, &stdout, &stderr)
    }
}

/// Raises [`ShelloutError::ExecutionFailed`] when `status` is non-zero.
///
/// `invoke` never checks the exit status itself; callers opt in through
/// this helper (or [`Invocation::ensure_success`]).
///
/// # Errors
///
/// Returns [`ShelloutError::ExecutionFailed`] embedding the status code
/// and both captured streams when the process failed.
pub fn check_exit_status(
    status: ExitStatus,
    stdout: &str,
    stderr: &str,
) -> Result<(), ShelloutError> {
    if status.success() {
        Ok(())
    } else {
        Err(ShelloutError::ExecutionFailed {
            status: status.code().unwrap_or(-1),
            stdout: stdout.to_owned(),
            stderr: stderr.to_owned(),
        })
    }
}

/// Controller for one wrapped external executable.
///
/// # Examples
///
/// ```
/// use shellout::{Param, Parameters, Tool};
///
/// let params = Parameters::new([
///     Param::option("-f")?.with_value(true)?,
///     Param::positional("input").with_value("input.txt")?,
/// ])?;
/// let tool = Tool::new("tool", params);
/// assert_eq!(tool.command_tokens(), ["tool", "-f", "input.txt"]);
/// assert_eq!(tool.to_string(), "tool -f input.txt");
/// # Ok::<(), shellout::ShelloutError>(())
/// ```
///
/// A `Tool` is not meant for concurrent invocation; `invoke` takes
/// `&mut self`, so overlapping calls on one instance do not compile.
/// Concurrent callers clone the tool and invoke the clones, each of
/// which owns independent parameters.
#[derive(Debug, Clone)]
pub struct Tool {
    program: String,
    base_args: Vec<String>,
    params: Parameters,
    version: Option<String>,
    url: Option<String>,
}

impl Tool {
    /// Creates a controller for `program` with the given parameters.
    ///
    /// The controller takes ownership of `params`; clone first to keep
    /// an independent copy.
    #[must_use]
    pub fn new(program: impl Into<String>, params: Parameters) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            params,
            version: None,
            url: None,
        }
    }

    /// Fixed tokens inserted after the program name and before any
    /// parameters (e.g. a subcommand such as `clone` for `git`).
    #[must_use]
    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Records the wrapped tool's version string (descriptive only).
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Records the wrapped tool's homepage (descriptive only).
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The program token.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The recorded version string, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The recorded homepage, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The live parameters.
    #[must_use]
    pub const fn params(&self) -> &Parameters {
        &self.params
    }

    /// Mutable access to the live parameters. Changes made here are
    /// persistent, like [`update`](Self::update).
    pub const fn params_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    /// The full argument vector: program, base args, then every on
    /// parameter's tokens in serialization order.
    #[must_use]
    pub fn command_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(1 + self.base_args.len());
        tokens.push(self.program.clone());
        tokens.extend(self.base_args.iter().cloned());
        tokens.extend(self.params.to_tokens());
        tokens
    }

    /// The command line as a display string: tokens joined by single
    /// spaces, with no quoting added.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.command_tokens().join(" ")
    }

    /// Persistently updates parameter values; see
    /// [`Parameters::update`] for the per-entry failure semantics.
    ///
    /// # Errors
    ///
    /// Propagates [`ShelloutError::UnknownKey`] and
    /// [`ShelloutError::InvalidValue`] from the underlying container.
    pub fn update<I, K, V>(&mut self, entries: I) -> Result<(), ShelloutError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.params.update(entries)
    }

    /// Looks up the params for a batch of names/aliases.
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::UnknownKey`] for the first key that
    /// resolves to nothing.
    pub fn grab<'k, I>(&self, keys: I) -> Result<Vec<&Param>, ShelloutError>
    where
        I: IntoIterator<Item = &'k str>,
    {
        keys.into_iter().map(|key| self.params.get(key)).collect()
    }

    /// Runs the external process once, with transient parameter
    /// overrides.
    ///
    /// The live parameters are snapshotted, the overrides applied, the
    /// command line assembled and the process executed to completion.
    /// The snapshot is restored unconditionally — on success, on a
    /// rejected override, on stream-open failure and on launch failure —
    /// so overrides never leak into later invocations.
    ///
    /// The exit status is returned as-is; use
    /// [`Invocation::ensure_success`] or [`check_exit_status`] to turn a
    /// non-zero status into an error.
    ///
    /// # Errors
    ///
    /// Propagates [`ShelloutError::UnknownKey`] /
    /// [`ShelloutError::InvalidValue`] from the overrides,
    /// [`ShelloutError::Resource`] when a stream cannot be opened, and
    /// [`ShelloutError::Spawn`] when the program cannot be launched.
    pub fn invoke<I, K, V>(
        &mut self,
        overrides: I,
        spec: InvokeSpec,
    ) -> Result<Invocation, ShelloutError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let snapshot = self.params.clone();
        let mut scope = RestoreOnDrop {
            live: &mut self.params,
            snapshot,
        };
        scope.live.update(overrides)?;

        let mut args = self.base_args.clone();
        args.extend(scope.live.to_tokens());
        debug!(
            program = %self.program,
            command = %render_line(&self.program, &args),
            "invoking external command"
        );

        let stdin = resolve_stdin(spec.stdin)?;
        let (child_out, stdout) = resolve_sink(spec.stdout)?;
        let (child_err, stderr) = resolve_sink(spec.stderr)?;

        let mut command = Command::new(&self.program);
        command.args(&args).stdin(stdin).stdout(child_out).stderr(child_err);
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }

        let status = command
            .status()
            .map_err(|source| ShelloutError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        debug!(code = status.code().unwrap_or(-1), "external command finished");

        Ok(Invocation {
            status,
            stdout,
            stderr,
        })
        // `scope` drops here (and on every `?` above), restoring the
        // pre-invocation parameters.
    }

    /// Runs the external process once with no overrides; see
    /// [`invoke`](Self::invoke).
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::Resource`] when a stream cannot be
    /// opened and [`ShelloutError::Spawn`] when the program cannot be
    /// launched.
    pub fn run(&mut self, spec: InvokeSpec) -> Result<Invocation, ShelloutError> {
        self.invoke(std::iter::empty::<(&str, Value)>(), spec)
    }
}

/// Renders the live command line.
impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Restores a [`Parameters`] snapshot when dropped, whatever the exit
/// path.
struct RestoreOnDrop<'a> {
    live: &'a mut Parameters,
    snapshot: Parameters,
}

impl Drop for RestoreOnDrop<'_> {
    fn drop(&mut self) {
        std::mem::swap(self.live, &mut self.snapshot);
    }
}

fn render_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_owned();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

fn anonymous_resource(source: std::io::Error) -> ShelloutError {
    ShelloutError::Resource {
        path: Utf8PathBuf::new(),
        source,
    }
}

fn path_resource(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> ShelloutError {
    let path = path.to_owned();
    move |source| ShelloutError::Resource { path, source }
}

fn resolve_stdin(source: StdinSource) -> Result<Stdio, ShelloutError> {
    match source {
        StdinSource::Null => Ok(Stdio::null()),
        StdinSource::Inherit => Ok(Stdio::inherit()),
        StdinSource::Path(path) => {
            let file = File::open(&path).map_err(path_resource(&path))?;
            Ok(Stdio::from(file))
        }
        StdinSource::Handle(file) => Ok(Stdio::from(file)),
    }
}

fn resolve_sink(sink: OutputSink) -> Result<(Stdio, OutputHandle), ShelloutError> {
    match sink {
        OutputSink::Capture => {
            let file = tempfile::tempfile().map_err(anonymous_resource)?;
            let child_end = file.try_clone().map_err(anonymous_resource)?;
            Ok((Stdio::from(child_end), OutputHandle::File(file)))
        }
        OutputSink::Path(path) => {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(&path)
                .map_err(path_resource(&path))?;
            let child_end = file.try_clone().map_err(path_resource(&path))?;
            Ok((Stdio::from(child_end), OutputHandle::File(file)))
        }
        OutputSink::Discard => Ok((Stdio::null(), OutputHandle::Discarded)),
    }
}
