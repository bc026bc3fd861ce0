//! Validated parameter modelling and scoped invocation of external
//! command-line tools.
//!
//! `shellout` models each parameter of a wrapped executable as a
//! first-class [`Param`] with its own [`Validate`] check, collects them
//! in an ordered, dual-keyed (name/alias) [`Parameters`] container, and
//! drives the external process through a [`Tool`] controller whose
//! [`Tool::invoke`] guarantees that per-call parameter overrides are
//! rolled back once the process has finished — on every exit path.
//!
//! ```no_run
//! use shellout::{InRange, InvokeSpec, Param, Parameters, Tool, Value};
//!
//! let params = Parameters::new([
//!     Param::option("-E")?
//!         .with_validator(InRange::new(0.0, 1000.0))
//!         .with_help("report hits below this E-value"),
//!     Param::option("--noali")?.with_help("omit alignments from output"),
//!     Param::positional("cmfile"),
//!     Param::positional("seqfile"),
//! ])?;
//!
//! let mut cmscan = Tool::new("cmscan", params)
//!     .with_version("1.1.2")
//!     .with_url("http://eddylab.org/infernal");
//! cmscan.update([("cmfile", Value::from("Rfam.cm")), ("seqfile", Value::from("genome.fa"))])?;
//!
//! // `-E 20` applies to this invocation only.
//! let mut run = cmscan.invoke([("E", Value::Int(20))], InvokeSpec::default())?;
//! run.ensure_success()?;
//! let hits = run.read_stdout().unwrap_or_default();
//! # let _ = hits;
//! # Ok::<(), shellout::ShelloutError>(())
//! ```

mod error;
mod param;
mod params;
mod tool;
mod validate;
mod value;

pub use error::ShelloutError;
pub use param::Param;
pub use params::Parameters;
pub use tool::{
    Invocation, InvokeSpec, OutputHandle, OutputSink, StdinSource, Tool, check_exit_status,
};
pub use validate::{AcceptAny, InRange, OneOf, ShellQuote, Validate};
pub use value::Value;
