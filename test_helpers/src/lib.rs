//! Test helpers shared across crates.
//!
//! This crate currently provides fake executable fixtures for
//! process-level tests.

pub mod script {
    //! Helpers for creating small executable shell scripts.
    //!
    //! Process-level tests need a predictable external program to wrap.
    //! [`fake_tool`] writes a `#!/bin/sh` script with a caller-supplied
    //! body into a caller-owned directory (typically a `tempfile`
    //! tempdir, so the script disappears with the directory).
    //!
    //! # Examples
    //!
    //! ```no_run
    //! use camino::Utf8Path;
    //! use shellout_test_helpers::script;
    //!
    //! let dir = Utf8Path::new("/tmp/fixtures");
    //! let tool = script::fake_tool(dir, "echo_args", r#"echo "$@""#)?;
    //! assert!(tool.as_str().ends_with("echo_args"));
    //! # Ok::<(), anyhow::Error>(())
    //! ```

    use std::fs;

    use anyhow::{Context, Result};
    use camino::{Utf8Path, Utf8PathBuf};

    /// Writes an executable `#!/bin/sh` script named `name` into `dir`
    /// and returns its path.
    ///
    /// On non-Unix platforms the script is written but not marked
    /// executable; tests that spawn it are gated on `cfg(unix)`.
    ///
    /// # Errors
    ///
    /// Returns an error when the script cannot be written or marked
    /// executable.
    pub fn fake_tool(dir: &Utf8Path, name: &str, body: &str) -> Result<Utf8PathBuf> {
        let path = dir.join(name);
        let contents = format!("#!/bin/sh\n{body}\n");
        fs::write(&path, contents).with_context(|| format!("writing fake tool {path}"))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .with_context(|| format!("marking {path} executable"))?;
        }
        Ok(path)
    }
}
