//! Process-level invocation tests against fake shell-script tools.

#![cfg(unix)]
#![allow(clippy::expect_used, reason = "test assertions")]

use camino::{Utf8Path, Utf8PathBuf};
use shellout::{
    InvokeSpec, OutputSink, Param, Parameters, ShelloutError, StdinSource, Tool, Value,
};
use tempfile::TempDir;
use test_helpers::script::fake_tool;

fn utf8(dir: &TempDir) -> &Utf8Path {
    Utf8Path::from_path(dir.path()).expect("tempdir path is utf-8")
}

/// A tool that prints its argument vector on one line.
fn echo_args(dir: &Utf8Path) -> Utf8PathBuf {
    fake_tool(dir, "echo_args", r#"printf '%s\n' "$*""#).expect("fixture script")
}

fn single_int_param(flag: &str, initial: i64) -> Parameters {
    Parameters::new([Param::option(flag)
        .expect("legal flag")
        .with_value(initial)
        .expect("ints are accepted")])
    .expect("single param")
}

#[test]
fn overrides_apply_for_one_call_and_roll_back() {
    let dir = TempDir::new().expect("tempdir");
    let script = echo_args(utf8(&dir));
    let mut tool = Tool::new(script.as_str(), single_int_param("-x", 0));

    let mut run = tool
        .invoke([("x", Value::Int(1))], InvokeSpec::default())
        .expect("invocation runs");
    assert!(run.status().success());
    assert_eq!(run.read_stdout().expect("captured stdout"), "-x 1\n");

    // The override was scoped to the call above.
    let x = tool.params().get("x").expect("known key");
    assert_eq!(x.value(), Some(&Value::Int(0)));
    assert_eq!(tool.command_tokens()[1..], [String::from("-x"), String::from("0")]);
}

#[test]
fn parameters_roll_back_even_when_the_process_fails() {
    let dir = TempDir::new().expect("tempdir");
    let script = fake_tool(utf8(&dir), "fail", "exit 1").expect("fixture script");
    let mut tool = Tool::new(script.as_str(), single_int_param("-x", 0));

    let mut run = tool
        .invoke([("x", Value::Int(9))], InvokeSpec::default())
        .expect("launch succeeds even though the tool fails");
    assert_eq!(run.status().code(), Some(1));
    assert!(run.ensure_success().is_err());

    let x = tool.params().get("x").expect("known key");
    assert_eq!(x.value(), Some(&Value::Int(0)));
}

#[test]
fn ensure_success_embeds_both_captured_streams() {
    let dir = TempDir::new().expect("tempdir");
    let script = fake_tool(
        utf8(&dir),
        "grumble",
        "echo partial\necho oops >&2\nexit 3",
    )
    .expect("fixture script");
    let mut tool = Tool::new(script.as_str(), Parameters::default());

    let mut run = tool
        .run(InvokeSpec::default())
        .expect("invocation runs");
    match run.ensure_success() {
        Err(ShelloutError::ExecutionFailed {
            status,
            stdout,
            stderr,
        }) => {
            assert_eq!(status, 3);
            assert_eq!(stdout, "partial\n");
            assert_eq!(stderr, "oops\n");
        }
        other => panic!("expected ExecutionFailed, got {other:?}"),
    }
}

#[test]
fn captured_output_reads_are_repeatable() {
    let dir = TempDir::new().expect("tempdir");
    let script = echo_args(utf8(&dir));
    let mut tool = Tool::new(script.as_str(), single_int_param("-n", 7));

    let mut run = tool
        .run(InvokeSpec::default())
        .expect("invocation runs");
    let first = run.read_stdout().expect("captured stdout");
    let second = run.read_stdout().expect("captured stdout again");
    assert_eq!(first, "-n 7\n");
    assert_eq!(first, second);
}

#[test]
fn discarded_streams_read_as_empty() {
    let dir = TempDir::new().expect("tempdir");
    let script = fake_tool(utf8(&dir), "noisy", "echo out\necho err >&2").expect("fixture script");
    let mut tool = Tool::new(script.as_str(), Parameters::default());

    let spec = InvokeSpec {
        stdout: OutputSink::Discard,
        stderr: OutputSink::Discard,
        ..InvokeSpec::default()
    };
    let mut run = tool
        .run(spec)
        .expect("invocation runs");
    assert!(run.status().success());
    assert_eq!(run.read_stdout().expect("no stream"), "");
    assert_eq!(run.read_stderr().expect("no stream"), "");
}

#[test]
fn stdin_can_come_from_a_file() {
    let dir = TempDir::new().expect("tempdir");
    let script = fake_tool(utf8(&dir), "copy", "cat").expect("fixture script");
    let input = utf8(&dir).join("input.txt");
    std::fs::write(&input, "line one\nline two\n").expect("input fixture");
    let mut tool = Tool::new(script.as_str(), Parameters::default());

    let spec = InvokeSpec {
        stdin: StdinSource::Path(input),
        ..InvokeSpec::default()
    };
    let mut run = tool
        .run(spec)
        .expect("invocation runs");
    assert_eq!(
        run.read_stdout().expect("captured stdout"),
        "line one\nline two\n"
    );
}

#[test]
fn stdout_can_go_to_a_named_file() {
    let dir = TempDir::new().expect("tempdir");
    let script = echo_args(utf8(&dir));
    let out_path = utf8(&dir).join("run.log");
    let mut tool = Tool::new(script.as_str(), single_int_param("-x", 0));

    let spec = InvokeSpec {
        stdout: OutputSink::Path(out_path.clone()),
        ..InvokeSpec::default()
    };
    let mut run = tool
        .run(spec)
        .expect("invocation runs");
    assert_eq!(
        std::fs::read_to_string(&out_path).expect("named file"),
        "-x 0\n"
    );
    // The handle reads the same content back.
    assert_eq!(run.read_stdout().expect("handle"), "-x 0\n");
}

#[test]
fn missing_stdin_file_is_a_resource_error_and_still_rolls_back() {
    let dir = TempDir::new().expect("tempdir");
    let script = echo_args(utf8(&dir));
    let mut tool = Tool::new(script.as_str(), single_int_param("-x", 0));

    let spec = InvokeSpec {
        stdin: StdinSource::Path(utf8(&dir).join("does-not-exist")),
        ..InvokeSpec::default()
    };
    let result = tool.invoke([("x", Value::Int(5))], spec);
    assert!(matches!(result, Err(ShelloutError::Resource { .. })));

    let x = tool.params().get("x").expect("known key");
    assert_eq!(x.value(), Some(&Value::Int(0)));
}

#[test]
fn child_runs_in_the_requested_working_directory() {
    let dir = TempDir::new().expect("tempdir");
    let work = TempDir::new().expect("workdir");
    let script = fake_tool(utf8(&dir), "where", "pwd").expect("fixture script");
    let mut tool = Tool::new(script.as_str(), Parameters::default());

    let spec = InvokeSpec {
        cwd: Some(utf8(&work).to_owned()),
        ..InvokeSpec::default()
    };
    let mut run = tool
        .run(spec)
        .expect("invocation runs");
    let reported = run.read_stdout().expect("captured stdout");
    let canonical = std::fs::canonicalize(work.path()).expect("canonical workdir");
    assert_eq!(reported.trim_end(), canonical.to_string_lossy());
}

#[test]
fn concurrent_callers_clone_the_tool() {
    let dir = TempDir::new().expect("tempdir");
    let script = echo_args(utf8(&dir));
    let tool = Tool::new(script.as_str(), single_int_param("-x", 0));

    let handles: Vec<_> = (1..=2i64)
        .map(|i| {
            let mut clone = tool.clone();
            std::thread::spawn(move || {
                let mut run = clone
                    .invoke([("x", Value::Int(i))], InvokeSpec::default())
                    .expect("invocation runs");
                run.read_stdout().expect("captured stdout")
            })
        })
        .collect();

    let mut outputs: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().expect("thread joins"))
        .collect();
    outputs.sort();
    assert_eq!(outputs, ["-x 1\n", "-x 2\n"]);

    // The original tool never saw any of the clones' overrides.
    let x = tool.params().get("x").expect("known key");
    assert_eq!(x.value(), Some(&Value::Int(0)));
}
