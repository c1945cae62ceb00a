//! Output checks for keyref invocations.

use std::process::Output;

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn streams(output: &Output) -> String {
    format!(
        "status: {}\n--- stdout\n{}--- stderr\n{}",
        output.status,
        text(&output.stdout),
        text(&output.stderr)
    )
}

pub fn stdout(output: &Output) -> String {
    text(&output.stdout)
}

pub fn stderr(output: &Output) -> String {
    text(&output.stderr)
}

pub fn assert_success(output: &Output) {
    assert!(output.status.success(), "keyref failed\n{}", streams(output));
}

pub fn assert_failure(output: &Output) {
    assert!(!output.status.success(), "keyref succeeded\n{}", streams(output));
}

pub fn assert_stdout_contains(output: &Output, needle: &str) {
    assert!(stdout(output).contains(needle), "no {:?} on stdout\n{}", needle, streams(output));
}

pub fn assert_stderr_contains(output: &Output, needle: &str) {
    assert!(stderr(output).contains(needle), "no {:?} on stderr\n{}", needle, streams(output));
}

/// Secret values and log lines must never reach stdout.
pub fn assert_stdout_excludes(output: &Output, needle: &str) {
    assert!(!stdout(output).contains(needle), "{:?} leaked to stdout\n{}", needle, streams(output));
}

/// `set` followed by `get` returns the value verbatim.
pub fn assert_roundtrip(t: &super::Test, key: &str, value: &str) {
    assert_success(&t.set(key, value));
    let got = t.get(key);
    assert_success(&got);
    assert_eq!(stdout(&got).trim_end(), value, "value for {} changed", key);
}
