//! Tests for `keyref run`.

use crate::support::*;

#[cfg(unix)]
#[test]
fn test_run_injects_resolved_env() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);
    t.write(".env", SAMPLE_ENV);

    let output = t
        .cmd()
        .args(["run", "--", "sh", "-c", "echo \"$API_KEY|$PORT\""])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end(), "sk-test-12345|8080");
}

#[cfg(unix)]
#[test]
fn test_run_keeps_parent_environment() {
    let t = Test::init("myapp");
    t.write(".env", "A=1\n");

    let output = t
        .cmd()
        .env("FROM_PARENT", "inherited")
        .args(["run", "--", "sh", "-c", "echo \"$FROM_PARENT $A\""])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end(), "inherited 1");
}

#[cfg(unix)]
#[test]
fn test_run_propagates_exit_code() {
    let t = Test::init("myapp");
    t.write(".env", "A=1\n");

    let output = t
        .cmd()
        .args(["run", "--", "sh", "-c", "exit 7"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

#[cfg(unix)]
#[test]
fn test_run_with_profile() {
    let t = Test::init("myapp");
    t.write(".env", "STAGE=dev\n");
    t.write(".env.staging", "STAGE=staging\n");

    let output = t
        .cmd()
        .args(["run", "--profile", "staging", "--", "sh", "-c", "echo $STAGE"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end(), "staging");
}

#[test]
fn test_run_strict_does_not_spawn() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);
    t.write(".env", "A=ref://secrets/missing\nB=ref://secrets/api_key\n");
    let marker = t.path("spawned");

    let output = t
        .cmd()
        .args(["run", "--strict", "--", "touch"])
        .arg(&marker)
        .output()
        .unwrap();
    assert_failure(&output);
    assert!(!marker.exists());
}

#[test]
fn test_run_unknown_program() {
    let t = Test::init("myapp");
    t.write(".env", "A=1\n");

    let output = t
        .cmd()
        .args(["run", "--", "definitely-not-a-real-program-keyref"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to run");
}

#[test]
fn test_run_requires_command() {
    let t = Test::init("myapp");

    let output = t.cmd().arg("run").output().unwrap();
    assert_failure(&output);
}
