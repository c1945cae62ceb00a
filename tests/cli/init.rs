//! Tests for `keyref init` and `keyref whoami`.

use crate::support::*;

#[test]
fn test_init_writes_config() {
    let t = Test::init("myapp");

    let config = t.read(".keyref.toml");
    assert!(config.contains("name = \"myapp\""));
    assert!(config.contains("name = \"local\""));
    assert!(config.contains("type = \"file\""));
    assert!(config.contains("name = \"tester\""));
    assert!(config.contains("public_key = \"age1"));
}

#[test]
fn test_init_generates_identity() {
    let t = Test::init("myapp");

    let identity = t.home.path().join(".keyref").join("identity");
    assert!(identity.exists());
    assert!(t.home.path().join(".keyref").join("identity.pub").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&identity).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}

#[test]
fn test_init_twice_fails() {
    let t = Test::init("myapp");

    let output = t.init_cmd("myapp");
    assert_failure(&output);
    assert_stderr_contains(&output, "already initialized");
}

#[test]
fn test_init_reuses_identity() {
    let t = Test::init("first");
    let before = stdout(&t.whoami());

    std::fs::remove_file(t.path(".keyref.toml")).unwrap();
    assert_success(&t.init_cmd("second"));

    assert_eq!(stdout(&t.whoami()), before);
}

#[test]
fn test_init_rejects_bad_project_name() {
    let t = Test::new();

    let output = t.init_cmd("my/app");
    assert_failure(&output);
    assert!(!t.path(".keyref.toml").exists());
}

#[test]
fn test_whoami_prints_public_key() {
    let t = Test::init("myapp");

    let output = t.whoami();
    assert_success(&output);
    let key = stdout(&output);
    assert!(key.trim().starts_with("age1"));
    assert!(t.read(".keyref.toml").contains(key.trim()));
}

#[test]
fn test_whoami_without_identity() {
    let t = Test::new();

    let output = t.whoami();
    assert_failure(&output);
    assert_stderr_contains(&output, "no identity found");
    assert_stderr_contains(&output, "keyref init");
}
