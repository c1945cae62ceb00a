//! Tests for `keyref set/get/rm/list`.

use crate::support::*;

#[test]
fn test_set_and_get_roundtrip() {
    let t = Test::init("myapp");
    assert_roundtrip(&t, "secrets/api_key", "sk-123");
}

#[test]
fn test_set_reports_backend() {
    let t = Test::init("myapp");

    let output = t.set("secrets/api_key", "sk-123");
    assert_success(&output);
    assert_stdout_contains(&output, "secrets/api_key");
    assert_stdout_contains(&output, "local");
}

#[test]
fn test_store_is_encrypted_at_rest() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);

    let store = t
        .home
        .path()
        .join(".keyref")
        .join("stores")
        .join("local.age");
    let raw = std::fs::read_to_string(store).unwrap();
    assert!(raw.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
    for (key, value) in STANDARD_SECRETS {
        assert!(!raw.contains(key));
        assert!(!raw.contains(value));
    }
}

#[test]
fn test_set_overwrites() {
    let t = Test::with_secrets("myapp", &[("secrets/token", "old")]);

    assert_success(&t.set("secrets/token", "new"));
    assert_eq!(stdout(&t.get("secrets/token")).trim_end(), "new");
}

#[test]
fn test_get_missing_key() {
    let t = Test::init("myapp");

    let output = t.get("secrets/missing");
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
}

#[test]
fn test_rm() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);

    assert_success(&t.rm("secrets/api_key"));
    assert_failure(&t.get("secrets/api_key"));
    assert_success(&t.get("secrets/jwt_secret"));

    let output = t.rm("secrets/api_key");
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
}

#[test]
fn test_list() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);

    let output = t.list();
    assert_success(&output);
    assert_stdout_contains(&output, "3 secrets in local (myapp)");
    assert_stdout_contains(&output, "─────");
    for (key, value) in STANDARD_SECRETS {
        assert_stdout_contains(&output, &format!("• {}", key));
        assert_stdout_excludes(&output, value);
    }
}

#[test]
fn test_list_json() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);

    let output = t.cmd().args(["list", "--json"]).output().unwrap();
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["count"], 3);
    assert_eq!(json["backend"], "local");
    assert_eq!(json["namespace"], "myapp");
    assert_eq!(
        json["keys"],
        serde_json::json!([
            "secrets/api_key",
            "secrets/database_url",
            "secrets/jwt_secret"
        ])
    );
}

#[test]
fn test_list_empty() {
    let t = Test::init("myapp");

    let output = t.list();
    assert_success(&output);
    assert_stdout_contains(&output, "no secrets");
}

#[test]
fn test_projects_sharing_a_store_are_isolated() {
    let t = Test::with_secrets("alpha", &[("secrets/api_key", "alpha-key")]);

    t.write_config(
        "beta",
        "[[backends]]\nname = \"local\"\ntype = \"file\"\n",
    );
    assert_success(&t.set("secrets/api_key", "beta-key"));

    assert_eq!(stdout(&t.get("secrets/api_key")).trim_end(), "beta-key");
    let output = t.list();
    assert_stdout_contains(&output, "1 secrets");

    t.write_config(
        "alpha",
        "[[backends]]\nname = \"local\"\ntype = \"file\"\n",
    );
    assert_eq!(stdout(&t.get("secrets/api_key")).trim_end(), "alpha-key");
}

#[test]
fn test_profile_namespace_and_fallback() {
    let t = Test::with_secrets("myapp", &[("secrets/db", "project-db"), ("secrets/shared", "shared")]);

    let output = t
        .cmd()
        .args(["set", "secrets/db", "prod-db", "--profile", "prod"])
        .output()
        .unwrap();
    assert_success(&output);

    let get = |profile: Option<&str>, key: &str| {
        let mut cmd = t.cmd();
        cmd.args(["get", key]);
        if let Some(profile) = profile {
            cmd.args(["--profile", profile]);
        }
        cmd.output().unwrap()
    };

    assert_eq!(stdout(&get(Some("prod"), "secrets/db")).trim_end(), "prod-db");
    assert_eq!(stdout(&get(None, "secrets/db")).trim_end(), "project-db");
    assert_eq!(stdout(&get(Some("prod"), "secrets/shared")).trim_end(), "shared");
}

#[test]
fn test_profile_from_environment() {
    let t = Test::init("myapp");

    let output = t
        .cmd()
        .env("KEYREF_PROFILE", "staging")
        .args(["set", "secrets/token", "staging-token"])
        .output()
        .unwrap();
    assert_success(&output);

    let output = t
        .cmd()
        .args(["list", "--profile", "staging", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["namespace"], "myapp/staging");
    assert_eq!(json["keys"], serde_json::json!(["secrets/token"]));
}

#[test]
fn test_named_backend() {
    let t = Test::init("myapp");
    t.write_config(
        "myapp",
        &format!(
            "[[backends]]\nname = \"first\"\ntype = \"file\"\n[backends.config]\npath = \"{}\"\n\n\
             [[backends]]\nname = \"second\"\ntype = \"file\"\n[backends.config]\npath = \"{}\"\n",
            t.store_path("first"),
            t.store_path("second")
        ),
    );

    assert_success(&t.set_in("second", "secrets/api_key", "sk-second"));
    assert!(!std::path::Path::new(&t.store_path("first")).exists());
    assert!(std::path::Path::new(&t.store_path("second")).exists());

    // get without --backend searches in order
    assert_eq!(stdout(&t.get("secrets/api_key")).trim_end(), "sk-second");

    let output = t.set_in("third", "secrets/api_key", "x");
    assert_failure(&output);
    assert_stderr_contains(&output, "backend not configured: third");
}

#[test]
fn test_invalid_keys_rejected() {
    let t = Test::init("myapp");

    for key in ["", "has space", "/leading", "trailing/", "a//b", "key=value"] {
        let output = t.set(key, "value");
        assert_failure(&output);
    }
}

#[test]
fn test_empty_value_rejected() {
    let t = Test::init("myapp");

    let output = t.set("secrets/empty", "");
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot be empty");
}

#[test]
fn test_env_backend_is_read_only() {
    let t = Test::init("myapp");
    t.write_config("myapp", "[[backends]]\nname = \"ci\"\ntype = \"env\"\n");

    let output = t.set("secrets/api_key", "x");
    assert_failure(&output);
    assert_stderr_contains(&output, "read-only");

    let output = t
        .cmd()
        .env("MYAPP_SECRETS_API_KEY", "from-env")
        .args(["get", "secrets/api_key"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end(), "from-env");
}
