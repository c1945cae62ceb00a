//! Tests for `keyref sync export/import`.

use crate::support::*;

const ENVELOPE: &str = ".keyref.sync.age";

fn export(t: &Test, extra: &[&str]) -> std::process::Output {
    t.cmd()
        .args(["sync", "export"])
        .args(extra)
        .output()
        .unwrap()
}

fn import(t: &Test, extra: &[&str]) -> std::process::Output {
    t.cmd()
        .args(["sync", "import"])
        .args(extra)
        .output()
        .unwrap()
}

#[test]
fn test_export_writes_armored_envelope() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);

    let output = export(&t, &[]);
    assert_success(&output);
    assert_stdout_contains(&output, "1 recipients");

    let envelope = t.read(ENVELOPE);
    assert!(envelope.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
    for (_, value) in STANDARD_SECRETS {
        assert!(!envelope.contains(value));
    }
}

#[test]
fn test_export_without_recipients_writes_nothing() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);
    t.write_config("myapp", "[[backends]]\nname = \"local\"\ntype = \"file\"\n");

    let output = export(&t, &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "at least one recipient is required");
    assert!(!t.path(ENVELOPE).exists());
}

#[test]
fn test_export_empty_namespace() {
    let t = Test::init("myapp");

    let output = export(&t, &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no secrets to export");
    assert!(!t.path(ENVELOPE).exists());
}

#[test]
fn test_roundtrip_into_another_store() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);
    assert_success(&export(&t, &[]));

    t.write_config(
        "myapp",
        &format!(
            "[[backends]]\nname = \"fresh\"\ntype = \"file\"\n[backends.config]\npath = \"{}\"\n",
            t.store_path("fresh")
        ),
    );

    let output = import(&t, &[]);
    assert_success(&output);
    assert_stdout_contains(&output, "imported 3, skipped 0");

    for (key, value) in STANDARD_SECRETS {
        assert_eq!(stdout(&t.get(key)).trim_end(), *value);
    }
}

#[test]
fn test_import_is_idempotent() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);
    assert_success(&export(&t, &[]));

    let output = import(&t, &[]);
    assert_success(&output);
    assert_stdout_contains(&output, "imported 0, skipped 3");

    let before = stdout(&t.list());
    assert_success(&import(&t, &[]));
    assert_eq!(stdout(&t.list()), before);
}

#[test]
fn test_import_force_overwrites() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);
    assert_success(&export(&t, &[]));
    assert_success(&t.set("secrets/api_key", "changed-locally"));

    assert_success(&import(&t, &[]));
    assert_eq!(stdout(&t.get("secrets/api_key")).trim_end(), "changed-locally");

    let output = import(&t, &["--force"]);
    assert_success(&output);
    assert_stdout_contains(&output, "imported 3");
    assert_eq!(stdout(&t.get("secrets/api_key")).trim_end(), "sk-test-12345");
}

#[test]
fn test_import_never_deletes() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);
    assert_success(&export(&t, &[]));
    assert_success(&t.set("secrets/local_only", "keep-me"));

    assert_success(&import(&t, &["--force"]));
    assert_eq!(stdout(&t.get("secrets/local_only")).trim_end(), "keep-me");
}

#[test]
fn test_teammate_can_decrypt() {
    let alice = Test::with_secrets("myapp", STANDARD_SECRETS);
    let bob = Test::init("myapp");
    let bob_key = stdout(&bob.whoami());

    assert_success(&alice.team_add("bob", bob_key.trim()));
    assert_success(&export(&alice, &[]));

    std::fs::copy(alice.path(ENVELOPE), bob.path(ENVELOPE)).unwrap();
    let output = import(&bob, &[]);
    assert_success(&output);
    assert_stdout_contains(&output, "imported 3");
    assert_eq!(stdout(&bob.get("secrets/api_key")).trim_end(), "sk-test-12345");
}

#[test]
fn test_non_recipient_cannot_decrypt() {
    let alice = Test::with_secrets("myapp", STANDARD_SECRETS);
    let eve = Test::init("myapp");

    assert_success(&export(&alice, &[]));
    std::fs::copy(alice.path(ENVELOPE), eve.path(ENVELOPE)).unwrap();

    let output = import(&eve, &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no matching identity");
    assert_stdout_contains(&eve.list(), "no secrets");
}

#[test]
fn test_ad_hoc_recipient() {
    let alice = Test::with_secrets("myapp", STANDARD_SECRETS);
    let carol = Test::init("myapp");
    let carol_key = stdout(&carol.whoami());

    let output = export(&alice, &["--recipient", carol_key.trim()]);
    assert_success(&output);
    assert_stdout_contains(&output, "2 recipients");

    std::fs::copy(alice.path(ENVELOPE), carol.path(ENVELOPE)).unwrap();
    assert_success(&import(&carol, &[]));
}

#[test]
fn test_explicit_identity_file() {
    let alice = Test::with_secrets("myapp", STANDARD_SECRETS);
    let bob = Test::init("myapp");
    assert_success(&export(&alice, &["--output", "shared.age"]));

    let identity = alice.home.path().join(".keyref").join("identity");
    let output = bob
        .cmd()
        .args(["sync", "import", "--input"])
        .arg(alice.path("shared.age"))
        .arg("--identity")
        .arg(&identity)
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "imported 3");
}

#[test]
fn test_export_to_stdout() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);

    let output = export(&t, &["--output", "-"]);
    assert_success(&output);
    assert!(stdout(&output).starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
    assert!(!t.path(ENVELOPE).exists());
}

#[test]
fn test_profile_export_only_contains_profile() {
    let t = Test::with_secrets("myapp", STANDARD_SECRETS);
    let output = t
        .cmd()
        .args(["set", "secrets/prod_only", "p", "--profile", "prod"])
        .output()
        .unwrap();
    assert_success(&output);

    assert_success(&export(&t, &["--profile", "prod"]));

    t.write_config(
        "myapp",
        &format!(
            "[[backends]]\nname = \"fresh\"\ntype = \"file\"\n[backends.config]\npath = \"{}\"\n",
            t.store_path("fresh")
        ),
    );
    let output = import(&t, &["--profile", "prod"]);
    assert_success(&output);
    assert_stdout_contains(&output, "imported 1, skipped 0");
}

#[test]
fn test_import_garbage() {
    let t = Test::init("myapp");
    t.write(ENVELOPE, "this is not an envelope");

    let output = import(&t, &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "malformed sync envelope");
}
