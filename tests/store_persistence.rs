// ABOUTME: E2E tests for the session store's durable behavior across restarts.
// ABOUTME: Exercises write-through, corruption recovery, and auth pair handling on real files.

use std::fs;
use std::path::Path;

use codedeck::session::store::{
    AuthUser, ChatMessage, DebugProblem, DebugUpdate, ExecutionUpdate, Sender, SessionStore,
    SnippetUpdate, Tool,
};
use codedeck::session::FileStorage;

fn open_store(dir: &Path) -> SessionStore {
    SessionStore::open(FileStorage::open(dir).unwrap()).unwrap()
}

fn sample_user() -> AuthUser {
    AuthUser {
        id: 7,
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
    }
}

fn sample_problem() -> DebugProblem {
    DebugProblem {
        id: 3,
        title: "Off by one".to_string(),
        description: "The loop stops early.".to_string(),
        language: "python".to_string(),
        code_with_error: "for i in range(2): print(i)".to_string(),
        solution_code: None,
    }
}

/// Everything persisted by one process must be visible to the next,
/// except the chat transcript, which resets with the process.
#[test]
fn state_survives_a_restart_but_chat_does_not() {
    let tmp = tempfile::tempdir().unwrap();

    {
        let mut store = open_store(tmp.path());
        store
            .set_auth(Some("tok-123".to_string()), Some(sample_user()))
            .unwrap();
        store
            .update_execution(ExecutionUpdate {
                code: Some("console.log(1 + 1);".to_string()),
                stdin: Some("ignored".to_string()),
                ..Default::default()
            })
            .unwrap();
        store
            .update_snippet(SnippetUpdate {
                code: Some("System.out.println(42);".to_string()),
                ..Default::default()
            })
            .unwrap();
        store
            .update_debug(DebugUpdate {
                user_code: Some("print(6)".to_string()),
                selected_problem: Some(Some(sample_problem())),
                ..Default::default()
            })
            .unwrap();
        store.append_chat_message(ChatMessage {
            text: "remember me?".to_string(),
            sender: Sender::User,
        });
    }

    let store = open_store(tmp.path());
    assert!(store.is_logged_in());
    assert_eq!(store.auth().token.as_deref(), Some("tok-123"));
    assert_eq!(store.auth().user.as_ref().unwrap().username, "ada");
    assert_eq!(store.execution().code, "console.log(1 + 1);");
    assert_eq!(store.execution().stdin, "ignored");
    assert_eq!(store.snippet().code, "System.out.println(42);");
    assert_eq!(store.debug().user_code, "print(6)");
    assert_eq!(
        store.debug().selected_problem.as_ref().unwrap().title,
        "Off by one"
    );
    assert!(store.chat().is_empty(), "the transcript must not persist");
    assert!(store.recovery_notes().is_empty());
}

/// The token is stored as the raw string, not JSON-wrapped.
#[test]
fn auth_token_is_stored_raw() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = open_store(tmp.path());
    store
        .set_auth(Some("raw-token".to_string()), Some(sample_user()))
        .unwrap();

    let on_disk = fs::read_to_string(tmp.path().join("authToken")).unwrap();
    assert_eq!(on_disk, "raw-token");
}

/// A corrupt workspace record recovers to the hardcoded default and is
/// reported, without disturbing the other records.
#[test]
fn corrupt_workspace_recovers_to_default() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut store = open_store(tmp.path());
        store
            .update_snippet(SnippetUpdate {
                code: Some("kept".to_string()),
                ..Default::default()
            })
            .unwrap();
    }
    fs::write(tmp.path().join("codeSolveState"), "{not json").unwrap();

    let store = open_store(tmp.path());
    assert_eq!(store.execution().code, "console.log('Hello World');");
    assert_eq!(store.execution().language_name, "JavaScript");
    assert_eq!(store.snippet().code, "kept");
    assert!(
        store
            .recovery_notes()
            .iter()
            .any(|n| n.contains("codeSolveState")),
        "recovery should be reported, got: {:?}",
        store.recovery_notes(),
    );
}

/// A record written by an older version that lacks newer fields keeps its
/// stored fields and takes the rest from the default.
#[test]
fn partial_stored_record_merges_with_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("codeSolveState"),
        r#"{"code":"old work","languageName":"Python"}"#,
    )
    .unwrap();

    let store = open_store(tmp.path());
    assert_eq!(store.execution().code, "old work");
    assert_eq!(store.execution().language_name, "Python");
    assert_eq!(store.execution().output, "");
    assert_eq!(store.execution().stdin, "");
    assert!(store.recovery_notes().is_empty());
}

/// Extra fields written by a newer version are ignored rather than fatal.
#[test]
fn unknown_fields_in_stored_record_are_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("clickToCodeState"),
        r#"{"code":"x","activeLanguage":"python","output":"","stdin":"","theme":"dark"}"#,
    )
    .unwrap();

    let store = open_store(tmp.path());
    assert_eq!(store.snippet().code, "x");
    assert_eq!(store.snippet().active_language, "python");
}

/// A token without a user (or vice versa) is not a login; both halves are
/// scrubbed from storage so the broken pair cannot resurface.
#[test]
fn half_stored_auth_pair_is_cleared_from_disk() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("authToken"), "orphan-token").unwrap();

    let store = open_store(tmp.path());
    assert!(!store.is_logged_in());
    assert!(store.auth().token.is_none());
    assert!(!tmp.path().join("authToken").exists());
    assert!(
        store
            .recovery_notes()
            .iter()
            .any(|n| n.contains("incomplete"))
    );

    // And it stays cleared on the next start, silently.
    let store = open_store(tmp.path());
    assert!(store.recovery_notes().is_empty());
    assert!(!store.is_logged_in());
}

/// Logging out removes both halves of the pair from disk.
#[test]
fn clear_auth_removes_both_records() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = open_store(tmp.path());
    store
        .set_auth(Some("tok".to_string()), Some(sample_user()))
        .unwrap();
    store.clear_auth().unwrap();

    assert!(!tmp.path().join("authToken").exists());
    assert!(!tmp.path().join("authUser").exists());

    let store = open_store(tmp.path());
    assert!(!store.is_logged_in());
}

/// Switching language replaces the whole workspace with the new template
/// and that replacement is itself durable.
#[test]
fn language_reset_is_persisted() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut store = open_store(tmp.path());
        store
            .update_execution(ExecutionUpdate {
                code: Some("half-finished".to_string()),
                output: Some("old output".to_string()),
                ..Default::default()
            })
            .unwrap();
        store.reset_for_language(Tool::Execution, "Python").unwrap();
    }

    let store = open_store(tmp.path());
    assert_eq!(store.execution().language_name, "Python");
    assert_eq!(store.execution().code, "print('Hello World')");
    assert_eq!(store.execution().output, "");
}

/// `fresh` ignores stored state but still writes through, so old records
/// are overwritten as the user works.
#[test]
fn fresh_start_ignores_then_overwrites_stored_state() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut store = open_store(tmp.path());
        store
            .update_execution(ExecutionUpdate {
                code: Some("previous run".to_string()),
                ..Default::default()
            })
            .unwrap();
    }

    {
        let mut store = SessionStore::fresh(FileStorage::open(tmp.path()).unwrap());
        assert_eq!(store.execution().code, "console.log('Hello World');");
        store
            .update_execution(ExecutionUpdate {
                code: Some("new run".to_string()),
                ..Default::default()
            })
            .unwrap();
    }

    let store = open_store(tmp.path());
    assert_eq!(store.execution().code, "new run");
}
