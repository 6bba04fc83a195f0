use super::*;

fn sample_user() -> User {
    User {
        id: 1,
        username: "testuser".into(),
        email: "t@test.com".into(),
        first_name: Some("Test".into()),
        last_name: None,
        created_at: None,
        last_login: None,
        is_active: Some(true),
        is_verified: None,
    }
}

// =============================================================================
// load
// =============================================================================

#[test]
fn load_from_missing_dir_is_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path().join("never-created"));
    let session = file.load();
    assert_eq!(session, Session::default());
    assert!(!session.is_authenticated());
}

#[test]
fn load_ignores_empty_token_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("access_token"), "   \n").unwrap();
    let file = SessionFile::new(dir.path());
    assert!(file.load().access_token.is_none());
}

#[test]
fn load_ignores_corrupt_user_record_but_keeps_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path());
    file.save_tokens("tok", "ref").unwrap();
    std::fs::write(dir.path().join("user.json"), "{not json").unwrap();

    let session = file.load();
    assert_eq!(session.access_token.as_deref(), Some("tok"));
    assert_eq!(session.refresh_token.as_deref(), Some("ref"));
    assert!(session.user.is_none());
}

// =============================================================================
// save / round trip
// =============================================================================

#[test]
fn tokens_round_trip_exact_strings() {
    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path());
    file.save_tokens("tok", "ref").unwrap();

    let session = file.load();
    assert_eq!(session.access_token.as_deref(), Some("tok"));
    assert_eq!(session.refresh_token.as_deref(), Some("ref"));
    assert!(session.is_authenticated());
}

#[test]
fn user_round_trips_all_fields() {
    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path());
    file.save_user(&sample_user()).unwrap();

    assert_eq!(file.load().user, Some(sample_user()));
}

#[test]
fn save_creates_nested_state_dir() {
    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path().join("a").join("b"));
    file.save_tokens("tok", "ref").unwrap();
    assert_eq!(file.load().access_token.as_deref(), Some("tok"));
}

#[test]
fn save_overwrites_previous_values() {
    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path());
    file.save_tokens("old-a", "old-r").unwrap();
    file.save_tokens("new-a", "new-r").unwrap();

    let session = file.load();
    assert_eq!(session.access_token.as_deref(), Some("new-a"));
    assert_eq!(session.refresh_token.as_deref(), Some("new-r"));
}

// =============================================================================
// clear
// =============================================================================

#[test]
fn clear_removes_all_three_values() {
    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path());
    file.save_tokens("tok", "ref").unwrap();
    file.save_user(&sample_user()).unwrap();

    file.clear().unwrap();
    assert_eq!(file.load(), Session::default());
}

#[test]
fn clear_on_empty_dir_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path());
    file.clear().unwrap();
}

#[test]
fn clear_on_missing_dir_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path().join("never-created"));
    file.clear().unwrap();
}
