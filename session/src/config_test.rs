use super::*;

/// # Safety
/// Tests touching process env use unique keys or restore them afterwards.
unsafe fn clear_session_env() {
    unsafe {
        std::env::remove_var("NEWSDESK_BACKEND_URL");
        std::env::remove_var("NEWSDESK_TOKEN_FILE");
        std::env::remove_var("NEWSDESK_VERIFY_TIMEOUT_SECS");
        std::env::remove_var("NEWSDESK_REQUEST_TIMEOUT_SECS");
    }
}

// =============================================================
// helpers
// =============================================================

#[test]
fn normalize_base_url_trims_trailing_slashes() {
    assert_eq!(normalize_base_url("http://api.local:5000//"), "http://api.local:5000");
    assert_eq!(normalize_base_url("  http://api.local  "), "http://api.local");
}

#[test]
fn default_token_file_under_home() {
    assert_eq!(
        default_token_file(Some("/home/ed")),
        PathBuf::from("/home/ed/.newsdesk/auth_token")
    );
}

#[test]
fn default_token_file_without_home_is_relative() {
    assert_eq!(default_token_file(None), PathBuf::from(".newsdesk/auth_token"));
    assert_eq!(default_token_file(Some("")), PathBuf::from(".newsdesk/auth_token"));
}

#[test]
fn env_parse_u64_invalid_falls_back() {
    let key = "__TEST_NEWSDESK_U64_INVALID_417__";
    unsafe { std::env::set_var(key, "soon") };
    assert_eq!(env_parse_u64(key, 7), 7);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_u64_unset_falls_back() {
    assert_eq!(env_parse_u64("__TEST_NEWSDESK_SURELY_UNSET_88__", 3), 3);
}

#[test]
fn env_parse_u64_zero_falls_back() {
    let key = "__TEST_NEWSDESK_U64_ZERO_418__";
    unsafe { std::env::set_var(key, "0") };
    assert_eq!(env_parse_u64(key, 10), 10);
    unsafe { std::env::set_var(key, " 4 ") };
    assert_eq!(env_parse_u64(key, 10), 4);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn new_trims_trailing_slash() {
    let cfg = SessionConfig::new("http://localhost:5000/");
    assert_eq!(cfg.backend_url, "http://localhost:5000");
}

// =============================================================
// from_env
// =============================================================

#[test]
fn from_env_reads_overrides_and_defaults() {
    unsafe {
        clear_session_env();
        std::env::set_var("NEWSDESK_BACKEND_URL", "https://cms.example.com/");
        std::env::set_var("NEWSDESK_TOKEN_FILE", "/tmp/newsdesk-token");
        std::env::set_var("NEWSDESK_VERIFY_TIMEOUT_SECS", "3");
        std::env::set_var("NEWSDESK_REQUEST_TIMEOUT_SECS", "0");
    }

    let cfg = SessionConfig::from_env();
    assert_eq!(cfg.backend_url, "https://cms.example.com");
    assert_eq!(cfg.token_file, PathBuf::from("/tmp/newsdesk-token"));
    assert_eq!(cfg.timeouts.verify_secs, 3);
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

    unsafe { clear_session_env() };
    let cfg = SessionConfig::from_env();
    assert_eq!(cfg.backend_url, DEFAULT_BACKEND_URL);
    assert_eq!(cfg.timeouts, SessionTimeouts::default());
}
