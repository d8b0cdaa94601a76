use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(ClockError::config("x").to_string().contains("config error:"));
    assert!(ClockError::asset("x").to_string().contains("asset error:"));
    assert!(ClockError::render("x").to_string().contains("render error:"));
    assert!(
        ClockError::encode(Some(1), "x")
            .to_string()
            .contains("encode error:")
    );
    assert!(ClockError::player("x").to_string().contains("player error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ClockError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn encoder_failures_are_never_fatal() {
    assert!(!ClockError::encode(Some(1), "exit 1").is_fatal_at_startup());
    assert!(!ClockError::render("disk full").is_fatal_at_startup());
    assert!(ClockError::asset("missing").is_fatal_at_startup());
    assert!(ClockError::player("no socket").is_fatal_at_startup());
}
