use super::*;

#[test]
fn defaults_match_installed_layout() {
    let cfg = ClockConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.frame_path(10), PathBuf::from("images/clock0010.png"));
    assert_eq!(cfg.frame_path(19), PathBuf::from("images/clock0019.png"));
    assert_eq!(cfg.frame_pattern(), PathBuf::from("images/clock%04d.png"));
    assert_eq!(cfg.segment_path(0), PathBuf::from("movies/clock_0.mp4"));
    assert_eq!(cfg.segment_path(2), PathBuf::from("movies/clock_2.mp4"));
    assert_eq!(cfg.bus_addr.to_string(), "127.0.0.1:9999");
    assert_eq!(cfg.pivot, Point::new(502.0, 455.0));
}

#[test]
fn frame_indices_cover_one_segment() {
    let cfg = ClockConfig::default();
    let idx: Vec<u32> = cfg.frame_indices().collect();
    assert_eq!(idx, (10..20).collect::<Vec<_>>());
    assert_eq!(cfg.lookahead(), chrono::TimeDelta::seconds(10));
}

#[test]
fn rooted_at_moves_filesystem_paths_only() {
    let cfg = ClockConfig::rooted_at("/srv/clock");
    assert_eq!(cfg.assets.hour_hand, PathBuf::from("/srv/clock/clock/hour.png"));
    assert_eq!(cfg.frames_dir, PathBuf::from("/srv/clock/images"));
    assert_eq!(cfg.segment_path(1), PathBuf::from("/srv/clock/movies/clock_1.mp4"));
    assert_eq!(cfg.player_socket, PathBuf::from("/tmp/mpvsocket"));
    assert_eq!(cfg.encoder_program, PathBuf::from("/usr/bin/ffmpeg"));
}

#[test]
fn validation_catches_bad_values() {
    let mut cfg = ClockConfig::default();
    cfg.slot_count = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = ClockConfig::default();
    cfg.segment_secs = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = ClockConfig::default();
    cfg.wait_fine = Duration::ZERO;
    assert!(cfg.validate().is_err());

    let mut cfg = ClockConfig::default();
    cfg.encoder_program = PathBuf::new();
    assert!(cfg.validate().is_err());
}
