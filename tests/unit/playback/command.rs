use super::*;

#[test]
fn mpv_args_match_the_ipc_protocol() {
    assert_eq!(
        PlayerCommand::SetFullscreen { on: true }.to_mpv_args(),
        vec![json!("set_property"), json!("fullscreen"), json!(true)]
    );
    assert_eq!(
        PlayerCommand::SetMute { on: true }.to_mpv_args(),
        vec![json!("set_property"), json!("mute"), json!(true)]
    );
    assert_eq!(
        PlayerCommand::SetPause { paused: false }.to_mpv_args(),
        vec![json!("set_property"), json!("pause"), json!(false)]
    );
    assert_eq!(
        PlayerCommand::LoadFile {
            path: PathBuf::from("/srv/movies/clock_0.mp4"),
            mode: LoadMode::AppendPlay,
        }
        .to_mpv_args(),
        vec![
            json!("loadfile"),
            json!("/srv/movies/clock_0.mp4"),
            json!("append-play")
        ]
    );
}

#[test]
fn bus_wire_format_is_tagged_json() {
    let req = BusRequest {
        id: 7,
        command: PlayerCommand::LoadFile {
            path: PathBuf::from("/m/clock_1.mp4"),
            mode: LoadMode::AppendPlay,
        },
    };
    let text = serde_json::to_string(&req).unwrap();
    assert_eq!(
        text,
        r#"{"id":7,"command":{"cmd":"load_file","path":"/m/clock_1.mp4","mode":"append-play"}}"#
    );
    assert_eq!(serde_json::from_str::<BusRequest>(&text).unwrap(), req);
}

#[test]
fn ok_replies_omit_the_error_field() {
    assert_eq!(serde_json::to_string(&BusReply::ok(3)).unwrap(), r#"{"id":3}"#);
    let failed: BusReply = serde_json::from_str(r#"{"id":4,"error":"no player"}"#).unwrap();
    assert_eq!(failed, BusReply::failed(4, "no player"));
}
