use super::*;
use crate::catalog::{Track, TrackId};

fn make_session() -> PlaybackSession {
    let track = Track {
        id: TrackId::new("test"),
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        duration: Some(Duration::from_secs(3)),
        media: "music/test.mp3".to_string(),
        cover_art: None,
    };
    PlaybackSession {
        current_track: Some(track.clone()),
        queue: vec![track.clone(), track].into(),
        current_index: 1,
        is_playing: true,
        position: Duration::from_millis(1_500),
        duration: Some(Duration::from_micros(1_234_567)),
        volume: 0.5,
    }
}

fn iface() -> (PlayerIface, Receiver<crate::player::ControlCmd>) {
    let (remote, rx) = PlayerRemote::channel();
    let iface = PlayerIface {
        remote,
        state: Arc::new(Mutex::new(SharedState::default())),
    };
    (iface, rx)
}

#[test]
fn update_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    handle.update(&make_session());
    {
        let s = state.lock().unwrap();
        assert_eq!(s.status, Status::Playing);
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert_eq!(s.url.as_deref(), Some("music/test.mp3"));
        // The engine-reported duration wins over the catalog value.
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(s.position_micros, 1_500_000);
        assert_eq!(s.volume, 0.5);
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/1")
        );
    }

    handle.update(&PlaybackSession::default());
    {
        let s = state.lock().unwrap();
        assert_eq!(s.status, Status::Stopped);
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn playback_status_maps_session_to_mpris_strings() {
    let (iface, _rx) = iface();
    let handle = MprisHandle {
        state: iface.state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");

    let mut session = make_session();
    handle.update(&session);
    assert_eq!(iface.playback_status(), "Playing");

    session.is_playing = false;
    handle.update(&session);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (iface, _rx) = iface();
    let handle = MprisHandle {
        state: iface.state.clone(),
    };
    handle.update(&make_session());

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn bus_methods_become_player_commands() {
    let (iface, rx) = iface();
    iface.play_pause();
    iface.next();
    iface.stop();

    let cmds: Vec<String> = rx.try_iter().map(|c| format!("{c:?}")).collect();
    assert_eq!(
        cmds,
        vec![
            "Player(TogglePlayPause)".to_string(),
            "Player(Next)".to_string(),
            "Player(Pause)".to_string(),
        ]
    );
}

#[test]
fn relative_seek_is_resolved_against_current_position() {
    let (iface, rx) = iface();
    iface.state.lock().unwrap().position_micros = 10_000_000;

    iface.seek(-2_500_000);
    match rx.try_recv().unwrap() {
        crate::player::ControlCmd::Player(PlayerCmd::Seek(secs)) => {
            assert!((secs - 7.5).abs() < 1e-9)
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
