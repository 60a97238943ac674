use super::*;
use crate::config::LibrarySettings;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn t(id: &str, title: &str, artist: &str, album: &str) -> Track {
    Track {
        id: TrackId::new(id),
        title: title.into(),
        artist: artist.into(),
        album: album.into(),
        duration: None,
        media: format!("{id}.mp3"),
        cover_art: None,
    }
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"not real audio").unwrap();
}

#[test]
fn make_display_prefers_artist_dash_title() {
    assert_eq!(make_display("Song", Some("Artist")), "Artist - Song");
    assert_eq!(make_display("Song", Some("  Artist  ")), "Artist - Song");
    assert_eq!(make_display("Song", None), "Song");
    assert_eq!(make_display("Song", Some("   ")), "Song");
}

#[test]
fn search_matches_title_artist_or_album_case_insensitively() {
    let tracks = vec![
        t("1", "Paranoid", "Black Sabbath", "Paranoid"),
        t("2", "Blackened", "Metallica", "...And Justice for All"),
        t("3", "Teardrop", "Massive Attack", "Mezzanine"),
    ];

    let hits = filter_tracks(&tracks, "black").unwrap();
    let ids: Vec<&str> = hits.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);

    let hits = filter_tracks(&tracks, "  MEZZ ").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id.as_str(), "3");

    assert!(filter_tracks(&tracks, "polka").unwrap().is_empty());
}

#[test]
fn blank_search_is_rejected() {
    let tracks = vec![t("1", "A", "B", "C")];
    assert!(matches!(
        filter_tracks(&tracks, "   "),
        Err(CatalogError::EmptyQuery)
    ));
    assert!(matches!(normalize_query(""), Err(CatalogError::EmptyQuery)));
}

#[test]
fn local_catalog_rejects_missing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = LocalCatalog::open(&missing, &LibrarySettings::default())
        .err()
        .unwrap();
    match err {
        CatalogError::Io { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn local_catalog_rejects_a_file_as_root() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "song.mp3");
    let err = LocalCatalog::open(&dir.path().join("song.mp3"), &LibrarySettings::default())
        .err()
        .unwrap();
    assert!(matches!(err, CatalogError::NotADirectory(_)));
}

#[test]
fn locators_join_components_with_slashes() {
    let root = Path::new("/music");
    assert_eq!(
        local::relative_locator(root, Path::new("/music/Road Trip/a.mp3")).as_deref(),
        Some("Road Trip/a.mp3")
    );
    assert_eq!(local::relative_locator(root, Path::new("/music")), None);
    assert_eq!(local::relative_locator(root, Path::new("/elsewhere/a.mp3")), None);
}

#[cfg(unix)]
#[test]
fn non_utf8_components_yield_no_locator() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let root = Path::new("/music");
    let path = root
        .join("x")
        .join(OsStr::from_bytes(b"bad\xff"))
        .join("a.mp3");
    assert_eq!(local::relative_locator(root, &path), None);
}

#[test]
fn local_catalog_indexes_audio_files_with_relative_locators() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "b.MP3");
    touch(dir.path(), "A.ogg");
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "Road Trip/c.flac");

    let catalog = LocalCatalog::open(dir.path(), &LibrarySettings::default()).unwrap();
    let tracks = catalog.all_tracks().unwrap();

    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "b", "c"]);

    let nested = &tracks[2];
    assert_eq!(nested.media, "Road Trip/c.flac");
    assert_eq!(nested.id.as_str(), "Road Trip/c.flac");
    assert_eq!(catalog.root(), dir.path());
}

#[test]
fn local_catalog_skips_hidden_and_respects_recursion() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "top.mp3");
    touch(dir.path(), ".hidden.mp3");
    touch(dir.path(), "sub/deep.mp3");

    let settings = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    let catalog = LocalCatalog::open(dir.path(), &settings).unwrap();
    let tracks = catalog.all_tracks().unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].media, "top.mp3");
}

#[test]
fn subdirectories_become_playlists() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "loose.mp3");
    touch(dir.path(), "Chill/one.mp3");
    touch(dir.path(), "Chill/two.mp3");
    touch(dir.path(), "Workout/fast.mp3");

    let catalog = LocalCatalog::open(dir.path(), &LibrarySettings::default()).unwrap();

    let playlists = catalog.playlists().unwrap();
    let names: Vec<&str> = playlists.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Chill", "Workout"]);

    let chill = catalog.playlist("Chill").unwrap();
    let titles: Vec<&str> = chill.tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "two"]);

    assert!(matches!(
        catalog.playlist("Jazz"),
        Err(CatalogError::PlaylistNotFound(id)) if id == "Jazz"
    ));
}

#[test]
fn local_catalog_search_uses_shared_matching() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "Sunrise.mp3");
    touch(dir.path(), "Sunset.mp3");
    touch(dir.path(), "Midnight.mp3");

    let catalog = LocalCatalog::open(dir.path(), &LibrarySettings::default()).unwrap();
    let hits = catalog.search("sun").unwrap();
    assert_eq!(hits.len(), 2);
    assert!(catalog.search(" ").is_err());
}
