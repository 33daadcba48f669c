use std::{fs, path::Path};

use id3::{Tag, TagLike, Version};
use vksync::sync::{TagError, TrackTags, rewrite_tags};
use vksync::types::Track;

// A couple of silent MPEG-1 Layer III frames (128 kbit/s, 44.1 kHz)
fn write_test_mp3(path: &Path) {
    let mut frame = vec![0xFF, 0xFB, 0x90, 0x64];
    frame.resize(417, 0);
    let mut data = frame.clone();
    data.extend_from_slice(&frame);
    fs::write(path, data).unwrap();
}

fn create_test_tags() -> TrackTags {
    TrackTags {
        album: "vkMusic".to_string(),
        title: "Don't Stop".to_string(),
        artist: "Simon & Garfunkel".to_string(),
        album_artist: "vkMusic".to_string(),
    }
}

#[test]
fn test_rewrite_tags_without_existing_tag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("0000_1.mp3");
    write_test_mp3(&path);

    rewrite_tags(&path, &create_test_tags()).unwrap();

    let tag = Tag::read_from_path(&path).unwrap();
    assert_eq!(tag.frames().count(), 4);
    assert_eq!(tag.album(), Some("vkMusic"));
    assert_eq!(tag.title(), Some("Don't Stop"));
    assert_eq!(tag.artist(), Some("Simon & Garfunkel"));
    assert_eq!(tag.album_artist(), Some("vkMusic"));
}

#[test]
fn test_rewrite_tags_drops_previous_frames() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("0000_1.mp3");
    write_test_mp3(&path);

    let mut old = Tag::new();
    old.set_title("Old title");
    old.set_genre("Rock");
    old.set_year(1999);
    old.set_text("TCOM", "Someone");
    old.write_to_path(&path, Version::Id3v23).unwrap();

    rewrite_tags(&path, &create_test_tags()).unwrap();

    let tag = Tag::read_from_path(&path).unwrap();
    assert_eq!(tag.frames().count(), 4);
    assert_eq!(tag.title(), Some("Don't Stop"));
    assert_eq!(tag.genre(), None);
    assert_eq!(tag.year(), None);
    assert!(tag.get("TCOM").is_none());

    // running it twice gives the same result
    rewrite_tags(&path, &create_test_tags()).unwrap();
    let tag = Tag::read_from_path(&path).unwrap();
    assert_eq!(tag.frames().count(), 4);
}

#[test]
fn test_rewrite_tags_rejects_non_audio() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("0000_1.mp3");
    fs::write(&path, b"<html>404 not found</html>").unwrap();

    assert!(matches!(
        rewrite_tags(&path, &create_test_tags()),
        Err(TagError::NotAudio)
    ));
    assert_eq!(fs::read(&path).unwrap(), b"<html>404 not found</html>");

    let empty = dir.path().join("0001_2.mp3");
    fs::write(&empty, b"").unwrap();
    assert!(matches!(
        rewrite_tags(&empty, &create_test_tags()),
        Err(TagError::NotAudio)
    ));
}

#[test]
fn test_rewrite_tags_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        rewrite_tags(&dir.path().join("nope.mp3"), &create_test_tags()),
        Err(TagError::IoError(_))
    ));
}

#[test]
fn test_track_tags_for_track() {
    let track = Track {
        id: "1".to_string(),
        artist: "Artist".to_string(),
        title: "Title".to_string(),
        url: "u".to_string(),
        ordinal: 0,
    };

    let tags = TrackTags::for_track(&track, "Mixtape");
    assert_eq!(tags.artist, "Artist");
    assert_eq!(tags.title, "Title");
    assert_eq!(tags.album, "Mixtape");
    assert_eq!(tags.album_artist, "Mixtape");
}
