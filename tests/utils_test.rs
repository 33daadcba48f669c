use vksync::config::{Config, DEFAULT_ALBUM, DEFAULT_DESTINATION};
use vksync::utils::*;

#[test]
fn test_track_file_name() {
    assert_eq!(track_file_name(0, "12"), "0000_12.mp3");
    assert_eq!(track_file_name(42, "456239017"), "0042_456239017.mp3");

    // Ordinals past four digits keep growing instead of wrapping
    assert_eq!(track_file_name(12345, "7"), "12345_7.mp3");
}

#[test]
fn test_parse_track_file_name() {
    assert_eq!(
        parse_track_file_name("0042_456239017.mp3"),
        Some((42, "456239017".to_string()))
    );

    // Identifier may itself contain underscores
    assert_eq!(
        parse_track_file_name("0003_2000_81.mp3"),
        Some((3, "2000_81".to_string()))
    );

    // Reversible with the naming scheme
    let name = track_file_name(17, "abc");
    assert_eq!(parse_track_file_name(&name), Some((17, "abc".to_string())));
}

#[test]
fn test_parse_track_file_name_ignores_foreign_files() {
    assert_eq!(parse_track_file_name("cover.jpg"), None);
    assert_eq!(parse_track_file_name("123.mp3"), None);
    assert_eq!(parse_track_file_name("12_5.mp3"), None); // ordinal too short
    assert_eq!(parse_track_file_name("0001_5.mp3.part"), None);
    assert_eq!(parse_track_file_name("0001_.mp3"), None);
    assert_eq!(parse_track_file_name("0001_5.MP3"), None);
}

#[test]
fn test_partial_file_names() {
    let partial = partial_file_name(&track_file_name(1, "5"));
    assert_eq!(partial, "0001_5.mp3.part");
    assert!(is_partial_file_name(&partial));

    assert!(!is_partial_file_name("0001_5.mp3"));
    assert!(!is_partial_file_name("notes.part"));
}

#[test]
fn test_decode_entities() {
    assert_eq!(decode_entities("Simon &amp; Garfunkel"), "Simon & Garfunkel");
    assert_eq!(decode_entities("Don&#39;t Stop"), "Don't Stop");
    assert_eq!(decode_entities("&quot;Live&quot;"), "\"Live\"");
    assert_eq!(decode_entities("plain title"), "plain title");
}

#[test]
fn test_config_defaults_and_overrides() {
    let config = Config::default();
    assert_eq!(config.output_dir.to_str(), Some(DEFAULT_DESTINATION));
    assert_eq!(config.album, DEFAULT_ALBUM);
    assert_eq!(config.app_id, "3889070");
    assert_eq!(config.app_scope, "audio,offline");
    assert!(config.workers >= 1);

    let config = Config::default()
        .with_output_dir("music")
        .with_album("Mixtape")
        .with_workers(0);
    assert_eq!(config.output_dir.to_str(), Some("music"));
    assert_eq!(config.album, "Mixtape");
    assert_eq!(config.workers, 1);
}
