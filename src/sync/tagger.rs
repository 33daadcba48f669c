use std::{
    fmt,
    fs::File,
    io::{ErrorKind, Read},
    path::Path,
};

use id3::{Tag, TagLike, Version};

use crate::types::Track;

#[derive(Debug)]
pub enum TagError {
    NotAudio,
    IoError(std::io::Error),
    Id3(id3::Error),
    Aborted(String),
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::NotAudio => write!(f, "not an MPEG audio file"),
            TagError::IoError(e) => write!(f, "cannot open file: {}", e),
            TagError::Id3(e) => write!(f, "cannot write tags: {}", e),
            TagError::Aborted(reason) => write!(f, "tagging aborted: {}", reason),
        }
    }
}

impl std::error::Error for TagError {}

impl From<std::io::Error> for TagError {
    fn from(err: std::io::Error) -> Self {
        TagError::IoError(err)
    }
}

impl From<id3::Error> for TagError {
    fn from(err: id3::Error) -> Self {
        TagError::Id3(err)
    }
}

/// The four fields written into every track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags {
    pub album: String,
    pub title: String,
    pub artist: String,
    pub album_artist: String,
}

impl TrackTags {
    /// Real artist and title of the track; album and album artist both carry
    /// the collection name so players file every track under one album.
    pub fn for_track(track: &Track, album: &str) -> Self {
        Self {
            album: album.to_string(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album_artist: album.to_string(),
        }
    }
}

/// Replaces whatever tags `path` carries with exactly album (TALB), title
/// (TIT2), artist (TPE1) and album artist (TPE2).
///
/// Existing ID3v2 and ID3v1 tags are dropped first; a file without any tag is
/// fine. Blocking, run it off the async runtime.
pub fn rewrite_tags(path: &Path, tags: &TrackTags) -> Result<(), TagError> {
    if !is_audio_container(path)? {
        return Err(TagError::NotAudio);
    }

    tolerate_no_tag(Tag::remove_from_path(path))?;
    tolerate_no_tag(id3::v1::Tag::remove_from_path(path))?;

    let mut tag = Tag::new();
    tag.set_album(tags.album.as_str());
    tag.set_title(tags.title.as_str());
    tag.set_artist(tags.artist.as_str());
    tag.set_album_artist(tags.album_artist.as_str());
    tag.write_to_path(path, Version::Id3v24)?;

    Ok(())
}

fn tolerate_no_tag(result: id3::Result<bool>) -> Result<(), TagError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// An MP3 starts with an ID3v2 header or directly with an MPEG frame sync.
fn is_audio_container(path: &Path) -> Result<bool, TagError> {
    let mut header = [0u8; 3];
    match File::open(path)?.read_exact(&mut header) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(false),
        Err(e) => return Err(e.into()),
    }

    Ok(&header == b"ID3" || (header[0] == 0xFF && header[1] & 0xE0 == 0xE0))
}
