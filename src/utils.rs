use std::sync::LazyLock;

use regex::Regex;

pub const TRACK_EXTENSION: &str = "mp3";
pub const PARTIAL_EXTENSION: &str = "part";

static TRACK_FILE_NAME: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^(\d{4,})_(.+)\.mp3$"));

/// Builds the on-disk name of a track: the ordinal zero-padded to four digits,
/// an underscore, the identifier and the `.mp3` extension.
///
/// # Example
///
/// ```
/// assert_eq!(track_file_name(7, "456239017"), "0007_456239017.mp3");
/// ```
pub fn track_file_name(ordinal: usize, id: &str) -> String {
    format!("{ordinal:04}_{id}.{TRACK_EXTENSION}")
}

/// Recovers `(ordinal, identifier)` from a file name produced by
/// [`track_file_name`]. Returns `None` for anything else.
pub fn parse_track_file_name(file_name: &str) -> Option<(usize, String)> {
    let re = TRACK_FILE_NAME.as_ref().ok()?;
    let caps = re.captures(file_name)?;
    let ordinal = caps.get(1)?.as_str().parse().ok()?;
    let id = caps.get(2)?.as_str();
    if id.contains(['/', '\\']) {
        return None;
    }
    Some((ordinal, id.to_string()))
}

pub fn partial_file_name(file_name: &str) -> String {
    format!("{file_name}.{PARTIAL_EXTENSION}")
}

pub fn is_partial_file_name(file_name: &str) -> bool {
    file_name
        .strip_suffix(PARTIAL_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|stem| parse_track_file_name(stem).is_some())
}

/// Decodes HTML entities such as `&amp;` or `&#39;` that the API leaves in
/// artist and title strings.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
