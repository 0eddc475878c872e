use std::collections::HashSet;

/// Coarse media classification used by the quality estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Audio => write!(f, "audio"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

/// Extracts the lowercase file extension from a URL's path, ignoring query
/// string and fragment. Dots in the host do not count.
pub fn file_extension(url: &str) -> Option<String> {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    let path = match trimmed.find("://") {
        Some(idx) => {
            let rest = &trimmed[idx + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => return None,
            }
        }
        None => trimmed,
    };
    let name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Checks a media URL's extension against the supported-format set.
/// The rejection message names the offending extension.
pub fn validate_media_format(media_url: &str, supported: &HashSet<String>) -> Result<(), String> {
    let Some(ext) = file_extension(media_url) else {
        return Err("Could not determine file format".to_string());
    };

    if !supported.contains(&ext) {
        let mut formats: Vec<&str> = supported.iter().map(String::as_str).collect();
        formats.sort_unstable();
        return Err(format!(
            "Unsupported file format: {ext}. Supported formats: {}",
            formats.join(", ")
        ));
    }

    Ok(())
}

/// Classifies a file extension as audio or video. Unrecognized extensions
/// return `None` and downstream quality estimation reports Unknown.
pub fn media_kind(extension: &str) -> Option<MediaType> {
    match extension {
        "mp3" | "ogg" | "wav" | "pcm" | "flac" | "aac" | "m4a" | "wma" | "aiff" => {
            Some(MediaType::Audio)
        }
        "mp4" | "mov" | "webm" | "avi" => Some(MediaType::Video),
        _ => None,
    }
}
