//! Cover images are embedded into the record as `data:` URLs. Reading happens
//! off the UI thread; the event loop drains finished reads between frames.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

use crate::error::CoverError;

/// MIME type guessed from the file extension. Unknown extensions still get
/// embedded, as a generic binary payload.
pub fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Encode raw bytes as a `data:` URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Short human description of an embedded cover, e.g. `image/png, 12.4 KB`.
pub fn describe_data_url(data_url: &str) -> String {
    let Some(rest) = data_url.strip_prefix("data:") else {
        return "embedded image".to_string();
    };
    let (meta, payload) = rest.split_once(',').unwrap_or((rest, ""));
    let mime = meta.split(';').next().filter(|m| !m.is_empty()).unwrap_or("image");
    let bytes = payload.len() / 4 * 3;
    if bytes >= 1024 {
        format!("{mime}, {:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{mime}, {bytes} B")
    }
}

/// Terminals paste dropped files as paths, sometimes quoted or as `file://`
/// URIs. Normalize those into a plain path.
pub fn clean_dropped_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    let trimmed = trimmed.strip_prefix("file://").unwrap_or(trimmed);
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed.replace("\\ ", " ")))
    }
}

/// Read a file into a `data:` URL. No size or type validation.
pub fn read_cover(path: &Path) -> Result<String, CoverError> {
    if path.as_os_str().is_empty() {
        return Err(CoverError::EmptyPath);
    }
    let bytes = fs::read(path).map_err(|source| CoverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(to_data_url(mime_for(path), &bytes))
}

/// Outcome of a background read, tagged with the form that asked for it.
pub struct CoverLoaded {
    pub ticket: u64,
    pub path: PathBuf,
    pub result: Result<String, CoverError>,
}

/// Spawns cover reads and hands back their results.
pub struct CoverLoader {
    sender: Sender<CoverLoaded>,
    receiver: Receiver<CoverLoaded>,
}

impl CoverLoader {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Start reading `path` in the background.
    pub fn request(&self, ticket: u64, path: PathBuf) {
        let sender = self.sender.clone();
        debug!(ticket, path = %path.display(), "reading cover");
        thread::spawn(move || {
            let result = read_cover(&path);
            if sender.send(CoverLoaded { ticket, path, result }).is_err() {
                warn!(ticket, "cover read finished after the app closed");
            }
        });
    }

    /// Non-blocking: the next finished read, if any.
    pub fn poll(&self) -> Option<CoverLoaded> {
        match self.receiver.try_recv() {
            Ok(loaded) => Some(loaded),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn encodes_file_as_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.PNG");
        fs::File::create(&path).unwrap().write_all(b"abc").unwrap();

        assert_eq!(read_cover(&path).unwrap(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_cover(Path::new("/definitely/not/here.jpg")).unwrap_err();
        assert!(matches!(err, CoverError::Io { .. }));
        assert!(matches!(read_cover(Path::new("")), Err(CoverError::EmptyPath)));
    }

    #[test]
    fn unknown_extension_still_embeds() {
        assert_eq!(mime_for(Path::new("scan.tiff")), "application/octet-stream");
        assert_eq!(mime_for(Path::new("a.jpeg")), "image/jpeg");
    }

    #[test]
    fn describes_embedded_cover() {
        assert_eq!(describe_data_url("data:image/png;base64,YWJj"), "image/png, 3 B");
        let big = to_data_url("image/jpeg", &vec![0u8; 3072]);
        assert_eq!(describe_data_url(&big), "image/jpeg, 3.0 KB");
        assert_eq!(describe_data_url("bukuku.png"), "embedded image");
    }

    #[test]
    fn cleans_dropped_paths() {
        assert_eq!(
            clean_dropped_path("'/tmp/my cover.png'\n"),
            Some(PathBuf::from("/tmp/my cover.png"))
        );
        assert_eq!(
            clean_dropped_path("file:///tmp/a.png"),
            Some(PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(
            clean_dropped_path("/tmp/my\\ cover.png"),
            Some(PathBuf::from("/tmp/my cover.png"))
        );
        assert_eq!(clean_dropped_path("   "), None);
    }

    #[test]
    fn loader_reports_back_with_ticket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.gif");
        fs::write(&path, b"GIF89a").unwrap();

        let loader = CoverLoader::new();
        loader.request(7, path.clone());

        let deadline = Instant::now() + Duration::from_secs(5);
        let loaded = loop {
            if let Some(loaded) = loader.poll() {
                break loaded;
            }
            assert!(Instant::now() < deadline, "cover read never finished");
            thread::sleep(Duration::from_millis(10));
        };
        assert_eq!(loaded.ticket, 7);
        assert_eq!(loaded.path, path);
        assert!(loaded.result.unwrap().starts_with("data:image/gif;base64,"));
    }
}
