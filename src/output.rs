//! Artifact naming and writing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::model::ChromeTemplate;

const HOSTILE: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `<CODE>-<Version>-<Title>.pdf`, with empty parts skipped.
pub fn export_file_name(chrome: &ChromeTemplate) -> String {
    let parts: Vec<String> = [&chrome.document_code, &chrome.version, &chrome.title]
        .into_iter()
        .map(|p| sanitize(p))
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return "document.pdf".to_string();
    }
    format!("{}.pdf", parts.join("-"))
}

/// Replace path-hostile and control characters with `_` and collapse runs of
/// whitespace to one space.
pub fn sanitize(part: &str) -> String {
    let replaced: String = part
        .chars()
        .map(|c| {
            if HOSTILE.contains(&c) || (c.is_control() && !c.is_whitespace()) {
                '_'
            } else {
                c
            }
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Write `bytes` to `dir/name` through a temporary sibling, so a failed write
/// never leaves a partial file under the final name.
pub fn write_artifact(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, Error> {
    let target = dir.join(name);
    let tmp = dir.join(format!(".{name}.partial"));
    if let Err(e) = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, &target)) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::Io(e));
    }
    log::debug!("wrote {} ({} bytes)", target.display(), bytes.len());
    Ok(target)
}
