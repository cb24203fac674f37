//! Archive naming rules used by the duplicate check.

use crate::download::SessionFlags;

/// Archive extensions recognised for extraction, longest forms first.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    ".tar.bz2", ".tar.gz", ".bz2", ".gz", ".tar.xz", ".tar", ".tbz2", ".tgz", ".lzma2", ".zip",
    ".7z", ".z", ".rar", ".iso", ".wim", ".cab", ".apm", ".arj", ".chm", ".cpio", ".cramfs",
    ".deb", ".dmg", ".fat", ".hfs", ".lzh", ".lzma", ".mbr", ".msi", ".mslz", ".nsis", ".ntfs",
    ".rpm", ".squashfs", ".udf", ".vhd", ".xar",
];

/// Strip a recognised archive extension (case-insensitive).
///
/// Returns `None` when the name is not an archive this bot can extract.
pub fn archive_base_name(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    ARCHIVE_EXTENSIONS
        .iter()
        .find(|ext| {
            bytes.len() >= ext.len()
                && bytes[bytes.len() - ext.len()..].eq_ignore_ascii_case(ext.as_bytes())
        })
        .and_then(|ext| name.get(..name.len() - ext.len()))
        .map(str::to_string)
}

/// Name the mirrored content will have after post-processing.
///
/// Zipping appends `.zip`; extraction drops the archive extension. `None`
/// means no meaningful name can be predicted and the duplicate check is
/// skipped.
pub fn duplicate_candidate_name(name: &str, flags: SessionFlags) -> Option<String> {
    if flags.is_zip {
        Some(format!("{name}.zip"))
    } else if flags.should_extract {
        archive_base_name(name)
    } else {
        Some(name.to_string())
    }
}
