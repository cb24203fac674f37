//! Link-shape detection.

use serde::{Deserialize, Serialize};

/// Shape of a remote-storage link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkType {
    /// Public link to a single file, resolved directly.
    File,
    /// Folder or shared link, resolved through a folder login.
    Folder,
}

/// Classify a link by its shape.
///
/// New-style links carry `/folder/` or `/file/` path segments; legacy
/// folder links use the `#F!` fragment. Anything else is treated as a file.
pub fn link_type(link: &str) -> LinkType {
    if link.contains("folder") {
        LinkType::Folder
    } else if link.contains("file") {
        LinkType::File
    } else if link.contains("/#F!") {
        LinkType::Folder
    } else {
        LinkType::File
    }
}
