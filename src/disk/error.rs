use std::fmt;

use crate::disk::types::DiskId;

/// Disk-layer error type
#[derive(Debug)]
pub enum DiskError {
    Io(std::io::Error),   // underlying host-file I/O failed
    NoSuchImage(String),  // open with size 0 needs an existing image
    UnknownDisk(DiskId),  // handle was never issued by the registry
    DiskClosed(DiskId),   // handle is valid but the disk is closed
}

impl From<std::io::Error> for DiskError {
    fn from(e: std::io::Error) -> Self {
        DiskError::Io(e)
    }
}

impl fmt::Display for DiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Disk I/O error: {}", e),
            Self::NoSuchImage(path) => write!(f, "No disk image found at: {}", path),
            Self::UnknownDisk(id) => write!(f, "Unknown disk handle: {}", id),
            Self::DiskClosed(id) => write!(f, "Disk {} is closed", id),
        }
    }
}

impl std::error::Error for DiskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type shared by every disk-layer operation
pub type Result<T> = std::result::Result<T, DiskError>;
