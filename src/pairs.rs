use std::path::{Path, PathBuf};

use crate::viewer::file_uri;

/// Two consecutive pages shown together as one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub first: PathBuf,
    pub second: Option<PathBuf>, // None for a trailing odd page
}

impl Pair {
    pub fn first_uri(&self) -> String {
        file_uri(&self.first)
    }

    /// Empty string when there is no second page, which hides the second slot.
    pub fn second_uri(&self) -> String {
        self.second.as_deref().map(file_uri).unwrap_or_default()
    }
}

/// Groups page images two by two, preserving order.
pub fn pair_up<P: AsRef<Path>>(images: &[P]) -> Vec<Pair> {
    images
        .chunks(2)
        .map(|chunk| Pair {
            first: chunk[0].as_ref().to_path_buf(),
            second: chunk.get(1).map(|p| p.as_ref().to_path_buf()),
        })
        .collect()
}
