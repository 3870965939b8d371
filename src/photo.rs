use crate::Result;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::{collections::HashMap, fs, path::Path};
use tracing::{debug, info, warn};

/// Uploaded images keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct PhotoLibrary {
    photos: HashMap<String, Vec<u8>>,
}

pub struct PhotoAsset<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

impl PhotoLibrary {
    pub fn insert(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) {
        self.photos.insert(file_name.into(), bytes);
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Exact file name first, then the last path component of the reference,
    /// so `photos/a.jpg` still finds an upload named `a.jpg`.
    pub fn get(&self, reference: &str) -> Option<PhotoAsset<'_>> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        let base_name = reference
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(reference);
        [reference, base_name].into_iter().find_map(|name| {
            self.photos
                .get_key_value(name)
                .map(|(file_name, bytes)| PhotoAsset {
                    file_name: file_name.as_str(),
                    bytes: bytes.as_slice(),
                })
        })
    }

    pub fn load_dir(dir: &Path) -> Result<PhotoLibrary> {
        let mut library = PhotoLibrary::default();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|it| it.to_str()) else {
                debug!(?path, "Skipping file with a non UTF-8 name");
                continue;
            };
            if mime_type(file_name).is_none() {
                debug!(file_name, "Skipping non-image file");
                continue;
            }
            library.insert(file_name, fs::read(&path)?);
        }
        if library.is_empty() {
            warn!(?dir, "No photos found, popups will be text only");
        } else {
            info!(?dir, photos = library.len(), "Loaded photos");
        }
        Ok(library)
    }
}

impl PhotoAsset<'_> {
    pub fn mime_type(&self) -> &'static str {
        mime_type(self.file_name).unwrap_or("image/jpeg")
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.bytes)
    }
}

pub fn mime_type(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|it| it.to_str())?
        .to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
