use std::collections::BTreeMap;
use tracing::warn;

/// Resolves the pull spec of a component image by its logical name in a release payload.
pub trait ReleaseImageProvider {
    /// Returns the image for `key`, or an empty string when the release does not ship it.
    fn get_image(&self, key: &str) -> String;
}

/// Image catalog backed by the component map of a release payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseImageCatalog {
    images: BTreeMap<String, String>,
}

impl ReleaseImageCatalog {
    pub fn new(images: BTreeMap<String, String>) -> Self {
        Self { images }
    }
}

impl ReleaseImageProvider for ReleaseImageCatalog {
    fn get_image(&self, key: &str) -> String {
        match self.images.get(key) {
            Some(image) => image.to_owned(),
            None => {
                warn!("Image {key} not found in release payload");
                String::new()
            }
        }
    }
}
