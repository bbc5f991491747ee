use std::path::PathBuf;

use serde::Serialize;

/// Route prefix under which logos are served.
pub const IMAGES_ROUTE: &str = "/images/";

/// Client-facing locator of an asset, e.g. `/images/acme.png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Locator of `logo_id` under [`IMAGES_ROUTE`]. Does not check existence.
    pub fn for_logo(logo_id: &str) -> Self {
        Locator(format!("{IMAGES_ROUTE}{logo_id}"))
    }
}

/// Turns a stored logo identifier into a locator.
///
/// Never fails: unknown or unusable identifiers resolve to `None`, so a
/// missing logo cannot break the listing it belongs to.
pub trait AssetResolver: Send + Sync {
    fn resolve(&self, logo_id: &str) -> Option<Locator>;
}

/// Resolves against files in one directory.
#[derive(Debug, Clone)]
pub struct DirAssetResolver {
    root: PathBuf,
}

impl DirAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// On-disk path for `logo_id`, if the name is safe to join.
    pub fn path_for(&self, logo_id: &str) -> Option<PathBuf> {
        is_safe_name(logo_id).then(|| self.root.join(logo_id))
    }
}

impl AssetResolver for DirAssetResolver {
    fn resolve(&self, logo_id: &str) -> Option<Locator> {
        let path = self.path_for(logo_id)?;
        path.is_file().then(|| Locator::for_logo(logo_id))
    }
}

/// A bare file name that cannot escape the asset directory and needs no
/// escaping inside a URL path.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
