//! Logo assets: identifier → locator resolution, and the byte server
//! behind `GET /images/{logoId}`.

mod files;
mod resolver;

pub use files::serve_image;
pub use resolver::{AssetResolver, DirAssetResolver, Locator, IMAGES_ROUTE};
