use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use astra::{Body, ResponseBuilder};
use mime::Mime;

use crate::errors::{ResultResp, ServerError};

use super::DirAssetResolver;

/// An inclusive byte range already clamped to the file length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Interpret a `Range` header against a file of `len` bytes.
    ///
    /// `Ok(None)` means "serve the whole file": no header, another unit,
    /// several ranges, or syntax we do not understand.
    pub fn parse(header: &str, len: u64) -> Result<Option<Self>, ServerError> {
        let Some(spec) = header.trim().strip_prefix("bytes=") else {
            return Ok(None);
        };
        if spec.contains(',') {
            return Ok(None);
        }
        let Some((first, last)) = spec.trim().split_once('-') else {
            return Ok(None);
        };

        let unsatisfiable = ServerError::RangeNotSatisfiable { len };
        match (first.trim(), last.trim()) {
            ("", "") => Ok(None),
            ("", suffix) => {
                let Ok(n) = suffix.parse::<u64>() else {
                    return Ok(None);
                };
                if n == 0 || len == 0 {
                    return Err(unsatisfiable);
                }
                Ok(Some(Self {
                    start: len.saturating_sub(n),
                    end: len - 1,
                }))
            }
            (start, end) => {
                let Ok(start) = start.parse::<u64>() else {
                    return Ok(None);
                };
                let end = if end.is_empty() {
                    u64::MAX
                } else {
                    match end.parse::<u64>() {
                        Ok(end) if end >= start => end,
                        _ => return Ok(None),
                    }
                };
                if start >= len {
                    return Err(unsatisfiable);
                }
                Ok(Some(Self {
                    start,
                    end: end.min(len - 1),
                }))
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.end - self.start + 1
    }
}

fn content_type(path: &Path) -> Mime {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => mime::IMAGE_PNG,
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("gif") => mime::IMAGE_GIF,
        Some("svg") => mime::IMAGE_SVG,
        Some("bmp") => mime::IMAGE_BMP,
        Some("webp") => "image/webp"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// `GET /images/{logo_id}`, honoring a single byte range.
pub fn serve_image(
    assets: &DirAssetResolver,
    logo_id: &str,
    range_header: Option<&str>,
) -> ResultResp {
    let path = assets.path_for(logo_id).ok_or(ServerError::NotFound)?;

    let mut file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ServerError::NotFound),
        Err(e) => return Err(ServerError::Internal(format!("open image failed: {e}"))),
    };
    let meta = file
        .metadata()
        .map_err(|e| ServerError::Internal(format!("stat image failed: {e}")))?;
    if !meta.is_file() {
        return Err(ServerError::NotFound);
    }
    let len = meta.len();

    let range = match range_header {
        Some(h) => ByteRange::parse(h, len)?,
        None => None,
    };

    let (status, start, count) = match range {
        Some(r) => (206, r.start, r.count()),
        None => (200, 0, len),
    };

    let mut buf = Vec::with_capacity(count as usize);
    file.seek(SeekFrom::Start(start))
        .and_then(|_| file.take(count).read_to_end(&mut buf))
        .map_err(|e| ServerError::Internal(format!("read image failed: {e}")))?;

    let mut builder = ResponseBuilder::new()
        .status(status)
        .header("Content-Type", content_type(&path).as_ref())
        .header("Content-Length", buf.len().to_string())
        .header("Accept-Ranges", "bytes");
    if let Some(r) = range {
        builder = builder.header("Content-Range", format!("bytes {}-{}/{len}", r.start, r.end));
    }

    builder
        .body(Body::from(buf))
        .map_err(|e| ServerError::Internal(format!("response build failed: {e}")))
}
