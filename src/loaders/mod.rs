pub mod gltf;

use std::path::{Path, PathBuf};

use crate::error::{AssetLoadFailure, LoadCause};
use crate::types::ModelAsset;

pub use self::gltf::GltfLoader;

/// Model-loading collaborator. Runs on the loader thread, never on the viewer's.
pub trait AssetLoader: Send + Sync + 'static {
    fn load(&self, uri: &str) -> Result<ModelAsset, AssetLoadFailure>;
}

impl<F> AssetLoader for F
where
    F: Fn(&str) -> Result<ModelAsset, AssetLoadFailure> + Send + Sync + 'static,
{
    fn load(&self, uri: &str) -> Result<ModelAsset, AssetLoadFailure> {
        self(uri)
    }
}

/// Turn an asset URI into a filesystem path.
/// Accepts plain paths and `file://` URIs; relative paths are joined onto `base`.
pub fn resolve_uri(uri: &str, base: Option<&Path>) -> Result<PathBuf, AssetLoadFailure> {
    let path = match split_scheme(uri) {
        Some(("file", rest)) => {
            let decoded = percent_decode(rest)
                .ok_or_else(|| AssetLoadFailure::new(uri, LoadCause::MalformedUri))?;
            PathBuf::from(decoded)
        }
        Some((scheme, _)) => {
            return Err(AssetLoadFailure::new(
                uri,
                LoadCause::UnsupportedScheme(scheme.to_string()),
            ))
        }
        None => PathBuf::from(uri),
    };

    Ok(match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path,
    })
}

/// `scheme://rest`, where the scheme is a letter followed by letters, digits, `+`, `-` or `.`.
/// Single letters are drive names, not schemes.
fn split_scheme(uri: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = uri.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    let valid = scheme.len() > 1
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some((scheme, rest))
}

/// Decode `%XX` escapes. Returns `None` for a truncated escape or non-UTF-8 output.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(decoded).ok()
}
