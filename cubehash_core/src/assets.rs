//! Content-addressed origin for the compiled hash artifacts
//!
//! Requests of the form `/cubehash-wasm/{version}[/{impl}]/{file}` map to
//! the object key `cubehash-wasm/{version}[/{impl}]/{file}`. Objects are
//! immutable per path, so hits are cached for a year.

use crate::Result;
use bytes::Bytes;

mod route;
mod store;

pub use route::{ASSET_PREFIX, AssetRoute, content_type_for};
pub use store::{FsObjectStore, ObjectStore, StoredObject};

/// Cache policy for found objects
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Body of every miss
pub const NOT_FOUND_BODY: &str = "Not found";

/// Transport-neutral response
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Bytes,
}

impl AssetResponse {
    pub fn not_found() -> Self {
        Self {
            status: 404,
            headers: Vec::new(),
            body: Bytes::from_static(NOT_FOUND_BODY.as_bytes()),
        }
    }

    fn found(route: &AssetRoute, body: Bytes) -> Self {
        Self {
            status: 200,
            headers: vec![
                ("Content-Type", route.content_type().to_string()),
                ("Access-Control-Allow-Origin", "*".to_string()),
                ("Cache-Control", IMMUTABLE_CACHE_CONTROL.to_string()),
            ],
            body,
        }
    }

    /// First header value with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Serves artifacts out of an [`ObjectStore`]
pub struct AssetOrigin<S: ObjectStore> {
    store: S,
}

impl<S: ObjectStore> AssetOrigin<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up a parsed route
    pub async fn serve(&self, route: &AssetRoute) -> Result<AssetResponse> {
        let key = route.key();
        match self.store.get(&key).await? {
            Some(object) => {
                log::debug!("Serving {key} ({} bytes)", object.body.len());
                Ok(AssetResponse::found(route, object.body))
            }
            None => {
                log::debug!("No object for {key}");
                Ok(AssetResponse::not_found())
            }
        }
    }

    /// Look up a raw request path; paths outside the route shapes are misses
    pub async fn serve_path(&self, path: &str) -> Result<AssetResponse> {
        match AssetRoute::parse(path) {
            Some(route) => self.serve(&route).await,
            None => Ok(AssetResponse::not_found()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn origin_with(files: &[(&str, &[u8])]) -> (TempDir, AssetOrigin<FsObjectStore>) {
        let dir = TempDir::new().unwrap();
        for (key, body) in files {
            let path = dir.path().join(key);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, body).unwrap();
        }
        let origin = AssetOrigin::new(FsObjectStore::new(dir.path()));
        (dir, origin)
    }

    #[tokio::test]
    async fn test_hit_with_impl() {
        let (_dir, origin) = origin_with(&[("cubehash-wasm/v2/impl1/hash.wasm", b"\0asm")]);

        let response = origin
            .serve_path("/cubehash-wasm/v2/impl1/hash.wasm")
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(&response.body[..], b"\0asm");
        assert_eq!(response.header("content-type"), Some("application/wasm"));
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            response.header("Cache-Control"),
            Some(IMMUTABLE_CACHE_CONTROL)
        );
    }

    #[tokio::test]
    async fn test_hit_without_impl() {
        let (_dir, origin) = origin_with(&[("cubehash-wasm/v1/cubehash.js", b"export {}")]);

        let response = origin
            .serve_path("/cubehash-wasm/v1/cubehash.js")
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            response.header("Content-Type"),
            Some("application/javascript")
        );
    }

    #[tokio::test]
    async fn test_miss_has_no_cache_headers() {
        let (_dir, origin) = origin_with(&[]);

        let response = origin
            .serve_path("/cubehash-wasm/v9/missing.wasm")
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(&response.body[..], NOT_FOUND_BODY.as_bytes());
        assert!(response.header("Cache-Control").is_none());
    }

    #[tokio::test]
    async fn test_unroutable_path_is_a_miss() {
        let (_dir, origin) = origin_with(&[("cubehash-wasm/v1/a/b/c.js", b"x")]);

        for path in ["/other/v1/x.js", "/cubehash-wasm/v1/a/b/c.js", "/cubehash-wasm/../x"] {
            let response = origin.serve_path(path).await.unwrap();
            assert_eq!(response.status, 404, "{path}");
        }
    }
}
