//! Request path to object key mapping

/// Key and path prefix for all artifacts
pub const ASSET_PREFIX: &str = "cubehash-wasm";

/// A parsed artifact request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoute {
    version: String,
    implementation: Option<String>,
    file: String,
}

impl AssetRoute {
    /// Build a route from its segments
    ///
    /// Segments must be non-empty, contain no `/` and not be `.` or `..`.
    pub fn new(version: &str, implementation: Option<&str>, file: &str) -> Option<Self> {
        let segments_ok = [Some(version), implementation, Some(file)]
            .into_iter()
            .flatten()
            .all(is_valid_segment);
        if !segments_ok {
            return None;
        }

        Some(Self {
            version: version.to_string(),
            implementation: implementation.map(str::to_string),
            file: file.to_string(),
        })
    }

    /// Parse `/cubehash-wasm/{version}/{file}` or
    /// `/cubehash-wasm/{version}/{impl}/{file}`
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix('/').unwrap_or(path);
        let mut segments = rest.split('/');
        if segments.next()? != ASSET_PREFIX {
            return None;
        }

        let segments: Vec<&str> = segments.collect();
        match segments.as_slice() {
            [version, file] => Self::new(version, None, file),
            [version, implementation, file] => Self::new(version, Some(*implementation), file),
            _ => None,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn implementation(&self) -> Option<&str> {
        self.implementation.as_deref()
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Object-store key for this route
    pub fn key(&self) -> String {
        match &self.implementation {
            Some(implementation) => format!(
                "{ASSET_PREFIX}/{}/{implementation}/{}",
                self.version, self.file
            ),
            None => format!("{ASSET_PREFIX}/{}/{}", self.version, self.file),
        }
    }

    pub fn content_type(&self) -> &'static str {
        content_type_for(&self.file)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains(['/', '\\'])
}

/// MIME type by file extension
pub fn content_type_for(file: &str) -> &'static str {
    if file.ends_with(".js") {
        "application/javascript"
    } else if file.ends_with(".wasm") {
        "application/wasm"
    } else {
        "application/octet-stream"
    }
}
