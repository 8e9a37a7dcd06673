use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{GreetcardError, GreetcardResult};

/// Where template and font bytes come from.
///
/// Implementations must be shareable with the worker thread that performs the bounded wait.
pub trait AssetSource: Send + Sync {
    /// Fetch the raw bytes of a relative asset path.
    fn fetch(&self, path: &str) -> GreetcardResult<Vec<u8>>;
}

/// Reads assets from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn fetch(&self, path: &str) -> GreetcardResult<Vec<u8>> {
        let norm = normalize_rel_path(path)?;
        let abs = self.root.join(Path::new(&norm));
        let bytes = std::fs::read(&abs)
            .with_context(|| format!("read asset bytes from '{}'", abs.display()))?;
        Ok(bytes)
    }
}

/// In-memory assets keyed by normalized path.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, bytes: Vec<u8>) -> GreetcardResult<()> {
        self.files.insert(normalize_rel_path(path)?, bytes);
        Ok(())
    }

    pub fn with(mut self, path: &str, bytes: Vec<u8>) -> GreetcardResult<Self> {
        self.insert(path, bytes)?;
        Ok(self)
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, path: &str) -> GreetcardResult<Vec<u8>> {
        let norm = normalize_rel_path(path)?;
        self.files
            .get(&norm)
            .cloned()
            .ok_or_else(|| GreetcardError::asset_unavailable(format!("no asset at '{norm}'")))
    }
}

/// Normalize and validate asset-root-relative paths.
///
/// A single leading `/` is accepted (web-style `/birthcard-template.png`); parent traversals
/// (`..`) are rejected.
pub fn normalize_rel_path(source: &str) -> GreetcardResult<String> {
    let s = source.replace('\\', "/");
    let s = s.strip_prefix('/').unwrap_or(&s);
    if s.is_empty() {
        return Err(GreetcardError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(GreetcardError::validation(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(GreetcardError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
