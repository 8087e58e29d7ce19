use asyncgen_compiler::{DocumentResolver, ResolveError};
use asyncgen_spec::parse::parse_document_file;
use asyncgen_spec::AsyncApi;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves external document ids as paths under the root document's
/// directory. Ids arrive already resolved against the referring document
/// and normalized, so `shared/b.json` is the file a reference to `b.json`
/// inside `shared/a.json` names.
#[derive(Debug, Clone)]
pub struct FsResolver {
    base: PathBuf,
}

impl FsResolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolver for documents next to `root`.
    pub fn for_root(root: &Path) -> Self {
        Self::new(root.parent().unwrap_or_else(|| Path::new(".")))
    }

    pub fn path_of(&self, document: &str) -> PathBuf {
        self.base.join(document)
    }
}

impl DocumentResolver for FsResolver {
    fn resolve(&self, document: &str) -> Result<AsyncApi, ResolveError> {
        let path = self.path_of(document);
        debug!(%document, path = %path.display(), "loading external document");
        if !path.is_file() {
            return Err(ResolveError::NotFound {
                document: document.to_string(),
            });
        }
        parse_document_file(&path).map_err(|e| ResolveError::Failed {
            document: document.to_string(),
            message: e.to_string(),
        })
    }
}
