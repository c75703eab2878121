//! Version selection over a set of specification documents.

use std::{
    collections::BTreeMap,
    fs,
    ops::Bound,
    path::Path,
};

use log::{debug, info, warn};

use crate::{
    error::ConfigurationError,
    specification::{Specification, SpecificationDocument},
    version::Version,
};

/// A set of raw specification documents keyed by version.
#[derive(Debug, Clone, Default)]
pub struct SpecificationCatalog {
    documents: BTreeMap<Version, SpecificationDocument>,
}

impl SpecificationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already-decoded documents.
    pub fn from_documents(
        documents: impl IntoIterator<Item = SpecificationDocument>,
    ) -> Result<Self, ConfigurationError> {
        let mut catalog = Self::new();
        for document in documents {
            catalog.insert(document)?;
        }
        Ok(catalog)
    }

    /// Load every `*.json` document in a directory.
    ///
    /// Files are read in name order; other files are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a document cannot be read or
    /// decoded, or if two documents declare the same version.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let dir = dir.as_ref();
        let io_err = |source| ConfigurationError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<_> = fs::read_dir(dir)
            .map_err(io_err)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json")
            })
            .collect();
        paths.sort();

        let mut catalog = Self::new();
        for path in paths {
            debug!(path = path.display().to_string(); "Reading specification document");
            let content = fs::read_to_string(&path).map_err(|source| ConfigurationError::Io {
                path: path.clone(),
                source,
            })?;
            let document: SpecificationDocument = serde_json::from_str(&content)
                .map_err(|source| ConfigurationError::Decode {
                    path: path.clone(),
                    source,
                })?;
            catalog.insert(document)?;
        }

        if catalog.documents.is_empty() {
            warn!(path = dir.display().to_string(); "No specification documents found");
        }

        Ok(catalog)
    }

    /// Add a document, keyed by its declared version.
    pub fn insert(&mut self, document: SpecificationDocument) -> Result<(), ConfigurationError> {
        let version: Version = document.version.parse()?;
        if self.documents.contains_key(&version) {
            return Err(ConfigurationError::DuplicateVersion(version.to_string()));
        }
        self.documents.insert(version, document);
        Ok(())
    }

    /// Available versions in ascending order.
    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.documents.keys()
    }

    /// Select the document for a requested version.
    ///
    /// The exact version wins; otherwise the lowest version strictly greater
    /// than the requested one is chosen.
    pub fn select(&self, requested: &Version) -> Result<&SpecificationDocument, ConfigurationError> {
        if self.documents.is_empty() {
            return Err(ConfigurationError::NoVersions);
        }

        if let Some(document) = self.documents.get(requested) {
            return Ok(document);
        }

        self.documents
            .range((Bound::Excluded(requested), Bound::Unbounded))
            .next()
            .map(|(version, document)| {
                info!(requested:% = requested, selected:% = version; "Using next available specification version");
                document
            })
            .ok_or_else(|| ConfigurationError::NoCompatibleVersion {
                requested: requested.to_string(),
                available: self
                    .versions()
                    .map(Version::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Select and enhance the specification for a requested version string.
    pub fn load(&self, requested: &str) -> Result<Specification, ConfigurationError> {
        let requested: Version = requested.parse()?;
        let document = self.select(&requested)?;
        Specification::enhance(document)
    }
}
