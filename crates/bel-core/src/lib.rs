//! # BEL Core
//!
//! Shared model for the BEL statement engine:
//!
//! - [`specification`]: versioned specification documents, version selection
//!   and the enhancement step producing an immutable [`Specification`]
//! - [`terms`]: namespace term identifiers, the lookup collaborator traits and
//!   timed dispatch of collaborator calls
//!
//! ```
//! use bel_core::{SpecificationCatalog, SpecificationDocument};
//!
//! let document: SpecificationDocument = serde_json::from_str(r#"{
//!     "version": "2.0.0",
//!     "functions": {"proteinAbundance": {"abbreviation": "p", "kind": "primary"}},
//!     "relations": {"increases": {"abbreviation": "->"}}
//! }"#).unwrap();
//!
//! let catalog = SpecificationCatalog::from_documents([document]).unwrap();
//! let spec = catalog.load("2.0").unwrap();
//! assert_eq!(spec.function("p").unwrap().name(), "proteinAbundance");
//! ```

pub mod error;
pub mod specification;
pub mod terms;
pub mod version;

pub use error::{ConfigurationError, LookupError};
pub use specification::{Specification, SpecificationCatalog, SpecificationDocument};
pub use terms::TermId;
pub use version::Version;
