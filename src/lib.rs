//! leiflat - streaming LEI registration XML to Turtle / TSV
//!
//! Input documents are read in bounded chunks and scanned into start, end
//! and text events. A per-document [`Session`] recognises the dialect,
//! captures the fields of each record into a scratch arena, and hands the
//! finished record to an output profile:
//!
//! - `turtle`: full RDF Turtle with typed dates and derived IRIs
//! - `turtle-lite`: reduced Turtle (name, legal form, jurisdiction)
//! - `tsv`: one tab-separated line per entity
//!
//! Memory stays bounded by the largest record, not the document.
//!
//! ```
//! use leiflat::{convert_bytes, Config, Profile};
//!
//! let xml = b"<LEIRegistrations><LEIRegistration>\
//!     <LegalEntityIdentifier>5299</LegalEntityIdentifier>\
//!     <RegisteredName>Example  AG</RegisteredName>\
//!     </LEIRegistration></LEIRegistrations>";
//! let out = convert_bytes(xml, Config::new().with_profile(Profile::Tsv)).unwrap();
//! assert_eq!(out, b"ol:5299\tExample AG\n");
//! ```

pub mod arena;
pub mod config;
pub mod convert;
pub mod core;
pub mod dialect;
pub mod emit;
pub mod error;
#[cfg(feature = "memory_tracking")]
pub mod memory;
pub mod reader;
pub mod record;
pub mod session;
pub mod sink;
pub mod text;

pub use config::{Config, EmptyDocumentPolicy};
pub use convert::{convert_bytes, Converter};
pub use dialect::Dialect;
pub use emit::Profile;
pub use error::{ConvertError, Result};
pub use session::{DocumentStats, Session};
