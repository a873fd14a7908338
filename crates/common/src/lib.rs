/**
 * Username to password-hash mapping persisted
 *  as TOML, reloaded on every lookup.
 */
pub mod credentials;
/**
 * Document kinds, name rules and rendering.
 *  Everything here is pure; no I/O.
 */
pub mod document;
/**
 * Flat-file document storage.
 *  One file per document inside a single
 *  root directory.
 */
pub mod store;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::credentials::{CredentialError, CredentialStore};
    pub use crate::document::{
        validate_new_name, Document, DocumentKind, NameError, Rendered, HTML_CONTENT_TYPE,
        TEXT_CONTENT_TYPE,
    };
    pub use crate::store::{DocumentError, DocumentStore};
    pub use crate::version::{build_info, BuildInfo};
}
