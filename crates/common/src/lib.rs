/**
 * Path-prefix authorization.
 *  Decides whether a principal may touch a key.
 */
pub mod auth;
/**
 * Principals and their bearer tokens.
 *  Issue, rotate, resolve and revoke.
 */
pub mod identity;
/**
 * The virtual filesystem over the flat key store:
 *  directory emulation, subtree copy/move/delete
 *  and the batch executor.
 */
pub mod wiki;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::auth::{authorize, owned_prefix, require_authorized, AccessDenied};
    pub use crate::identity::{IdentityError, Principal, TokenStore};
    pub use crate::version::BuildInfo;
    pub use crate::wiki::{
        BatchOpKind, BatchOperation, BatchReport, BatchResult, FileContent, ListingEntry,
        PathType, Stat, SubtreeReport, Wiki, WikiError,
    };
}
