//! Download workflow types: errors, policy declines, requests and outcomes.
//!
//! # Structure
//!
//! - `errors` - Fatal error taxonomy (`DownloadError`)
//! - `policy` - Normal declines (`PolicyAbort`) with user-facing text
//! - `request` - `DownloadRequest`, session identity and display flags
//! - `outcome` - What a finished attempt amounted to

pub mod errors;
pub mod outcome;
pub mod policy;
pub mod request;

pub use errors::DownloadError;
pub use outcome::DownloadOutcome;
pub use policy::{DuplicateMatch, PolicyAbort};
pub use request::{DownloadRequest, DownloadSession, SessionFlags, SessionId};
