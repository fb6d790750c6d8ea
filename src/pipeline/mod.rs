//! Pipeline stages for PDF table extraction.
//!
//! Each submodule implements exactly one step. Only `input` and `detect`
//! touch the outside world; the four stages after detection are pure
//! functions of their input and configuration.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ detect ──▶ normalize ──▶ quality ──▶ dedup ──▶ markdown
//! (path)   (external)  (clean grid)  (accept?)   (sha256)   (report)
//! ```
//!
//! 1. [`input`]    : expand directories, validate each document (exists, `%PDF`)
//! 2. [`detect`]   : ask the external detector for raw candidates, once per strategy
//! 3. [`normalize`]: drop empty rows/columns, pad ragged rows, tidy the header,
//!    derive confidence
//! 4. [`quality`]  : structural and density checks with configurable thresholds
//! 5. [`dedup`]    : keep the first table of each distinct content fingerprint
//! 6. [`markdown`] : render tables and assemble the document report

pub mod dedup;
pub mod detect;
pub mod input;
pub mod markdown;
pub mod normalize;
pub mod quality;
