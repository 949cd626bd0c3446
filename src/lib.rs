//! `event-csv-decode` is a small library for decoding a CSV-encoded string
//! field of a structured [`event::Event`] into named sub-fields, using a
//! caller-supplied header (column-name list), and merging the result back into
//! the event.
//!
//! The primary entrypoint is [`decode_csv::DecodeCsvFields`]: construct it
//! once from a [`decode_csv::DecodeCsvConfig`] (or an untyped JSON config
//! record), then call [`decode_csv::DecodeCsvFields::run`] per event.
//!
//! ## What it does
//!
//! - Decodes exactly one CSV record with standard quoting rules (doubled
//!   quotes unescape, commas/newlines allowed inside quotes, no whitespace
//!   trimming).
//! - Assigns values to names by header position; the column count must match
//!   the header length or the decode fails and the event is left untouched.
//! - Merges the decoded map per the `target` option: in place over the source
//!   field, nested at a dotted path, or key-by-key into the event root.
//! - An absent source field or a non-string source value is a silent skip.
//!
//! ## Quick example: decode in place
//!
//! ```rust
//! use event_csv_decode::decode_csv::DecodeCsvFields;
//! use event_csv_decode::event::Event;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), event_csv_decode::DecodeError> {
//! let decoder = DecodeCsvFields::from_json(json!({
//!     "field": "msg",
//!     "header": ["h1", "h2", "h3"],
//! }))?;
//!
//! let mut event = Event::from_value(json!({"msg": "a,b,c"})).unwrap();
//! decoder.run(&mut event)?;
//!
//! assert_eq!(
//!     event,
//!     Event::from_value(json!({"msg": {"h1": "a", "h2": "b", "h3": "c"}})).unwrap()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Nest at a target path, or merge into the root
//!
//! ```rust
//! use event_csv_decode::decode_csv::DecodeCsvFields;
//! use event_csv_decode::event::Event;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), event_csv_decode::DecodeError> {
//! // A non-empty target nests the decoded map at that path.
//! let decoder = DecodeCsvFields::from_json(json!({
//!     "field": "msg",
//!     "header": ["ip", "status"],
//!     "target": "csv.out",
//! }))?;
//! let mut event = Event::from_value(json!({"msg": "10.0.0.1,200"})).unwrap();
//! decoder.run(&mut event)?;
//! assert_eq!(event.get("csv.out.status").unwrap(), &json!("200"));
//!
//! // An empty target merges decoded keys into the event root; existing keys
//! // are kept unless `overwrite_keys` is set.
//! let decoder = DecodeCsvFields::from_json(json!({
//!     "field": "msg",
//!     "header": ["ip", "status"],
//!     "target": "",
//! }))?;
//! let mut event = Event::from_value(json!({"msg": "10.0.0.1,200"})).unwrap();
//! decoder.run(&mut event)?;
//! assert_eq!(event.get("ip").unwrap(), &json!("10.0.0.1"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability
//!
//! An optional observer is notified of every run outcome (decoded, skipped,
//! or failed):
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use event_csv_decode::decode_csv::DecodeCsvFields;
//! use event_csv_decode::event::Event;
//! use event_csv_decode::observability::StdErrObserver;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), event_csv_decode::DecodeError> {
//! let decoder = DecodeCsvFields::from_json(json!({
//!     "field": "msg",
//!     "header": ["h1", "h2"],
//! }))?
//! .with_observer(Arc::new(StdErrObserver::default()));
//!
//! let mut event = Event::from_value(json!({"msg": "a,b"})).unwrap();
//! decoder.run(&mut event)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`decode_csv`]: the decoder, its configuration, and the single-record
//!   [`decode_csv::decode_csv`] function
//! - [`event`]: the dotted-path event record the decoder operates on
//! - [`observability`]: observer hooks for logging/metrics on run outcomes
//! - [`error`]: error types shared across the crate

pub mod decode_csv;
pub mod error;
pub mod event;
pub mod observability;

pub use error::{DecodeError, DecodeResult, EventError};
