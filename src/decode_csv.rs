//! The CSV field decoder.
//!
//! [`DecodeCsvFields`] reads one string field of an [`Event`], decodes it as a
//! single CSV record against a configured header, and merges the resulting
//! named sub-fields back into the event. Where the output lands is controlled
//! by the `target` option:
//!
//! - `target` unset: the decoded map replaces the source field in place.
//! - `target` set to a non-empty path: the decoded map is written at that path.
//! - `target` set to the empty string: decoded keys are merged into the event
//!   root, honoring `overwrite_keys`.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{DecodeError, DecodeResult, EventError};
use crate::event::Event;
use crate::observability::{TransformContext, TransformObserver, TransformSeverity};

/// Root key under which per-key merge failures are recorded.
const MERGE_ERROR_KEY: &str = "csv_error";

/// Configuration record for [`DecodeCsvFields`].
///
/// Recognized keys are exactly `field`, `header`, `overwrite_keys`, and
/// `target`; anything else is rejected at construction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DecodeCsvConfig {
    /// Dotted path of the source string field (required).
    pub field: String,
    /// Ordered column names assigned to CSV fields by position (required).
    pub header: Vec<String>,
    /// Whether a root merge may replace keys that already exist in the event.
    pub overwrite_keys: bool,
    /// Optional destination path; see [`Target`] for the tri-state semantics.
    pub target: Option<String>,
}

/// Destination of the decoded output, derived from the optional `target`
/// configuration string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `target` unset: replace the source field with the decoded map.
    Inline,
    /// `target` is the empty string: merge decoded keys into the event root.
    MergeRoot,
    /// `target` is a non-empty path: nest the decoded map at that path.
    Path(String),
}

impl Target {
    fn from_config(target: Option<String>) -> Self {
        match target {
            None => Self::Inline,
            Some(path) if path.is_empty() => Self::MergeRoot,
            Some(path) => Self::Path(path),
        }
    }
}

/// Decodes one CSV-encoded string field of an event into named sub-fields.
///
/// Immutable after construction; `run` borrows the event and holds no state
/// between calls, so one decoder may serve many threads as long as each event
/// is only handed to one of them at a time.
#[derive(Clone)]
pub struct DecodeCsvFields {
    field: String,
    header: Vec<String>,
    overwrite_keys: bool,
    target: Target,
    observer: Option<Arc<dyn TransformObserver>>,
}

impl fmt::Debug for DecodeCsvFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeCsvFields")
            .field("field", &self.field)
            .field("header_len", &self.header.len())
            .field("overwrite_keys", &self.overwrite_keys)
            .field("target", &self.target)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl fmt::Display for DecodeCsvFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decode_csv_fields={}", self.field)
    }
}

impl DecodeCsvFields {
    /// Build a decoder from a validated configuration.
    ///
    /// Fails with [`DecodeError::Config`] when `field` is empty or `header`
    /// has no columns. An empty header would make every decode fail the
    /// column-count check, so it is surfaced here instead.
    pub fn new(config: DecodeCsvConfig) -> DecodeResult<Self> {
        if config.field.is_empty() {
            return Err(DecodeError::Config {
                message: "missing required option 'field'".to_string(),
            });
        }
        if config.header.is_empty() {
            return Err(DecodeError::Config {
                message: "missing required option 'header'".to_string(),
            });
        }

        Ok(Self {
            field: config.field,
            header: config.header,
            overwrite_keys: config.overwrite_keys,
            target: Target::from_config(config.target),
            observer: None,
        })
    }

    /// Build a decoder from an untyped configuration record.
    ///
    /// Unknown keys are rejected with an error naming the offending key, and
    /// the value must be a JSON object.
    pub fn from_json(config: Value) -> DecodeResult<Self> {
        let config: DecodeCsvConfig =
            serde_json::from_value(config).map_err(|e| DecodeError::Config {
                message: e.to_string(),
            })?;
        Self::new(config)
    }

    /// Attach an observer that is notified of every `run` outcome.
    pub fn with_observer(mut self, observer: Arc<dyn TransformObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The configured source field path.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The configured destination.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Decode the configured field of `event` and merge the result back in.
    ///
    /// Leniency policy: an absent source field and a source field holding a
    /// non-string value are both silent no-ops, not errors. A decode failure
    /// leaves the event untouched. A write failure after a successful decode
    /// leaves the event in its best-effort mutated state.
    pub fn run(&self, event: &mut Event) -> DecodeResult<()> {
        let result = self.run_inner(event);
        if let Some(observer) = self.observer.as_ref() {
            let ctx = TransformContext {
                transform: self.to_string(),
                field: self.field.clone(),
            };
            match &result {
                Ok(true) => observer.on_decoded(&ctx),
                Ok(false) => observer.on_skipped(&ctx),
                Err(err) => observer.on_failure(&ctx, severity_for_error(err), err),
            }
        }
        result.map(|_| ())
    }

    /// Returns `Ok(true)` when the event was decoded and mutated, `Ok(false)`
    /// on a silent skip.
    fn run_inner(&self, event: &mut Event) -> DecodeResult<bool> {
        let value = match event.get(&self.field) {
            Ok(v) => v,
            Err(EventError::KeyNotFound { .. }) => return Ok(false),
            Err(err) => return Err(err.into()),
        };

        let Some(text) = value.as_str() else {
            return Ok(false);
        };

        let decoded = decode_csv(text, &self.header)?;

        match &self.target {
            Target::Inline => {
                event.put(&self.field, Value::Object(decoded))?;
            }
            Target::MergeRoot => {
                event.merge_root(decoded, self.overwrite_keys, MERGE_ERROR_KEY);
            }
            Target::Path(path) => {
                event.put(path, Value::Object(decoded))?;
            }
        }
        Ok(true)
    }
}

/// Decode `text` as exactly one CSV record, keyed by `header` position.
///
/// Standard CSV quoting applies: fields are comma-separated, a double-quoted
/// field may contain commas, newlines, and doubled quotes (`""` unescapes to
/// `"`), and whitespace outside quotes is preserved as-is. Only the first
/// record is consumed; trailing lines are ignored.
///
/// Fails with [`DecodeError::Parse`] when the record is malformed per CSV
/// quoting rules (an unterminated quoted field, a closing quote not followed
/// by a comma or line end, or a bare quote inside an unquoted field), and with
/// [`DecodeError::FieldCountMismatch`] when the parsed column count differs
/// from `header.len()` (empty input counts as zero columns). When the header
/// repeats a column name, the later position wins.
pub fn decode_csv(text: &str, header: &[String]) -> DecodeResult<Map<String, Value>> {
    check_record_quoting(text)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut record = csv::StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .map_err(|e| DecodeError::Parse {
            message: e.to_string(),
        })?;

    let actual = if found { record.len() } else { 0 };
    let expected = header.len();
    if expected != actual {
        return Err(DecodeError::FieldCountMismatch { expected, actual });
    }

    let mut decoded = Map::with_capacity(expected);
    for (name, value) in header.iter().zip(record.iter()) {
        decoded.insert(name.clone(), Value::String(value.to_string()));
    }
    Ok(decoded)
}

/// Validate the quoting of the first CSV record in `text`.
///
/// The `csv` crate reads quotes permissively (an unterminated quote consumes
/// the rest of the input), so strictness is enforced here: a quoted field
/// must close, a closing quote must be followed by a comma or line end, and
/// an unquoted field may not contain a quote. Only the first record is
/// checked; trailing lines are ignored, as in decoding.
fn check_record_quoting(text: &str) -> DecodeResult<()> {
    let bytes = text.as_bytes();
    let mut i = 0;
    loop {
        // Start of a field.
        if bytes.get(i).copied() == Some(b'"') {
            i += 1;
            loop {
                while bytes.get(i).copied().is_some_and(|b| b != b'"') {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(parse_error("unterminated quoted field"));
                }
                i += 1;
                match bytes.get(i).copied() {
                    // A doubled quote is an escaped quote; keep scanning.
                    Some(b'"') => i += 1,
                    Some(b',') => {
                        i += 1;
                        break;
                    }
                    None | Some(b'\r') | Some(b'\n') => return Ok(()),
                    Some(_) => {
                        return Err(parse_error(
                            "closing quote not followed by a comma or line end",
                        ));
                    }
                }
            }
        } else {
            loop {
                match bytes.get(i).copied() {
                    None | Some(b'\r') | Some(b'\n') => return Ok(()),
                    Some(b',') => {
                        i += 1;
                        break;
                    }
                    Some(b'"') => return Err(parse_error("bare quote in unquoted field")),
                    Some(_) => i += 1,
                }
            }
        }
    }
}

fn parse_error(message: &str) -> DecodeError {
    DecodeError::Parse {
        message: message.to_string(),
    }
}

fn severity_for_error(err: &DecodeError) -> TransformSeverity {
    match err {
        // Post-decode write failures leave a partially mutated event behind.
        DecodeError::Event(_) => TransformSeverity::Warning,
        DecodeError::Config { .. }
        | DecodeError::Parse { .. }
        | DecodeError::FieldCountMismatch { .. } => TransformSeverity::Error,
    }
}
