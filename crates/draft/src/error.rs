use thiserror::Error;

use crate::rules::FieldErrors;

/// Errors raised by wizard actions.
///
/// Nothing here is fatal: a duplicate selection leaves the draft untouched
/// and a rejected submit keeps the form in its editing state with the field
/// errors recorded for display.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    /// The picked book is already part of the series.
    #[error("'{name}' is already in the series")]
    DuplicateSelection { name: String },

    /// Full-draft validation failed; the submit transition was blocked.
    #[error("the draft has {} invalid field(s)", errors.len())]
    SubmitRejected { errors: FieldErrors },

    /// The wizard is mid-submit; edits are not accepted until it resolves.
    #[error("a submit is in flight")]
    SubmitInFlight,
}
