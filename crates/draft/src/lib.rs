//! Series/combo authoring core for the Boek console.
//!
//! This crate is the pure state layer behind the "create series" wizard:
//! the in-progress [`model::Draft`], per-field [`rules`], the
//! [`store::DraftStore`] that survives navigation between wizard steps, the
//! searchable [`picker::Picker`], the [`confirm::ConfirmationGate`] in front
//! of destructive removals, and the [`form::SeriesForm`] state machine that
//! ties them together. No I/O happens here; the HTTP module adapts requests
//! onto these types and carries the resulting notices and field errors back
//! to the client.

pub mod confirm;
pub mod error;
pub mod form;
pub mod model;
pub mod notice;
pub mod picker;
pub mod rules;
pub mod store;

pub use confirm::ConfirmationGate;
pub use error::DraftError;
pub use form::{FormMode, FormState, SeriesForm, SeriesPayload};
pub use model::{BookSummary, Draft, Genre};
pub use notice::{Notice, NoticeKind};
pub use picker::{Picker, PickerListing};
pub use rules::{Field, FieldErrors};
pub use store::DraftStore;
