//! Registration form ("Ficha de Cadastro") for a martial-arts academy.
//!
//! The crate masks and validates the form's fields and lays the result out
//! as a paginated A4 PDF with the academy logo and the handwritten
//! signature:
//!
//! - [`format`]: phone masking, age derivation, date display
//! - [`form`]: the form state and its per-field edits
//! - [`validate`]: field-level errors and focus routing
//! - [`layout`] and [`document`]: the paginated document
//! - [`session`]: the editing / generating / result state machine

pub mod assets;
pub mod canvas;
pub mod cli;
pub mod document;
pub mod error;
pub mod form;
pub mod format;
pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod session;
pub mod signature;
pub mod validate;

pub use document::{render_pdf, RenderedDocument};
pub use error::{AppError, Result};
pub use form::{Answer, Field, FormSnapshot};
pub use session::{Mode, Session};
pub use signature::SignatureBitmap;
pub use validate::{validate, ErrorMap, FocusTarget};
