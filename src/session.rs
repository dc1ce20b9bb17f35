// ficha-cadastro: registration session (editing -> generating -> result)

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::document::RenderedDocument;
use crate::error::{AppError, Result};
use crate::form::{Field, FormSnapshot};
use crate::signature::SignatureBitmap;
use crate::validate::{first_error_focus, validate, ErrorMap, FocusTarget};

#[derive(Debug, Clone)]
pub enum Mode {
    Editing,
    /// Inputs are locked while the document is produced.
    Generating,
    Result(RenderedDocument),
}

impl Mode {
    fn name(&self) -> &'static str {
        match self {
            Mode::Editing => "editing",
            Mode::Generating => "generating",
            Mode::Result(_) => "showing the result",
        }
    }
}

/// Owns the form, its errors, the signature and the last document.
#[derive(Debug)]
pub struct Session {
    form: FormSnapshot,
    errors: ErrorMap,
    signature: SignatureBitmap,
    mode: Mode,
}

impl Session {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            form: FormSnapshot::new(today),
            errors: ErrorMap::new(),
            signature: SignatureBitmap::default(),
            mode: Mode::Editing,
        }
    }

    pub fn form(&self) -> &FormSnapshot {
        &self.form
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn signature(&self) -> &SignatureBitmap {
        &self.signature
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    #[cfg(test)]
    fn is_locked(&self) -> bool {
        matches!(self.mode, Mode::Generating)
    }

    pub fn document(&self) -> Option<&RenderedDocument> {
        match &self.mode {
            Mode::Result(doc) => Some(doc),
            _ => None,
        }
    }

    /// Where focus should go for the current errors.
    pub fn focus(&self) -> Option<FocusTarget> {
        first_error_focus(&self.errors)
    }

    fn require_editing(&self, action: &'static str) -> Result<()> {
        match self.mode {
            Mode::Editing => Ok(()),
            _ => Err(AppError::InvalidState {
                action,
                mode: self.mode.name(),
            }),
        }
    }

    /// Applies one field edit and drops the errors it resolves.
    pub fn edit(&mut self, field: Field, value: &str) -> Result<()> {
        self.require_editing("edit the form")?;
        for cleared in self.form.apply(field, value) {
            self.errors.remove(&cleared);
        }
        Ok(())
    }

    pub fn set_signature(&mut self, signature: SignatureBitmap) -> Result<()> {
        self.require_editing("sign")?;
        self.signature = signature;
        if !self.signature.is_empty() {
            self.errors.remove(&Field::Signature);
        }
        Ok(())
    }

    pub fn clear_signature(&mut self) -> Result<()> {
        self.require_editing("clear the signature")?;
        self.signature.clear();
        Ok(())
    }

    /// Validates and, when valid, runs `render` with the inputs locked.
    ///
    /// Invalid input keeps the session editing with the full error map
    /// recorded. A render failure also returns to editing with every value
    /// intact. Nothing is retried.
    pub fn submit<F>(&mut self, render: F) -> Result<&RenderedDocument>
    where
        F: FnOnce(&Session) -> Result<RenderedDocument>,
    {
        self.require_editing("submit")?;

        self.errors = validate(&self.form, !self.signature.is_empty());
        if !self.errors.is_empty() {
            warn!(
                errors = self.errors.len(),
                focus = ?self.focus(),
                "registration has invalid fields"
            );
            return Err(AppError::Validation(self.errors.clone()));
        }

        self.mode = Mode::Generating;
        info!("generating document");

        match render(self) {
            Ok(doc) => {
                info!(file_name = %doc.file_name, "document ready");
                self.mode = Mode::Result(doc);
                self.document().ok_or(AppError::InvalidState {
                    action: "show the document",
                    mode: self.mode.name(),
                })
            }
            Err(e) => {
                warn!(error = %e, "document generation failed");
                self.mode = Mode::Editing;
                Err(e)
            }
        }
    }

    /// Starts a new registration: form, errors and signature cleared, the
    /// previous document released.
    pub fn reset(&mut self, today: NaiveDate) -> Result<()> {
        if !matches!(self.mode, Mode::Result(_)) {
            return Err(AppError::InvalidState {
                action: "start a new registration",
                mode: self.mode.name(),
            });
        }
        self.form = FormSnapshot::new(today);
        self.errors.clear();
        self.signature.clear();
        self.mode = Mode::Editing;
        info!("session reset");
        Ok(())
    }
}
