// ficha-cadastro: error taxonomy

use thiserror::Error;

use crate::validate::ErrorMap;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to load logo: {0}")]
    LogoError(String),
    #[error("Failed to load signature: {0}")]
    SignatureError(String),
    #[error("Failed to read form input: {0}")]
    InputError(String),
    #[error("Invalid date format: {0}")]
    DateError(String),
    #[error("Form has {} invalid field(s)", .0.len())]
    Validation(ErrorMap),
    #[error("Cannot {action} while {mode}")]
    InvalidState {
        action: &'static str,
        mode: &'static str,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// The single message shown to the person filling the form when
    /// document generation fails.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Verifique os campos destacados.",
            AppError::InvalidState { .. } => "Aguarde a geração do PDF.",
            _ => "Erro ao gerar o PDF.",
        }
    }
}
