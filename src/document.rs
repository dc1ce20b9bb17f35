// ficha-cadastro: registration document content and output

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use image::DynamicImage;
use tracing::info;

use crate::canvas::PageCanvas;
use crate::error::Result;
use crate::form::{Answer, FormSnapshot, HealthQuestion};
use crate::format::format_date_display;
use crate::layout::LayoutEngine;
use crate::pdf::PdfCanvas;
use crate::signature::SignatureBitmap;

pub const TITLE: &str = "Ficha de Cadastro";

/// A finished document, ready to be saved or handed to the user.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub page_count: usize,
}

impl RenderedDocument {
    /// Writes the document into `dir` under its file name.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `Ficha-<name>.pdf`, with characters that cannot appear in a file name
/// replaced by `_`.
pub fn file_name_for(full_name: &str) -> String {
    let sanitized: String = full_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("Ficha-{}.pdf", sanitized)
}

/// Trimmed value, or `-` when there is nothing to show.
fn safe(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "-"
    } else {
        trimmed
    }
}

fn health_value(question: &HealthQuestion) -> String {
    match question.answer {
        Some(Answer::Yes) => format!("Sim — {}", safe(&question.detail)),
        _ => Answer::No.as_str().to_string(),
    }
}

/// Lays out the whole registration on `canvas` in the fixed reading order.
pub fn lay_out<C: PageCanvas>(
    canvas: C,
    form: &FormSnapshot,
    signature: Option<&DynamicImage>,
    logo: &DynamicImage,
    generated_at: NaiveDateTime,
) -> LayoutEngine<C> {
    let mut engine = LayoutEngine::new(canvas);

    engine.header(logo, TITLE);

    let birth_date = format_date_display(&form.birth_date);

    engine.section_title("Informações Pessoais");
    engine.two_column_row(
        ("Nome completo", safe(&form.full_name)),
        ("Data de nascimento", birth_date.as_str()),
    );
    engine.two_column_row(("Idade", safe(&form.age)), ("Peso (kg)", safe(&form.weight)));
    engine.full_row("Endereço", safe(&form.address));
    engine.two_column_row(
        ("Telefone", safe(&form.phone)),
        ("Contato emergência", safe(&form.emergency_phone)),
    );
    engine.two_column_row(
        ("Responsável (se menor de idade)", safe(&form.guardian_name)),
        ("Telefone responsável", safe(&form.guardian_phone)),
    );
    engine.two_column_row(
        ("Dia vencimento mensalidade", safe(&form.due_day)),
        ("Data do cadastro", safe(&form.registration_date)),
    );

    engine.section_title("Saúde");
    engine.full_row("Restrição médica", &health_value(&form.restriction));
    engine.full_row("Medicamentos contínuos", &health_value(&form.medication));
    engine.full_row("Atividade anterior", &health_value(&form.prior_activity));

    if let Some(signature) = signature {
        engine.section_title("Assinatura");
        engine.signature_box(signature);
    }

    engine.footer(&format!("Gerado em: {}", generated_at.format("%d/%m/%Y %H:%M")));
    engine
}

/// Renders the registration as a PDF.
pub fn render_pdf(
    form: &FormSnapshot,
    signature: &SignatureBitmap,
    logo: &DynamicImage,
    generated_at: NaiveDateTime,
) -> Result<RenderedDocument> {
    let canvas = PdfCanvas::new(TITLE)?;
    let trimmed = signature.trimmed();
    let canvas = lay_out(canvas, form, trimmed.as_ref(), logo, generated_at).into_canvas();

    let page_count = canvas.page_count();
    let bytes = canvas.finish()?;
    let file_name = file_name_for(&form.full_name);

    info!(file_name = %file_name, pages = page_count, bytes = bytes.len(), "document rendered");
    Ok(RenderedDocument {
        bytes,
        file_name,
        page_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_keeps_the_typed_name() {
        assert_eq!(file_name_for("Ana Souza"), "Ficha-Ana Souza.pdf");
        assert_eq!(file_name_for("  João  "), "Ficha-João.pdf");
    }

    #[test]
    fn test_file_name_replaces_path_separators() {
        assert_eq!(file_name_for("a/b\\c"), "Ficha-a_b_c.pdf");
    }

    #[test]
    fn test_safe_placeholder() {
        assert_eq!(safe("   "), "-");
        assert_eq!(safe(" 60 "), "60");
    }

    #[test]
    fn test_health_values() {
        assert_eq!(health_value(&HealthQuestion::answered(Answer::Yes, "Joelho")), "Sim — Joelho");
        assert_eq!(health_value(&HealthQuestion::answered(Answer::Yes, " ")), "Sim — -");
        assert_eq!(health_value(&HealthQuestion::answered(Answer::No, "Joelho")), "Não");
        assert_eq!(health_value(&HealthQuestion::default()), "Não");
    }
}
