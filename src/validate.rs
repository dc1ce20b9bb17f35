// ficha-cadastro: form validation

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::form::{Answer, Field, FormSnapshot, HealthQuestion};
use crate::format::is_phone_complete;

/// Field-to-message map of current validation failures, iterated in
/// screen order.
pub type ErrorMap = BTreeMap<Field, String>;

pub const MSG_REQUIRED: &str = "Campo obrigatório.";
pub const MSG_FULL_NAME: &str = "Digite nome completo (nome e sobrenome).";
pub const MSG_PHONE: &str = "Telefone incompleto. Use (xx) xxxxx-xxxx.";
pub const MSG_DUE_DAY: &str = "Dia de vencimento deve ser entre 1 e 31.";
pub const MSG_SELECT: &str = "Selecione uma opção.";
pub const MSG_SIGNATURE: &str = "A assinatura é obrigatória.";

static FULL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-zÀ-ÿ]+(\s[A-Za-zÀ-ÿ]+)+$").expect("valid name pattern"));

/// Where the screen should move after a failed submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Field(Field),
    ScrollToTop,
}

/// Checks every rule independently and collects all failures.
///
/// A missing signature is reported under [`Field::Signature`] like any
/// other field.
pub fn validate(form: &FormSnapshot, signature_drawn: bool) -> ErrorMap {
    let mut errors = ErrorMap::new();

    let name = form.full_name.trim();
    if name.is_empty() {
        errors.insert(Field::FullName, MSG_REQUIRED.to_string());
    } else if !FULL_NAME.is_match(name) {
        errors.insert(Field::FullName, MSG_FULL_NAME.to_string());
    }

    if form.birth_date.is_empty() {
        errors.insert(Field::BirthDate, MSG_REQUIRED.to_string());
    }

    for (field, value) in [
        (Field::Age, &form.age),
        (Field::Weight, &form.weight),
        (Field::Address, &form.address),
    ] {
        if value.trim().is_empty() {
            errors.insert(field, MSG_REQUIRED.to_string());
        }
    }

    if form.emergency_phone.trim().is_empty() {
        errors.insert(Field::EmergencyPhone, MSG_REQUIRED.to_string());
    } else if !is_phone_complete(&form.emergency_phone) {
        errors.insert(Field::EmergencyPhone, MSG_PHONE.to_string());
    }

    let due_day = form.due_day.trim();
    if due_day.is_empty() {
        errors.insert(Field::DueDay, MSG_REQUIRED.to_string());
    } else if !is_valid_due_day(due_day) {
        errors.insert(Field::DueDay, MSG_DUE_DAY.to_string());
    }

    for (field, value) in [
        (Field::Phone, &form.phone),
        (Field::GuardianPhone, &form.guardian_phone),
    ] {
        if !value.trim().is_empty() && !is_phone_complete(value) {
            errors.insert(field, MSG_PHONE.to_string());
        }
    }

    check_health(&mut errors, Field::Restriction, &form.restriction, "Descreva a restrição.");
    check_health(&mut errors, Field::Medication, &form.medication, "Informe quais medicamentos.");
    check_health(
        &mut errors,
        Field::PriorActivity,
        &form.prior_activity,
        "Informe qual atividade.",
    );

    if !signature_drawn {
        errors.insert(Field::Signature, MSG_SIGNATURE.to_string());
    }

    errors
}

fn check_health(errors: &mut ErrorMap, field: Field, question: &HealthQuestion, detail_msg: &str) {
    match question.answer {
        None => {
            errors.insert(field, MSG_SELECT.to_string());
        }
        Some(Answer::Yes) if question.detail.trim().is_empty() => {
            if let Some(detail) = field.detail_of() {
                errors.insert(detail, detail_msg.to_string());
            }
        }
        Some(_) => {}
    }
}

fn is_valid_due_day(value: &str) -> bool {
    match value.parse::<f64>() {
        Ok(day) => day.is_finite() && (1.0..=31.0).contains(&day),
        Err(_) => false,
    }
}

/// Focus routing for the first failing field in screen order.
pub fn first_error_focus(errors: &ErrorMap) -> Option<FocusTarget> {
    let (&field, _) = errors.iter().next()?;
    if field.is_focusable() {
        Some(FocusTarget::Field(field))
    } else {
        Some(FocusTarget::ScrollToTop)
    }
}
