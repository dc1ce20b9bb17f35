// ficha-cadastro: registration form state

use std::fmt;

use chrono::NaiveDate;
use tracing::debug;

use crate::format::{compute_age, format_phone, DISPLAY_DATE_FORMAT};

// ============================================================================
// Field identity
// ============================================================================

/// Every input of the registration screen, in visual top-to-bottom order.
///
/// The derived `Ord` follows declaration order, which is what error
/// listing and focus routing rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    BirthDate,
    Age,
    Weight,
    Address,
    Phone,
    GuardianName,
    GuardianPhone,
    EmergencyPhone,
    DueDay,
    Restriction,
    RestrictionDetail,
    Medication,
    MedicationDetail,
    PriorActivity,
    PriorActivityDetail,
    RegistrationDate,
    Signature,
}

impl Field {
    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Nome completo",
            Field::BirthDate => "Data de nascimento",
            Field::Age => "Idade",
            Field::Weight => "Peso (kg)",
            Field::Address => "Endereço",
            Field::Phone => "Telefone",
            Field::GuardianName => "Responsável (se menor)",
            Field::GuardianPhone => "Telefone responsável",
            Field::EmergencyPhone => "Contato emergência",
            Field::DueDay => "Dia de vencimento (1 a 31)",
            Field::Restriction => "Possui alguma restrição médica?",
            Field::RestrictionDetail => "Qual restrição?",
            Field::Medication => "Faz uso contínuo de medicamentos?",
            Field::MedicationDetail => "Quais medicamentos?",
            Field::PriorActivity => "Já praticou alguma atividade física?",
            Field::PriorActivityDetail => "Qual atividade?",
            Field::RegistrationDate => "Data",
            Field::Signature => "Assinatura",
        }
    }

    /// Whether the field is a text input that can take keyboard focus.
    /// Radio groups, the read-only date and the signature pad cannot.
    pub fn is_focusable(self) -> bool {
        !matches!(
            self,
            Field::Restriction
                | Field::Medication
                | Field::PriorActivity
                | Field::RegistrationDate
                | Field::Signature
        )
    }

    pub fn is_phone(self) -> bool {
        matches!(self, Field::Phone | Field::GuardianPhone | Field::EmergencyPhone)
    }

    /// The elaboration field paired with a yes/no health question.
    pub fn detail_of(self) -> Option<Field> {
        match self {
            Field::Restriction => Some(Field::RestrictionDetail),
            Field::Medication => Some(Field::MedicationDetail),
            Field::PriorActivity => Some(Field::PriorActivityDetail),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Health questions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Parses the radio value, accent-less spelling included.
    pub fn parse(value: &str) -> Option<Answer> {
        match value.trim().to_lowercase().as_str() {
            "sim" | "s" => Some(Answer::Yes),
            "não" | "nao" | "n" => Some(Answer::No),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Answer::Yes => "Sim",
            Answer::No => "Não",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthQuestion {
    pub answer: Option<Answer>,
    pub detail: String,
}

impl HealthQuestion {
    pub fn answered(answer: Answer, detail: &str) -> Self {
        let detail = match answer {
            Answer::Yes => detail.to_string(),
            Answer::No => String::new(),
        };
        Self {
            answer: Some(answer),
            detail,
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Current values of one in-progress registration.
///
/// Numeric fields stay strings; whether they parse is decided by the
/// validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub full_name: String,
    /// ISO `YYYY-MM-DD`, as produced by a date input.
    pub birth_date: String,
    /// Derived from `birth_date`, never edited directly.
    pub age: String,
    pub weight: String,
    pub address: String,
    pub phone: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub emergency_phone: String,
    pub due_day: String,
    pub restriction: HealthQuestion,
    pub medication: HealthQuestion,
    pub prior_activity: HealthQuestion,
    /// Display-formatted (`dd/mm/yyyy`).
    pub registration_date: String,
    /// Reference date for age derivation.
    today: NaiveDate,
}

impl FormSnapshot {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            full_name: String::new(),
            birth_date: String::new(),
            age: String::new(),
            weight: String::new(),
            address: String::new(),
            phone: String::new(),
            guardian_name: String::new(),
            guardian_phone: String::new(),
            emergency_phone: String::new(),
            due_day: String::new(),
            restriction: HealthQuestion::default(),
            medication: HealthQuestion::default(),
            prior_activity: HealthQuestion::default(),
            registration_date: today.format(DISPLAY_DATE_FORMAT).to_string(),
            today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn question(&self, field: Field) -> Option<&HealthQuestion> {
        match field {
            Field::Restriction | Field::RestrictionDetail => Some(&self.restriction),
            Field::Medication | Field::MedicationDetail => Some(&self.medication),
            Field::PriorActivity | Field::PriorActivityDetail => Some(&self.prior_activity),
            _ => None,
        }
    }

    fn question_mut(&mut self, field: Field) -> Option<&mut HealthQuestion> {
        match field {
            Field::Restriction | Field::RestrictionDetail => Some(&mut self.restriction),
            Field::Medication | Field::MedicationDetail => Some(&mut self.medication),
            Field::PriorActivity | Field::PriorActivityDetail => Some(&mut self.prior_activity),
            _ => None,
        }
    }

    /// Current value of a field as the input would display it.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::BirthDate => &self.birth_date,
            Field::Age => &self.age,
            Field::Weight => &self.weight,
            Field::Address => &self.address,
            Field::Phone => &self.phone,
            Field::GuardianName => &self.guardian_name,
            Field::GuardianPhone => &self.guardian_phone,
            Field::EmergencyPhone => &self.emergency_phone,
            Field::DueDay => &self.due_day,
            Field::Restriction | Field::Medication | Field::PriorActivity => self
                .question(field)
                .and_then(|q| q.answer)
                .map(Answer::as_str)
                .unwrap_or(""),
            Field::RestrictionDetail | Field::MedicationDetail | Field::PriorActivityDetail => {
                self.question(field).map(|q| q.detail.as_str()).unwrap_or("")
            }
            Field::RegistrationDate => &self.registration_date,
            Field::Signature => "",
        }
    }

    /// Applies one edit the way the input's change handler does and returns
    /// the fields whose error entries the edit clears.
    ///
    /// Phone inputs are masked, a new birth date re-derives the age, and a
    /// "Não" answer empties the paired elaboration.
    pub fn apply(&mut self, field: Field, raw: &str) -> Vec<Field> {
        let value = if field.is_phone() {
            format_phone(raw)
        } else {
            raw.to_string()
        };

        match field {
            Field::FullName => self.full_name = value,
            Field::BirthDate => {
                self.age = compute_age(&value, self.today);
                self.birth_date = value;
                return vec![Field::BirthDate, Field::Age];
            }
            Field::Age => {
                debug!("age is derived from the birth date, ignoring direct edit");
                return Vec::new();
            }
            Field::Weight => self.weight = value,
            Field::Address => self.address = value,
            Field::Phone => self.phone = value,
            Field::GuardianName => self.guardian_name = value,
            Field::GuardianPhone => self.guardian_phone = value,
            Field::EmergencyPhone => self.emergency_phone = value,
            Field::DueDay => self.due_day = value,
            Field::Restriction | Field::Medication | Field::PriorActivity => {
                let answer = Answer::parse(&value);
                if answer.is_none() && !value.trim().is_empty() {
                    debug!(field = ?field, value = %value, "unrecognized yes/no answer");
                }
                let mut cleared = vec![field];
                if let Some(question) = self.question_mut(field) {
                    question.answer = answer;
                    if answer == Some(Answer::No) {
                        question.detail.clear();
                        cleared.extend(field.detail_of());
                    }
                }
                return cleared;
            }
            Field::RestrictionDetail | Field::MedicationDetail | Field::PriorActivityDetail => {
                if let Some(question) = self.question_mut(field) {
                    if question.answer == Some(Answer::No) {
                        debug!(field = ?field, "elaboration ignored for a \"Não\" answer");
                        return Vec::new();
                    }
                    question.detail = value;
                }
            }
            Field::RegistrationDate => self.registration_date = value,
            Field::Signature => return Vec::new(),
        }
        vec![field]
    }
}
