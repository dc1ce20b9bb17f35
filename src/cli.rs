// ficha-cadastro: command-line arguments and JSON form input

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::form::Field;
use crate::format::ISO_DATE_FORMAT;

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate a martial-arts academy registration form (Ficha de Cadastro) as PDF",
    args_override_self = true
)]
pub struct Args {
    /// JSON file with form values (same keys as the flags, camelCase)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Full name (first and last)
    #[arg(long)]
    pub nome: Option<String>,

    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    pub nascimento: Option<String>,

    /// Weight in kg
    #[arg(long)]
    pub peso: Option<String>,

    /// Address
    #[arg(long)]
    pub endereco: Option<String>,

    /// Phone, digits only or already masked
    #[arg(long)]
    pub telefone: Option<String>,

    /// Guardian name (for minors)
    #[arg(long)]
    pub responsavel: Option<String>,

    /// Guardian phone
    #[arg(long)]
    pub telefone_responsavel: Option<String>,

    /// Emergency contact phone
    #[arg(long)]
    pub emergencia: Option<String>,

    /// Monthly due day (1-31)
    #[arg(long)]
    pub vencimento: Option<String>,

    /// Medical restriction? (Sim/Não)
    #[arg(long)]
    pub restricao: Option<String>,

    /// Which restriction
    #[arg(long)]
    pub restricao_desc: Option<String>,

    /// Continuous medication? (Sim/Não)
    #[arg(long)]
    pub medicamentos: Option<String>,

    /// Which medications
    #[arg(long)]
    pub medicamentos_desc: Option<String>,

    /// Prior physical activity? (Sim/Não)
    #[arg(long)]
    pub atividade: Option<String>,

    /// Which activity
    #[arg(long)]
    pub atividade_desc: Option<String>,

    /// Registration date shown on the form (defaults to today, dd/mm/yyyy)
    #[arg(long)]
    pub data_cadastro: Option<String>,

    /// Signature image (PNG exported from the signature pad)
    #[arg(short, long)]
    pub signature: Option<String>,

    /// Logo image (file path or URL) centered in the header
    #[arg(long, default_value = "logo.png")]
    pub logo: String,

    /// Directory the PDF is written to
    #[arg(short = 'd', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Output filename (defaults to Ficha-<nome>.pdf in the output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Reference date for age and registration date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub today: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Form values read from `--input`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FormInput {
    pub nome: Option<String>,
    pub nascimento: Option<String>,
    pub peso: Option<String>,
    pub endereco: Option<String>,
    pub telefone: Option<String>,
    pub responsavel: Option<String>,
    pub telefone_responsavel: Option<String>,
    pub emergencia: Option<String>,
    pub vencimento: Option<String>,
    pub restricao: Option<String>,
    pub restricao_desc: Option<String>,
    pub medicamentos: Option<String>,
    pub medicamentos_desc: Option<String>,
    pub atividade: Option<String>,
    pub atividade_desc: Option<String>,
    pub data_hoje: Option<String>,
}

impl FormInput {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| AppError::InputError(format!("Invalid JSON: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::InputError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Overlays the values given on the command line.
    pub fn merge_args(mut self, args: &Args) -> Self {
        fn pick(slot: &mut Option<String>, flag: &Option<String>) {
            if flag.is_some() {
                slot.clone_from(flag);
            }
        }
        pick(&mut self.nome, &args.nome);
        pick(&mut self.nascimento, &args.nascimento);
        pick(&mut self.peso, &args.peso);
        pick(&mut self.endereco, &args.endereco);
        pick(&mut self.telefone, &args.telefone);
        pick(&mut self.responsavel, &args.responsavel);
        pick(&mut self.telefone_responsavel, &args.telefone_responsavel);
        pick(&mut self.emergencia, &args.emergencia);
        pick(&mut self.vencimento, &args.vencimento);
        pick(&mut self.restricao, &args.restricao);
        pick(&mut self.restricao_desc, &args.restricao_desc);
        pick(&mut self.medicamentos, &args.medicamentos);
        pick(&mut self.medicamentos_desc, &args.medicamentos_desc);
        pick(&mut self.atividade, &args.atividade);
        pick(&mut self.atividade_desc, &args.atividade_desc);
        pick(&mut self.data_hoje, &args.data_cadastro);
        self
    }

    /// Provided values as field edits, in screen order so that an answer
    /// is applied before its elaboration.
    pub fn edits(&self) -> Vec<(Field, &str)> {
        let values = [
            (Field::FullName, &self.nome),
            (Field::BirthDate, &self.nascimento),
            (Field::Weight, &self.peso),
            (Field::Address, &self.endereco),
            (Field::Phone, &self.telefone),
            (Field::GuardianName, &self.responsavel),
            (Field::GuardianPhone, &self.telefone_responsavel),
            (Field::EmergencyPhone, &self.emergencia),
            (Field::DueDay, &self.vencimento),
            (Field::Restriction, &self.restricao),
            (Field::RestrictionDetail, &self.restricao_desc),
            (Field::Medication, &self.medicamentos),
            (Field::MedicationDetail, &self.medicamentos_desc),
            (Field::PriorActivity, &self.atividade),
            (Field::PriorActivityDetail, &self.atividade_desc),
            (Field::RegistrationDate, &self.data_hoje),
        ];
        values
            .into_iter()
            .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
            .collect()
    }
}

pub fn parse_today(date_str: &Option<String>) -> Result<NaiveDate> {
    match date_str {
        Some(s) => NaiveDate::parse_from_str(s, ISO_DATE_FORMAT)
            .map_err(|_| AppError::DateError(s.clone())),
        None => Ok(Local::now().date_naive()),
    }
}
