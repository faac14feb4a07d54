//! Lead form definition shared by the public, new and edit pages.

use lead_form::{FieldRules, FormValues, RuleSet, ValidatorKind, parse_date};
use lead_model::fields::{
    CARGO, CONTACT_FIELDS, DATA_NASCIMENTO, EMAIL, MENSAGEM, NOME, TELEFONE, TRACKING_FIELDS,
};
use lead_model::{Lead, LeadFields};

pub const EMAIL_INVALID: &str = "E-mail inválido";
pub const PHONE_INVALID: &str = "Telefone inválido";
pub const DATE_INVALID: &str = "Data inválida";

/// Predicate failures reported as `Valor inválido`.
pub fn lead_rules() -> RuleSet {
    RuleSet::new()
        .field(NOME, FieldRules::required())
        .field(EMAIL, FieldRules::required().validate_with(ValidatorKind::Email))
        .field(TELEFONE, FieldRules::required().validate_with(ValidatorKind::Phone))
        .field(CARGO, FieldRules::required())
        .field(
            DATA_NASCIMENTO,
            FieldRules::required().validate_with(ValidatorKind::Date),
        )
        .field(MENSAGEM, FieldRules::required())
}

/// Same fields as [`lead_rules`] with a message per predicate.
pub fn lead_rules_with_messages() -> RuleSet {
    RuleSet::new()
        .field(NOME, FieldRules::required())
        .field(
            EMAIL,
            FieldRules::required()
                .validate_with(ValidatorKind::Email)
                .message(EMAIL_INVALID),
        )
        .field(
            TELEFONE,
            FieldRules::required()
                .validate_with(ValidatorKind::Phone)
                .message(PHONE_INVALID),
        )
        .field(CARGO, FieldRules::required())
        .field(
            DATA_NASCIMENTO,
            FieldRules::required()
                .validate_with(ValidatorKind::Date)
                .message(DATE_INVALID),
        )
        .field(MENSAGEM, FieldRules::required())
}

/// Empty contact fields.
pub fn contact_values() -> FormValues {
    CONTACT_FIELDS
        .iter()
        .map(|name| ((*name).to_string(), String::new()))
        .collect()
}

/// Empty contact and tracking fields.
pub fn capture_values() -> FormValues {
    CONTACT_FIELDS
        .iter()
        .chain(TRACKING_FIELDS.iter())
        .map(|name| ((*name).to_string(), String::new()))
        .collect()
}

/// Form values for editing `lead`, birth date as `YYYY-MM-DD`.
pub fn values_from_lead(lead: &Lead) -> FormValues {
    let mut values: FormValues = lead
        .fields()
        .to_pairs()
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    values.insert(
        DATA_NASCIMENTO.to_string(),
        to_input_date(&lead.data_nascimento),
    );
    values
}

/// Request payload from form values. Empty tracking values are omitted.
pub fn fields_from_values(values: &FormValues) -> LeadFields {
    LeadFields::from_lookup(|name| values.get(name).map(String::as_str))
}

/// Date part of a stored date or timestamp; unparseable input is returned
/// unchanged.
///
/// Zoned timestamps keep their own calendar day: `1990-05-17T00:00:00+03:00`
/// gives `1990-05-17`, not the UTC day before.
pub fn to_input_date(raw: &str) -> String {
    parse_date(raw).map_or_else(
        || raw.to_string(),
        |dt| dt.date().format("%Y-%m-%d").to_string(),
    )
}
