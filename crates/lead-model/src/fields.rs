//! Wire names of the lead form fields.
//!
//! These are the keys used in form value maps, in the JSON payloads and in
//! the landing-page query string, so they are kept in one place.

pub const NOME: &str = "nome";
pub const EMAIL: &str = "email";
pub const TELEFONE: &str = "telefone";
pub const CARGO: &str = "cargo";
pub const DATA_NASCIMENTO: &str = "dataNascimento";
pub const MENSAGEM: &str = "mensagem";

pub const UTM_SOURCE: &str = "utm_source";
pub const UTM_MEDIUM: &str = "utm_medium";
pub const UTM_CAMPAIGN: &str = "utm_campaign";
pub const UTM_TERM: &str = "utm_term";
pub const UTM_CONTENT: &str = "utm_content";
pub const GCLID: &str = "gclid";
pub const FBCLID: &str = "fbclid";

/// Fields a person fills in by hand.
pub const CONTACT_FIELDS: [&str; 6] = [NOME, EMAIL, TELEFONE, CARGO, DATA_NASCIMENTO, MENSAGEM];

/// Attribution fields captured from the originating URL, never validated.
pub const TRACKING_FIELDS: [&str; 7] = [
    UTM_SOURCE,
    UTM_MEDIUM,
    UTM_CAMPAIGN,
    UTM_TERM,
    UTM_CONTENT,
    GCLID,
    FBCLID,
];

/// Returns true if `name` is one of the tracking fields.
pub fn is_tracking_field(name: &str) -> bool {
    TRACKING_FIELDS.contains(&name)
}

/// Returns true if `name` is any known lead field.
pub fn is_lead_field(name: &str) -> bool {
    CONTACT_FIELDS.contains(&name) || is_tracking_field(name)
}
