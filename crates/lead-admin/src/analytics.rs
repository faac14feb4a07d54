//! Analytics records pushed by the application.

use serde_json::{Value, json};

use lead_form::digits_only;

/// Currency reported with lead conversions.
pub const DEFAULT_CURRENCY: &str = "BRL";

/// Contact data attached to a `generate_lead` event.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadGeneration<'a> {
    pub email: &'a str,
    /// Raw phone text; only its digits are sent.
    pub phone: &'a str,
    pub value: Option<f64>,
    pub currency: Option<&'a str>,
}

impl<'a> LeadGeneration<'a> {
    pub fn new(email: &'a str, phone: &'a str) -> Self {
        Self {
            email,
            phone,
            value: None,
            currency: None,
        }
    }

    /// The `generate_lead` record.
    pub fn to_record(&self) -> Value {
        let value = match self.value {
            Some(value) if value != 0.0 => json!(value),
            _ => json!(0),
        };
        json!({
            "event": "generate_lead",
            "ecommerce": {
                "value": value,
                "currency": self.currency.unwrap_or(DEFAULT_CURRENCY),
            },
            "user_data": {
                "email": self.email,
                "phone_number": digits_only(self.phone),
            },
        })
    }
}

/// A `pageview` record for `page`.
pub fn pageview(page: &str) -> Value {
    json!({ "event": "pageview", "page": page })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_generation_sends_digits_only() {
        let record = LeadGeneration::new("ana@example.com", "(11) 98765-4321").to_record();
        insta::assert_json_snapshot!(record, @r#"
        {
          "ecommerce": {
            "currency": "BRL",
            "value": 0
          },
          "event": "generate_lead",
          "user_data": {
            "email": "ana@example.com",
            "phone_number": "11987654321"
          }
        }
        "#);
    }

    #[test]
    fn explicit_value_and_currency() {
        let record = LeadGeneration {
            value: Some(150.5),
            currency: Some("USD"),
            ..LeadGeneration::new("a@b.co", "")
        }
        .to_record();
        assert_eq!(record["ecommerce"]["value"], json!(150.5));
        assert_eq!(record["ecommerce"]["currency"], "USD");
        assert_eq!(record["user_data"]["phone_number"], "");
    }

    #[test]
    fn pageview_record() {
        assert_eq!(pageview("/"), json!({"event": "pageview", "page": "/"}));
    }
}
