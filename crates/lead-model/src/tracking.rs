//! Marketing attribution parameters (UTM tags and click ids).

use serde::{Deserialize, Serialize};

use crate::fields;

/// Attribution parameters stored verbatim with a lead.
///
/// Every field is optional and omitted from payloads when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gclid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbclid: Option<String>,
}

impl TrackingParams {
    /// Look up a parameter by its wire name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let slot = match name {
            fields::UTM_SOURCE => &self.utm_source,
            fields::UTM_MEDIUM => &self.utm_medium,
            fields::UTM_CAMPAIGN => &self.utm_campaign,
            fields::UTM_TERM => &self.utm_term,
            fields::UTM_CONTENT => &self.utm_content,
            fields::GCLID => &self.gclid,
            fields::FBCLID => &self.fbclid,
            _ => return None,
        };
        slot.as_deref()
    }

    /// Set a parameter by its wire name. Empty values clear the slot.
    ///
    /// Returns false if `name` is not a tracking parameter.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            fields::UTM_SOURCE => &mut self.utm_source,
            fields::UTM_MEDIUM => &mut self.utm_medium,
            fields::UTM_CAMPAIGN => &mut self.utm_campaign,
            fields::UTM_TERM => &mut self.utm_term,
            fields::UTM_CONTENT => &mut self.utm_content,
            fields::GCLID => &mut self.gclid,
            fields::FBCLID => &mut self.fbclid,
            _ => return false,
        };
        *slot = (!value.is_empty()).then(|| value.to_string());
        true
    }

    /// Iterate over the parameters that are present, in wire order.
    pub fn present(&self) -> impl Iterator<Item = (&'static str, &str)> {
        fields::TRACKING_FIELDS
            .into_iter()
            .filter_map(move |name| self.get(name).map(|value| (name, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_by_wire_name() {
        let mut params = TrackingParams::default();
        assert!(params.is_empty());
        assert!(params.set("utm_source", "google"));
        assert!(params.set("fbclid", "abc"));
        assert!(!params.set("nome", "Ana"));

        assert_eq!(params.get("utm_source"), Some("google"));
        assert_eq!(params.get("utm_medium"), None);
        let present: Vec<_> = params.present().collect();
        assert_eq!(present, vec![("utm_source", "google"), ("fbclid", "abc")]);
    }

    #[test]
    fn empty_value_clears_slot() {
        let mut params = TrackingParams::default();
        params.set("gclid", "xyz");
        params.set("gclid", "");
        assert!(params.is_empty());
    }
}
