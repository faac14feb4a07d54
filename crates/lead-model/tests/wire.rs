//! Wire-format tests for lead payloads.

use insta::assert_json_snapshot;

use lead_model::{Lead, LeadFields, LeadId, TrackingParams};

#[test]
fn create_payload_shape() {
    let fields = LeadFields {
        nome: "Ana Souza".to_string(),
        email: "ana@example.com".to_string(),
        telefone: "(11) 98765-4321".to_string(),
        cargo: "Gerente".to_string(),
        data_nascimento: "1990-05-20".to_string(),
        mensagem: "Quero saber mais".to_string(),
        tracking: TrackingParams {
            utm_source: Some("google".to_string()),
            gclid: Some("abc123".to_string()),
            ..Default::default()
        },
    };

    assert_json_snapshot!(fields, @r#"
    {
      "nome": "Ana Souza",
      "email": "ana@example.com",
      "telefone": "(11) 98765-4321",
      "cargo": "Gerente",
      "dataNascimento": "1990-05-20",
      "mensagem": "Quero saber mais",
      "utm_source": "google",
      "gclid": "abc123"
    }
    "#);
}

#[test]
fn full_record_defaults_missing_tracking() {
    let json = r#"{
        "id": 12,
        "nome": "Bruno",
        "email": "bruno@example.com",
        "telefone": "1133334444",
        "cargo": "Analista",
        "dataNascimento": "1985-01-02T00:00:00.000Z",
        "mensagem": "Olá",
        "utm_campaign": "verao",
        "createdAt": "2024-06-10T14:30:00.000Z"
    }"#;

    let lead: Lead = serde_json::from_str(json).expect("parse lead");
    assert_eq!(lead.id, LeadId(12));
    assert_eq!(lead.tracking.utm_campaign.as_deref(), Some("verao"));
    assert_eq!(lead.tracking.utm_source, None);
    assert_eq!(lead.tracking.fbclid, None);
    assert_eq!(lead.fields().cargo, "Analista");
}

#[test]
fn null_tracking_values_are_absent() {
    let json = r#"{"id": 1, "nome": "C", "utm_source": null, "createdAt": ""}"#;
    let lead: Lead = serde_json::from_str(json).expect("parse lead");
    assert!(lead.tracking.is_empty());
    assert_eq!(lead.email, "");
}
