//! QR content payloads
//!
//! Builds the text encoded into a QR code for each content type: WiFi join
//! strings, vCard 3.0, `mailto:`, `sms:` and `tel:` URIs. A builder returns
//! an empty string when its required field is missing.

use serde::{Deserialize, Serialize};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// WiFi network security mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiSecurity {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    NoPass,
}

impl WifiSecurity {
    pub fn as_str(&self) -> &'static str {
        match self {
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wep => "WEP",
            WifiSecurity::NoPass => "nopass",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifiData {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub security: WifiSecurity,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VCardData {
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub phone: String,
    pub email: String,
    pub url: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailData {
    pub email: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsData {
    pub phone: String,
    pub message: String,
}

/// Structured content for one QR code, tagged by `content_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "content_type", content = "data", rename_all = "lowercase")]
pub enum ContentPayload {
    Url(String),
    Text(String),
    Phone(String),
    Wifi(WifiData),
    Vcard(VCardData),
    Email(EmailData),
    Sms(SmsData),
}

impl ContentPayload {
    /// Renders the payload as QR content text.
    pub fn encode(&self) -> String {
        match self {
            ContentPayload::Url(text) | ContentPayload::Text(text) => text.clone(),
            ContentPayload::Phone(number) => format!("tel:{number}"),
            ContentPayload::Wifi(wifi) => encode_wifi(wifi),
            ContentPayload::Vcard(card) => encode_vcard(card),
            ContentPayload::Email(email) => encode_email(email),
            ContentPayload::Sms(sms) => encode_sms(sms),
        }
    }
}

fn encode_wifi(wifi: &WifiData) -> String {
    if wifi.ssid.is_empty() {
        return String::new();
    }
    format!(
        "WIFI:T:{};S:{};P:{};H:{};;",
        wifi.security.as_str(),
        wifi.ssid,
        wifi.password,
        wifi.hidden
    )
}

fn encode_vcard(card: &VCardData) -> String {
    if card.first_name.is_empty() && card.last_name.is_empty() {
        return String::new();
    }

    let mut out = String::from("BEGIN:VCARD\nVERSION:3.0\n");
    out.push_str(&format!("FN:{} {}\n", card.first_name, card.last_name));
    out.push_str(&format!("N:{};{};;;\n", card.last_name, card.first_name));

    let optional = [
        ("ORG", &card.organization),
        ("TEL", &card.phone),
        ("EMAIL", &card.email),
        ("URL", &card.url),
    ];
    for (tag, value) in optional {
        if !value.is_empty() {
            out.push_str(&format!("{tag}:{value}\n"));
        }
    }
    if !card.address.is_empty() {
        out.push_str(&format!("ADR:;;{};;;;\n", card.address));
    }

    out.push_str("END:VCARD");
    out
}

fn encode_email(email: &EmailData) -> String {
    if email.email.is_empty() {
        return String::new();
    }
    format!(
        "mailto:{}?subject={}&body={}",
        email.email,
        encode_component(&email.subject),
        encode_component(&email.body)
    )
}

fn encode_sms(sms: &SmsData) -> String {
    if sms.phone.is_empty() {
        return String::new();
    }
    format!("sms:{}?body={}", sms.phone, encode_component(&sms.message))
}

/// Characters left as-is in a URI component: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a URI component as UTF-8, spaces as `%20`.
fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wifi_payload() {
        let payload = ContentPayload::Wifi(WifiData {
            ssid: "Home".to_string(),
            password: "secret".to_string(),
            security: WifiSecurity::Wpa,
            hidden: false,
        });

        assert_eq!(payload.encode(), "WIFI:T:WPA;S:Home;P:secret;H:false;;");
    }

    #[test]
    fn test_wifi_without_ssid_is_empty() {
        let payload = ContentPayload::Wifi(WifiData::default());
        assert_eq!(payload.encode(), "");
    }

    #[test]
    fn test_vcard_payload() {
        let payload = ContentPayload::Vcard(VCardData {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            organization: "Analytical".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 St James's Square".to_string(),
            ..Default::default()
        });

        assert_eq!(
            payload.encode(),
            "BEGIN:VCARD\nVERSION:3.0\nFN:Ada Lovelace\nN:Lovelace;Ada;;;\nORG:Analytical\n\
             EMAIL:ada@example.com\nADR:;;12 St James's Square;;;;\nEND:VCARD"
        );
    }

    #[test]
    fn test_vcard_without_names_is_empty() {
        let payload = ContentPayload::Vcard(VCardData {
            phone: "123".to_string(),
            ..Default::default()
        });
        assert_eq!(payload.encode(), "");
    }

    #[test]
    fn test_email_payload_encodes_components() {
        let payload = ContentPayload::Email(EmailData {
            email: "a@example.com".to_string(),
            subject: "Hi there".to_string(),
            body: "1+1=2 & more".to_string(),
        });

        assert_eq!(
            payload.encode(),
            "mailto:a@example.com?subject=Hi%20there&body=1%2B1%3D2%20%26%20more"
        );
    }

    #[test]
    fn test_email_payload_keeps_unreserved_marks() {
        let payload = ContentPayload::Email(EmailData {
            email: "a@example.com".to_string(),
            subject: "Hi! (it's me)~".to_string(),
            body: "a*b_c-d.e café/?#".to_string(),
        });

        assert_eq!(
            payload.encode(),
            "mailto:a@example.com?subject=Hi!%20(it's%20me)~&body=a*b_c-d.e%20caf%C3%A9%2F%3F%23"
        );
    }

    #[test]
    fn test_sms_and_phone_payloads() {
        let sms = ContentPayload::Sms(SmsData {
            phone: "+15550100".to_string(),
            message: "on my way".to_string(),
        });
        assert_eq!(sms.encode(), "sms:+15550100?body=on%20my%20way");

        let sms = ContentPayload::Sms(SmsData {
            phone: "+15550100".to_string(),
            message: "ok!".to_string(),
        });
        assert_eq!(sms.encode(), "sms:+15550100?body=ok!");

        let phone = ContentPayload::Phone("+15550100".to_string());
        assert_eq!(phone.encode(), "tel:+15550100");
    }

    #[test]
    fn test_payload_deserializes_from_tagged_json() {
        let payload: ContentPayload = serde_json::from_value(json!({
            "content_type": "wifi",
            "data": {"ssid": "Cafe", "security": "nopass", "hidden": true}
        }))
        .unwrap();

        assert_eq!(payload.encode(), "WIFI:T:nopass;S:Cafe;P:;H:true;;");

        let url: ContentPayload =
            serde_json::from_value(json!({"content_type": "url", "data": "https://x.dev"})).unwrap();
        assert_eq!(url.encode(), "https://x.dev");
    }
}
