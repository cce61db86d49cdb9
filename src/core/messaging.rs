//! Client message composition - charge reminders and appointment confirmations.
//!
//! The operator contacts clients over WhatsApp. This module picks the message
//! for an appointment or a client record and builds the `wa.me` link that opens
//! a chat with the text pre-filled.

use crate::entities::{appointment, client};
use chrono::{NaiveDate, NaiveTime};

/// What a message is about: enough of an appointment or client to pick the text.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSubject {
    /// Client name used in the greeting
    pub client_name: String,
    /// Phone as stored, with any formatting
    pub phone: String,
    /// Service label, when the subject is an appointment
    pub service: Option<String>,
    /// Appointment day, when known
    pub date: Option<NaiveDate>,
    /// Appointment time, when known
    pub time: Option<NaiveTime>,
    /// Amount still owed
    pub pending: f64,
}

impl From<&appointment::Model> for MessageSubject {
    fn from(value: &appointment::Model) -> Self {
        Self {
            client_name: value.client_name.clone(),
            phone: value.phone.clone(),
            service: Some(value.service.clone()),
            date: Some(value.date),
            time: Some(value.time),
            pending: value.pending_amount(),
        }
    }
}

impl From<&client::Model> for MessageSubject {
    fn from(value: &client::Model) -> Self {
        Self {
            client_name: value.name.clone(),
            phone: value.phone.clone(),
            service: None,
            date: None,
            time: None,
            pending: value.outstanding_balance.max(0.0),
        }
    }
}

/// A composed message and the link that sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMessage {
    /// Plain message text
    pub text: String,
    /// `https://wa.me/...` link with the text pre-filled
    pub link: String,
}

/// Formats an amount with the currency symbol and a decimal comma, e.g. `R$ 50,00`.
#[must_use]
pub fn format_money(currency: &str, amount: f64) -> String {
    format!("{currency} {}", format!("{amount:.2}").replace('.', ","))
}

/// Picks the message text for a subject.
///
/// A positive pending amount gets a charge reminder; otherwise a subject with
/// a date and time gets a confirmation request; anything else a greeting.
#[must_use]
pub fn compose_text(subject: &MessageSubject, currency: &str) -> String {
    if subject.pending > 0.0 {
        let what = subject
            .service
            .as_deref()
            .map_or_else(|| "your previous services".to_string(), |s| format!("the {s} service"));
        return format!(
            "Hi {}! Hope you are well 😊\n\nJust a note that there is an open balance of {} for {}.\n\nHow would you prefer to settle it? I'm at your disposal!",
            subject.client_name,
            format_money(currency, subject.pending),
            what
        );
    }

    if let (Some(date), Some(time)) = (subject.date, subject.time) {
        return format!(
            "Hi {}, can you confirm your {} appointment on {} at {}?",
            subject.client_name,
            subject.service.as_deref().unwrap_or("booked"),
            date.format("%d/%m/%Y"),
            time.format("%H:%M")
        );
    }

    format!("Hi {}, how are you? Can we talk?", subject.client_name)
}

/// Builds a `wa.me` link for `phone` (non-digits stripped, country code prepended).
///
/// # Arguments
/// * `country_code` - Digits prepended to the phone, e.g. `55`
/// * `phone` - Phone as stored, with any formatting
/// * `text` - Message text, percent-encoded into the link
#[must_use]
pub fn whatsapp_link(country_code: &str, phone: &str, text: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!(
        "https://wa.me/{country_code}{digits}?text={}",
        percent_encode(text)
    )
}

/// Composes the message for a subject together with its link.
#[must_use]
pub fn compose(subject: &MessageSubject, currency: &str, country_code: &str) -> ClientMessage {
    let text = compose_text(subject, currency);
    let link = whatsapp_link(country_code, &subject.phone, &text);
    ClientMessage { text, link }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

fn percent_encode(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len() * 3);
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            encoded.push('%');
            encoded.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
            encoded.push(char::from(HEX_DIGITS[usize::from(byte & 0x0F)]));
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_charge_message_for_pending_appointment() {
        let mut appt = ana_appointment(1);
        appt.amount_paid = 100.0;
        let text = compose_text(&MessageSubject::from(&appt), "R$");
        assert!(text.contains("Hi Ana!"));
        assert!(text.contains("R$ 50,00"));
        assert!(text.contains("the Volume Russo service"));
    }

    #[test]
    fn test_confirmation_message_when_paid_up() {
        let mut appt = ana_appointment(1);
        appt.amount_paid = appt.total_price;
        let text = compose_text(&MessageSubject::from(&appt), "R$");
        assert_eq!(
            text,
            "Hi Ana, can you confirm your Volume Russo appointment on 10/03/2025 at 14:00?"
        );
    }

    #[test]
    fn test_client_messages() {
        let mut ana = client::Model {
            id: 1,
            name: "Ana".to_string(),
            phone: "(11) 98765-4321".to_string(),
            outstanding_balance: 0.0,
            cancellations: 0,
        };
        assert_eq!(
            compose_text(&MessageSubject::from(&ana), "R$"),
            "Hi Ana, how are you? Can we talk?"
        );

        ana.outstanding_balance = 35.5;
        let text = compose_text(&MessageSubject::from(&ana), "R$");
        assert!(text.contains("R$ 35,50"));
        assert!(text.contains("your previous services"));
    }

    #[test]
    fn test_whatsapp_link() {
        let link = whatsapp_link("55", "(11) 98765-4321", "Oi Ana, tudo bem?");
        assert_eq!(
            link,
            "https://wa.me/5511987654321?text=Oi%20Ana%2C%20tudo%20bem%3F"
        );
    }

    #[test]
    fn test_percent_encode_utf8() {
        assert_eq!(percent_encode("ção"), "%C3%A7%C3%A3o");
        assert_eq!(percent_encode("a\nb"), "a%0Ab");
        assert_eq!(percent_encode("100% ok!"), "100%25%20ok%21");
        assert_eq!(percent_encode("\u{ff}"), "%C3%BF");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("R$", 1234.5), "R$ 1234,50");
        assert_eq!(format_money("€", 0.0), "€ 0,00");
    }
}
