//! Prefilled WhatsApp conversation links.

use aarogya_types::Language;
use serde::Serialize;

use crate::constants::{FALLBACK_WHATSAPP_NUMBER, WHATSAPP_SEND_URL};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WhatsAppLink {
    pub url: String,
    pub button_text: String,
}

/// Builds links to the configured WhatsApp number.
#[derive(Clone, Debug)]
pub struct WhatsAppLinker {
    phone: String,
}

impl WhatsAppLinker {
    /// Use `configured` as the recipient, keeping only digits and `+`.
    ///
    /// A missing or blank number falls back to the public helpline.
    pub fn new(configured: Option<&str>) -> Self {
        let cleaned: Option<String> = configured
            .map(|n| n.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect())
            .filter(|n: &String| !n.is_empty());

        let phone = cleaned.unwrap_or_else(|| {
            tracing::warn!("WhatsApp number not configured, using fallback number");
            FALLBACK_WHATSAPP_NUMBER.to_string()
        });
        Self { phone }
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Link that opens a chat with `message`, or the localized default greeting.
    pub fn url(&self, message: Option<&str>, language: Language) -> String {
        let text = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_message(language));
        format!(
            "{WHATSAPP_SEND_URL}?phone={}&text={}",
            self.phone,
            urlencoding::encode(text)
        )
    }

    pub fn link(&self, message: Option<&str>, language: Language, mobile: bool) -> WhatsAppLink {
        WhatsAppLink {
            url: self.url(message, language),
            button_text: button_text(language, mobile).to_string(),
        }
    }
}

pub fn default_message(language: Language) -> &'static str {
    match language {
        Language::English => "Hi Aarogya-AI! I need health information.",
        Language::Hindi => "नमस्ते आरोग्य-AI! मुझे स्वास्थ्य जानकारी चाहिए।",
        Language::Odia => "ନମସ୍କାର ଆରୋଗ୍ୟ-AI! ମୋତେ ସ୍ୱାସ୍ଥ୍ୟ ସୂଚନା ଦରକାର।",
    }
}

pub fn button_text(language: Language, mobile: bool) -> &'static str {
    match (language, mobile) {
        (Language::English, true) => "Open WhatsApp",
        (Language::English, false) => "Chat on WhatsApp Web",
        (Language::Hindi, true) => "WhatsApp खोलें",
        (Language::Hindi, false) => "WhatsApp Web पर चैट करें",
        (Language::Odia, true) => "WhatsApp ଖୋଲନ୍ତୁ",
        (Language::Odia, false) => "WhatsApp Web ରେ ଚାଟ କରନ୍ତୁ",
    }
}

/// Rough mobile detection from a `User-Agent` header.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    const MARKERS: [&str; 8] = [
        "android",
        "webos",
        "iphone",
        "ipad",
        "ipod",
        "blackberry",
        "iemobile",
        "opera mini",
    ];
    let ua = user_agent.to_lowercase();
    MARKERS.iter().any(|m| ua.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_is_cleaned() {
        let linker = WhatsAppLinker::new(Some("+91 (991) 725-0558"));
        assert_eq!(linker.phone(), "+919917250558");
    }

    #[test]
    fn test_missing_number_uses_fallback() {
        assert_eq!(WhatsAppLinker::new(None).phone(), FALLBACK_WHATSAPP_NUMBER);
        assert_eq!(WhatsAppLinker::new(Some("n/a")).phone(), FALLBACK_WHATSAPP_NUMBER);
    }

    #[test]
    fn test_url_with_explicit_message() {
        let linker = WhatsAppLinker::new(Some("15550001111"));
        assert_eq!(
            linker.url(Some("fever & cough"), Language::Hindi),
            "https://api.whatsapp.com/send?phone=15550001111&text=fever%20%26%20cough"
        );
    }

    #[test]
    fn test_url_with_default_message() {
        let linker = WhatsAppLinker::new(Some("15550001111"));
        let url = linker.url(None, Language::English);
        assert!(url.starts_with("https://api.whatsapp.com/send?phone=15550001111&text=Hi%20Aarogya-AI"));

        let hindi = linker.url(Some("   "), Language::Hindi);
        let encoded = hindi.split("text=").nth(1).unwrap();
        assert_eq!(
            urlencoding::decode(encoded).unwrap(),
            default_message(Language::Hindi)
        );
    }

    #[test]
    fn test_button_text_and_mobile_detection() {
        let android = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36";
        let desktop = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
        assert!(is_mobile_user_agent(android));
        assert!(!is_mobile_user_agent(desktop));

        let linker = WhatsAppLinker::new(None);
        assert_eq!(
            linker.link(None, Language::Odia, true).button_text,
            "WhatsApp ଖୋଲନ୍ତୁ"
        );
        assert_eq!(
            linker.link(None, Language::English, false).button_text,
            "Chat on WhatsApp Web"
        );
    }
}
