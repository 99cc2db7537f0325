use super::NotificationError;

/// Pre-filled messaging link: `https://<domain>/<digits>?text=<urlencoded>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    pub recipient: String,
    pub url: String,
}

/// Strip everything that is not a digit
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

impl DeepLink {
    pub fn compose(domain: &str, phone: &str, text: &str) -> Result<DeepLink, NotificationError> {
        let digits = normalize_phone(phone);
        if digits.is_empty() {
            return Err(NotificationError::InvalidPhone(phone.to_string()));
        }
        let domain = domain.trim().trim_end_matches('/');
        let url = format!("https://{}/{}?text={}", domain, digits, urlencoding::encode(text));
        Ok(DeepLink { recipient: digits, url })
    }
}
