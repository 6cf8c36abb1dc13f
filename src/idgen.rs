use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::{Rng, RngCore};

const ORDER_SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ORDER_SUFFIX_LEN: usize = 4;
const TOKEN_BYTES: usize = 32;

/// Human-readable order number, `ORD-<UTC timestamp>-<suffix>`. The random
/// suffix disambiguates orders placed within the same second; the store's
/// unique index catches the residual collision and the caller retries.
pub fn order_number(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ORDER_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..ORDER_SUFFIX_CHARSET.len());
            ORDER_SUFFIX_CHARSET[idx] as char
        })
        .collect();
    format!("ORD-{}-{}", now.format("%Y%m%d%H%M%S"), suffix)
}

/// 256-bit acceptance token from the OS RNG, encoded URL-safe without
/// padding so it can ride in a path segment.
pub fn acceptance_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn order_number_layout() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let number = order_number(now);

        assert!(number.starts_with("ORD-20250314092653-"));
        let suffix = number.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), ORDER_SUFFIX_LEN);
        assert!(suffix
            .bytes()
            .all(|b| ORDER_SUFFIX_CHARSET.contains(&b)));
    }

    #[test]
    fn acceptance_token_is_url_safe() {
        let token = acceptance_token();

        // 32 bytes -> ceil(32 * 4 / 3) unpadded base64 characters.
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn acceptance_tokens_do_not_repeat() {
        let a = acceptance_token();
        let b = acceptance_token();
        assert_ne!(a, b);
    }
}
