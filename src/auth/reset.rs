use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};

pub const RESET_TOKEN_BYTES: usize = 20;
pub const RESET_TOKEN_TTL: Duration = Duration::minutes(10);

/// A freshly minted reset token. `raw` goes to the user, `hash` and
/// `expires_at` go to the store.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub raw: String,
    pub hash: String,
    pub expires_at: OffsetDateTime,
}

impl ResetToken {
    pub fn issue(now: OffsetDateTime) -> Self {
        let mut bytes = [0u8; RESET_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let raw = hex::encode(bytes);
        Self {
            hash: hash_token(&raw),
            raw,
            expires_at: now + RESET_TOKEN_TTL,
        }
    }
}

pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

pub fn is_live(expires_at: OffsetDateTime, now: OffsetDateTime) -> bool {
    expires_at > now
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn raw_token_is_forty_hex_chars_and_never_the_hash() {
        let t = ResetToken::issue(OffsetDateTime::now_utc());
        assert_eq!(t.raw.len(), RESET_TOKEN_BYTES * 2);
        assert!(t.raw.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(t.raw, t.hash);
        assert_eq!(t.hash, hash_token(&t.raw));
    }

    #[test]
    fn tokens_are_unique() {
        let now = OffsetDateTime::now_utc();
        assert_ne!(ResetToken::issue(now).raw, ResetToken::issue(now).raw);
    }

    #[test]
    fn expiry_is_ten_minutes_out() {
        let now = datetime!(2024-05-01 12:00 UTC);
        let t = ResetToken::issue(now);
        assert_eq!(t.expires_at, datetime!(2024-05-01 12:10 UTC));
    }

    #[test]
    fn liveness_boundary() {
        let issued = datetime!(2024-05-01 12:00 UTC);
        let t = ResetToken::issue(issued);
        assert!(is_live(t.expires_at, issued + Duration::seconds(9 * 60 + 59)));
        assert!(!is_live(t.expires_at, issued + RESET_TOKEN_TTL));
        assert!(!is_live(t.expires_at, issued + Duration::seconds(10 * 60 + 1)));
    }

    #[test]
    fn hash_is_sha256_hex() {
        assert_eq!(
            hash_token(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
