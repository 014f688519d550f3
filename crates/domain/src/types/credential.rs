//! Bearer credentials with absolute expiry

use chrono::{DateTime, Duration, Utc};

use crate::constants::MAX_TOKEN_LIFETIME_SECS;

/// An opaque bearer token and the instant it stops being valid.
///
/// Deliberately not `Serialize`: credentials live in memory only. `Debug`
/// output redacts the token so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self { token: token.into(), expires_at }
    }

    /// Credential expiring `ttl` from now; saturates at the latest representable instant.
    pub fn from_ttl(token: impl Into<String>, ttl: Duration) -> Self {
        Self::new(token, Utc::now().checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    /// Credential for a remote `expires_in` value.
    ///
    /// Returns `None` unless `seconds` is positive and at most
    /// [`MAX_TOKEN_LIFETIME_SECS`].
    pub fn expiring_in(token: impl Into<String>, seconds: i64) -> Option<Self> {
        if !(1..=MAX_TOKEN_LIFETIME_SECS).contains(&seconds) {
            return None;
        }
        let ttl = Duration::try_seconds(seconds)?;
        Utc::now().checked_add_signed(ttl).map(|expires_at| Self::new(token, expires_at))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A credential is usable strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_strictly_before_expiry() {
        let expires_at = Utc::now();
        let credential = Credential::new("tok", expires_at);

        assert!(credential.is_valid_at(expires_at - Duration::seconds(1)));
        assert!(!credential.is_valid_at(expires_at));
        assert!(!credential.is_valid_at(expires_at + Duration::seconds(1)));
    }

    #[test]
    fn from_ttl_is_valid_now() {
        let credential = Credential::from_ttl("tok", Duration::seconds(3600));
        assert!(credential.is_valid());
        assert_eq!(credential.token(), "tok");
    }

    #[test]
    fn zero_ttl_is_already_expired() {
        assert!(!Credential::from_ttl("tok", Duration::zero()).is_valid());
    }

    #[test]
    fn from_ttl_saturates_instead_of_overflowing() {
        let credential = Credential::from_ttl("tok", Duration::MAX);
        assert_eq!(credential.expires_at(), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn expiring_in_accepts_typical_lifetimes() {
        let credential = Credential::expiring_in("tok", 3599).unwrap();
        assert!(credential.is_valid());
        assert!(credential.expires_at() <= Utc::now() + Duration::seconds(3599));
    }

    #[test]
    fn expiring_in_rejects_out_of_range_lifetimes() {
        assert!(Credential::expiring_in("tok", 0).is_none());
        assert!(Credential::expiring_in("tok", -30).is_none());
        assert!(Credential::expiring_in("tok", MAX_TOKEN_LIFETIME_SECS + 1).is_none());
        assert!(Credential::expiring_in("tok", 10_000_000_000_000).is_none());
        assert!(Credential::expiring_in("tok", i64::MAX).is_none());
    }

    #[test]
    fn debug_never_prints_token() {
        let rendered = format!("{:?}", Credential::from_ttl("super-secret", Duration::seconds(60)));
        assert!(!rendered.contains("super-secret"));
    }
}
