use std::collections::HashMap;
use std::sync::Mutex;

struct IssuedToken {
    user_id: String,
    expires_at: usize,
    revoked: bool,
}

/// Refresh-token registry keyed by jti. Rotation revokes the old jti,
/// logout is idempotent.
pub struct RefreshTokenStore {
    inner: Mutex<HashMap<String, IssuedToken>>,
}

impl RefreshTokenStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, jti: &str, user_id: &str, expires_at: usize) {
        self.inner.lock().unwrap().insert(
            jti.to_string(),
            IssuedToken {
                user_id: user_id.to_string(),
                expires_at,
                revoked: false,
            },
        );
    }

    /// Active means known, not revoked, not expired.
    pub fn is_active(&self, jti: &str, now: usize) -> bool {
        let tokens = self.inner.lock().unwrap();
        tokens
            .get(jti)
            .map(|t| !t.revoked && t.expires_at > now)
            .unwrap_or(false)
    }

    pub fn revoke(&self, jti: &str) {
        if let Some(token) = self.inner.lock().unwrap().get_mut(jti) {
            token.revoked = true;
        }
    }

    pub fn revoke_all_for_user(&self, user_id: &str) {
        for token in self.inner.lock().unwrap().values_mut() {
            if token.user_id == user_id {
                token.revoked = true;
            }
        }
    }
}

impl Default for RefreshTokenStore {
    fn default() -> Self {
        Self::new()
    }
}
