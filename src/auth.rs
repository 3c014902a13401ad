//! Static bearer-token check for the HTTP API

use subtle::ConstantTimeEq;

/// Outcome of checking an `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Authorized,
    /// No header, or nothing after the scheme (401)
    Missing,
    /// Credential present but wrong, including an empty one (403)
    Rejected,
}

impl AuthOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthOutcome::Authorized => 200,
            AuthOutcome::Missing => 401,
            AuthOutcome::Rejected => 403,
        }
    }
}

/// Process-wide credential, loaded once at startup.
#[derive(Clone)]
pub struct BearerAuth {
    token: Vec<u8>,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into().into_bytes(),
        }
    }

    /// The credential is the second single-space-separated part of the
    /// header (`Bearer <token>`). `"Bearer  tok"` presents an empty
    /// credential and is rejected, not treated as missing; an empty header
    /// value is rejected the same way.
    pub fn check(&self, header: Option<&str>) -> AuthOutcome {
        let presented = match header {
            None => return AuthOutcome::Missing,
            Some("") => return AuthOutcome::Rejected,
            Some(h) => match h.split(' ').nth(1) {
                Some(t) => t,
                None => return AuthOutcome::Missing,
            },
        };
        if bool::from(presented.as_bytes().ct_eq(&self.token)) {
            AuthOutcome::Authorized
        } else {
            AuthOutcome::Rejected
        }
    }
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth").field("token", &"<redacted>").finish()
    }
}
