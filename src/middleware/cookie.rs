//! `Set-Cookie` construction and `Cookie` header parsing for session tokens.

use std::fmt;

use axum::http::{header::COOKIE, HeaderMap};

/// An HTTP-only, path `/` cookie carrying a token, or clearing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    name: &'static str,
    value: String,
    secure: bool,
    expire: bool,
}

impl SessionCookie {
    pub fn new(name: &'static str, value: impl Into<String>, secure: bool) -> Self {
        Self {
            name,
            value: value.into(),
            secure,
            expire: false,
        }
    }

    /// Cookie that tells the browser to drop `name` immediately.
    pub fn clear(name: &'static str, secure: bool) -> Self {
        Self {
            name,
            value: String::new(),
            secure,
            expire: true,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }
}

impl fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path=/; HttpOnly; SameSite=Lax", self.name, self.value)?;
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.expire {
            f.write_str("; Max-Age=0")?;
        }
        Ok(())
    }
}

/// Value of cookie `name` across all `Cookie` headers. Empty values count as absent.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
