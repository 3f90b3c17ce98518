//! Cookie options and `Cookie`/`Set-Cookie` header plumbing.

use std::fmt;

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// Attributes written into the session cookie.
///
/// `max_age` doubles as the deletion signal: `0` produces a browser-session
/// cookie with no `Max-Age` attribute, a positive value is the lifetime in
/// seconds, and a negative value asks the store to delete the session on
/// save and emit a clearing cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    /// Cookie path.
    pub path: String,

    /// Cookie domain (optional, defaults to the request host).
    pub domain: Option<String>,

    /// Max-Age in seconds; `0` = session cookie, negative = delete on save.
    pub max_age: i64,

    /// Require HTTPS (Secure flag).
    pub secure: bool,

    /// Set the HttpOnly flag.
    pub http_only: bool,

    /// SameSite attribute, omitted when `None`.
    pub same_site: Option<SameSite>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
            max_age: 0,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }
}

/// Build a `Set-Cookie` header value for `name`/`value` with the given options.
///
/// A negative `max_age` produces the clearing form browsers honor:
/// `Max-Age=0` plus an epoch `Expires` date.
pub fn header_value(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut cookie = format!("{}={}", name, value);

    if let Some(ref domain) = options.domain {
        cookie.push_str(&format!("; Domain={}", domain));
    }

    if !options.path.is_empty() {
        cookie.push_str(&format!("; Path={}", options.path));
    }

    if options.max_age > 0 {
        cookie.push_str(&format!("; Max-Age={}", options.max_age));
    } else if options.max_age < 0 {
        cookie.push_str("; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
    }

    if options.secure {
        cookie.push_str("; Secure");
    }

    if options.http_only {
        cookie.push_str("; HttpOnly");
    }

    if let Some(same_site) = options.same_site {
        cookie.push_str(&format!("; SameSite={}", same_site));
    }

    cookie
}

/// Extract the value of the named cookie from a raw `Cookie` request header.
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(&format!("{}=", name)) {
            return Some(value.to_string());
        }
    }
    None
}
