//! # Cookies — a request-readable mirror of client state
//!
//! Some client state must also be visible to anything that inspects HTTP
//! requests (a server-rendered page, a reverse proxy). Cookies are the only
//! store the browser attaches to requests automatically, so [`CookieStore`]
//! models a cookie jar with the same string-in/string-out shape as
//! [`crate::KeyValueStore`], plus an expiry.
//!
//! Cookies here are always a *derived* copy: callers keep the authoritative
//! value elsewhere and re-write the cookie from it. A cookie that expired on its
//! own is therefore harmless.
//!
//! The helpers [`format_set_cookie`] and [`parse_cookie_header`] produce and read
//! the wire forms (`name=value; Path=/; Max-Age=…` and `a=1; b=2`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use cookie::Cookie;

pub use cookie::SameSite;

/// Attributes written alongside a cookie value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    /// `None` makes a session cookie.
    pub max_age: Option<Duration>,
    pub same_site: SameSite,
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            max_age: None,
            same_site: SameSite::Lax,
            secure: false,
        }
    }
}

impl CookieOptions {
    /// Builder method to set the lifetime.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

/// A cookie jar.
pub trait CookieStore {
    /// Read a cookie that has not expired.
    fn get_cookie(&self, name: &str) -> Option<String>;

    /// Write (or replace) a cookie.
    fn set_cookie(&self, name: &str, value: &str, options: &CookieOptions);

    /// Expire a cookie immediately.
    fn remove_cookie(&self, name: &str);
}

impl<C: CookieStore + ?Sized> CookieStore for std::rc::Rc<C> {
    fn get_cookie(&self, name: &str) -> Option<String> {
        (**self).get_cookie(name)
    }

    fn set_cookie(&self, name: &str, value: &str, options: &CookieOptions) {
        (**self).set_cookie(name, value, options)
    }

    fn remove_cookie(&self, name: &str) {
        (**self).remove_cookie(name)
    }
}

/// Build a `Set-Cookie` / `document.cookie` assignment string. The name and
/// value are percent-encoded.
pub fn format_set_cookie(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut builder = Cookie::build((name, value))
        .path(options.path.as_str())
        .same_site(options.same_site)
        .secure(options.secure);
    if let Some(max_age) = options.max_age {
        let secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        builder = builder.max_age(cookie::time::Duration::seconds(secs));
    }
    builder.build().encoded().to_string()
}

/// Parse a `Cookie:` request header (or `document.cookie`) into name/value pairs.
///
/// Pairs that do not parse (empty name, bad encoding) are skipped. Later
/// duplicates win.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    Cookie::split_parse_encoded(header)
        .filter_map(Result::ok)
        .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
        .collect()
}

#[derive(Clone, Debug)]
struct StoredCookie {
    value: String,
    expires_at: Option<SystemTime>,
}

/// In-memory cookie jar honouring `Max-Age`.
#[derive(Clone, Debug, Default)]
pub struct MemoryCookies {
    jar: Arc<Mutex<HashMap<String, StoredCookie>>>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the jar the way a browser would send it in a `Cookie:` header.
    pub fn header(&self) -> String {
        let now = SystemTime::now();
        let jar = self.jar();
        let mut pairs: Vec<String> = jar
            .iter()
            .filter(|(_, c)| c.expires_at.map_or(true, |at| at > now))
            .map(|(name, c)| Cookie::new(name.as_str(), c.value.as_str()).encoded().to_string())
            .collect();
        pairs.sort();
        pairs.join("; ")
    }

    fn jar(&self) -> MutexGuard<'_, HashMap<String, StoredCookie>> {
        self.jar.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CookieStore for MemoryCookies {
    fn get_cookie(&self, name: &str) -> Option<String> {
        let mut jar = self.jar();
        let expired = jar
            .get(name)?
            .expires_at
            .is_some_and(|at| at <= SystemTime::now());
        if expired {
            jar.remove(name);
            return None;
        }
        jar.get(name).map(|c| c.value.clone())
    }

    fn set_cookie(&self, name: &str, value: &str, options: &CookieOptions) {
        let expires_at = options.max_age.map(|age| SystemTime::now() + age);
        self.jar().insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at,
            },
        );
    }

    fn remove_cookie(&self, name: &str) {
        self.jar().remove(name);
    }
}
