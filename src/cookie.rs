//! Cookie Module
//!
//! A document-cookie helper: Set-Cookie-style writes with day-granularity
//! expiration, `;`-split reads, and deletion by writing an already-expired
//! date. The document itself is behind the [`CookieSource`] seam, so
//! runtimes without one get the degrade-and-warn behavior instead of an
//! error.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// The `expires` attribute value that deletes a cookie.
const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:01 GMT";

// == Cookie Source ==
/// The two-sided `document.cookie` capability.
///
/// Reads return the joined `name=value; other=value` form; writes take a
/// single Set-Cookie-style directive and apply browser semantics (an
/// `expires` in the past deletes the named cookie).
pub trait CookieSource {
    /// The joined `name=value` pairs currently visible, without attributes.
    fn cookie_string(&self) -> String;

    /// Applies one `name=value; expires=...; path=/` directive.
    fn write_cookie(&mut self, directive: &str);
}

// == Memory Cookies ==
/// In-memory [`CookieSource`] with browser-shaped semantics.
///
/// Keeps cookies in insertion order, replaces on rewrite, and honors a
/// past `expires` attribute as deletion. Attributes are consumed on write
/// and never echoed back, matching what a document exposes to readers.
#[derive(Debug, Default)]
pub struct MemoryCookies {
    cookies: Vec<(String, String)>,
}

impl MemoryCookies {
    /// Creates an empty cookie source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieSource for MemoryCookies {
    fn cookie_string(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write_cookie(&mut self, directive: &str) {
        let mut segments = directive.split(';');

        let Some(pair) = segments.next() else {
            return;
        };
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };
        let name = name.trim().to_string();
        let value = value.trim().to_string();

        // A past expires attribute means "delete this cookie"
        let mut expired = false;
        for attribute in segments {
            let attribute = attribute.trim();
            if let Some(date) = attribute
                .strip_prefix("expires=")
                .or_else(|| attribute.strip_prefix("Expires="))
            {
                if let Ok(parsed) = DateTime::parse_from_rfc2822(&date.replace("GMT", "+0000")) {
                    expired = parsed.with_timezone(&Utc) <= Utc::now();
                }
            }
        }

        self.cookies.retain(|(existing, _)| *existing != name);
        if !expired {
            self.cookies.push((name, value));
        }
    }
}

// == Cookie Jar ==
/// Helper over an optional [`CookieSource`].
///
/// A jar without a source (a runtime with no document) warns on every
/// operation and degrades: writes no-op, reads return `None`.
pub struct CookieJar<S> {
    source: Option<S>,
}

impl<S: CookieSource> CookieJar<S> {
    /// Creates a jar over a cookie source.
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Creates a jar with no cookie source.
    pub fn detached() -> Self {
        Self { source: None }
    }

    /// Writes `name=value` expiring `days` from now, scoped to path `/`.
    pub fn set(&mut self, name: &str, value: &str, days: i64) {
        let Some(source) = self.source.as_mut() else {
            warn!(name, "no cookie source available, cookie not set");
            return;
        };
        let expires = format_expires(Utc::now() + Duration::days(days));
        source.write_cookie(&format!("{name}={value};expires={expires};path=/"));
    }

    /// Reads the cookie named `name`.
    ///
    /// Percent-decodes the cookie string, splits it on `;`, trims leading
    /// spaces per segment and returns the suffix of the first `name=`
    /// match.
    pub fn get(&self, name: &str) -> Option<String> {
        let Some(source) = self.source.as_ref() else {
            warn!(name, "no cookie source available");
            return None;
        };
        let raw = source.cookie_string();
        let decoded = match urlencoding::decode(&raw) {
            Ok(decoded) => decoded.into_owned(),
            Err(e) => {
                warn!(name, error = %e, "cookie string is not valid percent-encoding, reading raw");
                raw
            }
        };
        let needle = format!("{name}=");
        decoded
            .split(';')
            .map(|segment| segment.trim_start_matches(' '))
            .find_map(|segment| segment.strip_prefix(needle.as_str()).map(str::to_string))
    }

    /// Deletes the cookie named `name` by writing an already-expired date.
    pub fn clear(&mut self, name: &str) {
        let Some(source) = self.source.as_mut() else {
            warn!(name, "no cookie source available, nothing to clear");
            return;
        };
        source.write_cookie(&format!("{name}=; Path=/; Expires={EPOCH_EXPIRES};"));
    }
}

/// Formats a timestamp the way `Date.toUTCString` does for the `expires`
/// attribute (RFC 1123, GMT suffix).
fn format_expires(when: DateTime<Utc>) -> String {
    when.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut jar = CookieJar::new(MemoryCookies::new());

        jar.set("a", "b", 1);
        assert_eq!(jar.get("a"), Some("b".to_string()));
    }

    #[test]
    fn test_get_missing() {
        let jar = CookieJar::new(MemoryCookies::new());
        assert_eq!(jar.get("absent"), None);
    }

    #[test]
    fn test_clear_deletes_cookie() {
        let mut jar = CookieJar::new(MemoryCookies::new());

        jar.set("a", "b", 1);
        jar.clear("a");

        assert_eq!(jar.get("a"), None);
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let mut jar = CookieJar::new(MemoryCookies::new());

        jar.set("a", "first", 1);
        jar.set("a", "second", 1);

        assert_eq!(jar.get("a"), Some("second".to_string()));
    }

    #[test]
    fn test_multiple_cookies_first_match_wins() {
        let mut jar = CookieJar::new(MemoryCookies::new());

        jar.set("theme", "dark", 1);
        jar.set("lang", "en", 1);

        assert_eq!(jar.get("theme"), Some("dark".to_string()));
        assert_eq!(jar.get("lang"), Some("en".to_string()));
    }

    #[test]
    fn test_prefix_names_do_not_collide() {
        let mut jar = CookieJar::new(MemoryCookies::new());

        jar.set("id_long", "1", 1);
        jar.set("id", "2", 1);

        assert_eq!(jar.get("id"), Some("2".to_string()));
        assert_eq!(jar.get("id_long"), Some("1".to_string()));
    }

    #[test]
    fn test_percent_encoded_value_decodes_on_read() {
        let mut source = MemoryCookies::new();
        source.write_cookie("greeting=hello%20world;path=/");

        let jar = CookieJar::new(source);
        assert_eq!(jar.get("greeting"), Some("hello world".to_string()));
    }

    #[test]
    fn test_malformed_percent_sequence_reads_raw() {
        let mut source = MemoryCookies::new();
        source.write_cookie("broken=50%;path=/");

        let jar = CookieJar::new(source);
        assert_eq!(jar.get("broken"), Some("50%".to_string()));
    }

    #[test]
    fn test_detached_jar_degrades() {
        let mut jar = CookieJar::<MemoryCookies>::detached();

        jar.set("a", "b", 1);
        assert_eq!(jar.get("a"), None);
        jar.clear("a");
    }

    #[test]
    fn test_cookie_string_shape() {
        let mut source = MemoryCookies::new();
        source.write_cookie("a=1;path=/");
        source.write_cookie("b=2;path=/");

        assert_eq!(source.cookie_string(), "a=1; b=2");
    }

    #[test]
    fn test_past_expires_removes_on_write() {
        let mut source = MemoryCookies::new();
        source.write_cookie("a=1;path=/");
        source.write_cookie(&format!("a=;Expires={EPOCH_EXPIRES};Path=/"));

        assert_eq!(source.cookie_string(), "");
    }

    #[test]
    fn test_expires_format_is_rfc1123() {
        let when = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_expires(when), "Fri, 02 Jan 2026 03:04:05 GMT");
    }
}
