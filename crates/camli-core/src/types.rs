// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the uploader preferences.

use serde::{Deserialize, Serialize};

/// Port used when an `http://` endpoint does not name one.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Port used when an `https://` (or scheme-less) endpoint does not name one.
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Server endpoint parsed from the URL-like string the user typed in.
///
/// Accepted shapes are `[http://|https://]host[:port][/]`, with bracketed
/// IPv6 literals allowed as host. A missing scheme means HTTPS. Parsing never
/// fails: anything that does not fit yields a value whose
/// [`is_valid`](Self::is_valid) is `false`, so callers can keep the raw text
/// around for display and decide what to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPort {
    raw: String,
    host: String,
    port: u16,
    secure: bool,
    valid: bool,
}

impl HostPort {
    /// Parse `raw` into a host/port pair.
    pub fn new(raw: &str) -> Self {
        match parse_endpoint(raw) {
            Some((secure, host, port)) => Self {
                raw: raw.to_string(),
                host,
                port,
                secure,
                valid: true,
            },
            None => Self {
                raw: raw.to_string(),
                host: String::new(),
                port: 0,
                secure: true,
                valid: false,
            },
        }
    }

    /// Whether the input named a usable host and port.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// True for `https://` and scheme-less input.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// The string this value was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `scheme://host:port`, suitable as a base for request URLs.
    ///
    /// Returns `None` when the endpoint is invalid.
    pub fn url_prefix(&self) -> Option<String> {
        if !self.valid {
            return None;
        }
        let scheme = if self.secure { "https" } else { "http" };
        Some(format!("{scheme}://{self}"))
    }
}

impl std::fmt::Display for HostPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.valid {
            return write!(f, "{}", self.raw);
        }
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Strip `prefix` from the start of `s`, ignoring ASCII case.
fn strip_scheme<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

/// Returns `(secure, host, port)` or `None` when the input is unusable.
fn parse_endpoint(raw: &str) -> Option<(bool, String, u16)> {
    let trimmed = raw.trim();
    let (secure, rest) = if let Some(rest) = strip_scheme(trimmed, "https://") {
        (true, rest)
    } else if let Some(rest) = strip_scheme(trimmed, "http://") {
        (false, rest)
    } else {
        (true, trimmed)
    };

    let rest = rest.trim_end_matches('/');
    if rest.is_empty() || rest.contains('/') {
        return None;
    }

    let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
        let (host, tail) = bracketed.split_once(']')?;
        let port = if tail.is_empty() {
            None
        } else {
            Some(tail.strip_prefix(':')?)
        };
        (host, port)
    } else {
        match rest.rsplit_once(':') {
            // An unbracketed host may not itself contain a colon.
            Some((host, _)) if host.contains(':') => return None,
            Some((host, port)) => (host, Some(port)),
            None => (rest, None),
        }
    };

    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return None;
    }

    let port = match port {
        Some(p) => p.parse::<u16>().ok().filter(|p| *p != 0)?,
        None if secure => DEFAULT_HTTPS_PORT,
        None => DEFAULT_HTTP_PORT,
    };

    Some((secure, host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_with_port() {
        let hp = HostPort::new("http://1.2.3.4:3179");
        assert!(hp.is_valid());
        assert!(!hp.is_secure());
        assert_eq!(hp.host(), "1.2.3.4");
        assert_eq!(hp.port(), 3179);
        assert_eq!(hp.url_prefix().as_deref(), Some("http://1.2.3.4:3179"));
        assert_eq!(hp.to_string(), "1.2.3.4:3179");
    }

    #[test]
    fn scheme_less_defaults_to_https() {
        let hp = HostPort::new("photos.example.com");
        assert!(hp.is_valid());
        assert!(hp.is_secure());
        assert_eq!(hp.port(), DEFAULT_HTTPS_PORT);
        assert_eq!(
            hp.url_prefix().as_deref(),
            Some("https://photos.example.com:443")
        );
    }

    #[test]
    fn http_without_port_uses_80() {
        let hp = HostPort::new("HTTP://example.com/");
        assert!(hp.is_valid());
        assert_eq!(hp.port(), DEFAULT_HTTP_PORT);
        assert_eq!(hp.host(), "example.com");
    }

    #[test]
    fn bracketed_ipv6() {
        let hp = HostPort::new("https://[::1]:3179");
        assert!(hp.is_valid());
        assert_eq!(hp.host(), "::1");
        assert_eq!(hp.to_string(), "[::1]:3179");
    }

    #[test]
    fn empty_is_invalid() {
        let hp = HostPort::new("");
        assert!(!hp.is_valid());
        assert!(hp.url_prefix().is_none());
        assert_eq!(hp.raw(), "");
    }

    #[test]
    fn rejects_bad_ports_and_paths() {
        assert!(!HostPort::new("example.com:http").is_valid());
        assert!(!HostPort::new("example.com:70000").is_valid());
        assert!(!HostPort::new("example.com:0").is_valid());
        assert!(!HostPort::new("example.com/ui/").is_valid());
        assert!(!HostPort::new("::1").is_valid());
        assert!(!HostPort::new("http://:3179").is_valid());
    }

    #[test]
    fn invalid_displays_raw_text() {
        let hp = HostPort::new("not a host");
        assert!(!hp.is_valid());
        assert_eq!(hp.to_string(), "not a host");
    }
}
