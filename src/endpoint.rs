use core::fmt;

use crate::constants::HTTPS_PORT;

const HTTPS_SCHEME: &str = "https";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    MissingScheme,
    UnsupportedScheme,
    EmptyHost,
    InvalidPort,
    UserInfo,
    InvalidCharacter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::MissingScheme => "missing scheme",
            Error::UnsupportedScheme => "scheme must be https",
            Error::EmptyHost => "empty host",
            Error::InvalidPort => "invalid port",
            Error::UserInfo => "credentials in URL are not allowed",
            Error::InvalidCharacter => "whitespace or control character in URL",
        };
        f.write_str(msg)
    }
}

/// An absolute `https` URL split into the parts needed to open a TLS session
/// and write the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub host: &'a str,
    pub port: u16,
    /// Path and query as written in the URL, `/` when both are absent
    pub path: &'a str,
}

impl<'a> Endpoint<'a> {
    /// Parse `https://host[:port][/path][?query][#fragment]`.
    pub fn parse(url: &'a str) -> Result<Self, Error> {
        if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::InvalidCharacter);
        }

        let (scheme, rest) = url.split_once("://").ok_or(Error::MissingScheme)?;
        if scheme.is_empty() {
            return Err(Error::MissingScheme);
        }
        if !scheme.eq_ignore_ascii_case(HTTPS_SCHEME) {
            return Err(Error::UnsupportedScheme);
        }

        // Fragments never leave the client
        let rest = match rest.split_once('#') {
            Some((before, _)) => before,
            None => rest,
        };

        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let (authority, path) = rest.split_at(authority_end);

        if authority.contains('@') {
            return Err(Error::UserInfo);
        }

        let (host, port) = split_port(authority)?;
        if host.is_empty() {
            return Err(Error::EmptyHost);
        }

        let path = if path.is_empty() { "/" } else { path };

        Ok(Endpoint { host, port, path })
    }

    /// Both endpoints reach the same resource. Host names compare without
    /// regard to ASCII case, paths compare exactly.
    pub fn same_address(&self, other: &Endpoint<'_>) -> bool {
        self.host.eq_ignore_ascii_case(other.host)
            && self.port == other.port
            && self.path == other.path
    }

    /// Request target for the request line, always starting with `/`.
    pub fn write_target<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        if !self.path.starts_with('/') {
            w.write_char('/')?;
        }
        w.write_str(self.path)
    }

    /// Value for the `Host` header: the port is only spelled out when it is not the default.
    pub fn write_host<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        if self.port == HTTPS_PORT {
            w.write_str(self.host)
        } else {
            write!(w, "{}:{}", self.host, self.port)
        }
    }
}

fn split_port(authority: &str) -> Result<(&str, u16), Error> {
    // Bracketed IPv6 literal, the colons inside are not a port separator
    if let Some(stripped) = authority.strip_prefix('[') {
        let close = stripped.find(']').ok_or(Error::EmptyHost)?;
        let host_len = close + 2;
        let (host, tail) = authority.split_at(host_len);
        return match tail {
            "" => Ok((host, HTTPS_PORT)),
            _ => Ok((host, parse_port(tail.strip_prefix(':').ok_or(Error::InvalidPort)?)?)),
        };
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => Ok((host, parse_port(port)?)),
        None => Ok((authority, HTTPS_PORT)),
    }
}

fn parse_port(port: &str) -> Result<u16, Error> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidPort);
    }
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(Error::InvalidPort),
        Ok(p) => Ok(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_run_url_defaults_to_root_and_443() {
        let ep = Endpoint::parse("https://tu-url-ingest.run.app").unwrap();
        assert_eq!(ep.host, "tu-url-ingest.run.app");
        assert_eq!(ep.port, 443);
        assert_eq!(ep.path, "/");
    }

    #[test]
    fn keeps_path_and_query_drops_fragment() {
        let ep = Endpoint::parse("HTTPS://example.com:8443/api/status?zone=A#top").unwrap();
        assert_eq!(ep.host, "example.com");
        assert_eq!(ep.port, 8443);
        assert_eq!(ep.path, "/api/status?zone=A");
    }

    #[test]
    fn query_without_path() {
        let ep = Endpoint::parse("https://example.com?zone=A").unwrap();
        assert_eq!(ep.path, "?zone=A");

        let mut target = heapless::String::<32>::new();
        ep.write_target(&mut target).unwrap();
        assert_eq!(target.as_str(), "/?zone=A");
    }

    #[test]
    fn ipv6_literal() {
        let ep = Endpoint::parse("https://[::1]:9000/x").unwrap();
        assert_eq!(ep.host, "[::1]");
        assert_eq!(ep.port, 9000);

        let ep = Endpoint::parse("https://[::1]/x").unwrap();
        assert_eq!(ep.port, 443);
    }

    #[test]
    fn rejects_non_https() {
        assert_eq!(
            Endpoint::parse("http://example.com"),
            Err(Error::UnsupportedScheme)
        );
        assert_eq!(Endpoint::parse("example.com/x"), Err(Error::MissingScheme));
        assert_eq!(Endpoint::parse("://example.com"), Err(Error::MissingScheme));
    }

    #[test]
    fn rejects_bad_authority() {
        assert_eq!(Endpoint::parse("https:///status"), Err(Error::EmptyHost));
        assert_eq!(Endpoint::parse("https://:443/"), Err(Error::EmptyHost));
        assert_eq!(Endpoint::parse("https://h:0/"), Err(Error::InvalidPort));
        assert_eq!(Endpoint::parse("https://h:99999/"), Err(Error::InvalidPort));
        assert_eq!(Endpoint::parse("https://h:/"), Err(Error::InvalidPort));
        assert_eq!(Endpoint::parse("https://u:p@h/"), Err(Error::UserInfo));
        assert_eq!(
            Endpoint::parse("https://exa mple.com"),
            Err(Error::InvalidCharacter)
        );
    }

    #[test]
    fn host_case_does_not_make_a_new_address() {
        let a = Endpoint::parse("https://Parking.run.app/").unwrap();
        let b = Endpoint::parse("https://parking.RUN.app").unwrap();
        assert!(a.same_address(&b));

        let other_port = Endpoint::parse("https://parking.run.app:8443/").unwrap();
        let other_path = Endpoint::parse("https://parking.run.app/Status").unwrap();
        let lower_path = Endpoint::parse("https://parking.run.app/status").unwrap();
        assert!(!a.same_address(&other_port));
        assert!(!other_path.same_address(&lower_path));
    }

    #[test]
    fn host_header_omits_default_port() {
        let mut s = heapless::String::<64>::new();
        Endpoint::parse("https://a.run.app/x")
            .unwrap()
            .write_host(&mut s)
            .unwrap();
        assert_eq!(s.as_str(), "a.run.app");

        let mut s = heapless::String::<64>::new();
        Endpoint::parse("https://a.run.app:8443/x")
            .unwrap()
            .write_host(&mut s)
            .unwrap();
        assert_eq!(s.as_str(), "a.run.app:8443");
    }
}
