use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt::{self, Write};

use heapless::String;

use crate::constants::{REQUEST_BUFFER_SIZE, VERSION};
use crate::endpoint::Endpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Request does not fit in the request buffer
    Format,
    /// No end of headers yet, keep reading
    Incomplete,
    Malformed,
    Truncated,
    InvalidChunk,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::Format => "request exceeds buffer",
            Error::Incomplete => "response headers incomplete",
            Error::Malformed => "malformed response head",
            Error::Truncated => "response body truncated",
            Error::InvalidChunk => "invalid chunk in response body",
        };
        f.write_str(msg)
    }
}

const REQ_SUFFIX: &str = "Connection: close\r\n\r\n";

fn write_request_head<W: Write>(method: &str, endpoint: &Endpoint<'_>, w: &mut W) -> fmt::Result {
    write!(w, "{} ", method)?;
    endpoint.write_target(w)?;
    w.write_str(" HTTP/1.1\r\nHost: ")?;
    endpoint.write_host(w)?;
    write!(w, "\r\nUser-Agent: s-parking-sensor/{}\r\n", VERSION)
}

/// `GET` for the full spot listing.
pub fn write_status_request<W: Write>(endpoint: &Endpoint<'_>, w: &mut W) -> fmt::Result {
    write_request_head("GET", endpoint, w)?;
    w.write_str("Accept: application/json\r\n")?;
    w.write_str(REQ_SUFFIX)
}

/// `POST` carrying one JSON reading.
pub fn write_ingest_request<W: Write>(endpoint: &Endpoint<'_>, body: &str, w: &mut W) -> fmt::Result {
    write_request_head("POST", endpoint, w)?;
    w.write_str("Content-Type: application/json\r\n")?;
    write!(w, "Content-Length: {}\r\n", body.len())?;
    w.write_str(REQ_SUFFIX)?;
    w.write_str(body)
}

pub fn status_request(endpoint: &Endpoint<'_>) -> Result<String<REQUEST_BUFFER_SIZE>, Error> {
    let mut req = String::new();
    write_status_request(endpoint, &mut req).map_err(|_| Error::Format)?;
    log::debug!("Status request: {} bytes to {}", req.len(), endpoint.host);
    Ok(req)
}

pub fn ingest_request(endpoint: &Endpoint<'_>, body: &str) -> Result<String<REQUEST_BUFFER_SIZE>, Error> {
    let mut req = String::new();
    write_ingest_request(endpoint, body, &mut req).map_err(|_| Error::Format)?;
    log::debug!("Ingest request: {} bytes to {}", req.len(), endpoint.host);
    Ok(req)
}

/// A complete HTTP/1.x response read off the socket.
#[derive(Debug)]
pub struct Response<'a> {
    pub status: u16,
    head: &'a str,
    pub body: Cow<'a, [u8]>,
}

impl<'a> Response<'a> {
    pub fn parse(raw: &'a [u8]) -> Result<Self, Error> {
        let body_start = find_header_end(raw).ok_or(Error::Incomplete)?;
        let head = core::str::from_utf8(&raw[..body_start - 4]).map_err(|_| Error::Malformed)?;

        let status_line = head.lines().next().ok_or(Error::Malformed)?;
        let mut parts = status_line.split_whitespace();
        let version = parts.next().ok_or(Error::Malformed)?;
        if !version.starts_with("HTTP/1.") {
            return Err(Error::Malformed);
        }
        let status = parse_number::<u16>(parts.next().ok_or(Error::Malformed)?)?;

        let mut response = Response {
            status,
            head,
            body: Cow::Borrowed(&[]),
        };

        let rest = &raw[body_start..];
        let chunked = response
            .header("Transfer-Encoding")
            .is_some_and(|te| te.split(',').any(|t| t.trim().eq_ignore_ascii_case("chunked")));

        response.body = if chunked {
            Cow::Owned(decode_chunked(rest)?)
        } else if let Some(len) = response.header("Content-Length") {
            let len = parse_number::<usize>(len)?;
            if rest.len() < len {
                return Err(Error::Truncated);
            }
            Cow::Borrowed(&rest[..len])
        } else {
            Cow::Borrowed(rest)
        };

        Ok(response)
    }

    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Helper function to parse numbers from header values
fn parse_number<T: core::str::FromStr>(s: &str) -> Result<T, Error> {
    s.trim().parse::<T>().map_err(|_| Error::Malformed)
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|window| window == b"\r\n")
}

fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut body = Vec::new();

    loop {
        let line_end = find_crlf(data).ok_or(Error::Truncated)?;
        let line = core::str::from_utf8(&data[..line_end]).map_err(|_| Error::InvalidChunk)?;
        // Drop chunk extensions
        let size_hex = line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16).map_err(|_| Error::InvalidChunk)?;
        data = &data[line_end + 2..];

        if size == 0 {
            // Trailers, if any, are not needed
            return Ok(body);
        }

        // Size comes off the wire, never trust it in arithmetic
        let end = size.checked_add(2).ok_or(Error::InvalidChunk)?;
        if data.len() < end {
            return Err(Error::Truncated);
        }
        if &data[size..end] != b"\r\n" {
            return Err(Error::InvalidChunk);
        }
        body.extend_from_slice(&data[..size]);
        data = &data[end..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(url: &'static str) -> Endpoint<'static> {
        Endpoint::parse(url).unwrap()
    }

    #[test]
    fn frames_status_request() {
        let req = status_request(&endpoint("https://get-status.run.app")).unwrap();
        let expected = format!(
            "GET / HTTP/1.1\r\nHost: get-status.run.app\r\nUser-Agent: s-parking-sensor/{}\r\n\
             Accept: application/json\r\nConnection: close\r\n\r\n",
            VERSION
        );
        assert_eq!(req.as_str(), expected);
    }

    #[test]
    fn frames_ingest_request_with_body() {
        let body = r#"{"spot_id":"A-01","status":0}"#;
        let req = ingest_request(&endpoint("https://ingest.run.app:8443/v1?x=1"), body).unwrap();

        assert!(req.starts_with("POST /v1?x=1 HTTP/1.1\r\nHost: ingest.run.app:8443\r\n"));
        assert!(req.contains("Content-Type: application/json\r\n"));
        assert!(req.contains("Content-Length: 29\r\n"));
        assert!(req.ends_with("\r\n\r\n{\"spot_id\":\"A-01\",\"status\":0}"));
    }

    #[test]
    fn oversized_request_is_an_error() {
        let body = "x".repeat(REQUEST_BUFFER_SIZE);
        assert_eq!(
            ingest_request(&endpoint("https://ingest.run.app"), &body),
            Err(Error::Format)
        );
    }

    #[test]
    fn parses_content_length_response() {
        let raw = b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\nContent-Length: 2\r\n\r\n[]trailing";
        let resp = Response::parse(raw).unwrap();
        assert_eq!(resp.status, 200);
        assert!(resp.is_success());
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert_eq!(&resp.body[..], b"[]");
    }

    #[test]
    fn parses_chunked_response() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
                    5;ext=1\r\n[{\"id\r\n9\r\n\":\"A-01\"}\r\n1\r\n]\r\n0\r\n\r\n";
        let resp = Response::parse(raw).unwrap();
        assert_eq!(&resp.body[..], br#"[{"id":"A-01"}]"#);
    }

    #[test]
    fn body_runs_to_end_without_length() {
        let raw = b"HTTP/1.0 500 Internal Server Error\r\n\r\nError interno";
        let resp = Response::parse(raw).unwrap();
        assert_eq!(resp.status, 500);
        assert!(!resp.is_success());
        assert_eq!(&resp.body[..], b"Error interno");
    }

    #[test]
    fn rejects_partial_or_broken_responses() {
        assert_eq!(
            Response::parse(b"HTTP/1.1 200 OK\r\nContent-Le").unwrap_err(),
            Error::Incomplete
        );
        assert_eq!(
            Response::parse(b"SMTP 200 OK\r\n\r\n").unwrap_err(),
            Error::Malformed
        );
        assert_eq!(
            Response::parse(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n[]").unwrap_err(),
            Error::Truncated
        );
        assert_eq!(
            Response::parse(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n").unwrap_err(),
            Error::InvalidChunk
        );
        assert_eq!(
            Response::parse(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nab").unwrap_err(),
            Error::Truncated
        );
        assert_eq!(
            Response::parse(
                b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nffffffffffffffff\r\nab\r\n0\r\n\r\n"
            )
            .unwrap_err(),
            Error::InvalidChunk
        );
        assert_eq!(
            Response::parse(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nfffffff\r\nab\r\n0\r\n\r\n")
                .unwrap_err(),
            Error::Truncated
        );
    }
}
