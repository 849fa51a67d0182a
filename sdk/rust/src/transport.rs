//! Transport Call: one operation in, one decoded envelope out.
//!
//! [`HttpTransport`] speaks plain HTTP/1.1 over a tokio `TcpStream`, which
//! keeps the client free of a full HTTP stack. It posts to a single fixed
//! endpoint and does not interpret `data` or `errors`.

use crate::client::ClientConfig;
use crate::envelope::Envelope;
use crate::error::{ErrorCode, ResultExt, SdkError, SdkResult};
use crate::operation::Operation;
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Sends one operation and decodes the response body.
///
/// Failures are errors, never envelopes: a network failure, an HTTP-level
/// failure or a body that is not JSON all return `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, operation: &Operation) -> SdkResult<Envelope>;
}

/// HTTP transport posting JSON to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoint {
    host: String,
    port: u16,
    path: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> SdkResult<Self> {
        let (host, port, path) = parse_url(&config.url)?;
        Ok(Self {
            endpoint: Endpoint { host, port, path },
        })
    }

    async fn post(&self, body: &str) -> SdkResult<RawResponse> {
        let Endpoint { host, port, path } = &self.endpoint;

        let mut stream = TcpStream::connect((host.as_str(), *port))
            .await
            .map_err(|e| {
                SdkError::new(
                    ErrorCode::ConnectionRefused,
                    format!("Connection failed: {e}"),
                )
            })?;

        let request = format!(
            "POST {path} HTTP/1.1\r\n\
             Host: {host}:{port}\r\n\
             Content-Type: application/json\r\n\
             Accept: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {body}",
            body.len()
        );

        stream
            .write_all(request.as_bytes())
            .await
            .map_sdk_err_with(ErrorCode::NetworkError, "Write failed")?;

        let mut response_bytes = Vec::new();
        stream
            .read_to_end(&mut response_bytes)
            .await
            .map_sdk_err_with(ErrorCode::NetworkError, "Read failed")?;

        parse_http_response(&response_bytes)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, operation: &Operation) -> SdkResult<Envelope> {
        let body = operation.to_body()?;
        debug!(
            "POST {} {}",
            self.endpoint.path,
            operation.query.chars().take(100).collect::<String>()
        );

        let response = self.post(&body).await.map_err(|e| {
            warn!(code = %e.code, "transport failed: {}", e.message);
            e
        })?;

        match Envelope::from_body(&response.body) {
            Ok(envelope) => Ok(envelope),
            Err(parse_error) if !response.is_success() => Err(SdkError::new(
                ErrorCode::HttpError,
                format!("HTTP error: {}", response.status_line),
            )
            .with_source(parse_error)),
            Err(parse_error) => Err(parse_error),
        }
    }
}

#[derive(Debug)]
struct RawResponse {
    status_line: String,
    status: u16,
    body: String,
}

impl RawResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Parses a URL into host, port, and path.
fn parse_url(url: &str) -> SdkResult<(String, u16, String)> {
    let url = url.trim();

    let without_protocol = if url.starts_with("https://") {
        return Err(SdkError::new(
            ErrorCode::HttpsNotSupported,
            "HTTPS is not supported by the built-in transport. Point it at the local proxy instead.",
        ));
    } else if let Some(rest) = url.strip_prefix("http://") {
        rest
    } else {
        url
    };

    let (host_port, path) = match without_protocol.find('/') {
        Some(slash_pos) => without_protocol.split_at(slash_pos),
        None => (without_protocol, "/"),
    };

    let (host, port) = match host_port.rfind(':') {
        Some(colon_pos) => {
            let port_str = &host_port[colon_pos + 1..];
            let port = port_str.parse().map_err(|_| {
                SdkError::new(ErrorCode::InvalidUrl, format!("Invalid port: {port_str}"))
            })?;
            (&host_port[..colon_pos], port)
        }
        None => (host_port, 80),
    };

    if host.is_empty() {
        return Err(SdkError::new(
            ErrorCode::InvalidUrl,
            format!("Missing host in URL: {url}"),
        ));
    }

    Ok((host.to_string(), port, path.to_string()))
}

/// Splits a raw HTTP response into status and body.
fn parse_http_response(response: &[u8]) -> SdkResult<RawResponse> {
    let (head, body) = match find(response, b"\r\n\r\n") {
        Some(pos) => (&response[..pos], &response[pos + 4..]),
        None => {
            return Err(SdkError::new(
                ErrorCode::InvalidResponse,
                if response.is_empty() {
                    "Empty response"
                } else {
                    "Could not find response body"
                },
            ))
        }
    };

    let head = String::from_utf8_lossy(head);
    let mut lines = head.lines();
    let status_line = lines.next().unwrap_or_default().trim().to_string();
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| {
            SdkError::new(
                ErrorCode::InvalidResponse,
                format!("Malformed status line: {status_line}"),
            )
        })?;

    let chunked = lines.any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("transfer-encoding")
                && value.trim().eq_ignore_ascii_case("chunked")
        })
    });

    let body = if chunked {
        parse_chunked_body(body)?
    } else {
        body.to_vec()
    };

    Ok(RawResponse {
        status_line,
        status,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Decodes a chunked transfer encoding body.
///
/// A chunk that claims more bytes than the response holds is an error.
fn parse_chunked_body(body: &[u8]) -> SdkResult<Vec<u8>> {
    let mut result = Vec::new();
    let mut remaining = body;

    loop {
        let Some(size_end) = find(remaining, b"\r\n") else {
            if remaining.is_empty() {
                break;
            }
            return Err(SdkError::new(
                ErrorCode::InvalidResponse,
                "Truncated chunk size line",
            ));
        };
        let size_line = String::from_utf8_lossy(&remaining[..size_end]);
        // Chunk extensions follow a ';'.
        let size_str = size_line.split(';').next().unwrap_or_default().trim();
        let chunk_size = usize::from_str_radix(size_str, 16).map_err(|_| {
            SdkError::new(
                ErrorCode::InvalidResponse,
                format!("Invalid chunk size: {size_str}"),
            )
        })?;
        if chunk_size == 0 {
            break;
        }

        let data_start = size_end + 2;
        let data_end = data_start
            .checked_add(chunk_size)
            .filter(|end| *end <= remaining.len())
            .ok_or_else(|| {
                SdkError::new(
                    ErrorCode::InvalidResponse,
                    format!(
                        "Invalid chunk size: {size_str} exceeds the {} bytes left in the response",
                        remaining.len() - data_start
                    ),
                )
            })?;

        result.extend_from_slice(&remaining[data_start..data_end]);
        remaining = &remaining[data_end..];
        remaining = remaining.strip_prefix(b"\r\n").unwrap_or(remaining);
    }

    Ok(result)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        let (host, port, path) = parse_url("http://localhost:4000/graphql").unwrap();
        assert_eq!(host, "localhost");
        assert_eq!(port, 4000);
        assert_eq!(path, "/graphql");

        let (host, port, path) = parse_url("example.com/api/graphql").unwrap();
        assert_eq!(host, "example.com");
        assert_eq!(port, 80);
        assert_eq!(path, "/api/graphql");

        let (_, _, path) = parse_url("http://127.0.0.1:8080").unwrap();
        assert_eq!(path, "/");
    }

    #[test]
    fn test_parse_url_rejections() {
        assert_eq!(
            parse_url("https://example.com/graphql").unwrap_err().code,
            ErrorCode::HttpsNotSupported
        );
        assert_eq!(
            parse_url("http://localhost:port/graphql").unwrap_err().code,
            ErrorCode::InvalidUrl
        );
        assert_eq!(
            parse_url("http://:4000/graphql").unwrap_err().code,
            ErrorCode::InvalidUrl
        );
    }

    #[test]
    fn test_parse_http_response() {
        let response = b"HTTP/1.1 200 OK\r\n\
                         Content-Type: application/json\r\n\
                         \r\n\
                         {\"data\":{\"hello\":\"world\"}}";
        let parsed = parse_http_response(response).unwrap();
        assert_eq!(parsed.status, 200);
        assert!(parsed.is_success());
        assert_eq!(parsed.body, "{\"data\":{\"hello\":\"world\"}}");
    }

    #[test]
    fn test_parse_error_status() {
        let response = b"HTTP/1.1 502 Bad Gateway\r\n\r\nupstream down";
        let parsed = parse_http_response(response).unwrap();
        assert_eq!(parsed.status, 502);
        assert!(!parsed.is_success());
        assert_eq!(parsed.status_line, "HTTP/1.1 502 Bad Gateway");
    }

    #[test]
    fn test_parse_chunked_response() {
        let response = b"HTTP/1.1 200 OK\r\n\
                         transfer-encoding: chunked\r\n\
                         \r\n\
                         5\r\nhello\r\n5\r\nworld\r\n0\r\n\r\n";
        let parsed = parse_http_response(response).unwrap();
        assert_eq!(parsed.body, "helloworld");
    }

    #[test]
    fn test_parse_empty_response() {
        let err = parse_http_response(b"").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
    }

    #[test]
    fn test_chunked_body_parsing() {
        let chunked = b"5\r\nhello\r\n5;ext=1\r\nworld\r\n0\r\n\r\n";
        let result = parse_chunked_body(chunked).unwrap();
        assert_eq!(result, b"helloworld");

        let err = parse_chunked_body(b"zz\r\nhello\r\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
    }

    #[test]
    fn test_oversized_chunk_is_invalid_response() {
        let response = b"HTTP/1.1 200 OK\r\n\
                         Transfer-Encoding: chunked\r\n\
                         \r\n\
                         ffffffffffffffff\r\n{}\r\n0\r\n\r\n";
        let err = parse_http_response(response).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
        assert!(err.message.starts_with("Invalid chunk size: ffffffffffffffff"));
    }

    #[test]
    fn test_truncated_chunk_is_invalid_response() {
        let err = parse_chunked_body(b"10\r\n{\"data\":{}}").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);

        let err = parse_chunked_body(b"5\r\nhello\r\n5").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
        assert_eq!(err.message, "Truncated chunk size line");
    }

    #[test]
    fn test_headers_cut_off() {
        let err = parse_http_response(b"HTTP/1.1 200 OK\r\nContent-Type: application/js")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
        assert_eq!(err.message, "Could not find response body");
    }

    #[test]
    fn test_malformed_status_line() {
        let err = parse_http_response(b"garbage\r\n\r\n{}").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
        assert!(err.message.starts_with("Malformed status line"));
    }

    #[test]
    fn test_https_rejected_at_construction() {
        let err = HttpTransport::new(&ClientConfig::new("https://shop.example/graphql")).unwrap_err();
        assert_eq!(err.code, ErrorCode::HttpsNotSupported);
    }
}
