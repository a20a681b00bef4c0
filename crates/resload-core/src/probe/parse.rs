//! Parse HTTP response header lines into a ProbeResult.

use super::ProbeResult;

/// Parse collected header lines. With redirects followed, only the last
/// response's headers count.
pub(crate) fn parse_headers(lines: &[String]) -> ProbeResult {
    let mut content_length = None;
    let mut content_type = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_length = None;
            content_type = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }
    }

    ProbeResult {
        content_length,
        content_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_headers_length_and_type() {
        let lines = [
            "HTTP/1.1 200 OK".to_string(),
            "Content-Length: 12345".to_string(),
            "Content-Type: text/css; charset=utf-8".to_string(),
        ];
        let r = parse_headers(&lines);
        assert_eq!(r.content_length, Some(12345));
        assert_eq!(r.content_type.as_deref(), Some("text/css; charset=utf-8"));
    }

    #[test]
    fn parse_headers_keeps_last_response_only() {
        let lines = [
            "HTTP/1.1 302 Found".to_string(),
            "Location: https://cdn.example.com/app.js".to_string(),
            "Content-Type: text/html".to_string(),
            "".to_string(),
            "HTTP/1.1 200 OK".to_string(),
            "Content-Length: 42".to_string(),
        ];
        let r = parse_headers(&lines);
        assert_eq!(r.content_length, Some(42));
        assert!(r.content_type.is_none());
    }

    #[test]
    fn parse_headers_ignores_garbage() {
        let lines = [
            "Content-Length: nope".to_string(),
            "no colon here".to_string(),
        ];
        let r = parse_headers(&lines);
        assert!(r.content_length.is_none());
    }
}
