//! Minimal HTTP/1.1 static server for integration tests.
//!
//! Serves a fixed set of paths. HEAD and GET on a known path answer 200 with
//! Content-Length and Content-Type; anything else is 404. Every request path
//! is counted so tests can assert how often a resource was fetched.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

pub struct StaticServer {
    pub base: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl StaticServer {
    /// Number of requests received for `path` (e.g. "/app.js").
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

/// Starts a server in a background thread serving `files` (path -> body).
/// The server runs until the process exits.
pub fn start(files: &[(&str, &str)]) -> StaticServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let files: Arc<HashMap<String, String>> = Arc::new(
        files
            .iter()
            .map(|(p, b)| (p.to_string(), b.to_string()))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let files = Arc::clone(&files);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &files, &hits));
        }
    });
    StaticServer {
        base: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    files: &HashMap<String, String>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");
    *hits.lock().unwrap().entry(path.to_string()).or_insert(0) += 1;

    let Some(body) = files.get(path) else {
        let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
        return;
    };
    let content_type = if path.ends_with(".css") {
        "text/css"
    } else {
        "text/javascript"
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: {}\r\n\r\n",
        body.len(),
        content_type
    );
    let _ = stream.write_all(response.as_bytes());
    if method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(body.as_bytes());
    }
}
