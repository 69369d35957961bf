//! A blocking HTTP server that answers Yahoo chart requests from a table.

use std::{
    collections::HashMap,
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    thread,
};

/// Three full daily rows for `symbol`, 2024-01-01 to 2024-01-03 in IST.
pub fn chart_body(symbol: &str) -> String {
    format!(
        r#"{{"chart":{{"result":[{{
            "meta":{{"symbol":"{symbol}","currency":"INR","gmtoffset":19800}},
            "timestamp":[1704080700,1704167100,1704253500],
            "indicators":{{"quote":[{{
                "open":[10.0,10.5,11.0],
                "high":[11.0,12.0,11.5],
                "low":[9.0,10.0,10.5],
                "close":[10.5,11.0,11.2],
                "volume":[1000,2000,1500]
            }}]}}
        }}],"error":null}}}}"#
    )
}

const NOT_FOUND_BODY: &str =
    r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;

/// Canned answer for one symbol.
pub enum Reply {
    Chart,
    Status(&'static str, &'static str),
}

/// Starts the server on a free port and returns its base URL.
///
/// Symbols without an entry get Yahoo's `Not Found` chart error.
pub fn spawn_chart_server(replies: Vec<(&'static str, Reply)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let replies: HashMap<&'static str, Reply> = replies.into_iter().collect();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            answer(stream, &replies);
        }
    });

    format!("http://{addr}")
}

fn answer(mut stream: TcpStream, replies: &HashMap<&'static str, Reply>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf);
    let symbol = request
        .split_whitespace()
        .nth(1)
        .and_then(|target| target.split("/chart/").nth(1))
        .map(|rest| rest.split('?').next().unwrap_or(rest).to_string())
        .unwrap_or_default();

    let (status, body) = match replies.get(symbol.as_str()) {
        Some(Reply::Chart) => ("200 OK", chart_body(&symbol)),
        Some(Reply::Status(status, body)) => (*status, body.to_string()),
        None => ("404 Not Found", NOT_FOUND_BODY.to_string()),
    };
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
