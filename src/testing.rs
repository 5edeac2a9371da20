//! Test helpers: a throwaway HTTP responder and fixture credentials.

use crate::core::credentials::Credentials;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub fn credentials() -> Credentials {
    Credentials {
        practicum_token: "practicum-token".to_string(),
        telegram_token: "123:telegram-token".to_string(),
        telegram_chat_id: "42".to_string(),
    }
}

/// Answers the next connection with `status_line` and `body`.
/// Returns the base URL and a handle resolving to the raw request.
pub async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let (base, handle) = serve(vec![(status_line.to_string(), body.to_string())]).await;
    let handle = tokio::spawn(async move {
        handle
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap_or_default()
    });
    (base, handle)
}

/// Answers one connection per response, in order.
pub async fn serve(responses: Vec<(String, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status_line, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        }
        requests
    });

    (base, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
