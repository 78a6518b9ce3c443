#![forbid(unsafe_code)]

use std::io::Read;
use std::sync::Arc;
use std::thread;

use log::{info, warn};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tokens::PredictRequest;

use crate::echo::EchoModel;

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn reply(request: Request, status: u16, body: String, json: bool) {
    let mut response = Response::from_string(body).with_status_code(StatusCode(status));
    if json {
        if let Some(h) = header("Content-Type", "application/json") {
            response.add_header(h);
        }
    }
    if let Some(h) = header("Access-Control-Allow-Origin", "*") {
        response.add_header(h);
    }
    if let Err(e) = request.respond(response) {
        warn!("failed to send response: {e}");
    }
}

fn predict_body(request: &mut Request, model: &EchoModel) -> Option<String> {
    let mut content = String::new();
    request.as_reader().read_to_string(&mut content).ok()?;
    let req = serde_json::from_str::<PredictRequest>(&content).ok()?;
    serde_json::to_string(&model.predict(&req.input_text)).ok()
}

/// Answer a single request.
///
/// - `GET /health` -> `OK`
/// - `POST /predict` -> prediction JSON, or 400 when the body is not a predict request
/// - anything else -> 404
pub fn handle(mut request: Request, model: &EchoModel) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let (status, body, json) = match (&method, url.as_str()) {
        (Method::Get, "/health") => (200, "OK".to_string(), false),
        (Method::Post, "/predict") => match predict_body(&mut request, model) {
            Some(body) => (200, body, true),
            None => (400, "Bad Request".to_string(), false),
        },
        _ => (404, "Not Found".to_string(), false),
    };
    info!("{method} {url} -> {status}");
    reply(request, status, body, json);
}

/// Accept requests forever, one thread per request.
pub fn serve(server: Server, model: Arc<EchoModel>) {
    for request in server.incoming_requests() {
        let model = model.clone();
        thread::spawn(move || handle(request, &model));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::{SocketAddr, TcpStream};

    fn start() -> SocketAddr {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        thread::spawn(move || serve(server, Arc::new(EchoModel::default())));
        addr
    }

    // minimal HTTP/1.0 exchange, returns (status, body)
    fn exchange(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, String) {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(
            stream,
            "{method} {path} HTTP/1.0\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        let mut reader = BufReader::new(stream);
        let mut status_line = String::new();
        reader.read_line(&mut status_line).unwrap();
        let status = status_line.split_whitespace().nth(1).unwrap().parse().unwrap();
        let mut rest = String::new();
        reader.read_to_string(&mut rest).unwrap();
        let body = rest.split_once("\r\n\r\n").map(|(_, b)| b.to_string()).unwrap_or_default();
        (status, body)
    }

    #[test]
    fn health_ok() {
        let addr = start();
        assert_eq!(exchange(addr, "GET", "/health", ""), (200, "OK".to_string()));
    }

    #[test]
    fn predict_returns_wire_format() {
        let addr = start();
        let (status, body) = exchange(addr, "POST", "/predict", r#"{"input_text":"a cat"}"#);
        assert_eq!(status, 200);
        let parsed: tokens::PredictionResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, EchoModel::default().predict("a cat"));
    }

    #[test]
    fn bad_body_is_400() {
        let addr = start();
        assert_eq!(exchange(addr, "POST", "/predict", r#"{"text":1}"#).0, 400);
    }

    #[test]
    fn unknown_route_is_404() {
        let addr = start();
        assert_eq!(exchange(addr, "GET", "/predict", "").0, 404);
    }
}
