//! Shared test infrastructure for integration tests.
//!
//! A `tiny_http` server stands in for the developer portal; tests drive the
//! compiled `devportal` binary against it and inspect the envelope.

use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tiny_http::{Header, Response, Server};

pub const SESSION_TOKEN: &str = "session-token-1";

/// Canned response for one `METHOD /path` (query strings are ignored).
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
        }
    }
}

/// A request the fake portal received.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub url: String,
    pub session: Option<String>,
    pub body: String,
}

pub struct FakePortalServer {
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    pub url: String,
    pub seen: Arc<Mutex<Vec<Seen>>>,
}

impl FakePortalServer {
    /// Start a portal that accepts the login and answers `routes`.
    pub fn start(routes: Vec<(&str, &str, Reply)>) -> Self {
        let mut table: HashMap<String, Reply> = routes
            .into_iter()
            .map(|(method, path, reply)| (format!("{method} {path}"), reply))
            .collect();
        table
            .entry("POST /session".to_string())
            .or_insert_with(|| Reply::json(200, serde_json::json!({"session": SESSION_TOKEN})));
        Self::serve(table)
    }

    fn serve(table: HashMap<String, Reply>) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind fake portal"));
        let addr = server.server_addr().to_ip().expect("ip listener");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let worker = Arc::clone(&server);
        let log = Arc::clone(&seen);
        let handle = std::thread::spawn(move || {
            for mut request in worker.incoming_requests() {
                let method = request.method().as_str().to_string();
                let url = request.url().to_string();
                let path = url.split('?').next().unwrap_or_default().to_string();
                let session = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("X-Portal-Session"))
                    .map(|h| h.value.as_str().to_string());
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                log.lock().expect("log lock").push(Seen {
                    method: method.clone(),
                    url,
                    session,
                    body,
                });

                let reply = table
                    .get(&format!("{method} {path}"))
                    .cloned()
                    .unwrap_or_else(|| Reply::json(404, serde_json::json!({"error": "no route"})));
                let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .expect("content type header");
                let response = Response::from_data(reply.body)
                    .with_status_code(reply.status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            server,
            handle: Some(handle),
            url: format!("http://{addr}"),
            seen,
        }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().expect("log lock").clone()
    }
}

impl Drop for FakePortalServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Outcome of one binary invocation.
#[derive(Debug)]
pub struct RunResult {
    pub envelope: Value,
    pub exit_code: Option<i32>,
    pub stderr: String,
}

/// Run `devportal` against `portal_url` with the given extra arguments.
pub fn run_devportal(portal_url: &str, args: &[&str]) -> anyhow::Result<RunResult> {
    run_devportal_with_env(portal_url, args, &[])
}

/// Like [`run_devportal`], with extra environment variables set on the child.
pub fn run_devportal_with_env(
    portal_url: &str,
    args: &[&str],
    envs: &[(&str, &str)],
) -> anyhow::Result<RunResult> {
    let output = Command::new(env!("CARGO_BIN_EXE_devportal"))
        .args(["--username", "dev@example.com", "--password", "secret"])
        .args(["--portal-url", portal_url])
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("RUST_BACKTRACE")
        .env_remove("RUST_LIB_BACKTRACE")
        .envs(envs.iter().copied())
        .output()?;

    let stdout = String::from_utf8(output.stdout)?;
    let line = stdout
        .lines()
        .find(|line| line.starts_with('{'))
        .ok_or_else(|| anyhow::anyhow!("no envelope on stdout: {stdout:?}"))?;
    Ok(RunResult {
        envelope: serde_json::from_str(line)?,
        exit_code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
