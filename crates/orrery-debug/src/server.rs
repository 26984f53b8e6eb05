//! tiny_http server on a background thread.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Request, Response, Server};

use crate::{DebugCommand, DebugState};

type HandlerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum DebugServerError {
    #[error("failed to bind to port {port}: {error}")]
    BindError { port: u16, error: String },
    #[error("failed to spawn server thread: {0}")]
    Spawn(#[source] std::io::Error),
}

pub struct DebugServer {
    port: u16,
    actual_port: Option<u16>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Deserialize)]
struct CommandRequest {
    command: String,
}

#[derive(Serialize)]
struct CommandResponse {
    executed: bool,
    command: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_seconds: f64,
}

impl DebugServer {
    /// Port 0 lets the OS choose; see [`actual_port`](Self::actual_port).
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self {
            port,
            actual_port: None,
            handle: None,
        }
    }

    pub fn start(&mut self, state: Arc<Mutex<DebugState>>) -> Result<(), DebugServerError> {
        let server = Server::http(format!("127.0.0.1:{}", self.port)).map_err(|e| {
            DebugServerError::BindError {
                port: self.port,
                error: e.to_string(),
            }
        })?;

        let actual_port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .unwrap_or(self.port);
        self.actual_port = Some(actual_port);

        let handle = thread::Builder::new()
            .name("debug-api".into())
            .spawn(move || Self::run_server(server, state))
            .map_err(DebugServerError::Spawn)?;
        self.handle = Some(handle);
        log::info!("Debug API listening on 127.0.0.1:{actual_port}");
        Ok(())
    }

    /// Detaches the server thread. tiny_http has no graceful shutdown and the
    /// thread may be parked in `incoming_requests`, so it is not joined.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            std::mem::forget(handle);
        }
    }

    #[must_use]
    pub fn actual_port(&self) -> u16 {
        self.actual_port.unwrap_or(self.port)
    }

    fn run_server(server: Server, state: Arc<Mutex<DebugState>>) {
        for request in server.incoming_requests() {
            if let Err(e) = Self::handle_request(request, &state) {
                log::warn!("Debug API request failed: {e}");
            }
        }
    }

    fn handle_request(
        mut request: Request,
        state: &Arc<Mutex<DebugState>>,
    ) -> Result<(), HandlerError> {
        let response = match (request.method(), request.url()) {
            (&Method::Get, "/health") => {
                let uptime_seconds = lock(state)?.uptime_seconds;
                json_response(&HealthResponse {
                    status: "ok",
                    uptime_seconds,
                })?
            }
            (&Method::Get, "/metrics") => json_response(&*lock(state)?)?,
            (&Method::Get, "/bodies") => json_response(&lock(state)?.bodies)?,
            (&Method::Post, "/command") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                match serde_json::from_str::<CommandRequest>(&body) {
                    Ok(req) => {
                        let parsed = DebugCommand::parse(&req.command);
                        if let Some(command) = parsed {
                            lock(state)?.push_command(command);
                        }
                        json_response(&CommandResponse {
                            executed: parsed.is_some(),
                            command: req.command,
                        })?
                    }
                    Err(e) => {
                        Response::from_string(format!("invalid command body: {e}"))
                            .with_status_code(400)
                    }
                }
            }
            _ => Response::from_string("Not Found").with_status_code(404),
        };

        request.respond(response)?;
        Ok(())
    }
}

fn lock(state: &Mutex<DebugState>) -> Result<std::sync::MutexGuard<'_, DebugState>, HandlerError> {
    state.lock().map_err(|_| "debug state poisoned".into())
}

fn json_response<T: Serialize + ?Sized>(
    value: &T,
) -> Result<Response<std::io::Cursor<Vec<u8>>>, HandlerError> {
    let json = serde_json::to_string(value)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|()| "invalid content-type header")?;
    Ok(Response::from_string(json).with_header(header))
}

impl Drop for DebugServer {
    fn drop(&mut self) {
        self.stop();
    }
}
