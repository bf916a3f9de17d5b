use std::borrow::Cow;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use log::{debug, info, warn};
use serde::Serialize;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::locale::Language;
use crate::puzzle::calculator::CrossingPlan;
use crate::puzzle::model::{CrossingInput, GroupColor, GroupCount};
use crate::report::CalculationReport;

#[derive(Debug, Clone, Serialize)]
pub struct LastCalculation {
    pub input: CrossingInput,
    pub plan: CrossingPlan,
    pub source: &'static str,
    pub computed_unix_ms: i64,
}

#[derive(Debug, Clone)]
pub struct ApiSharedState {
    total_requests: u64,
    calculations: u64,
    rejected_inputs: u64,
    server_started_unix_ms: i64,
    last_calculation: Option<LastCalculation>,
}

impl Default for ApiSharedState {
    fn default() -> Self {
        Self {
            total_requests: 0,
            calculations: 0,
            rejected_inputs: 0,
            server_started_unix_ms: Local::now().timestamp_millis(),
            last_calculation: None,
        }
    }
}

impl ApiSharedState {
    /// Records a calculation made by any front end (API or GUI).
    pub fn record_calculation(
        &mut self,
        input: CrossingInput,
        plan: CrossingPlan,
        source: &'static str,
    ) {
        self.calculations += 1;
        self.last_calculation = Some(LastCalculation {
            input,
            plan,
            source,
            computed_unix_ms: Local::now().timestamp_millis(),
        });
    }

    pub fn calculations(&self) -> u64 {
        self.calculations
    }

    pub fn last_calculation(&self) -> Option<&LastCalculation> {
        self.last_calculation.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

pub struct ApiServer {
    pub state: Arc<Mutex<ApiSharedState>>,
    stop: Arc<AtomicBool>,
    http_join: Option<JoinHandle<()>>,
}

impl ApiServer {
    pub fn start(config: ApiServerConfig) -> Result<Self> {
        let bind = format!("{}:{}", config.bind_addr, config.port);
        let server = Server::http(&bind)
            .map_err(|err| anyhow::anyhow!("failed to start API server on {bind}: {err}"))?;
        info!("calculator API listening on http://{bind}/v1");
        let state = Arc::new(Mutex::new(ApiSharedState::default()));
        let stop = Arc::new(AtomicBool::new(false));
        let state_for_thread = Arc::clone(&state);
        let stop_for_thread = Arc::clone(&stop);
        let http_join =
            thread::spawn(move || run_server_loop(server, state_for_thread, stop_for_thread));

        Ok(Self {
            state,
            stop,
            http_join: Some(http_join),
        })
    }

    /// Blocks until the server thread exits.
    pub fn wait(mut self) {
        if let Some(join) = self.http_join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.http_join.take() {
            let _ = join.join();
        }
        info!("calculator API stopped");
    }
}

fn run_server_loop(server: Server, state: Arc<Mutex<ApiSharedState>>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Relaxed) {
        match server.recv_timeout(Duration::from_millis(200)) {
            Ok(Some(request)) => handle_request(request, &state),
            Ok(None) => continue,
            Err(_) => continue,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiIndexResponse {
    api_base: String,
    calculate_url: String,
    state_url: String,
    health_url: String,
}

#[derive(Debug, Serialize)]
struct StateResponse {
    total_requests: u64,
    calculations: u64,
    rejected_inputs: u64,
    server_started_unix_ms: i64,
    last_calculation: Option<LastCalculation>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn handle_request(request: tiny_http::Request, state: &Arc<Mutex<ApiSharedState>>) {
    if request.method() != &Method::Get {
        let _ = send_text(request, StatusCode(405), "method not allowed");
        return;
    }

    let Some(remote_addr) = request.remote_addr() else {
        let _ = send_text(request, StatusCode(400), "missing remote address");
        return;
    };
    if !is_local_network_ip(remote_addr.ip()) {
        let _ = send_text(request, StatusCode(403), "forbidden: local network only");
        return;
    }

    let url = request.url().to_string();
    let (path, query) = split_path_query(&url);
    let base_url = request_base_url(&request);
    debug!("GET {path} from {remote_addr}");

    let mut guard = match state.lock() {
        Ok(guard) => guard,
        Err(_) => {
            let _ = send_text(request, StatusCode(500), "internal state lock error");
            return;
        }
    };
    guard.total_requests += 1;

    let sent = match path {
        "/" | "/v1" => {
            let payload = ApiIndexResponse {
                calculate_url: format!("{base_url}/v1/calculate?red=3&green=3&blue=1"),
                state_url: format!("{base_url}/v1/state"),
                health_url: format!("{base_url}/healthz"),
                api_base: base_url,
            };
            send_json(request, StatusCode(200), &payload)
        }
        "/v1/calculate" => match calculate_from_query(query) {
            Ok((input, report)) => {
                guard.record_calculation(input, report.plan.clone(), "api");
                send_json(request, StatusCode(200), &report)
            }
            Err(message) => {
                guard.rejected_inputs += 1;
                send_json(
                    request,
                    StatusCode(400),
                    &ErrorResponse { error: message },
                )
            }
        },
        "/v1/state" => {
            let payload = StateResponse {
                total_requests: guard.total_requests,
                calculations: guard.calculations(),
                rejected_inputs: guard.rejected_inputs,
                server_started_unix_ms: guard.server_started_unix_ms,
                last_calculation: guard.last_calculation().cloned(),
            };
            send_json(request, StatusCode(200), &payload)
        }
        "/healthz" => send_text(request, StatusCode(200), "ok"),
        _ => send_text(request, StatusCode(404), "not found"),
    };

    if let Err(err) = sent {
        warn!("failed to send response for {path}: {err:#}");
    }
}

/// Reads `red`, `green`, `blue`, `lang` and `strict` from a query string.
///
/// Counts are clamped the same way as interactive input unless `strict` is
/// set, in which case the first invalid count is reported as an error.
fn calculate_from_query(query: &str) -> Result<(CrossingInput, CalculationReport), String> {
    let strict = query_param(query, "strict")
        .map(|value| matches!(value.as_ref(), "" | "1" | "true" | "yes"))
        .unwrap_or(false);

    let mut input = CrossingInput::default();
    for color in GroupColor::ALL {
        let raw = query_param(query, color.as_str()).unwrap_or_default();
        input[color] = if strict {
            GroupCount::parse_strict(&raw).map_err(|err| format!("{}: {err}", color.as_str()))?
        } else {
            GroupCount::from_raw(&raw)
        };
    }

    let language = match query_param(query, "lang") {
        Some(code) => {
            Language::from_code(&code).ok_or_else(|| format!("unsupported language '{code}'"))?
        }
        None => Language::English,
    };

    Ok((input, CalculationReport::new(&input, language)))
}

fn send_json<T: Serialize>(
    request: tiny_http::Request,
    status: StatusCode,
    body: &T,
) -> Result<()> {
    let payload = serde_json::to_vec(body)?;
    let content_type = Header::from_str("Content-Type: application/json; charset=utf-8")
        .map_err(|_| anyhow::anyhow!("failed to build content-type header"))?;
    request.respond(
        Response::from_data(payload)
            .with_status_code(status)
            .with_header(content_type),
    )?;
    Ok(())
}

fn send_text(request: tiny_http::Request, status: StatusCode, body: &str) -> Result<()> {
    let content_type = Header::from_str("Content-Type: text/plain; charset=utf-8")
        .map_err(|_| anyhow::anyhow!("failed to build content-type header"))?;
    request.respond(
        Response::from_string(body.to_string())
            .with_status_code(status)
            .with_header(content_type),
    )?;
    Ok(())
}

fn split_path_query(url: &str) -> (&str, &str) {
    match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    }
}

fn request_base_url(request: &tiny_http::Request) -> String {
    for header in request.headers() {
        if header.field.equiv("Host") {
            return format!("http://{}", header.value.as_str());
        }
    }
    match request.remote_addr() {
        Some(addr) => format!("http://{addr}"),
        None => "http://localhost".to_string(),
    }
}

fn query_param<'a>(query: &'a str, key: &str) -> Option<Cow<'a, str>> {
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (k, v) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        if k == key {
            return Some(decode_query_value(v));
        }
    }
    None
}

/// Form-style decoding: `+` is a space and `%XX` a byte. Malformed escapes stay literal.
fn decode_query_value(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['%', '+']) {
        return Cow::Borrowed(raw);
    }
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' => match bytes.get(i + 1..i + 3).and_then(hex_byte) {
                Some(byte) => {
                    decoded.push(byte);
                    i += 3;
                }
                None => {
                    decoded.push(b'%');
                    i += 1;
                }
            },
            byte => {
                decoded.push(byte);
                i += 1;
            }
        }
    }
    Cow::Owned(String::from_utf8_lossy(&decoded).into_owned())
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    let digit = |byte: u8| char::from(byte).to_digit(16);
    let high = digit(pair[0])?;
    let low = digit(pair[1])?;
    u8::try_from(high * 16 + low).ok()
}

fn is_local_network_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback() || v4.is_private() || v4.is_link_local(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unique_local()
                || v6.is_unicast_link_local()
                || is_ipv4_mapped_local(v6)
        }
    }
}

fn is_ipv4_mapped_local(v6: Ipv6Addr) -> bool {
    match v6.to_ipv4_mapped() {
        Some(v4) => v4.is_loopback() || v4.is_private() || v4.is_link_local(),
        None => false,
    }
}
