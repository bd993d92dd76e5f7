use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use domain::serial::select_default_port;
use domain::{CommandTable, PortNumber, SerialDevice, SerialPortInfo};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "KVM Manager Service";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/serial_ports", get(get_serial_ports))
        .route("/ports", get(get_ports))
        .route("/switch", get(switch_port))
        .route("/test_serial/{serial_port}", get(test_serial_port))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "description": "HTTP bridge for MLEEDA KVM1001A control",
        "endpoints": {
            "health": "/health",
            "serial_ports": "/serial_ports",
            "ports": "/ports",
            "switch": "/switch?serial_port={device}&port={1-10}",
            "test_serial": "/test_serial/{device}"
        }
    }))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    serial_ports_count: usize,
    uptime_secs: u64,
    timestamp: chrono::DateTime<chrono::Utc>,
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let serial_ports_count = match state.list_serial_ports().await {
        Ok(ports) => ports.len(),
        Err(e) => {
            warn!(error = %e, "Health check could not enumerate serial ports");
            0
        }
    };

    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        serial_ports_count,
        uptime_secs: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now(),
    })
}

#[derive(Debug, Serialize)]
struct SerialPortsResponse {
    serial_ports: Vec<SerialPortInfo>,
    default_port: Option<String>,
}

async fn get_serial_ports(State(state): State<Arc<AppState>>) -> Response {
    match state.list_serial_ports().await {
        Ok(serial_ports) => {
            let default_port = select_default_port(&serial_ports).map(|p| p.device.clone());
            Json(SerialPortsResponse {
                serial_ports,
                default_port,
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "Error listing serial ports");
            detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get serial ports: {}", e),
            )
        }
    }
}

#[derive(Debug, Serialize)]
struct PortsResponse {
    available_ports: Vec<u8>,
    commands: BTreeMap<u8, &'static str>,
    port_names: BTreeMap<u8, String>,
}

async fn get_ports(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let commands = CommandTable::entries()
        .map(|(port, command)| (port.get(), command.as_str()))
        .collect();
    let port_names = PortNumber::all()
        .map(|port| (port.get(), state.naming.display_name(port)))
        .collect();

    Json(PortsResponse {
        available_ports: PortNumber::all().map(|p| p.get()).collect(),
        commands,
        port_names,
    })
}

#[derive(Debug, Deserialize)]
struct SwitchQuery {
    serial_port: String,
    port: i64,
}

fn device_exists(path: &str) -> bool {
    // COM names on Windows are not filesystem entries; the opener reports those
    !cfg!(unix) || std::path::Path::new(path).exists()
}

async fn switch_port(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SwitchQuery>,
) -> Response {
    info!(port = query.port, serial_port = %query.serial_port, "Switch request");

    let device = match SerialDevice::new(query.serial_port) {
        Ok(device) => device,
        Err(e) => return detail(StatusCode::BAD_REQUEST, e.to_string()),
    };

    if !device_exists(device.as_str()) {
        return detail(
            StatusCode::BAD_REQUEST,
            format!("Serial port {} does not exist", device),
        );
    }

    let result = state.switch.switch_port(&device, query.port).await;
    if !result.success() {
        // Failed switches are still 200 so clients read one response shape
        warn!(error = ?result.error(), "Switch operation failed");
    }

    Json(result).into_response()
}

async fn test_serial_port(
    State(state): State<Arc<AppState>>,
    Path(serial_port): Path<String>,
) -> impl IntoResponse {
    let device = match SerialDevice::new(serial_port.clone()) {
        Ok(device) => device,
        Err(e) => {
            return Json(json!({
                "success": false,
                "error": format!("Failed to connect to {}: {}", serial_port, e)
            }));
        }
    };

    // Wait for any switch in flight on this device
    let _guard = match &state.locks {
        Some(locks) => Some(locks.acquire(&device).await),
        None => None,
    };

    let line = state.switch.line_config();
    match state.opener.open(&device, line).await {
        Ok(link) => {
            drop(link);
            Json(json!({
                "success": true,
                "message": format!("Successfully connected to {}", device),
                "port_info": {
                    "name": device.as_str(),
                    "baudrate": line.baud_rate,
                    "timeout": line.read_timeout().as_secs_f64()
                }
            }))
        }
        Err(e) => Json(json!({
            "success": false,
            "error": format!("Failed to connect to {}: {}", device, e)
        })),
    }
}
