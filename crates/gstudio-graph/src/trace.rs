//! Request trace event definitions.
//!
//! Only the wire shape lives here. Events serialize as flat JSON objects whose
//! `type` field reads `request:start`, `guard:end`, `pipe:error` and so on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const MAX_STACK_LINES: usize = 10;

/// Part of the request pipeline an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Guard,
    Pipe,
    Interceptor,
    Handler,
    Filter,
    Request,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Guard => "guard",
            Stage::Pipe => "pipe",
            Stage::Interceptor => "interceptor",
            Stage::Handler => "handler",
            Stage::Filter => "filter",
            Stage::Request => "request",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guard" => Ok(Stage::Guard),
            "pipe" => Ok(Stage::Pipe),
            "interceptor" => Ok(Stage::Interceptor),
            "handler" => Ok(Stage::Handler),
            "filter" => Ok(Stage::Filter),
            "request" => Ok(Stage::Request),
            other => Err(format!("unknown stage '{}'", other)),
        }
    }
}

/// Error flattened for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedError {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl SerializedError {
    /// Capture an error. `name` is the error's type name without its module
    /// path, `stack` the first lines of its debug rendering and `cause` its
    /// immediate source.
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        let message = error.to_string();
        let debug = format!("{:?}", error);
        let stack = debug
            .lines()
            .take(MAX_STACK_LINES)
            .map(str::to_string)
            .collect();

        Self {
            name: short_type_name::<E>(),
            message: if message.is_empty() { debug } else { message },
            stack: Some(stack),
            cause: error.source().map(|source| source.to_string()),
        }
    }

    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
            cause: None,
        }
    }
}

fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let name = base.rsplit("::").next().unwrap_or(base);
    if name.is_empty() {
        "Error".to_string()
    } else {
        name.to_string()
    }
}

/// One observation from the request pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTraceEvent", into = "RawTraceEvent")]
pub enum TraceEvent {
    RequestStart {
        request_id: String,
        method: String,
        path: String,
        sample_in: Option<Value>,
        /// Start time in milliseconds.
        t0: f64,
    },
    RequestEnd {
        request_id: String,
        status: u16,
        dt: f64,
        size: Option<u64>,
    },
    RequestError {
        request_id: String,
        dt: f64,
        error: SerializedError,
    },
    HandlerReturn {
        request_id: String,
        controller: String,
        handler: String,
        sample_out: Option<Value>,
    },
    StageStart {
        stage: Stage,
        request_id: String,
        name: String,
        args: Option<Vec<Value>>,
    },
    StageEnd {
        stage: Stage,
        request_id: String,
        name: String,
        dt: f64,
        result: Option<Value>,
    },
    StageError {
        stage: Stage,
        request_id: String,
        name: String,
        dt: f64,
        error: SerializedError,
    },
}

impl TraceEvent {
    /// Value of the JSON `type` tag.
    pub fn event_type(&self) -> String {
        match self {
            TraceEvent::RequestStart { .. } => "request:start".to_string(),
            TraceEvent::RequestEnd { .. } => "request:end".to_string(),
            TraceEvent::RequestError { .. } => "request:error".to_string(),
            TraceEvent::HandlerReturn { .. } => "handler:return".to_string(),
            TraceEvent::StageStart { stage, .. } => format!("{}:start", stage),
            TraceEvent::StageEnd { stage, .. } => format!("{}:end", stage),
            TraceEvent::StageError { stage, .. } => format!("{}:error", stage),
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            TraceEvent::RequestStart { request_id, .. }
            | TraceEvent::RequestEnd { request_id, .. }
            | TraceEvent::RequestError { request_id, .. }
            | TraceEvent::HandlerReturn { request_id, .. }
            | TraceEvent::StageStart { request_id, .. }
            | TraceEvent::StageEnd { request_id, .. }
            | TraceEvent::StageError { request_id, .. } => request_id,
        }
    }
}

/// Flat wire form shared by every event kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTraceEvent {
    #[serde(rename = "type")]
    kind: String,
    request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sample_in: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    t0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<SerializedError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    controller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sample_out: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    args: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
}

fn required<T>(value: Option<T>, field: &str, kind: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("'{}' event is missing '{}'", kind, field))
}

impl TryFrom<RawTraceEvent> for TraceEvent {
    type Error = String;

    fn try_from(raw: RawTraceEvent) -> Result<Self, Self::Error> {
        let kind = raw.kind.as_str();
        let request_id = raw.request_id;

        let event = match kind {
            "request:start" => TraceEvent::RequestStart {
                request_id,
                method: required(raw.method, "method", kind)?,
                path: required(raw.path, "path", kind)?,
                sample_in: raw.sample_in,
                t0: required(raw.t0, "t0", kind)?,
            },
            "request:end" => TraceEvent::RequestEnd {
                request_id,
                status: required(raw.status, "status", kind)?,
                dt: required(raw.dt, "dt", kind)?,
                size: raw.size,
            },
            "request:error" => TraceEvent::RequestError {
                request_id,
                dt: required(raw.dt, "dt", kind)?,
                error: required(raw.error, "error", kind)?,
            },
            "handler:return" => TraceEvent::HandlerReturn {
                request_id,
                controller: required(raw.controller, "controller", kind)?,
                handler: required(raw.handler, "handler", kind)?,
                sample_out: raw.sample_out,
            },
            _ => {
                let (stage, phase) = kind
                    .split_once(':')
                    .ok_or_else(|| format!("malformed event type '{}'", kind))?;
                let stage: Stage = stage.parse()?;
                let name = required(raw.name, "name", kind)?;

                match phase {
                    "start" => TraceEvent::StageStart {
                        stage,
                        request_id,
                        name,
                        args: raw.args,
                    },
                    "end" => TraceEvent::StageEnd {
                        stage,
                        request_id,
                        name,
                        dt: required(raw.dt, "dt", kind)?,
                        result: raw.result,
                    },
                    "error" => TraceEvent::StageError {
                        stage,
                        request_id,
                        name,
                        dt: required(raw.dt, "dt", kind)?,
                        error: required(raw.error, "error", kind)?,
                    },
                    other => return Err(format!("unknown event phase '{}'", other)),
                }
            }
        };

        Ok(event)
    }
}

impl From<TraceEvent> for RawTraceEvent {
    fn from(event: TraceEvent) -> Self {
        let kind = event.event_type();
        match event {
            TraceEvent::RequestStart {
                request_id,
                method,
                path,
                sample_in,
                t0,
            } => RawTraceEvent {
                kind,
                request_id,
                method: Some(method),
                path: Some(path),
                sample_in,
                t0: Some(t0),
                ..RawTraceEvent::default()
            },
            TraceEvent::RequestEnd {
                request_id,
                status,
                dt,
                size,
            } => RawTraceEvent {
                kind,
                request_id,
                status: Some(status),
                dt: Some(dt),
                size,
                ..RawTraceEvent::default()
            },
            TraceEvent::RequestError {
                request_id,
                dt,
                error,
            } => RawTraceEvent {
                kind,
                request_id,
                dt: Some(dt),
                error: Some(error),
                ..RawTraceEvent::default()
            },
            TraceEvent::HandlerReturn {
                request_id,
                controller,
                handler,
                sample_out,
            } => RawTraceEvent {
                kind,
                request_id,
                controller: Some(controller),
                handler: Some(handler),
                sample_out,
                ..RawTraceEvent::default()
            },
            TraceEvent::StageStart {
                request_id,
                name,
                args,
                ..
            } => RawTraceEvent {
                kind,
                request_id,
                name: Some(name),
                args,
                ..RawTraceEvent::default()
            },
            TraceEvent::StageEnd {
                request_id,
                name,
                dt,
                result,
                ..
            } => RawTraceEvent {
                kind,
                request_id,
                name: Some(name),
                dt: Some(dt),
                result,
                ..RawTraceEvent::default()
            },
            TraceEvent::StageError {
                request_id,
                name,
                dt,
                error,
                ..
            } => RawTraceEvent {
                kind,
                request_id,
                name: Some(name),
                dt: Some(dt),
                error: Some(error),
                ..RawTraceEvent::default()
            },
        }
    }
}
