use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(Debug)]
struct Window {
    start: Instant,
    reads: u32,
    writes: u32,
}

/// Fixed one-second window shared by all clients. Writes (status updates,
/// session open/close) get a quarter of the read budget, at least one.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    read_rps: u32,
    write_rps: u32,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Self {
        let read_rps = rps.max(1);
        Self {
            read_rps,
            write_rps: (read_rps / 4).max(1),
            window: Arc::new(Mutex::new(Window {
                start: Instant::now(),
                reads: 0,
                writes: 0,
            })),
        }
    }

    fn allow(&self, is_write: bool) -> bool {
        let mut guard = self.window.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        if now.duration_since(guard.start) >= Duration::from_secs(1) {
            guard.start = now;
            guard.reads = 0;
            guard.writes = 0;
        }
        let (used, limit) = if is_write {
            (&mut guard.writes, self.write_rps)
        } else {
            (&mut guard.reads, self.read_rps)
        };
        if *used < limit {
            *used += 1;
            true
        } else {
            false
        }
    }
}

pub async fn rps_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let is_write = !matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS);
    if !limiter.allow(is_write) {
        tracing::warn!(method = %req.method(), path = %req.uri().path(), "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "1")],
            Json(json!({ "error": "rate_limit_exceeded" })),
        )
            .into_response();
    }
    next.run(req).await
}
