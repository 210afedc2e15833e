//! Broker endpoint configuration.
//!
//! The page talks to a STOMP broker on its own origin. Only the path is
//! configurable, at build time through `BCHAT_WS_ENDPOINT`; an absolute
//! `ws://`/`wss://` URL there replaces the origin as well.

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod endpoint_test;

/// Raw-WebSocket route of a SockJS `/ws` endpoint.
pub const DEFAULT_ENDPOINT: &str = "/ws/websocket";

/// Client configuration, provided to the component tree as context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_ENDPOINT.to_owned() }
    }
}

impl ClientConfig {
    /// Configuration baked in at compile time.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::with_endpoint(option_env!("BCHAT_WS_ENDPOINT"))
    }

    /// Blank values fall back to [`DEFAULT_ENDPOINT`]; bare paths gain a leading `/`.
    #[must_use]
    pub fn with_endpoint(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::default();
        };
        let endpoint = if is_absolute(raw) || raw.starts_with('/') {
            raw.to_owned()
        } else {
            format!("/{raw}")
        };
        Self { endpoint }
    }

    /// WebSocket URL for a page served with `protocol` (e.g. `"https:"`) from `host`.
    #[must_use]
    pub fn websocket_url(&self, protocol: &str, host: &str) -> String {
        if is_absolute(&self.endpoint) {
            return self.endpoint.clone();
        }
        let scheme = if protocol.starts_with("https") { "wss" } else { "ws" };
        format!("{scheme}://{host}{}", self.endpoint)
    }
}

fn is_absolute(endpoint: &str) -> bool {
    endpoint.starts_with("ws://") || endpoint.starts_with("wss://")
}

/// Origin details of the current page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLocation {
    /// Scheme with trailing colon, as `Location.protocol` reports it.
    pub protocol: String,
    /// Host and port.
    pub host: String,
    /// Host without port; sent as the STOMP virtual host.
    pub hostname: String,
}

/// Read the current page location, falling back to a local broker.
#[cfg(feature = "csr")]
pub fn page_location() -> PageLocation {
    let location = web_sys::window().map(|w| w.location());
    let location = location.as_ref();
    PageLocation {
        protocol: location
            .and_then(|l| l.protocol().ok())
            .unwrap_or_else(|| "http:".to_owned()),
        host: location
            .and_then(|l| l.host().ok())
            .unwrap_or_else(|| "localhost:8080".to_owned()),
        hostname: location
            .and_then(|l| l.hostname().ok())
            .unwrap_or_else(|| "localhost".to_owned()),
    }
}
