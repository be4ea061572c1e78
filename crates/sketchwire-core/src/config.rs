//! Session configuration and hub URL helpers.

use crate::color::Rgba;
use crate::storage::DEFAULT_STORAGE_KEY;
use crate::tools::{DEFAULT_ERASER_WIDTH, DEFAULT_PEN_WIDTH};
use serde::{Deserialize, Serialize};

/// Default surface width when the host gives no container size.
pub const DEFAULT_WIDTH: u32 = 800;

/// Default surface height when the host gives no container size.
pub const DEFAULT_HEIGHT: u32 = 600;

/// Settings for one drawing session.
///
/// Every field has a default, so a partial JSON object is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial surface width in pixels.
    pub width: u32,
    /// Initial surface height in pixels.
    pub height: u32,
    /// Background color; the eraser paints with it.
    pub background: Rgba,
    /// Width the pen tool starts with.
    pub pen_width: u32,
    /// Width selected with the eraser tool.
    pub eraser_width: u32,
    /// Maximum undo checkpoints kept. `None` keeps all of them.
    pub history_limit: Option<usize>,
    /// Key the canvas is persisted under.
    pub storage_key: String,
    /// WebSocket URL of the broadcast hub.
    pub hub_url: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: Rgba::white(),
            pen_width: DEFAULT_PEN_WIDTH,
            eraser_width: DEFAULT_ERASER_WIDTH,
            history_limit: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            hub_url: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_hub_url(mut self, url: impl Into<String>) -> Self {
        self.hub_url = Some(url.into());
        self
    }

    /// Fill in the hub URL from `?room=..&server=..` style parameters.
    ///
    /// The hub URL is only set when a server is given.
    pub fn apply_params(mut self, query: &str) -> Self {
        let (room, server) = parse_params(query);
        if let Some(server) = server {
            self.hub_url = Some(hub_url(&server, room.as_deref()));
        }
        self
    }
}

/// Parse room and server parameters from a query string or hash.
pub fn parse_params(s: &str) -> (Option<String>, Option<String>) {
    let s = s.trim_start_matches(['?', '#']);

    let mut room = None;
    let mut server = None;

    for pair in s.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            if !value.is_empty() {
                match key {
                    "room" => room = Some(value.to_string()),
                    "server" => server = Some(value.to_string()),
                    _ => {}
                }
            }
        }
    }

    (room, server)
}

/// Build a WebSocket URL from a `host:port` or `ws(s)://` server string.
///
/// Plain hosts get `ws://`; the path always ends in `/ws`.
pub fn server_url(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    if server.starts_with("ws://") || server.starts_with("wss://") {
        if server.ends_with("/ws") {
            server.to_string()
        } else {
            format!("{}/ws", server)
        }
    } else {
        format!("ws://{}/ws", server)
    }
}

/// Hub URL for a server, scoped to a room when one is given.
pub fn hub_url(server: &str, room: Option<&str>) -> String {
    match room {
        Some(room) => format!("{}?room={}", server_url(server), room),
        None => server_url(server),
    }
}
