use serde::Deserialize;

/// Top-level configuration for the chat client, the relay and the REST boundary.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub chat: ChatSettings,
    pub relay: RelaySettings,
    pub api: ApiSettings,
    pub log: LogSettings,
}

/// What the connection manager does with a frame sent while not `Open`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutboundPolicy {
    /// Keep the frame in the local store only; nothing is transmitted.
    #[default]
    Drop,
    /// Hold the frame and flush it on the next `Open`.
    Buffer,
}

/// Messaging endpoint and reconnect behaviour.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChatSettings {
    pub endpoint: String,
    pub reconnect_delay_ms: u64,
    pub outbound: OutboundPolicy,
}

impl ChatSettings {
    pub fn reconnect_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.reconnect_delay_ms)
    }
}

/// Address the local relay server binds to.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RelaySettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration loaded from files or environment.
///
/// Every field is optional; missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize, Default)]
pub struct PartialSettings {
    pub chat: Option<PartialChatSettings>,
    pub relay: Option<PartialRelaySettings>,
    pub api: Option<PartialApiSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialChatSettings {
    pub endpoint: Option<String>,
    pub reconnect_delay_ms: Option<u64>,
    pub outbound: Option<OutboundPolicy>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialRelaySettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialApiSettings {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chat: ChatSettings {
                endpoint: "ws://127.0.0.1:8080".to_string(),
                reconnect_delay_ms: 3000,
                outbound: OutboundPolicy::Drop,
            },
            relay: RelaySettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            api: ApiSettings {
                base_url: "http://127.0.0.1:5000/api".to_string(),
                timeout_secs: 30,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl PartialSettings {
    /// Fill every missing value from `Settings::default()`.
    pub fn merge_with_defaults(self) -> Settings {
        let default = Settings::default();
        let chat = self.chat.unwrap_or_default();
        let relay = self.relay.unwrap_or_default();
        let api = self.api.unwrap_or_default();
        let log = self.log.unwrap_or_default();

        Settings {
            chat: ChatSettings {
                endpoint: chat.endpoint.unwrap_or(default.chat.endpoint),
                reconnect_delay_ms: chat
                    .reconnect_delay_ms
                    .unwrap_or(default.chat.reconnect_delay_ms),
                outbound: chat.outbound.unwrap_or(default.chat.outbound),
            },
            relay: RelaySettings {
                host: relay.host.unwrap_or(default.relay.host),
                port: relay.port.unwrap_or(default.relay.port),
            },
            api: ApiSettings {
                base_url: api.base_url.unwrap_or(default.api.base_url),
                timeout_secs: api.timeout_secs.unwrap_or(default.api.timeout_secs),
            },
            log: LogSettings {
                level: log.level.unwrap_or(default.log.level),
            },
        }
    }
}
