//! Root application configuration (§4.12): one sub-struct per concern, each
//! with a `Default` matching the thresholds SPEC_FULL.md names, and
//! fallible validation wherever §7's "out-of-range input" rule applies.

use crate::arbiter::ArbiterConfig;
use crate::clipboard::ClipboardConfig as ClipboardWireConfig;
use crate::error::ConfigError;

/// Which `InputBackend` the main loop should drive.
#[derive(Clone, Debug)]
pub enum BackendConfig {
    Local,
    HidPeripheral { psm_control: u16, psm_interrupt: u16 },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Local
    }
}

/// Where the relay binary listens.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub bind_addr: std::net::SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { bind_addr: "0.0.0.0:8765".parse().expect("literal socket address") }
    }
}

/// The three CLI arguments §6 requires for the clipboard client: relay
/// URI, session id, and peer name.
#[derive(Clone, Debug, Default)]
pub struct ClipboardConfig {
    pub relay_uri: String,
    pub session_id: String,
    pub name: String,
}

impl From<ClipboardConfig> for ClipboardWireConfig {
    fn from(c: ClipboardConfig) -> Self {
        ClipboardWireConfig { relay_uri: c.relay_uri, session_id: c.session_id, name: c.name }
    }
}

/// The full set of knobs the `handpilot` main loop needs: every gesture
/// machine's thresholds (via [`ArbiterConfig`], which already aggregates
/// them), which input backend to drive, and the optional clipboard
/// session to join.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub arbiter: ArbiterConfig,
    pub backend: BackendConfig,
    pub clipboard: Option<ClipboardConfig>,
}

impl AppConfig {
    /// Validates every sub-config that has fallible construction rules,
    /// surfacing the first failure.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.arbiter.cursor.validated()?;
        self.arbiter.pinch.validated()?;
        self.arbiter.swipe.validated()?;
        self.arbiter.frame.validated()?;
        self.arbiter.palm_arrow.validated()?;
        self.arbiter.stop_resume.validated()?;
        self.arbiter.copy_paste.validated()?;
        Ok(self)
    }
}
