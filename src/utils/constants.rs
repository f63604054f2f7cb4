//! Constants for well-known URIs used throughout the A2A Rust SDK.

/// The well-known path for agent card discovery.
pub const AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent.json";

/// The default RPC endpoint path.
pub const DEFAULT_RPC_URL: &str = "/a2a";
