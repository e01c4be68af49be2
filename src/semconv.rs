//! Semantic Convention Vocabulary
//!
//! Stable attribute keys expected by downstream dashboards and consumers.
//! Keys follow the OpenTelemetry database and network conventions; the one
//! Redis-specific key lives under the `db.redis.` namespace.

// Database call attributes
pub const DB_SYSTEM: &str = "db.system";
pub const DB_NAMESPACE: &str = "db.namespace";
pub const DB_OPERATION_NAME: &str = "db.operation.name";
pub const DB_QUERY_TEXT: &str = "db.query.text";
pub const DB_REDIS_FLAGS: &str = "db.redis.flags";

// Server / peer attributes
pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";
pub const NETWORK_PEER_ADDRESS: &str = "network.peer.address";
pub const NETWORK_PEER_PORT: &str = "network.peer.port";

/// Fixed `db.system` value for every span this crate produces.
pub const DB_SYSTEM_REDIS: &str = "redis";

/// Duration histogram recorded once per mapped command, in seconds.
pub const METRIC_CLIENT_OPERATION_DURATION: &str = "db.client.operation.duration";

// Span event names for the profiler's pipeline phase timestamps
pub const EVENT_ENQUEUED: &str = "Enqueued";
pub const EVENT_SENT: &str = "Sent";
pub const EVENT_RESPONSE_RECEIVED: &str = "ResponseReceived";
