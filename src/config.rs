//! Defaults shared by the planner, the HTTP server and the CLI.

use std::net::SocketAddr;

use crate::data::Weekday;

/// Every weekday in weekly order.
pub const WEEK: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

/// Days used when a request does not pick its own.
pub const DEFAULT_ACTIVE_DAYS: [Weekday; 5] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
];

pub const MIN_HOUR: f64 = 0.0;
pub const MAX_HOUR: f64 = 24.0;

/// Slot length in hours.
pub const DEFAULT_SLOT_DURATION: f64 = 1.0;

pub const DEFAULT_SUBJECT: &str = "General";
pub const DEFAULT_HEADCOUNT: u32 = 25;
pub const DEFAULT_WEEKLY_SESSIONS: u32 = 25;
pub const DEFAULT_ROOM_CAPACITY: u32 = 30;

/// Inclusive bounds used when headcounts are drawn at random.
pub const DEFAULT_HEADCOUNT_RANGE: (u32, u32) = (20, 35);
/// Inclusive bounds used when capacities are drawn at random.
pub const DEFAULT_CAPACITY_RANGE: (u32, u32) = (20, 40);

/// Upper bound on teachers, classes or rooms in one request.
pub const MAX_RESOURCES: usize = 1_000;
/// Upper bound on the weekly sessions a single class may ask for.
pub const MAX_WEEKLY_SESSIONS: u32 = 200;
/// Upper bound on the number of slots in one grid, all days included.
pub const MAX_SLOTS: usize = 5_000;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            max_body_size: 1024 * 1024,
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }
}
