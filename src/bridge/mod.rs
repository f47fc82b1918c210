//! Messaging transport: a rosbridge (v2 JSON protocol) client that turns
//! plan requests published on one topic into occupancy grids published on
//! another.

pub mod client;
pub mod node;
pub mod protocol;
