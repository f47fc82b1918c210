use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const OCCUPANCY_GRID_TYPE: &str = "nav_msgs/OccupancyGrid";
pub const GET_PLAN_TYPE: &str = "nav_msgs/GetPlan";

/// The subset of rosbridge operations this node speaks. Anything else
/// deserialises to `Unknown` and is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum BridgeOp {
    Advertise {
        topic: String,
        #[serde(rename = "type")]
        msg_type: String,
    },
    Unadvertise {
        topic: String,
    },
    Subscribe {
        topic: String,
        #[serde(rename = "type")]
        msg_type: String,
    },
    Unsubscribe {
        topic: String,
    },
    Publish {
        topic: String,
        msg: Value,
    },
    #[serde(other)]
    Unknown,
}
