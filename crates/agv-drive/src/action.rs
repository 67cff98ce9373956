//! Named vehicle actions and the telemetry snapshot the vehicle reports.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use agv_core::{Point, Pose};

/// A command understood by the vehicle.
///
/// [`name`](Self::name) is the action name on the wire and
/// [`parameters`](Self::parameters) the key/value list sent with it.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Drive to the node with this map id.
    Goto { node: String },
    Resume,
    Stop,
    /// Tell the vehicle where it is.
    InitPosition { pose: Pose, map_id: String, last_node_id: String },
    PinUp,
    PinDown,
    TurnLeft,
    TurnRight,
    DriveForwards,
}

impl Action {
    pub fn goto(node: impl Into<String>) -> Self {
        Action::Goto { node: node.into() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Goto { .. }         => "goto",
            Action::Resume              => "Resume",
            Action::Stop                => "Stop",
            Action::InitPosition { .. } => "initposition",
            Action::PinUp               => "MovePinUp",
            Action::PinDown             => "MovePinDown",
            Action::TurnLeft            => "TurnLeft",
            Action::TurnRight           => "TurnRight",
            Action::DriveForwards       => "DriveForwardsSpeed3",
        }
    }

    pub fn parameters(&self) -> Vec<(&'static str, Value)> {
        match self {
            Action::Goto { node } => vec![("end", json!(node))],
            Action::InitPosition { pose, map_id, last_node_id } => vec![
                ("x",          json!(pose.x)),
                ("y",          json!(pose.y)),
                ("theta",      json!(pose.theta)),
                ("mapId",      json!(map_id)),
                ("lastNodeId", json!(last_node_id)),
            ],
            _ => Vec::new(),
        }
    }

    /// The body posted to the vehicle's `instantActions` endpoint: a one-item
    /// `instantActions` list whose entry carries `actionName`, `actionId`
    /// `"0"`, `blockingType` `"NONE"` and `actionParameters` as
    /// `{"key": .., "value": ..}` pairs.
    pub fn to_json(&self) -> Value {
        let parameters: Vec<Value> = self
            .parameters()
            .into_iter()
            .map(|(key, value)| json!({ "key": key, "value": value }))
            .collect();
        json!({
            "instantActions": [{
                "actionName":       self.name(),
                "actionId":         "0",
                "blockingType":     "NONE",
                "actionParameters": parameters,
            }]
        })
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Goto { node } => write!(f, "goto({node})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Vehicle state as reported by its variables endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Telemetry {
    #[serde(rename = "agvPosition")]
    pub position:     Pose,
    pub last_node_id: String,
    pub paused:       bool,
    pub driving:      bool,
    pub is_pin_up:    bool,
}

impl Telemetry {
    pub fn location(&self) -> Point {
        self.position.point()
    }
}
