//! Request payloads for the simulation engine's HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::Action;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGameRequest {
    pub name: String,
    pub credit_hours: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformActionRequest {
    pub action: Action,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_request_encodes_enrollment_fields() {
        let body = StartGameRequest {
            name: "Ada".to_string(),
            credit_hours: 15,
        };
        let encoded = serde_json::to_value(&body).expect("encode start request");
        assert_eq!(encoded["name"], "Ada");
        assert_eq!(encoded["credit_hours"], 15);
    }

    #[test]
    fn action_request_carries_the_wire_token() {
        let body = PerformActionRequest {
            action: Action::UseAi,
        };
        let encoded = serde_json::to_value(&body).expect("encode action request");
        assert_eq!(encoded["action"], "useAI");
    }
}
