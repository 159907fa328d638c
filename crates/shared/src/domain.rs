use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownAction;

/// Credit-hour choices the enrollment form offers; a soft constraint,
/// the engine itself accepts any value.
pub const CREDIT_HOUR_CHOICES: [u32; 7] = [12, 13, 14, 15, 16, 17, 18];

pub const HOMEWORK_TARGET: u32 = 5;
pub const LAB_POINT_TARGET: u32 = 100;
pub const HIGH_STRESS_THRESHOLD: u32 = 90;

/// One turn's worth of player intent. Opaque to the client; the effects
/// live entirely in the simulation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Lecture,
    Homework,
    OfficeHours,
    #[serde(rename = "useAI")]
    UseAi,
    Break,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Lecture,
        Action::Homework,
        Action::OfficeHours,
        Action::UseAi,
        Action::Break,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            Action::Lecture => "lecture",
            Action::Homework => "homework",
            Action::OfficeHours => "officeHours",
            Action::UseAi => "useAI",
            Action::Break => "break",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| s.eq_ignore_ascii_case(action.wire_name()))
            .ok_or_else(|| UnknownAction(s.to_owned()))
    }
}

/// Server-authoritative view of one player's progress at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub name: String,
    pub credit_hours: u32,
    pub stress_level: u32,
    pub understanding: u32,
    /// The engine advances this in quarter steps; floor for display.
    pub homework_completed: f64,
    pub lab_points: u32,
    pub current_week: u32,
    pub risk_level: u32,
    pub current_grade: String,
}

impl GameSnapshot {
    pub fn homework_done(&self) -> u32 {
        self.homework_completed.floor() as u32
    }

    pub fn high_stress(&self) -> bool {
        self.stress_level >= HIGH_STRESS_THRESHOLD
    }
}

impl Default for GameSnapshot {
    /// Placeholder shown before the first start response arrives.
    fn default() -> Self {
        Self {
            name: String::new(),
            credit_hours: 12,
            stress_level: 0,
            understanding: 0,
            homework_completed: 0.0,
            lab_points: 0,
            current_week: 1,
            risk_level: 0,
            current_grade: "N/A".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tokens_match_the_engine() {
        for action in Action::ALL {
            let encoded = serde_json::to_string(&action).expect("encode action");
            assert_eq!(encoded, format!("\"{}\"", action.wire_name()));
        }
        assert_eq!(Action::UseAi.wire_name(), "useAI");
        assert_eq!(Action::OfficeHours.wire_name(), "officeHours");
        assert_eq!(Action::Break.wire_name(), "break");
    }

    #[test]
    fn action_parses_tokens_case_insensitively() {
        assert_eq!("useAI".parse::<Action>().expect("parse"), Action::UseAi);
        assert_eq!("USEAI".parse::<Action>().expect("parse"), Action::UseAi);
        assert_eq!("break".parse::<Action>().expect("parse"), Action::Break);
        assert!("nap".parse::<Action>().is_err());
    }

    #[test]
    fn default_snapshot_is_the_prestart_placeholder() {
        let snapshot = GameSnapshot::default();
        assert_eq!(snapshot.name, "");
        assert_eq!(snapshot.credit_hours, 12);
        assert_eq!(snapshot.current_week, 1);
        assert_eq!(snapshot.current_grade, "N/A");
        assert_eq!(snapshot.homework_done(), 0);
        assert!(!snapshot.high_stress());
    }

    #[test]
    fn snapshot_decodes_fractional_homework_progress() {
        let payload = r#"{
            "name": "Ada",
            "credit_hours": 14,
            "stress_level": 91,
            "understanding": 55,
            "homework_completed": 2.75,
            "lab_points": 35,
            "current_week": 6,
            "risk_level": 10,
            "current_grade": "B+"
        }"#;
        let snapshot: GameSnapshot = serde_json::from_str(payload).expect("decode snapshot");
        assert_eq!(snapshot.homework_completed, 2.75);
        assert_eq!(snapshot.homework_done(), 2);
        assert!(snapshot.high_stress());
    }
}
