use crate::error::UnknownGoalType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub info: String,
    pub level: i32,
    pub mainline: bool,
    #[serde(default)]
    pub mobile_id: u64,
    /// Server-side id, when an announcement with the same title was captured.
    pub quest_id: Option<u64>,
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Names of the goals active as soon as the quest starts.
    #[serde(default)]
    pub start_goals: Vec<String>,
}

impl Quest {
    pub fn goal(&self, name: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.name == name)
    }

    pub fn has_goal_name_id(&self, name_id: u32) -> bool {
        self.goals.iter().any(|g| g.name_id == name_id)
    }

    pub fn is_start_goal(&self, name: &str) -> bool {
        self.start_goals.iter().any(|n| n == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Synthesized `<ordinal>_<title>`, unique within its quest.
    pub name: String,
    pub name_id: u32,
    pub title: String,
    pub location: String,
    pub destination_zone: String,
    pub display_image1: String,
    pub display_image2: String,
    pub goal_type: GoalType,
    pub kind: GoalKind,
    #[serde(default)]
    pub client_tags: Vec<String>,
    #[serde(default)]
    pub no_quest_helper: bool,
    #[serde(default)]
    pub pet_only_quest: bool,
}

/// Goal type codes as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalType {
    Bounty,
    BountyCollect,
    Scavenge,
    Waypoint,
    Persona,
    AchieveRank,
    Usage,
}

impl GoalType {
    pub fn from_code(code: u8) -> Result<Self, UnknownGoalType> {
        match code {
            1 => Ok(GoalType::Bounty),
            2 => Ok(GoalType::BountyCollect),
            3 => Ok(GoalType::Scavenge),
            4 => Ok(GoalType::Waypoint),
            5 => Ok(GoalType::Persona),
            7 => Ok(GoalType::AchieveRank),
            8 => Ok(GoalType::Usage),
            _ => Err(UnknownGoalType { code }),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            GoalType::Bounty => 1,
            GoalType::BountyCollect => 2,
            GoalType::Scavenge => 3,
            GoalType::Waypoint => 4,
            GoalType::Persona => 5,
            GoalType::AchieveRank => 7,
            GoalType::Usage => 8,
        }
    }
}

impl TryFrom<u8> for GoalType {
    type Error = UnknownGoalType;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        GoalType::from_code(code)
    }
}

/// The concrete goal variant, with the data specific to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant")]
pub enum GoalKind {
    Bounty { bounty_total: u32 },
    Scavenge { item_total: u32 },
    Persona,
    Waypoint,
    AchieveRank,
}

impl GoalKind {
    /// Pick the variant for `goal_type`. `total` feeds the bounty and
    /// scavenge counters and is ignored by the other variants.
    pub fn for_type(goal_type: GoalType, total: u32) -> Self {
        match goal_type {
            GoalType::Bounty | GoalType::BountyCollect => GoalKind::Bounty {
                bounty_total: total,
            },
            GoalType::Scavenge | GoalType::Usage => GoalKind::Scavenge { item_total: total },
            GoalType::Persona => GoalKind::Persona,
            GoalType::Waypoint => GoalKind::Waypoint,
            GoalType::AchieveRank => GoalKind::AchieveRank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip() {
        for code in [1u8, 2, 3, 4, 5, 7, 8] {
            let t = GoalType::from_code(code).expect("known code");
            assert_eq!(t.code(), code);
        }
    }

    #[test]
    fn unknown_codes_are_errors() {
        for code in [0u8, 6, 9, 255] {
            assert_eq!(GoalType::try_from(code), Err(UnknownGoalType { code }));
        }
    }

    #[test]
    fn variants_by_type() {
        assert_eq!(
            GoalKind::for_type(GoalType::BountyCollect, 5),
            GoalKind::Bounty { bounty_total: 5 }
        );
        assert_eq!(
            GoalKind::for_type(GoalType::Usage, 2),
            GoalKind::Scavenge { item_total: 2 }
        );
        assert_eq!(GoalKind::for_type(GoalType::Waypoint, 9), GoalKind::Waypoint);
        assert_eq!(GoalKind::for_type(GoalType::AchieveRank, 0), GoalKind::AchieveRank);
    }
}
