//! Typed packets read out of a capture, one struct per message kind.

use crate::extract::{FieldRule, Inferred, Packet, Target};
use chrono::NaiveDateTime;

pub const MSG_QUESTOFFER: &str = "MSG_QUESTOFFER";
pub const MSG_SENDQUEST: &str = "MSG_SENDQUEST";
pub const MSG_SENDGOAL: &str = "MSG_SENDGOAL";

/// A quest offered to the player, including the compiled goal list that
/// becomes active when the quest is accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestOfferPacket {
    pub mobile_id: u64,
    pub quest_name: String,
    pub quest_title: String,
    pub quest_info: String,
    pub level: i32,
    pub rewards: String,
    /// Hex-encoded goal compilation blob.
    pub goal_data: String,
    pub mainline: u8,
    pub timestamp: Option<NaiveDateTime>,
}

static QUEST_OFFER_RULES: &[FieldRule<QuestOfferPacket>] = &[
    FieldRule::new("mobile_id", "MobileID", Target::Identifier(|p| &mut p.mobile_id)),
    FieldRule::new("quest_name", "QuestName", Target::Text(|p| &mut p.quest_name)),
    FieldRule::new("quest_title", "QuestTitle", Target::Text(|p| &mut p.quest_title)),
    FieldRule::new("quest_info", "QuestInfo", Target::Text(|p| &mut p.quest_info)),
    FieldRule::new("level", "Level", Target::Inferred(Inferred::I32(|p| &mut p.level))),
    FieldRule::new("rewards", "Rewards", Target::Hex(|p| &mut p.rewards)),
    FieldRule::new("goal_data", "GoalData", Target::Hex(|p| &mut p.goal_data)),
    FieldRule::new("mainline", "Mainline", Target::SmallUnsigned(|p| &mut p.mainline)),
    FieldRule::new("timestamp", "Timestamp", Target::Timestamp(|p| &mut p.timestamp)),
];

impl Packet for QuestOfferPacket {
    const NAME: &'static str = MSG_QUESTOFFER;

    fn rules() -> &'static [FieldRule<Self>] {
        QUEST_OFFER_RULES
    }
}

/// Announces the server-side id of a quest the player now has.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendQuestPacket {
    pub quest_id: u64,
    pub quest_title: String,
}

static SEND_QUEST_RULES: &[FieldRule<SendQuestPacket>] = &[
    FieldRule::new("quest_id", "QuestID", Target::Identifier(|p| &mut p.quest_id)),
    FieldRule::new("quest_title", "QuestTitle", Target::Text(|p| &mut p.quest_title)),
];

impl Packet for SendQuestPacket {
    const NAME: &'static str = MSG_SENDQUEST;

    fn rules() -> &'static [FieldRule<Self>] {
        SEND_QUEST_RULES
    }
}

/// Announces one goal of an active quest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendGoalPacket {
    pub quest_id: u64,
    pub goal_name_id: u32,
    pub goal_title: String,
    pub goal_location: String,
    pub goal_destination_zone: String,
    pub goal_image1: String,
    pub goal_image2: String,
    pub goal_type: u8,
    pub goal_total: u32,
    /// Hex-encoded client tag list blob.
    pub client_tags: String,
    pub no_quest_helper: u8,
    pub pet_only_quest: u8,
}

static SEND_GOAL_RULES: &[FieldRule<SendGoalPacket>] = &[
    FieldRule::new("quest_id", "QuestID", Target::Identifier(|p| &mut p.quest_id)),
    FieldRule::new("goal_name_id", "GoalNameID", Target::Unsigned(|p| &mut p.goal_name_id)),
    FieldRule::new("goal_title", "GoalTitle", Target::Text(|p| &mut p.goal_title)),
    FieldRule::new("goal_location", "GoalLocation", Target::Text(|p| &mut p.goal_location)),
    FieldRule::new(
        "goal_destination_zone",
        "GoalDestinationZone",
        Target::Text(|p| &mut p.goal_destination_zone),
    ),
    FieldRule::new("goal_image1", "GoalImage1", Target::Text(|p| &mut p.goal_image1)),
    FieldRule::new("goal_image2", "GoalImage2", Target::Hex(|p| &mut p.goal_image2)),
    FieldRule::new("goal_type", "GoalType", Target::SmallUnsigned(|p| &mut p.goal_type)),
    FieldRule::new("goal_total", "GoalTotal", Target::Unsigned(|p| &mut p.goal_total)),
    FieldRule::new("client_tags", "ClientTags", Target::Hex(|p| &mut p.client_tags)),
    FieldRule::new(
        "no_quest_helper",
        "NoQuestHelper",
        Target::SmallUnsigned(|p| &mut p.no_quest_helper),
    ),
    FieldRule::new(
        "pet_only_quest",
        "PetOnlyQuest",
        Target::SmallUnsigned(|p| &mut p.pet_only_quest),
    ),
];

impl Packet for SendGoalPacket {
    const NAME: &'static str = MSG_SENDGOAL;

    fn rules() -> &'static [FieldRule<Self>] {
        SEND_GOAL_RULES
    }
}
