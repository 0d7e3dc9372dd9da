//! Assemble quests out of the quest offer, quest announcement and goal
//! announcement streams of one capture.
//!
//! Only loading the capture can fail. Everything after that degrades: a quest
//! whose goal blob cannot be decoded keeps zero embedded goals, a goal with an
//! unknown type is skipped, a quest without a matching announcement keeps no
//! id. Each such event is recorded as a [`BuildIssue`].

use crate::capture::{Capture, read_capture_from_file};
use crate::codec::{BlobCodec, ClientTagList, GoalCompilation, GoalDescriptor, decode_blob};
use crate::error::{BlobDecodeError, FieldError, Result, UnknownGoalType};
use crate::extract::{Extracted, Packet};
use crate::model::{Goal, GoalKind, GoalType, Quest};
use crate::packets::{QuestOfferPacket, SendGoalPacket, SendQuestPacket};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Match offers to quest announcements by title and append announced goals.
    pub correlate_announcements: bool,
    /// Decode the client tag blob of announced goals.
    pub decode_client_tags: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            correlate_announcements: true,
            decode_client_tags: true,
        }
    }
}

/// A condition that was recovered from while building. `quest` is the index
/// of the affected quest in [`BuildOutput::quests`], `record` the index of a
/// packet among the records of its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildIssue {
    FieldConversion {
        packet: &'static str,
        record: usize,
        error: FieldError,
    },
    BlobDecode {
        quest: usize,
        error: BlobDecodeError,
    },
    UnknownGoalType {
        quest: usize,
        goal_title: String,
        error: UnknownGoalType,
    },
    CorrelationMiss {
        quest: usize,
        title: String,
    },
    ClientTags {
        quest: usize,
        goal_name_id: u32,
        error: BlobDecodeError,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    pub quests: Vec<Quest>,
    pub issues: Vec<BuildIssue>,
}

impl BuildOutput {
    pub fn goal_count(&self) -> usize {
        self.quests.iter().map(|q| q.goals.len()).sum()
    }

    /// One line for the status bar of whatever invoked the build.
    pub fn summary(&self) -> String {
        let correlated = self.quests.iter().filter(|q| q.quest_id.is_some()).count();
        format!(
            "Extracted {} quests ({} goals, {} matched to quest ids) from packet capture; {} issues.",
            self.quests.len(),
            self.goal_count(),
            correlated,
            self.issues.len()
        )
    }
}

pub struct QuestBuilder<C> {
    codec: C,
    options: BuildOptions,
}

impl<C: BlobCodec> QuestBuilder<C> {
    pub fn new(codec: C) -> Self {
        Self::with_options(codec, BuildOptions::default())
    }

    pub fn with_options(codec: C, options: BuildOptions) -> Self {
        QuestBuilder { codec, options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Load the capture at `path` once and build quests out of it.
    pub fn build_from_file(&self, path: &Path) -> Result<BuildOutput> {
        let capture = read_capture_from_file(path)?;
        Ok(self.build(&capture))
    }

    pub fn build(&self, capture: &Capture) -> BuildOutput {
        let mut issues = Vec::new();
        let offers: Vec<QuestOfferPacket> = collect_packets(capture, &mut issues);

        let mut quests: Vec<Quest> = offers
            .iter()
            .enumerate()
            .map(|(idx, offer)| self.quest_from_offer(idx, offer, &mut issues))
            .collect();

        if self.options.correlate_announcements {
            let announcements: Vec<SendQuestPacket> = collect_packets(capture, &mut issues);
            let goal_announcements: Vec<SendGoalPacket> = collect_packets(capture, &mut issues);

            // offer index -> announced quest id, scoped to this build
            let quest_ids = correlate_quest_ids(&quests, &announcements, &mut issues);
            for (idx, quest) in quests.iter_mut().enumerate() {
                if let Some(&quest_id) = quest_ids.get(&idx) {
                    quest.quest_id = Some(quest_id);
                    self.append_announced_goals(
                        idx,
                        quest,
                        quest_id,
                        &goal_announcements,
                        &mut issues,
                    );
                }
            }
        }

        let output = BuildOutput { quests, issues };
        info!(
            quests = output.quests.len(),
            goals = output.goal_count(),
            issues = output.issues.len(),
            "built quests from capture"
        );
        output
    }

    fn quest_from_offer(
        &self,
        idx: usize,
        offer: &QuestOfferPacket,
        issues: &mut Vec<BuildIssue>,
    ) -> Quest {
        let mut quest = Quest {
            name: offer.quest_name.clone(),
            title: offer.quest_title.clone(),
            info: offer.quest_info.clone(),
            level: offer.level,
            mainline: offer.mainline == 1,
            mobile_id: offer.mobile_id,
            quest_id: None,
            timestamp: offer.timestamp,
            goals: Vec::new(),
            start_goals: Vec::new(),
        };

        let compilation: GoalCompilation = match decode_blob(&self.codec, &offer.goal_data) {
            Ok(c) => c,
            Err(error) => {
                warn!(quest = %quest.title, %error, "goal data could not be decoded");
                issues.push(BuildIssue::BlobDecode { quest: idx, error });
                return quest;
            }
        };

        // ordinals only advance for goals that were actually added
        for descriptor in &compilation.goals {
            match goal_from_descriptor(quest.goals.len() + 1, descriptor) {
                Ok(goal) => quest.goals.push(goal),
                Err(error) => {
                    warn!(
                        quest = %quest.title,
                        goal = %descriptor.goal_title,
                        %error,
                        "skipping goal"
                    );
                    issues.push(BuildIssue::UnknownGoalType {
                        quest: idx,
                        goal_title: descriptor.goal_title.clone(),
                        error,
                    });
                }
            }
        }

        // every goal of the compilation is active from the start
        quest.start_goals = quest.goals.iter().map(|g| g.name.clone()).collect();
        quest
    }

    fn append_announced_goals(
        &self,
        idx: usize,
        quest: &mut Quest,
        quest_id: u64,
        packets: &[SendGoalPacket],
        issues: &mut Vec<BuildIssue>,
    ) {
        for packet in packets.iter().filter(|p| p.quest_id == quest_id) {
            if quest.has_goal_name_id(packet.goal_name_id) {
                continue;
            }

            let goal_type = match GoalType::from_code(packet.goal_type) {
                Ok(t) => t,
                Err(error) => {
                    warn!(
                        quest = %quest.title,
                        goal = %packet.goal_title,
                        name_id = packet.goal_name_id,
                        %error,
                        "skipping announced goal"
                    );
                    issues.push(BuildIssue::UnknownGoalType {
                        quest: idx,
                        goal_title: packet.goal_title.clone(),
                        error,
                    });
                    continue;
                }
            };

            let mut goal = Goal {
                name: goal_name(quest.goals.len() + 1, &packet.goal_title),
                name_id: packet.goal_name_id,
                title: packet.goal_title.clone(),
                location: packet.goal_location.clone(),
                destination_zone: packet.goal_destination_zone.clone(),
                display_image1: packet.goal_image1.clone(),
                display_image2: packet.goal_image2.clone(),
                goal_type,
                kind: GoalKind::for_type(goal_type, packet.goal_total),
                client_tags: Vec::new(),
                no_quest_helper: packet.no_quest_helper == 1,
                pet_only_quest: packet.pet_only_quest == 1,
            };

            if self.options.decode_client_tags && !packet.client_tags.trim().is_empty() {
                match decode_blob::<ClientTagList, _>(&self.codec, &packet.client_tags) {
                    Ok(list) => goal.client_tags = list.client_tags,
                    Err(error) => {
                        debug!(goal = %goal.name, %error, "client tags could not be decoded");
                        issues.push(BuildIssue::ClientTags {
                            quest: idx,
                            goal_name_id: packet.goal_name_id,
                            error,
                        });
                    }
                }
            }

            quest.goals.push(goal);
        }
    }
}

/// Build quests from the capture at `path` with default options.
pub fn build_quests_from_capture<C: BlobCodec>(path: &Path, codec: C) -> Result<Vec<Quest>> {
    Ok(QuestBuilder::new(codec).build_from_file(path)?.quests)
}

fn collect_packets<T: Packet>(capture: &Capture, issues: &mut Vec<BuildIssue>) -> Vec<T> {
    capture
        .extract_named::<T>(T::NAME)
        .into_iter()
        .enumerate()
        .map(|(record, Extracted { value, failures })| {
            issues.extend(failures.into_iter().map(|error| BuildIssue::FieldConversion {
                packet: T::NAME,
                record,
                error,
            }));
            value
        })
        .collect()
}

/// Pair each quest with the id of the first announcement carrying exactly
/// its title.
fn correlate_quest_ids(
    quests: &[Quest],
    announcements: &[SendQuestPacket],
    issues: &mut Vec<BuildIssue>,
) -> HashMap<usize, u64> {
    let mut ids = HashMap::new();
    for (idx, quest) in quests.iter().enumerate() {
        match announcements.iter().find(|a| a.quest_title == quest.title) {
            Some(a) => {
                ids.insert(idx, a.quest_id);
            }
            None => {
                debug!(quest = %quest.title, "no quest announcement matches");
                issues.push(BuildIssue::CorrelationMiss {
                    quest: idx,
                    title: quest.title.clone(),
                });
            }
        }
    }
    ids
}

fn goal_from_descriptor(
    ordinal: usize,
    d: &GoalDescriptor,
) -> std::result::Result<Goal, UnknownGoalType> {
    let goal_type = GoalType::from_code(d.goal_type)?;
    Ok(Goal {
        name: goal_name(ordinal, &d.goal_title),
        name_id: d.goal_name_id,
        title: d.goal_title.clone(),
        location: d.goal_location.clone(),
        destination_zone: d.goal_destination_zone.clone(),
        display_image1: d.goal_image1.clone(),
        display_image2: d.goal_image2.clone(),
        goal_type,
        kind: GoalKind::for_type(goal_type, d.goal_total),
        client_tags: Vec::new(),
        no_quest_helper: false,
        pet_only_quest: false,
    })
}

fn goal_name(ordinal: usize, title: &str) -> String {
    format!("{ordinal}_{title}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonBlobCodec;

    fn descriptor(name_id: u32, title: &str, goal_type: u8) -> GoalDescriptor {
        GoalDescriptor {
            goal_name_id: name_id,
            goal_title: title.into(),
            goal_type,
            goal_total: 3,
            ..Default::default()
        }
    }

    #[test]
    fn ordinals_skip_unknown_goal_types() {
        let codec = JsonBlobCodec;
        let compilation = GoalCompilation {
            goals: vec![
                descriptor(1, "A", 1),
                descriptor(2, "B", 99),
                descriptor(3, "C", 3),
            ],
        };
        let offer = QuestOfferPacket {
            quest_title: "Q".into(),
            goal_data: codec.encode_hex(&compilation).expect("encode"),
            ..Default::default()
        };
        let builder = QuestBuilder::new(codec);
        let mut issues = Vec::new();
        let quest = builder.quest_from_offer(0, &offer, &mut issues);

        let names: Vec<_> = quest.goals.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["1_A", "2_C"]);
        assert_eq!(quest.start_goals, vec!["1_A", "2_C"]);
        assert_eq!(quest.goals[0].kind, GoalKind::Bounty { bounty_total: 3 });
        assert_eq!(quest.goals[1].kind, GoalKind::Scavenge { item_total: 3 });
        assert_eq!(
            issues,
            vec![BuildIssue::UnknownGoalType {
                quest: 0,
                goal_title: "B".into(),
                error: UnknownGoalType { code: 99 },
            }]
        );
    }

    #[test]
    fn empty_goal_data_yields_no_goals() {
        let builder = QuestBuilder::new(JsonBlobCodec);
        let mut issues = Vec::new();
        let quest = builder.quest_from_offer(4, &QuestOfferPacket::default(), &mut issues);
        assert!(quest.goals.is_empty());
        assert!(quest.start_goals.is_empty());
        assert_eq!(
            issues,
            vec![BuildIssue::BlobDecode {
                quest: 4,
                error: BlobDecodeError::Empty,
            }]
        );
    }

    #[test]
    fn correlation_takes_first_exact_title() {
        let quests = vec![
            Quest {
                title: "Unicorn Way".into(),
                ..Default::default()
            },
            Quest {
                title: "unicorn way".into(),
                ..Default::default()
            },
        ];
        let announcements = vec![
            SendQuestPacket {
                quest_id: 10,
                quest_title: "Unicorn Way".into(),
            },
            SendQuestPacket {
                quest_id: 11,
                quest_title: "Unicorn Way".into(),
            },
            SendQuestPacket {
                quest_id: 12,
                quest_title: String::new(),
            },
        ];
        let mut issues = Vec::new();
        let ids = correlate_quest_ids(&quests, &announcements, &mut issues);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids.get(&0), Some(&10));
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn untitled_quest_matches_untitled_announcement() {
        let quests = vec![Quest::default()];
        let announcements = vec![
            SendQuestPacket {
                quest_id: 5,
                quest_title: "Named".into(),
            },
            SendQuestPacket {
                quest_id: 12,
                quest_title: String::new(),
            },
        ];
        let mut issues = Vec::new();
        let ids = correlate_quest_ids(&quests, &announcements, &mut issues);
        assert_eq!(ids.get(&0), Some(&12));
        assert!(issues.is_empty());
    }

    #[test]
    fn builder_keeps_its_options() {
        let options = BuildOptions {
            correlate_announcements: false,
            ..Default::default()
        };
        let builder = QuestBuilder::with_options(JsonBlobCodec, options);
        assert_eq!(builder.options(), &options);
        assert_eq!(QuestBuilder::new(JsonBlobCodec).options(), &BuildOptions::default());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: BuildOptions =
            serde_json::from_str(r#"{"decode_client_tags": false}"#).expect("options");
        assert!(opts.correlate_announcements);
        assert!(!opts.decode_client_tags);
    }
}
