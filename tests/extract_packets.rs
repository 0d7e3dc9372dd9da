mod common;

use common::{record, write_capture};
use quest_capture_tools::packets::{QuestOfferPacket, SendGoalPacket, SendQuestPacket};
use quest_capture_tools::{CaptureError, MSG_SENDGOAL, MSG_SENDQUEST, extract_packets};
use serde_json::json;
use std::fs::write;
use std::path::Path;

#[test]
fn packets_keep_capture_order() -> anyhow::Result<()> {
    let doc = json!([
        record("MSG_SENDQUEST", json!({"QuestID": 3, "QuestTitle": "Third"})),
        record("MSG_SENDGOAL", json!({"QuestID": 3, "GoalNameID": 1})),
        record("MSG_SENDQUEST", json!({"QuestID": 1, "QuestTitle": "First"})),
        record("MSG_SENDQUEST", json!({"QuestID": 2, "QuestTitle": "Second"})),
    ]);
    let file = write_capture(&doc);

    let quests: Vec<SendQuestPacket> = extract_packets(file.path(), MSG_SENDQUEST)?;
    let ids: Vec<u64> = quests.iter().map(|q| q.quest_id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(quests[1].quest_title, "First");

    let goals: Vec<SendGoalPacket> = extract_packets(file.path(), MSG_SENDGOAL)?;
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].goal_name_id, 1);
    Ok(())
}

#[test]
fn empty_capture_yields_no_packets() -> anyhow::Result<()> {
    let file = write_capture(&json!([]));
    let offers: Vec<QuestOfferPacket> = extract_packets(file.path(), "MSG_QUESTOFFER")?;
    assert!(offers.is_empty());
    Ok(())
}

#[test]
fn single_top_level_record() -> anyhow::Result<()> {
    let file = write_capture(&record(
        "MSG_SENDQUEST",
        json!({"QuestID": 99, "QuestTitle": "Lonely"}),
    ));
    let quests: Vec<SendQuestPacket> = extract_packets(file.path(), MSG_SENDQUEST)?;
    assert_eq!(quests.len(), 1);
    assert_eq!(quests[0].quest_id, 99);
    Ok(())
}

#[test]
fn missing_numeric_fields_are_zero() -> anyhow::Result<()> {
    let file = write_capture(&json!([record("MSG_SENDGOAL", json!({"GoalTitle": "x"}))]));
    let goals: Vec<SendGoalPacket> = extract_packets(file.path(), MSG_SENDGOAL)?;
    assert_eq!(goals[0].quest_id, 0);
    assert_eq!(goals[0].goal_name_id, 0);
    assert_eq!(goals[0].goal_type, 0);
    assert_eq!(goals[0].no_quest_helper, 0);
    Ok(())
}

#[test]
fn missing_file_is_not_found() {
    let res: Result<Vec<SendQuestPacket>, _> =
        extract_packets(Path::new("/definitely/not/here/capture.json"), MSG_SENDQUEST);
    match res {
        Err(CaptureError::NotFound(p)) => assert!(p.ends_with("capture.json")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn invalid_json_is_malformed() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json");
    write(&path, "[{\"data\": ")?;

    let res: Result<Vec<SendQuestPacket>, _> = extract_packets(&path, MSG_SENDQUEST);
    assert!(matches!(res, Err(CaptureError::MalformedCapture(_))));
    Ok(())
}
