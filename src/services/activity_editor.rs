//! 单个活动的编辑会话
//!
//! 打开时保留一份基线，之后所有修改都作用在工作快照上；
//! 关闭而不保存时直接丢弃快照即可，基线从未被改动。
//! 基线活动已结束时会话只读（每次操作按当前时间重新判断）：所有修改静默拒绝，仍可导出。

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::config::WheelConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    Activity, ActivityFieldsUpdate, ActivityWheels, EditorView, ExportFile,
    LocalizedRules, Wheel, WheelCommand, WheelType,
};
use crate::services::wheel_editor::{self, EditContext, EditOutcome};

#[derive(Debug, Clone)]
pub struct ActivityEditor {
    /// 打开时的值；新建活动没有基线
    baseline: Option<Activity>,
    snapshot: Activity,
}

impl ActivityEditor {
    pub fn open(activity: Activity) -> Self {
        Self {
            baseline: Some(activity.clone()),
            snapshot: activity,
        }
    }

    /// 新建活动；给出模板时复制其转盘、备注与规则，时间清空
    pub fn create(id: String, template: Option<&Activity>, wheel_config: &WheelConfig) -> Self {
        let snapshot = match template {
            Some(template) => Activity {
                id,
                start_time: None,
                end_time: None,
                remarks: template.remarks.clone(),
                rules: template.rules.clone(),
                wheels: template.wheels.clone(),
                last_operator: String::new(),
                last_update_time: None,
            },
            None => Activity {
                id,
                start_time: None,
                end_time: None,
                remarks: String::new(),
                rules: LocalizedRules::default(),
                wheels: empty_wheels(wheel_config),
                last_operator: String::new(),
                last_update_time: None,
            },
        };

        Self {
            baseline: None,
            snapshot,
        }
    }

    pub fn id(&self) -> &str {
        &self.snapshot.id
    }

    pub fn snapshot(&self) -> &Activity {
        &self.snapshot
    }

    pub fn is_new(&self) -> bool {
        self.baseline.is_none()
    }

    /// 按已保存的起止时间判断；新建活动不会只读
    pub fn is_read_only(&self, now: NaiveDateTime) -> bool {
        self.baseline
            .as_ref()
            .is_some_and(|b| b.status_at(now).is_read_only())
    }

    pub fn is_dirty(&self) -> bool {
        match &self.baseline {
            Some(baseline) => baseline != &self.snapshot,
            None => true,
        }
    }

    /// 执行转盘命令；返回 false 表示只读或被禁用的操作，快照不变
    pub fn apply_wheel_command(
        &mut self,
        wheel_type: WheelType,
        command: &WheelCommand,
        ctx: &EditContext,
        now: NaiveDateTime,
    ) -> AppResult<bool> {
        if self.is_read_only(now) {
            return Ok(false);
        }
        match wheel_editor::apply(self.snapshot.wheels.get(wheel_type), command, ctx)? {
            EditOutcome::Applied(wheel) => {
                *self.snapshot.wheels.get_mut(wheel_type) = wheel;
                Ok(true)
            }
            EditOutcome::Ignored => Ok(false),
        }
    }

    pub fn update_fields(&mut self, update: &ActivityFieldsUpdate, now: NaiveDateTime) -> bool {
        if self.is_read_only(now) || update.is_empty() {
            return false;
        }
        let mut next = self.snapshot.clone();
        update.apply_to(&mut next);
        self.snapshot = next;
        true
    }

    /// 整体替换工作快照
    ///
    /// 顶层必须是含 `wheels` 的对象，且结构校验通过；任何失败都不改动当前快照。
    /// 活动ID保持为会话的ID，文件中的ID被忽略。
    pub fn import_json(&mut self, content: &str, now: NaiveDateTime) -> AppResult<bool> {
        if self.is_read_only(now) {
            return Ok(false);
        }
        let value: Value = serde_json::from_str(content)
            .map_err(|e| AppError::ValidationError(format!("Invalid JSON: {e}")))?;
        let Value::Object(mut object) = value else {
            return Err(AppError::ValidationError(
                "Activity file must be a JSON object".into(),
            ));
        };
        if !object.contains_key("wheels") {
            return Err(AppError::ValidationError(
                "Activity file is missing the wheels field".into(),
            ));
        }
        object.insert("id".to_string(), Value::String(self.snapshot.id.clone()));

        let mut imported: Activity = serde_json::from_value(Value::Object(object))
            .map_err(|e| AppError::ValidationError(format!("Invalid activity file: {e}")))?;
        imported.check_structure()?;
        for wheel_type in WheelType::ALL {
            imported.wheels.get_mut(wheel_type).sync_grand_prize_flags();
        }

        self.snapshot = imported;
        Ok(true)
    }

    /// 导出当前快照：`activity-<id>-<日期>.json`
    pub fn export_json(&self, now: NaiveDateTime) -> AppResult<ExportFile> {
        Ok(ExportFile {
            filename: format!(
                "activity-{}-{}.json",
                self.snapshot.id,
                now.date().format("%Y-%m-%d")
            ),
            content: serde_json::to_string_pretty(&self.snapshot)?,
        })
    }

    pub fn view(&self, now: NaiveDateTime) -> EditorView {
        EditorView {
            session_id: self.snapshot.id.clone(),
            status: self.snapshot.status_at(now),
            read_only: self.is_read_only(now),
            is_new: self.is_new(),
            is_dirty: self.is_dirty(),
            activity: self.snapshot.clone(),
            wheels: self.snapshot.wheels.iter().map(wheel_editor::view).collect(),
            missing_grand_prizes: self.snapshot.wheels_missing_grand_prize(),
        }
    }

    /// 保存前校验并盖上操作人与时间，返回待持久化的活动
    ///
    /// 会话本身不变，持久化成功后由调用方关闭会话。
    pub fn prepare_save(&self, operator: &str, now: NaiveDateTime) -> AppResult<Activity> {
        if self.is_read_only(now) {
            return Err(AppError::ValidationError(format!(
                "Activity {} has ended and is read-only",
                self.snapshot.id
            )));
        }
        self.snapshot.validate_for_save()?;
        if self.is_new()
            && let Some(end) = self.snapshot.end_time
            && end <= now
        {
            return Err(AppError::ValidationError(
                "End time of a new activity must be in the future".into(),
            ));
        }

        let mut activity = self.snapshot.clone();
        activity.last_operator = operator.to_string();
        activity.last_update_time = Some(now);
        Ok(activity)
    }
}

fn empty_wheels(config: &WheelConfig) -> ActivityWheels {
    let wheel = |t: WheelType| Wheel::new(t, t.default_name(), config.max_rewards(t));
    ActivityWheels {
        beginner: wheel(WheelType::Beginner),
        intermediate: wheel(WheelType::Intermediate),
        advanced: wheel(WheelType::Advanced),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityStatus, MoveDirection, Reward};
    use chrono::NaiveDate;

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn ctx() -> EditContext {
        EditContext {
            upgrade_item_id: "upgrade_ticket".into(),
            upgrade_item_name: "升级券".into(),
            upgrade_reward_weight: 50,
        }
    }

    fn reward(id: &str, weight: u32) -> Reward {
        Reward {
            id: id.into(),
            item_id: format!("item_{id}"),
            item_name: id.into(),
            count: 1,
            weight,
            is_grand_prize: false,
        }
    }

    fn stored_activity() -> Activity {
        let mut wheels = empty_wheels(&WheelConfig::default());
        for wheel_type in WheelType::ALL {
            let wheel = wheels.get_mut(wheel_type);
            wheel.rewards = vec![reward("a", 500), reward("b", 10)];
            wheel.grand_prize_id = Some("b".into());
            wheel.sync_grand_prize_flags();
        }
        Activity {
            id: "ACT_20260001".into(),
            start_time: Some(at(3, 1)),
            end_time: Some(at(3, 31)),
            remarks: "三月活动".into(),
            rules: LocalizedRules::default(),
            wheels,
            last_operator: "admin_01".into(),
            last_update_time: Some(at(2, 1)),
        }
    }

    #[test]
    fn test_ended_activity_is_read_only() {
        let ended = at(4, 1);
        let mut editor = ActivityEditor::open(stored_activity());
        assert!(editor.is_read_only(ended));

        let applied = editor
            .apply_wheel_command(WheelType::Beginner, &WheelCommand::AddReward, &ctx(), ended)
            .unwrap();
        assert!(!applied);
        let update = ActivityFieldsUpdate {
            remarks: Some("changed".into()),
            ..Default::default()
        };
        assert!(!editor.update_fields(&update, ended));
        assert!(!editor.import_json(r#"{"wheels": {}}"#, ended).unwrap());
        assert!(!editor.is_dirty());
        assert!(editor.prepare_save("ops", ended).is_err());
        // 导出仍然可用
        assert!(editor.export_json(ended).is_ok());
    }

    #[test]
    fn test_session_turns_read_only_when_activity_ends() {
        let mut editor = ActivityEditor::open(stored_activity());
        let running = at(3, 10);
        assert!(!editor.is_read_only(running));
        assert!(editor
            .apply_wheel_command(WheelType::Beginner, &WheelCommand::AddReward, &ctx(), running)
            .unwrap());
        let snapshot = editor.snapshot().clone();

        // 会话仍打开时活动结束
        let ended = at(4, 1);
        let view = editor.view(ended);
        assert_eq!(view.status, ActivityStatus::Ended);
        assert!(view.read_only);
        assert!(!editor
            .apply_wheel_command(WheelType::Beginner, &WheelCommand::AddReward, &ctx(), ended)
            .unwrap());
        let update = ActivityFieldsUpdate {
            remarks: Some("too late".into()),
            ..Default::default()
        };
        assert!(!editor.update_fields(&update, ended));
        assert_eq!(editor.snapshot(), &snapshot);
        assert!(matches!(
            editor.prepare_save("ops", ended),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_edits_do_not_touch_baseline() {
        let now = at(3, 10);
        let original = stored_activity();
        let mut editor = ActivityEditor::open(original.clone());
        assert!(!editor.is_read_only(now));
        assert!(!editor.is_dirty());

        let move_a = WheelCommand::MoveReward {
            id: "a".into(),
            direction: MoveDirection::Up,
        };
        // a 上方是大奖，移动被忽略
        assert!(!editor.apply_wheel_command(WheelType::Advanced, &move_a, &ctx(), now).unwrap());
        assert!(editor
            .apply_wheel_command(WheelType::Advanced, &WheelCommand::AddReward, &ctx(), now)
            .unwrap());
        assert!(editor.is_dirty());
        assert_eq!(editor.snapshot().wheels.advanced.rewards.len(), 3);
        assert_eq!(editor.baseline.as_ref(), Some(&original));
    }

    #[test]
    fn test_import_missing_wheels_leaves_snapshot_unchanged() {
        let now = at(3, 10);
        let mut editor = ActivityEditor::open(stored_activity());
        let update = ActivityFieldsUpdate {
            remarks: Some("编辑中".into()),
            ..Default::default()
        };
        assert!(editor.update_fields(&update, now));
        let before = serde_json::to_vec(editor.snapshot()).unwrap();

        let result = editor.import_json(r#"{"id": "ACT_X", "remarks": "imported"}"#, now);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert_eq!(serde_json::to_vec(editor.snapshot()).unwrap(), before);

        assert!(editor.import_json("not json", now).is_err());
        assert!(editor.import_json("[1, 2]", now).is_err());
        assert_eq!(serde_json::to_vec(editor.snapshot()).unwrap(), before);
    }

    #[test]
    fn test_import_replaces_snapshot_and_keeps_id() {
        let mut editor = ActivityEditor::open(stored_activity());
        let mut file = stored_activity();
        file.id = "ACT_OTHER".into();
        file.remarks = "导入的活动".into();
        file.wheels.beginner.rewards.push(reward("c", 7));
        let content = serde_json::to_string(&file).unwrap();

        assert!(editor.import_json(&content, at(3, 10)).unwrap());
        assert_eq!(editor.id(), "ACT_20260001");
        assert_eq!(editor.snapshot().remarks, "导入的活动");
        assert_eq!(editor.snapshot().wheels.beginner.rewards.len(), 3);
    }

    #[test]
    fn test_import_rejects_broken_wheels() {
        let mut editor = ActivityEditor::open(stored_activity());
        let mut file = stored_activity();
        file.wheels.beginner.grand_prize_id = Some("ghost".into());
        let content = serde_json::to_string(&file).unwrap();

        assert!(editor.import_json(&content, at(3, 10)).is_err());
        assert_eq!(editor.snapshot(), &stored_activity());
    }

    #[test]
    fn test_create_from_template() {
        let template = stored_activity();
        let editor = ActivityEditor::create("ACT_20269999".into(), Some(&template), &WheelConfig::default());
        assert!(editor.is_new());
        assert!(editor.is_dirty());
        // 新建活动没有基线，任何时刻都可编辑
        assert!(!editor.is_read_only(at(12, 31)));
        let snapshot = editor.snapshot();
        assert_eq!(snapshot.id, "ACT_20269999");
        assert_eq!(snapshot.start_time, None);
        assert_eq!(snapshot.end_time, None);
        assert_eq!(snapshot.wheels, template.wheels);
        assert_eq!(snapshot.remarks, template.remarks);
    }

    #[test]
    fn test_create_empty_uses_configured_capacity() {
        let editor = ActivityEditor::create("ACT_1".into(), None, &WheelConfig::default());
        let view = editor.view(at(3, 1));
        assert_eq!(view.status, ActivityStatus::NotStarted);
        assert_eq!(view.wheels.len(), 3);
        assert_eq!(view.wheels[0].max_rewards, 15);
        assert_eq!(view.wheels[1].max_rewards, 12);
        assert_eq!(view.wheels[2].max_rewards, 10);
        assert!(!view.wheels[2].can_add_upgrade_reward);
        assert_eq!(view.missing_grand_prizes, WheelType::ALL.to_vec());
    }

    #[test]
    fn test_prepare_save_validates_and_stamps() {
        let template = stored_activity();
        let mut editor = ActivityEditor::create("ACT_2".into(), Some(&template), &WheelConfig::default());
        let now = at(3, 10);

        // 缺少时间
        assert!(editor.prepare_save("ops", now).is_err());

        // 新活动的结束时间已过去
        editor.update_fields(
            &ActivityFieldsUpdate {
                start_time: Some(at(1, 1)),
                end_time: Some(at(2, 1)),
                ..Default::default()
            },
            now,
        );
        assert!(editor.prepare_save("ops", now).is_err());

        editor.update_fields(
            &ActivityFieldsUpdate {
                end_time: Some(at(5, 1)),
                ..Default::default()
            },
            now,
        );
        let saved = editor.prepare_save("ops_02", now).unwrap();
        assert_eq!(saved.last_operator, "ops_02");
        assert_eq!(saved.last_update_time, Some(now));

        // 移除大奖后必须重新选择才能保存
        let remove_grand = WheelCommand::RemoveReward { id: "b".into() };
        editor
            .apply_wheel_command(WheelType::Intermediate, &remove_grand, &ctx(), now)
            .unwrap();
        match editor.prepare_save("ops", now) {
            Err(AppError::ValidationError(msg)) => assert!(msg.contains("intermediate")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_export_filename() {
        let editor = ActivityEditor::open(stored_activity());
        let file = editor.export_json(at(3, 10)).unwrap();
        assert_eq!(file.filename, "activity-ACT_20260001-2026-03-10.json");
        let parsed: Activity = serde_json::from_str(&file.content).unwrap();
        assert_eq!(&parsed, editor.snapshot());
    }
}
