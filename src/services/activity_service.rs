use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::config::WheelConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    Activity, ActivityFieldsUpdate, ActivityListItem, ActivityListQuery, EditorResponse,
    EditorView, ExportFile, PendingEditsResponse, SortOrder, WheelCommand, WheelType,
};
use crate::services::activity_editor::ActivityEditor;
use crate::services::dirty_tracker::DirtyTracker;
use crate::services::wheel_editor::EditContext;
use crate::store::ConfigStore;
use crate::utils::{generate_activity_id, Clock};

/// 生成活动ID时的最大重试次数
const ID_ATTEMPTS: usize = 32;

/// 活动列表与编辑会话
///
/// - 列表上的备注修改先进入脏数据跟踪，统一提交
/// - 每个活动同一时间只有一个编辑会话，以活动ID为键
#[derive(Clone)]
pub struct ActivityService {
    store: Arc<dyn ConfigStore>,
    clock: Arc<dyn Clock>,
    wheel_config: WheelConfig,
    sessions: Arc<Mutex<HashMap<String, ActivityEditor>>>,
    board: Arc<Mutex<DirtyTracker<Activity>>>,
}

impl ActivityService {
    pub fn new(store: Arc<dyn ConfigStore>, clock: Arc<dyn Clock>, wheel_config: WheelConfig) -> Self {
        Self {
            store,
            clock,
            wheel_config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            board: Arc::new(Mutex::new(DirtyTracker::default())),
        }
    }

    // ==================== 列表 ====================

    /// 活动列表：状态按当前时间推导，可按状态筛选，按开始时间（同则按结束时间）排序
    pub async fn list(&self, query: &ActivityListQuery) -> AppResult<Vec<ActivityListItem>> {
        let board = self.synced_board().await?;
        let now = self.clock.now();

        let mut rows: Vec<&Activity> = board
            .rows()
            .into_iter()
            .filter(|a| query.status.is_none_or(|s| a.status_at(now) == s))
            .collect();
        rows.sort_by(|a, b| {
            let ord = a.start_time.cmp(&b.start_time).then(a.end_time.cmp(&b.end_time));
            match query.sort.unwrap_or_default() {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        Ok(rows
            .into_iter()
            .map(|a| list_item(a, now, board.is_row_dirty(&a.id)))
            .collect())
    }

    pub async fn get(&self, id: &str) -> AppResult<Activity> {
        self.store
            .get_activity(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity {id} not found")))
    }

    // ==================== 行内备注修改 ====================

    /// 暂存一条备注修改；改回原值时该行不再算作已修改
    pub async fn stage_remark(&self, id: &str, remarks: String) -> AppResult<ActivityListItem> {
        let mut board = self.synced_board().await?;
        let key = id.to_string();
        board.edit(&key, |a| a.remarks = remarks)?;

        let now = self.clock.now();
        let row = board
            .current(&key)
            .ok_or_else(|| AppError::NotFound(format!("Activity {id} not found")))?;
        Ok(list_item(row, now, board.is_row_dirty(&key)))
    }

    pub async fn pending_remarks(&self) -> PendingEditsResponse {
        let board = self.board.lock().await;
        PendingEditsResponse {
            is_dirty: board.is_dirty(),
            count: board.dirty_count(),
            activities: board.dirty_rows().into_iter().cloned().collect(),
        }
    }

    /// 一次性提交所有已修改的行；失败时修改全部保留
    pub async fn commit_remarks(&self, operator: &str) -> AppResult<usize> {
        let mut board = self.synced_board().await?;
        let now = self.clock.now();
        let store = self.store.clone();
        let operator = operator.to_string();

        let count = board
            .commit(|rows| async move {
                let stamped: Vec<Activity> = rows
                    .into_iter()
                    .map(|mut a| {
                        a.last_operator = operator.clone();
                        a.last_update_time = Some(now);
                        a
                    })
                    .collect();
                store.save_activities(&stamped).await?;
                Ok::<_, AppError>(stamped)
            })
            .await
            .inspect_err(|e| log::warn!("Remark commit failed, edits kept for retry: {e}"))?;

        if count > 0 {
            log::info!("Committed {count} activity remark edits");
        }
        Ok(count)
    }

    pub async fn discard_remarks(&self) -> usize {
        let mut board = self.board.lock().await;
        let count = board.dirty_count();
        board.discard();
        count
    }

    /// 以存储为准刷新未修改的行，并加入新出现的活动
    async fn synced_board(&self) -> AppResult<MutexGuard<'_, DirtyTracker<Activity>>> {
        let stored = self.store.list_activities().await?;
        let mut board = self.board.lock().await;
        for activity in stored {
            if !board.is_row_dirty(&activity.id) {
                board.rebase(activity);
            }
        }
        Ok(board)
    }

    // ==================== 编辑会话 ====================

    /// 打开已有活动；已有会话时直接返回该会话
    pub async fn open_editor(&self, id: &str) -> AppResult<EditorView> {
        let mut sessions = self.sessions.lock().await;
        let now = self.clock.now();
        if let Some(editor) = sessions.get(id) {
            return Ok(editor.view(now));
        }

        let activity = self.get(id).await?;
        let editor = ActivityEditor::open(activity);
        if editor.is_read_only(now) {
            log::info!("Activity {id} has ended, opened read-only");
        }
        let view = editor.view(now);
        sessions.insert(id.to_string(), editor);
        Ok(view)
    }

    /// 新建活动，可指定模板活动复制其转盘配置
    pub async fn create_editor(&self, template_id: Option<&str>) -> AppResult<EditorView> {
        let template = match template_id {
            Some(tid) => Some(self.get(tid).await?),
            None => None,
        };

        let mut sessions = self.sessions.lock().await;
        let id = self.unused_activity_id(&sessions).await?;
        let editor = ActivityEditor::create(id.clone(), template.as_ref(), &self.wheel_config);
        let view = editor.view(self.clock.now());
        sessions.insert(id.clone(), editor);

        log::info!(
            "Created activity draft {id}{}",
            template_id.map(|t| format!(" from template {t}")).unwrap_or_default()
        );
        Ok(view)
    }

    pub async fn editor_view(&self, id: &str) -> AppResult<EditorView> {
        let sessions = self.sessions.lock().await;
        Ok(session(&sessions, id)?.view(self.clock.now()))
    }

    pub async fn apply_command(
        &self,
        id: &str,
        wheel_type: WheelType,
        command: &WheelCommand,
    ) -> AppResult<EditorResponse> {
        let ctx = self.edit_context(command).await?;
        let mut sessions = self.sessions.lock().await;
        let editor = session_mut(&mut sessions, id)?;
        let now = self.clock.now();
        let applied = editor.apply_wheel_command(wheel_type, command, &ctx, now)?;
        Ok(EditorResponse {
            applied,
            editor: editor.view(now),
        })
    }

    pub async fn update_fields(&self, id: &str, update: &ActivityFieldsUpdate) -> AppResult<EditorResponse> {
        let mut sessions = self.sessions.lock().await;
        let editor = session_mut(&mut sessions, id)?;
        let now = self.clock.now();
        let applied = editor.update_fields(update, now);
        Ok(EditorResponse {
            applied,
            editor: editor.view(now),
        })
    }

    pub async fn import(&self, id: &str, content: &str) -> AppResult<EditorResponse> {
        let mut sessions = self.sessions.lock().await;
        let editor = session_mut(&mut sessions, id)?;
        let now = self.clock.now();
        let applied = editor.import_json(content, now)?;
        Ok(EditorResponse {
            applied,
            editor: editor.view(now),
        })
    }

    pub async fn export(&self, id: &str) -> AppResult<ExportFile> {
        let sessions = self.sessions.lock().await;
        session(&sessions, id)?.export_json(self.clock.now())
    }

    /// 保存编辑会话
    ///
    /// 1. 校验并盖上操作人、时间
    /// 2. 写入存储，失败时会话保留以便重试
    /// 3. 刷新列表基线并关闭会话
    pub async fn save_editor(&self, id: &str, operator: &str) -> AppResult<Activity> {
        let mut sessions = self.sessions.lock().await;
        let activity = session(&sessions, id)?.prepare_save(operator, self.clock.now())?;

        if let Err(e) = self.store.save_activity(&activity).await {
            log::warn!("Saving activity {id} failed, editor kept open: {e}");
            return Err(e);
        }
        sessions.remove(id);
        drop(sessions);

        self.board.lock().await.rebase(activity.clone());
        log::info!("Activity {id} saved by {operator}");
        Ok(activity)
    }

    /// 关闭会话且不保存
    pub async fn discard_editor(&self, id: &str) -> AppResult<()> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("No open editor for activity {id}")))
    }

    async fn edit_context(&self, command: &WheelCommand) -> AppResult<EditContext> {
        let upgrade_item_id = match command {
            WheelCommand::AddUpgradeReward => self.store.load_general_config().await?.upgrade_item_id,
            _ => String::new(),
        };
        Ok(EditContext {
            upgrade_item_id,
            upgrade_item_name: self.wheel_config.upgrade_reward_name.clone(),
            upgrade_reward_weight: self.wheel_config.upgrade_reward_weight,
        })
    }

    async fn unused_activity_id(&self, sessions: &HashMap<String, ActivityEditor>) -> AppResult<String> {
        let now = self.clock.now();
        for _ in 0..ID_ATTEMPTS {
            let id = generate_activity_id(now);
            if !sessions.contains_key(&id) && self.store.get_activity(&id).await?.is_none() {
                return Ok(id);
            }
        }
        Err(AppError::InternalError(
            "Failed to generate an unused activity id".into(),
        ))
    }
}

fn session<'a>(sessions: &'a HashMap<String, ActivityEditor>, id: &str) -> AppResult<&'a ActivityEditor> {
    sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("No open editor for activity {id}")))
}

fn session_mut<'a>(
    sessions: &'a mut HashMap<String, ActivityEditor>,
    id: &str,
) -> AppResult<&'a mut ActivityEditor> {
    sessions
        .get_mut(id)
        .ok_or_else(|| AppError::NotFound(format!("No open editor for activity {id}")))
}

fn list_item(activity: &Activity, now: chrono::NaiveDateTime, is_edited: bool) -> ActivityListItem {
    let status = activity.status_at(now);
    ActivityListItem {
        id: activity.id.clone(),
        remarks: activity.remarks.clone(),
        start_time: activity.start_time,
        end_time: activity.end_time,
        status,
        read_only: status.is_read_only(),
        is_edited,
        last_operator: activity.last_operator.clone(),
        last_update_time: activity.last_update_time,
    }
}
