use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{call_sessions, conversation_participants, conversations, messages};
use crate::errors::{CampusError, Result};
use crate::models::messenger::{
    entities::{CallSession, CallStatus, ChatMessage, Conversation},
    requests::CreateConversationRequest,
};
use crate::utils::random_code::generate_room_name;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 创建会话，创建者自动成为成员
    pub async fn create_conversation_impl(
        &self,
        creator_id: i64,
        req: CreateConversationRequest,
    ) -> Result<Conversation> {
        let now = chrono::Utc::now().timestamp();
        let id = uuid::Uuid::new_v4().to_string();

        let model = ConversationActiveModel {
            id: Set(id.clone()),
            title: Set(req.title),
            is_group: Set(req.is_group),
            module_id: Set(req.module_id),
            created_by: Set(Some(creator_id)),
            created_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            CampusError::database_operation(format!("Create conversation failed: {e}"))
        })?;

        let mut member_ids = vec![creator_id];
        for participant_id in req.participant_ids {
            if !member_ids.contains(&participant_id) {
                member_ids.push(participant_id);
            }
        }

        let members: Vec<ConversationParticipantActiveModel> = member_ids
            .into_iter()
            .map(|user_id| ConversationParticipantActiveModel {
                conversation_id: Set(id.clone()),
                user_id: Set(user_id),
                role: Set((user_id == creator_id).then(|| "owner".to_string())),
                joined_at: Set(now),
                ..Default::default()
            })
            .collect();

        ConversationParticipants::insert_many(members)
            .on_conflict(
                OnConflict::columns([
                    conversation_participants::Column::ConversationId,
                    conversation_participants::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Add participants failed: {e}"))
            })?;

        Ok(result.into_conversation())
    }

    /// 列出用户参与的会话
    pub async fn list_conversations_for_user_impl(
        &self,
        user_id: i64,
    ) -> Result<Vec<Conversation>> {
        let memberships = ConversationParticipants::find()
            .filter(conversation_participants::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query participants failed: {e}"))
            })?;

        let conversation_ids: Vec<String> = memberships
            .into_iter()
            .map(|m| m.conversation_id)
            .collect();
        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Conversations::find()
            .filter(conversations::Column::Id.is_in(conversation_ids))
            .order_by_desc(conversations::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("List conversations failed: {e}"))
            })?;

        Ok(rows.into_iter().map(|m| m.into_conversation()).collect())
    }

    /// 判断用户是否为会话成员
    pub async fn is_participant_impl(&self, conversation_id: &str, user_id: i64) -> Result<bool> {
        let count = ConversationParticipants::find()
            .filter(conversation_participants::Column::ConversationId.eq(conversation_id))
            .filter(conversation_participants::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query participant failed: {e}"))
            })?;

        Ok(count > 0)
    }

    /// 持久化消息，返回携带发送者姓名的完整消息
    pub async fn create_message_impl(
        &self,
        conversation_id: &str,
        sender_id: i64,
        text: String,
    ) -> Result<ChatMessage> {
        let now = chrono::Utc::now().timestamp();

        let model = MessageActiveModel {
            conversation_id: Set(conversation_id.to_string()),
            sender_id: Set(sender_id),
            text: Set(text),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Create message failed: {e}")))?;

        let sender_name = Users::find_by_id(sender_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query sender failed: {e}")))?
            .and_then(|u| u.display_name)
            .unwrap_or_default();

        Ok(result.into_message(sender_name))
    }

    /// 取历史消息
    ///
    /// 按 id 倒序取 limit + 1 条判断是否还有更早的，再反转为正序返回。
    pub async fn list_messages_impl(
        &self,
        conversation_id: &str,
        before_id: Option<i64>,
        limit: u64,
    ) -> Result<(Vec<ChatMessage>, bool)> {
        let mut select = Messages::find()
            .filter(messages::Column::ConversationId.eq(conversation_id))
            .order_by_desc(messages::Column::Id)
            .limit(limit + 1);

        if let Some(before) = before_id {
            select = select.filter(messages::Column::Id.lt(before));
        }

        let mut rows = select
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List messages failed: {e}")))?;

        let has_more = rows.len() as u64 > limit;
        rows.truncate(limit as usize);
        rows.reverse();

        let sender_ids: Vec<i64> = rows.iter().map(|m| m.sender_id).collect();
        let sender_names: HashMap<i64, String> = Users::find()
            .filter(crate::entity::users::Column::Id.is_in(sender_ids))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query senders failed: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.display_name.unwrap_or_default()))
            .collect();

        let result = rows
            .into_iter()
            .map(|m| {
                let name = sender_names.get(&m.sender_id).cloned().unwrap_or_default();
                m.into_message(name)
            })
            .collect();

        Ok((result, has_more))
    }

    /// 创建通话会话，初始状态为 init
    pub async fn create_call_session_impl(
        &self,
        conversation_id: &str,
        host_id: i64,
    ) -> Result<CallSession> {
        let now = chrono::Utc::now().timestamp();

        let model = CallSessionActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            conversation_id: Set(conversation_id.to_string()),
            host_id: Set(Some(host_id)),
            room_name: Set(generate_room_name()),
            status: Set(CallStatus::Init.to_string()),
            started_at: Set(None),
            ended_at: Set(None),
            created_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            CampusError::database_operation(format!("Create call session failed: {e}"))
        })?;

        Ok(result.into_call_session())
    }

    /// 通过 ID 获取通话会话
    pub async fn get_call_session_impl(&self, id: &str) -> Result<Option<CallSession>> {
        let result = CallSessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query call session failed: {e}"))
            })?;

        Ok(result.map(|m| m.into_call_session()))
    }

    /// 通过房间名获取通话会话，信令通道鉴权用
    pub async fn get_call_by_room_impl(&self, room_name: &str) -> Result<Option<CallSession>> {
        let result = CallSessions::find()
            .filter(call_sessions::Column::RoomName.eq(room_name))
            .one(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query call session failed: {e}"))
            })?;

        Ok(result.map(|m| m.into_call_session()))
    }

    /// init → live
    pub async fn start_call_impl(&self, id: &str) -> Result<Option<CallSession>> {
        let Some(session) = CallSessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query call session failed: {e}"))
            })?
        else {
            return Ok(None);
        };

        let status = session
            .status
            .parse::<CallStatus>()
            .unwrap_or(CallStatus::Init);
        if !status.can_start() {
            return Err(CampusError::validation(
                "L'appel ne peut être démarré que depuis l'état initial",
            ));
        }

        let now = chrono::Utc::now().timestamp();
        let mut active: CallSessionActiveModel = session.into();
        active.status = Set(CallStatus::Live.to_string());
        active.started_at = Set(Some(now));

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Start call failed: {e}")))?;

        Ok(Some(result.into_call_session()))
    }

    /// init/live → ended，init 状态下等于取消
    pub async fn end_call_impl(&self, id: &str) -> Result<Option<CallSession>> {
        let Some(session) = CallSessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query call session failed: {e}"))
            })?
        else {
            return Ok(None);
        };

        let status = session
            .status
            .parse::<CallStatus>()
            .unwrap_or(CallStatus::Init);
        if !status.can_end() {
            return Err(CampusError::validation("L'appel est déjà terminé"));
        }

        let now = chrono::Utc::now().timestamp();
        let mut active: CallSessionActiveModel = session.into();
        active.status = Set(CallStatus::Ended.to_string());
        active.ended_at = Set(Some(now));

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("End call failed: {e}")))?;

        Ok(Some(result.into_call_session()))
    }
}
