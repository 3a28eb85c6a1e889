pub mod calls;
pub mod conversations;
pub mod messages;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::messenger::requests::{
    CreateConversationRequest, HistoryQuery, SendMessageRequest,
};
use crate::storage::Storage;

pub struct MessengerService {
    storage: Option<Arc<dyn Storage>>,
}

impl MessengerService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_conversation(
        &self,
        req: CreateConversationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        conversations::handle_create_conversation(self, req, request).await
    }

    pub async fn list_conversations(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        conversations::handle_list_conversations(self, request).await
    }

    pub async fn get_history(
        &self,
        conversation_id: &str,
        query: HistoryQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::handle_get_history(self, conversation_id, query, request).await
    }

    pub async fn send_message(
        &self,
        conversation_id: &str,
        req: SendMessageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::handle_send_message(self, conversation_id, req, request).await
    }

    pub async fn create_call(
        &self,
        conversation_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        calls::handle_create_call(self, conversation_id, request).await
    }

    pub async fn start_call(&self, call_id: &str, request: &HttpRequest) -> ActixResult<HttpResponse> {
        calls::handle_start_call(self, call_id, request).await
    }

    pub async fn end_call(&self, call_id: &str, request: &HttpRequest) -> ActixResult<HttpResponse> {
        calls::handle_end_call(self, call_id, request).await
    }
}
