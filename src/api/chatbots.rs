use super::client::ApiClient;
use crate::types::{Chatbot, ChatbotUpdate, NewChatbot, Result};

/// `/chatbots` endpoints.
pub struct ChatbotApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ChatbotApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /chatbots`
    pub async fn list(&self) -> Result<Vec<Chatbot>> {
        self.client.get("/chatbots").await
    }

    /// `GET /chatbots/{id}`
    pub async fn get(&self, id: i64) -> Result<Chatbot> {
        self.client.get(&format!("/chatbots/{}", id)).await
    }

    /// `POST /chatbots`
    pub async fn create(&self, data: &NewChatbot) -> Result<Chatbot> {
        self.client.post("/chatbots", data).await
    }

    /// `PUT /chatbots/{id}` with a partial body
    pub async fn update(&self, id: i64, data: &ChatbotUpdate) -> Result<Chatbot> {
        self.client.put(&format!("/chatbots/{}", id), data).await
    }

    /// `DELETE /chatbots/{id}`
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/chatbots/{}", id)).await
    }
}
