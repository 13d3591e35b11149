use super::client::ApiClient;
use crate::types::{Keyword, KeywordUpdate, NewKeyword, Result};

/// Keyword rule endpoints.
pub struct KeywordApi<'a> {
    client: &'a ApiClient,
}

impl<'a> KeywordApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /chatbots/{id}/keywords`
    pub async fn list_for_bot(&self, chatbot_id: i64) -> Result<Vec<Keyword>> {
        self.client
            .get(&format!("/chatbots/{}/keywords", chatbot_id))
            .await
    }

    /// `POST /keywords`
    pub async fn create(&self, data: &NewKeyword) -> Result<Keyword> {
        self.client.post("/keywords", data).await
    }

    /// `PUT /keywords/{id}`
    pub async fn update(&self, id: i64, data: &KeywordUpdate) -> Result<Keyword> {
        self.client.put(&format!("/keywords/{}", id), data).await
    }

    /// `DELETE /keywords/{id}`
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/keywords/{}", id)).await
    }
}
