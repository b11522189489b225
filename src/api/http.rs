use crate::{
    api::{BoardApi, ReorderCardsRequest, ReorderListsRequest},
    config::ClientConfig,
    domain::{
        Background, Board, BoardId, BoardSummary, Card, CardId, CardPosition, Checklist,
        ChecklistId, ChecklistItem, ChecklistItemId, Label, LabelId, List, ListId, ListPosition,
        Member, UserId,
    },
    error::{FlowlogError, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

/// Partial card update; unset fields are left alone by the server
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Some(None)` clears the due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// FlowLog REST client
///
/// No timeouts or retries: a failed request is reported once and that's it.
#[derive(Debug, Clone)]
pub struct HttpBoardApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBoardApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(Self::auth_headers(&config)?)
            .build()
            .map_err(|e| FlowlogError::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn auth_headers(config: &ClientConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&token.bearer())
                .map_err(|e| FlowlogError::ConfigError(format!("invalid auth header: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.config.endpoint(path)?))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| FlowlogError::NetworkError(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = %status, url = %response.url(), "FlowLog API response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("request failed ({})", status));
        Err(FlowlogError::ServerError {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await?;
        Ok(())
    }

    // Boards

    /// Boards owned by the token's user; an empty list without a token
    pub async fn list_boards(&self) -> Result<Vec<BoardSummary>> {
        if self.config.token.is_none() {
            return Ok(Vec::new());
        }
        self.send_json(self.request(Method::GET, "boards")?).await
    }

    pub async fn create_board(
        &self,
        title: &str,
        background: Option<&Background>,
    ) -> Result<BoardSummary> {
        let title = non_blank(title, "board title")?;
        let body = json!({ "title": title, "background": background.map(Background::as_str) });
        self.send_json(self.request(Method::POST, "boards")?.json(&body))
            .await
    }

    pub async fn update_board(
        &self,
        id: BoardId,
        title: Option<&str>,
        background: Option<&Background>,
    ) -> Result<BoardSummary> {
        let mut body = serde_json::Map::new();
        if let Some(title) = title {
            body.insert("title".into(), json!(non_blank(title, "board title")?));
        }
        if let Some(background) = background {
            body.insert("background".into(), json!(background.as_str()));
        }
        self.send_json(self.request(Method::PUT, &format!("boards/{}", id))?.json(&body))
            .await
    }

    pub async fn delete_board(&self, id: BoardId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("boards/{}", id))?)
            .await
    }

    // Lists

    pub async fn create_list(&self, title: &str, board_id: BoardId) -> Result<List> {
        let body = json!({ "title": non_blank(title, "list title")?, "boardId": board_id });
        self.send_json(self.request(Method::POST, "lists")?.json(&body))
            .await
    }

    pub async fn rename_list(&self, id: ListId, title: &str) -> Result<List> {
        let body = json!({ "title": non_blank(title, "list title")? });
        self.send_json(self.request(Method::PUT, &format!("lists/{}", id))?.json(&body))
            .await
    }

    pub async fn set_list_color(&self, id: ListId, color: Option<&str>) -> Result<List> {
        let body = json!({ "color": color });
        self.send_json(self.request(Method::PUT, &format!("lists/{}", id))?.json(&body))
            .await
    }

    pub async fn delete_list(&self, id: ListId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("lists/{}", id))?)
            .await
    }

    // Cards

    pub async fn create_card(&self, title: &str, list_id: ListId) -> Result<Card> {
        let body = json!({ "title": non_blank(title, "card title")?, "listId": list_id });
        self.send_json(self.request(Method::POST, "cards")?.json(&body))
            .await
    }

    pub async fn update_card(&self, id: CardId, update: &CardUpdate) -> Result<Card> {
        if let Some(title) = &update.title {
            non_blank(title, "card title")?;
        }
        self.send_json(self.request(Method::PUT, &format!("cards/{}", id))?.json(update))
            .await
    }

    pub async fn delete_card(&self, id: CardId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("cards/{}", id))?)
            .await
    }

    // Labels

    pub async fn create_label(&self, name: &str, color: &str, board_id: BoardId) -> Result<Label> {
        let body = json!({ "name": name, "color": color, "boardId": board_id });
        self.send_json(self.request(Method::POST, "labels")?.json(&body))
            .await
    }

    pub async fn update_label(&self, id: LabelId, name: &str, color: &str) -> Result<Label> {
        let body = json!({ "name": name, "color": color });
        self.send_json(self.request(Method::PUT, &format!("labels/{}", id))?.json(&body))
            .await
    }

    pub async fn delete_label(&self, id: LabelId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("labels/{}", id))?)
            .await
    }

    pub async fn attach_label(&self, card_id: CardId, label_id: LabelId) -> Result<()> {
        let body = json!({ "cardId": card_id, "labelId": label_id });
        self.send_empty(self.request(Method::POST, "labels/card")?.json(&body))
            .await
    }

    pub async fn detach_label(&self, card_id: CardId, label_id: LabelId) -> Result<()> {
        let path = format!("labels/card/{}/{}", card_id, label_id);
        self.send_empty(self.request(Method::DELETE, &path)?).await
    }

    // Checklists

    pub async fn create_checklist(&self, title: &str, card_id: CardId) -> Result<Checklist> {
        let body = json!({ "title": non_blank(title, "checklist title")?, "cardId": card_id });
        self.send_json(self.request(Method::POST, "checklists")?.json(&body))
            .await
    }

    pub async fn delete_checklist(&self, id: ChecklistId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("checklists/{}", id))?)
            .await
    }

    pub async fn add_checklist_item(
        &self,
        checklist_id: ChecklistId,
        content: &str,
    ) -> Result<ChecklistItem> {
        let body = json!({ "content": non_blank(content, "checklist item")? });
        let path = format!("checklists/{}/items", checklist_id);
        self.send_json(self.request(Method::POST, &path)?.json(&body))
            .await
    }

    pub async fn toggle_checklist_item(&self, item_id: ChecklistItemId) -> Result<ChecklistItem> {
        let path = format!("checklists/items/{}/toggle", item_id);
        self.send_json(self.request(Method::PATCH, &path)?).await
    }

    pub async fn delete_checklist_item(&self, item_id: ChecklistItemId) -> Result<()> {
        let path = format!("checklists/items/{}", item_id);
        self.send_empty(self.request(Method::DELETE, &path)?).await
    }

    // Members

    pub async fn list_users(&self) -> Result<Vec<Member>> {
        self.send_json(self.request(Method::GET, "members/users")?)
            .await
    }

    pub async fn board_members(&self, board_id: BoardId) -> Result<Vec<Member>> {
        let path = format!("members/board/{}", board_id);
        self.send_json(self.request(Method::GET, &path)?).await
    }

    pub async fn assign_member(&self, card_id: CardId, user_id: UserId) -> Result<()> {
        let body = json!({ "cardId": card_id, "userId": user_id });
        self.send_empty(self.request(Method::POST, "members/card")?.json(&body))
            .await
    }

    pub async fn remove_member(&self, card_id: CardId, user_id: UserId) -> Result<()> {
        let path = format!("members/card/{}/{}", card_id, user_id);
        self.send_empty(self.request(Method::DELETE, &path)?).await
    }

    pub async fn create_user(&self, name: &str, email: &str) -> Result<Member> {
        let body = json!({ "name": non_blank(name, "name")?, "email": non_blank(email, "email")? });
        self.send_json(self.request(Method::POST, "members/users")?.json(&body))
            .await
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn fetch_board(&self, id: BoardId) -> Result<Board> {
        self.send_json(self.request(Method::GET, &format!("boards/{}", id))?)
            .await
    }

    async fn reorder_lists(&self, board_id: BoardId, items: &[ListPosition]) -> Result<()> {
        let body = ReorderListsRequest {
            items: items.to_vec(),
            board_id,
        };
        tracing::debug!(board_id = %board_id, count = items.len(), "Sending list reorder");
        self.send_empty(self.request(Method::PUT, "lists/reorder")?.json(&body))
            .await
    }

    async fn reorder_cards(&self, items: &[CardPosition]) -> Result<()> {
        let body = ReorderCardsRequest {
            items: items.to_vec(),
        };
        tracing::debug!(count = items.len(), "Sending card reorder");
        self.send_empty(self.request(Method::PUT, "cards/reorder")?.json(&body))
            .await
    }
}

fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FlowlogError::ValidationError(format!(
            "{} must not be empty",
            what
        )));
    }
    Ok(trimmed)
}
