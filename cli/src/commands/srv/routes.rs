//! # Server Routes
//!
//! File: cli/src/commands/srv/routes.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Request handlers for `starx srv` and the state they share.
//!
//! | Route | Behavior |
//! |---|---|
//! | `GET /` | HTML chat page |
//! | `POST /chat` | form field `message`; blank messages are ignored; `303` to `/` |
//! | `POST /reset` | reset the conversation; `303` to `/` |
//! | `GET /api/session` | the session as JSON |
//! | `POST /api/messages` | `{ "text": … }` → `{ reply, state }`; blank text → `422` |
//! | `POST /api/reset` | reset; returns the fresh session |
//! | `GET /api/deals?range=MIN-MAX` | matching listings; bad range → `400` |
//!
use crate::common::catalog::{CatalogEntry, PriceRange};
use crate::common::dialogue::{DialogueAgent, DialogueState, Session};
use crate::core::error::StarxError;
use crate::core::templating::{self, ChatPage};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Tera;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// # Shared Server State (`AppState`)
///
/// One agent and one conversation for the whole server.
#[derive(Clone)]
pub struct AppState {
    agent: Arc<DialogueAgent>,
    session: Arc<Mutex<Session>>,
    templates: Arc<Tera>,
}

impl AppState {
    pub fn new(agent: DialogueAgent, templates: Tera) -> Self {
        Self {
            agent: Arc::new(agent),
            session: Arc::new(Mutex::new(Session::new())),
            templates: Arc::new(templates),
        }
    }
}

/// # Build Routes (`router`)
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(chat_page))
        .route("/chat", post(submit_form))
        .route("/reset", post(reset_form))
        .route("/api/session", get(get_session))
        .route("/api/messages", post(post_message))
        .route("/api/reset", post(reset_api))
        .route("/api/deals", get(get_deals))
        .with_state(state)
}

/// An error answered as JSON `{ "error": … }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<StarxError> for ApiError {
    fn from(err: StarxError) -> Self {
        let status = match err {
            StarxError::EmptyInput => StatusCode::UNPROCESSABLE_ENTITY,
            StarxError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!("Request failed: {:#}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    reply: String,
    state: DialogueState,
}

#[derive(Debug, Deserialize)]
pub struct DealsQuery {
    range: String,
}

async fn chat_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let session = state.session.lock().await;
    let page = ChatPage::new(state.agent.name(), &session);
    let html = templating::render_chat_page(&state.templates, &page)?;
    Ok(Html(html))
}

async fn submit_form(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Redirect {
    let mut session = state.session.lock().await;
    match state.agent.try_respond(&mut session, &form.message) {
        Ok(reply) => debug!("Form turn answered: {}", reply),
        Err(e) => debug!("Ignoring form submission: {}", e),
    }
    Redirect::to("/")
}

async fn reset_form(State(state): State<AppState>) -> Redirect {
    let mut session = state.session.lock().await;
    state.agent.reset(&mut session);
    info!("Conversation reset from the chat page");
    Redirect::to("/")
}

async fn get_session(State(state): State<AppState>) -> Json<Session> {
    Json(state.session.lock().await.clone())
}

async fn post_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let reply = state.agent.try_respond(&mut session, &request.text)?;
    Ok(Json(MessageResponse {
        reply,
        state: session.state(),
    }))
}

async fn reset_api(State(state): State<AppState>) -> Json<Session> {
    let mut session = state.session.lock().await;
    state.agent.reset(&mut session);
    info!("Conversation reset through the API");
    Json(session.clone())
}

async fn get_deals(
    State(state): State<AppState>,
    Query(query): Query<DealsQuery>,
) -> Result<Json<Vec<CatalogEntry>>, ApiError> {
    let range = query.range.parse::<PriceRange>().map_err(|e| {
        warn!("Rejected price range '{}': {}", query.range, e);
        ApiError::from(e)
    })?;
    let matches = state
        .agent
        .catalog()
        .in_range(range)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(matches))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::dialogue::agent::replies;
    use crate::common::prediction::{LinearModel, PredictionBridge};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let model = LinearModel::new(
            -1_900_000.0,
            ["Kms_driven", "Fuel_type", "Owner", "Year", "Company", "Location_2"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![-0.5, 0.0, -10_000.0, 1_000.0, 0.0, 5_000.0],
        )
        .unwrap();
        let agent = DialogueAgent::new(PredictionBridge::new(Arc::new(model)));
        router(AppState::new(agent, templating::chat_templates().unwrap()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn api_message_advances_the_session() {
        let app = app();
        let (status, body) = send(&app, json_post("/api/messages", r#"{"text":"I want to buy a car"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["reply"], replies::BUY_CAR_INTRO);
        assert_eq!(json["state"], "buy_car");

        let (_, body) = send(&app, get_req("/api/session")).await;
        let session: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(session["state"], "buy_car");
        let transcript = session["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0]["index"], 1);
        assert_eq!(transcript[0]["speaker"], "user");
        assert_eq!(transcript[1]["speaker"], "assistant");
    }

    #[tokio::test]
    async fn api_purchase_flow_quotes_price() {
        let app = app();
        for text in ["I want to buy a car", "ok"] {
            send(&app, json_post("/api/messages", &format!(r#"{{"text":"{}"}}"#, text))).await;
        }
        let (_, body) = send(&app, json_post("/api/messages", r#"{"text":"40000, 1, 2015"}"#)).await;
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["reply"],
            "This car will cost ₹90,000.00. Your order has been sent!"
        );
        assert_eq!(json["state"], "default");
    }

    #[tokio::test]
    async fn blank_api_message_is_unprocessable() {
        let app = app();
        let (status, body) = send(&app, json_post("/api/messages", r#"{"text":"   "}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Input cannot be empty.");

        let (_, body) = send(&app, get_req("/api/session")).await;
        let session: Value = serde_json::from_slice(&body).unwrap();
        assert!(session["transcript"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn api_reset_returns_fresh_session() {
        let app = app();
        send(&app, json_post("/api/messages", r#"{"text":"hello"}"#)).await;
        let (status, body) = send(&app, json_post("/api/reset", "")).await;
        assert_eq!(status, StatusCode::OK);
        let session: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(session["state"], "default");
        assert!(session["transcript"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn deals_are_filtered_by_range() {
        let app = app();
        let (status, body) = send(&app, get_req("/api/deals?range=60000-70000")).await;
        assert_eq!(status, StatusCode::OK);
        let listings: Value = serde_json::from_slice(&body).unwrap();
        let listings = listings.as_array().unwrap();
        assert!(!listings.is_empty());
        assert!(listings
            .iter()
            .all(|l| (60_000..=70_000).contains(&l["price"].as_u64().unwrap())));
    }

    #[tokio::test]
    async fn bad_deals_range_is_bad_request() {
        let app = app();
        let (status, body) = send(&app, get_req("/api/deals?range=cheap")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("Invalid input"));

        let (status, _) = send(&app, get_req("/api/deals?range=900-100")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn form_submission_redirects_and_renders() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("message=hello"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let (status, body) = send(&app, get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("data-index=\"2\""));
    }

    #[tokio::test]
    async fn blank_form_submission_is_ignored() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("message=+++"))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let (_, body) = send(&app, get_req("/api/session")).await;
        let session: Value = serde_json::from_slice(&body).unwrap();
        assert!(session["transcript"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn form_reset_redirects() {
        let app = app();
        send(&app, json_post("/api/messages", r#"{"text":"find the best deal"}"#)).await;
        let request = Request::builder()
            .method("POST")
            .uri("/reset")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let (_, body) = send(&app, get_req("/api/session")).await;
        let session: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(session["state"], "default");
    }
}
