//! HTTP surface: sessions, language, news and the contact form.
//!
//! All state lives in [`AppState`] and is handed to handlers through axum's
//! `State` extractor. The display language travels in the
//! `preferredLanguage` cookie; everything per-visitor that must stay on the
//! server (anti-forgery token, rate limiter, submit control) lives in a
//! [`Session`] keyed by its token.

use crate::config::Config;
use crate::contact::{
    submit, ContactForm, ContactTransport, FormField, RateLimiterConfig, SubmissionOutcome,
    SubmissionRateLimiter, SubmissionReport, SubmitControl,
};
use crate::i18n::{Language, LanguageManager, LanguageStrings, PageChrome};
use crate::news::{ContentSource, NewsCard};
use crate::security::{constant_time_compare, generate_csrf_token};
use crate::storage::{PreferenceStore, StoreError, PREFERRED_LANGUAGE_KEY};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Sessions older than this are dropped when new ones are created.
const SESSION_TTL_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Upper bound on live sessions; the oldest is evicted to make room.
pub const MAX_SESSIONS: usize = 10_000;

// ==================== State ====================

/// Per-visitor server state.
#[derive(Debug)]
pub struct Session {
    csrf_token: String,
    created_at: i64,
    limiter: std::sync::Mutex<SubmissionRateLimiter>,
    control: SubmitControl,
}

impl Session {
    fn new(csrf_token: String, limits: RateLimiterConfig, now_millis: i64) -> Self {
        Self {
            csrf_token,
            created_at: now_millis,
            limiter: std::sync::Mutex::new(SubmissionRateLimiter::new(limits)),
            control: SubmitControl::new(),
        }
    }
}

pub struct AppState {
    pub config: Config,
    pub content: ContentSource,
    pub transport: ContactTransport,
    sessions: Mutex<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
}

impl AppState {
    pub fn new(config: Config, content: ContentSource, transport: ContactTransport) -> Self {
        Self {
            config,
            content,
            transport,
            sessions: Mutex::new(HashMap::new()),
            max_sessions: MAX_SESSIONS,
        }
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn rate_limits(&self) -> RateLimiterConfig {
        RateLimiterConfig::new(
            self.config.rate_limit_max_submissions,
            self.config.rate_limit_window,
        )
    }

    async fn create_session(&self, now_millis: i64) -> anyhow::Result<String> {
        let token = generate_csrf_token()?;
        let session = Arc::new(Session::new(token.clone(), self.rate_limits(), now_millis));

        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| now_millis - s.created_at < SESSION_TTL_MILLIS);
        if sessions.len() < before {
            debug!("Expired {} sessions", before - sessions.len());
        }

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, s)| s.created_at)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
            debug!("Session limit reached, evicted the oldest session");
        }
        sessions.insert(token.clone(), session);

        Ok(token)
    }

    /// The session issued with `token`. The stored token is compared again
    /// in constant time before it is trusted.
    async fn find_session(&self, token: &str) -> Option<Arc<Session>> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(token)
            .filter(|s| constant_time_compare(&s.csrf_token, token))
            .cloned()
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/session", post(create_session))
        .route("/api/language", get(current_language))
        .route("/api/language/toggle", post(toggle_language))
        .route("/api/news", get(news))
        .route("/api/contact", post(contact))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Language cookie ====================

/// Preference store backed by the request's cookie jar.
///
/// Writes are added to the jar and reach the browser as `Set-Cookie`
/// headers when the jar is returned from a handler.
#[derive(Debug, Clone)]
pub struct CookieStore {
    jar: CookieJar,
}

impl CookieStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl PreferenceStore for CookieStore {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|cookie| cookie.value().to_string())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let cookie = Cookie::build((key.to_string(), value.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .permanent()
            .build();
        self.jar = self.jar.clone().add(cookie);
        Ok(())
    }
}

fn request_language(jar: &CookieJar) -> Language {
    LanguageManager::restore(CookieStore::new(jar.clone())).get()
}

// ==================== Responses ====================

/// A localized error body: `{"error": "..."}`.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    csrf_token: String,
    language: Language,
}

#[derive(Debug, Serialize)]
struct LanguageResponse {
    language: Language,
    chrome: PageChrome,
}

#[derive(Debug, Serialize)]
struct NewsResponse {
    language: Language,
    cards: Vec<NewsCard>,
}

#[derive(Debug, Deserialize)]
struct ContactRequest {
    csrf_token: String,
    fields: Vec<FormField>,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn outcome_status(outcome: SubmissionOutcome) -> StatusCode {
    match outcome {
        SubmissionOutcome::Accepted => StatusCode::OK,
        SubmissionOutcome::RejectedValidation => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionOutcome::RejectedInProgress => StatusCode::CONFLICT,
        SubmissionOutcome::RejectedRateLimited => StatusCode::TOO_MANY_REQUESTS,
        SubmissionOutcome::RejectedTransport => StatusCode::BAD_GATEWAY,
    }
}

// ==================== Handlers ====================

async fn health() -> &'static str {
    "OK"
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<SessionResponse>, ApiError> {
    let token = state.create_session(now_millis()).await.map_err(|e| {
        error!("Failed to create session: {:#}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session")
    })?;

    Ok(Json(SessionResponse {
        csrf_token: token,
        language: request_language(&jar),
    }))
}

async fn current_language(jar: CookieJar) -> Json<LanguageResponse> {
    let language = request_language(&jar);
    Json(LanguageResponse {
        language,
        chrome: PageChrome::for_language(language),
    })
}

async fn toggle_language(
    jar: CookieJar,
) -> Result<(CookieJar, Json<LanguageResponse>), ApiError> {
    let mut manager = LanguageManager::restore(CookieStore::new(jar));
    let language = manager.toggle().map_err(|e| {
        error!("Failed to persist language: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to switch language")
    })?;
    debug!("Set {} cookie to {}", PREFERRED_LANGUAGE_KEY, language);

    Ok((
        manager.into_store().into_jar(),
        Json(LanguageResponse {
            language,
            chrome: PageChrome::for_language(language),
        }),
    ))
}

async fn news(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<NewsResponse>, ApiError> {
    let language = request_language(&jar);

    let entries = state
        .content
        .load_recent(state.config.news_limit)
        .await
        .map_err(|e| {
            warn!("News unavailable: {}", e);
            ApiError::new(
                StatusCode::BAD_GATEWAY,
                LanguageStrings::for_language(language).news_unavailable,
            )
        })?;

    let cards = entries
        .iter()
        .map(|entry| NewsCard::render(entry, language, state.config.news_excerpt_length))
        .collect();

    Ok(Json(NewsResponse { language, cards }))
}

async fn contact(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<SubmissionReport>), ApiError> {
    let language = request_language(&jar);
    let strings = LanguageStrings::for_language(language);

    let Some(session) = state.find_session(&request.csrf_token).await else {
        warn!("Contact submission with unknown session token");
        return Err(ApiError::new(StatusCode::FORBIDDEN, strings.invalid_session));
    };

    let mut form = ContactForm::new(request.fields);
    let report = submit(
        &mut form,
        &session.limiter,
        &session.control,
        &state.transport,
        language,
        now_millis(),
    )
    .await;

    info!("Contact submission finished: {:?}", report.outcome);
    Ok((outcome_status(report.outcome), Json(report)))
}
