//! Route table and handlers.

use std::path::PathBuf;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ApiResult, AppState};
use crate::analyzer::ProjectSummary;
use crate::workflow::article::{
    ArticleListItem, ArticleRecord, ArticleUpdate, SocialPosts, TagSuggestion, Topic,
};
use crate::workflow::Health;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/topics", post(topics))
        .route("/api/write", post(write))
        .route("/api/titles", post(titles))
        .route("/api/revise", post(revise))
        .route("/api/social-posts", post(social_posts))
        .route("/api/tags", post(tags))
        .route("/api/save", post(save))
        .route("/api/articles", get(articles_list))
        .route(
            "/api/articles/{id}",
            get(articles_get).put(articles_update).delete(articles_delete),
        )
        .with_state(state)
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_topic_count() -> usize {
    5
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(state.orchestrator.health())
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    /// Local directory or remote git URL.
    path: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    session_id: String,
    analysis: ProjectSummary,
}

async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let (session_id, analysis) = state.orchestrator.analyze(&req.path).await?;
    Ok(Json(AnalyzeResponse { session_id, analysis }))
}

#[derive(Deserialize)]
struct TopicsRequest {
    session_id: String,
    #[serde(default = "default_topic_count")]
    topic_count: usize,
    #[serde(default = "default_language")]
    language: String,
}

async fn topics(
    State(state): State<AppState>,
    Json(req): Json<TopicsRequest>,
) -> ApiResult<Json<Value>> {
    let topics: Vec<Topic> = state
        .orchestrator
        .generate_topics(&req.session_id, req.topic_count, &req.language)
        .await?;
    Ok(Json(json!({ "topics": topics })))
}

#[derive(Deserialize)]
struct WriteRequest {
    session_id: String,
    topic_index: i64,
    #[serde(default = "default_language")]
    language: String,
}

#[derive(Serialize)]
struct WriteResponse {
    article_id: String,
    article: ArticleRecord,
}

async fn write(
    State(state): State<AppState>,
    Json(req): Json<WriteRequest>,
) -> ApiResult<Json<WriteResponse>> {
    let article = state
        .orchestrator
        .write_article(&req.session_id, req.topic_index, &req.language)
        .await?;
    Ok(Json(WriteResponse { article_id: article.id.clone(), article }))
}

#[derive(Deserialize)]
struct TitlesRequest {
    markdown: String,
    #[serde(default = "default_language")]
    language: String,
}

async fn titles(
    State(state): State<AppState>,
    Json(req): Json<TitlesRequest>,
) -> ApiResult<Json<Value>> {
    let titles = state.orchestrator.suggest_titles(&req.markdown, &req.language).await?;
    Ok(Json(json!({ "titles": titles })))
}

#[derive(Deserialize)]
struct ReviseRequest {
    markdown: String,
    instruction: String,
    #[serde(default = "default_language")]
    language: String,
}

async fn revise(
    State(state): State<AppState>,
    Json(req): Json<ReviseRequest>,
) -> ApiResult<Json<Value>> {
    let revised = state
        .orchestrator
        .revise_article(&req.markdown, &req.instruction, &req.language)
        .await?;
    Ok(Json(json!({ "markdown": revised })))
}

#[derive(Deserialize)]
struct SocialPostsRequest {
    title: String,
    #[serde(default)]
    subtitle: String,
    markdown: String,
    article_url: String,
    #[serde(default = "default_language")]
    language: String,
}

async fn social_posts(
    State(state): State<AppState>,
    Json(req): Json<SocialPostsRequest>,
) -> ApiResult<Json<Value>> {
    let posts: SocialPosts = state
        .orchestrator
        .generate_social_posts(
            &req.title,
            &req.subtitle,
            &req.markdown,
            &req.article_url,
            &req.language,
        )
        .await?;
    Ok(Json(json!({ "posts": posts })))
}

async fn tags(
    State(state): State<AppState>,
    Json(req): Json<TitlesRequest>,
) -> ApiResult<Json<Value>> {
    let tags: Vec<TagSuggestion> =
        state.orchestrator.suggest_tags(&req.markdown, &req.language).await?;
    Ok(Json(json!({ "tags": tags })))
}

#[derive(Deserialize)]
struct SaveRequest {
    markdown: String,
    output_path: PathBuf,
}

async fn save(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> ApiResult<Json<Value>> {
    let path = state.orchestrator.save_to_path(&req.markdown, &req.output_path)?;
    Ok(Json(json!({ "success": true, "path": path })))
}

async fn articles_list(State(state): State<AppState>) -> Json<Value> {
    let articles: Vec<ArticleListItem> = state.orchestrator.store().list();
    Json(json!({ "articles": articles }))
}

async fn articles_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let article = state.orchestrator.store().get(&id)?;
    Ok(Json(json!({ "article": article })))
}

async fn articles_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ArticleUpdate>,
) -> ApiResult<Json<Value>> {
    let article = state.orchestrator.store().update(&id, update)?;
    Ok(Json(json!({ "success": true, "article": article })))
}

async fn articles_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.orchestrator.store().delete(&id)?;
    Ok(Json(json!({ "success": true })))
}
