//! 故事生成处理器

use axum::{extract::State, Json};
use bytes::Bytes;

use crate::gateway::state::AppState;
use crate::story::{write_story, StoryError, StoryRequest, StoryResponse};

/// POST /generate_story 处理器
///
/// 请求体按原始字节接收，由 [`StoryRequest::from_body`] 统一校验，
/// 这样空请求体和非法 JSON 都走 400 分支
pub async fn handle_generate_story(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StoryResponse>, StoryError> {
    let request = StoryRequest::from_body(&body)?;
    let story = write_story(state.provider(), &request, state.model_timeout()).await?;
    Ok(Json(StoryResponse::Story(story)))
}
