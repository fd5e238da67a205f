//! Moderation queue for site owners. Pending comments are resolved with a
//! three-stage fan-out (sites → threads → comments) because the data
//! service cannot join across tables.

use crate::api::Api;
use crate::error::ClientError;
use crate::models::{Comment, Thread};
use serde_json::json;

/// Newest-first pending comments across every site the user owns, capped
/// at 50. An empty intermediate stage short-circuits without further
/// calls; read failures degrade to an empty queue.
pub async fn get_pending_comments(api: &Api, user_id: i64) -> Vec<Comment> {
    let sites = crate::sites::get_sites(api, user_id).await;
    if sites.is_empty() {
        return Vec::new();
    }

    let site_ids = csv(sites.iter().map(|s| s.id));
    let threads: Vec<Thread> = match api
        .read(&format!(
            "/read/threads?site_id[in]={}&includeTotal=true",
            site_ids
        ))
        .await
    {
        Ok(found) => found.data,
        Err(e) => {
            log::error!("get_pending_comments: threads {}", e);
            return Vec::new();
        }
    };
    if threads.is_empty() {
        return Vec::new();
    }

    let thread_ids = csv(threads.iter().map(|t| t.id));
    match api
        .read::<Comment>(&format!(
            "/read/comments?visible=0&thread_id[in]={}&sort=created_at&order=desc&limit=50&includeTotal=true",
            thread_ids
        ))
        .await
    {
        Ok(found) => found.data,
        Err(e) => {
            log::error!("get_pending_comments: comments {}", e);
            Vec::new()
        }
    }
}

pub async fn approve_comment(api: &Api, comment_id: i64) -> Result<(), ClientError> {
    api.update(
        &format!("/update/comments/{}", comment_id),
        json!({ "visible": true }),
    )
    .await?;
    Ok(())
}

/// Rejection deletes outright; there is no soft-delete state.
pub async fn reject_comment(api: &Api, comment_id: i64) -> Result<(), ClientError> {
    api.delete(&format!("/delete/comments/{}", comment_id)).await?;
    Ok(())
}

fn csv(ids: impl Iterator<Item = i64>) -> String {
    ids.map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}
