//! Embeddable widget logic.
//!
//! One page load walks site resolution, thread resolution and the visible
//! comment read in order; the first unrecoverable failure becomes a static
//! error view and nothing is retried. The host shell owns the DOM; this
//! module only produces [`WidgetView`] values.

pub mod submit;

pub use submit::{CommentForm, SubmitThrottle};

use crate::api::{encode, Api};
use crate::cache::{Clock, SiteCache, SystemClock};
use crate::error::ClientError;
use crate::models::{Comment, Plan, ReadResponse, Site};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Element id the embedding page provides next to the script tag.
pub const CONTAINER_ID: &str = "murmur-comments";

/// How long the embedding shell keeps the post-submit confirmation visible.
pub const CONFIRMATION_SECS: u64 = 5;

const IP_ECHO_URL: &str = "https://api.ipify.org?format=json";
const IP_FALLBACK: &str = "0.0.0.0";

/// Where on the host site the widget woke up.
#[derive(Clone, Debug)]
pub struct PageContext {
    /// `window.location.pathname` equivalent.
    pub path: String,
    /// Document title, stored on the thread when one is created.
    pub title: String,
}

#[derive(Debug)]
pub enum WidgetView {
    Ready {
        thread_id: i64,
        /// Newest first, at most 50. Empty means "be the first to comment".
        comments: Vec<Comment>,
        /// Owner is on the paid plan; the shell shows the supporter badge.
        supporter: bool,
    },
    Failed {
        message: String,
    },
}

pub struct Widget {
    api: Api,
    api_key: String,
    cache: SiteCache,
    throttle: SubmitThrottle,
    ip_echo_url: String,
}

impl Widget {
    /// `api` points directly at the data service; the widget's reads are
    /// public and carry no credential.
    pub fn new(api: Api, api_key: impl Into<String>) -> Self {
        Self::with_clock(api, api_key, Arc::new(SystemClock))
    }

    pub fn with_clock(api: Api, api_key: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Widget {
            cache: SiteCache::with_default_ttl(clock.clone()),
            throttle: SubmitThrottle::new(clock),
            api,
            api_key: api_key.into(),
            ip_echo_url: IP_ECHO_URL.to_owned(),
        }
    }

    pub fn with_ip_echo_url(mut self, url: impl Into<String>) -> Self {
        self.ip_echo_url = url.into();
        self
    }

    /// The page-load flow. Terminal on first success or first failure.
    pub async fn load(&self, page: &PageContext) -> WidgetView {
        match self.try_load(page).await {
            Ok(view) => view,
            Err(e) => {
                log::error!("widget load: {}", e);
                WidgetView::Failed {
                    message: failure_message(&e),
                }
            }
        }
    }

    async fn try_load(&self, page: &PageContext) -> Result<WidgetView, ClientError> {
        let site = self.resolve_site().await?;
        let plan = self.owner_plan(site.user_id).await?;
        let thread_id = find_or_create_thread(&self.api, site.id, page).await?;
        let comments = self.load_comments(thread_id).await?;

        Ok(WidgetView::Ready {
            thread_id,
            comments,
            supporter: plan.is_supporter(),
        })
    }

    /// Cache-fronted key lookup. The data service cannot filter on
    /// `api_key`, so a miss scans the site table.
    async fn resolve_site(&self) -> Result<Site, ClientError> {
        if let Some(site) = self.cache.get(&self.api_key) {
            return Ok(site);
        }

        let found: ReadResponse<Site> = self
            .api
            .read("/read/sites?limit=100&includeTotal=true")
            .await?;
        let site = found
            .data
            .into_iter()
            .find(|s| s.api_key == self.api_key)
            .ok_or(ClientError::InvalidKey)?;

        self.cache.put(site.clone());
        Ok(site)
    }

    async fn owner_plan(&self, user_id: i64) -> Result<Plan, ClientError> {
        let found: ReadResponse<crate::models::User> = self
            .api
            .read(&format!("/read/users?id={}", user_id))
            .await?;
        Ok(found.data.into_iter().next().map(|u| u.plan).unwrap_or_default())
    }

    async fn load_comments(&self, thread_id: i64) -> Result<Vec<Comment>, ClientError> {
        let found: ReadResponse<Comment> = self
            .api
            .read(&format!(
                "/read/comments?thread_id={}&visible=1&sort=created_at&order=desc&limit=50&includeTotal=true",
                thread_id
            ))
            .await?;
        Ok(found.data)
    }

    /// Repeatable submit action, throttled client-side to one comment per
    /// three seconds. New comments are invisible until a moderator
    /// approves them.
    pub async fn submit_comment(
        &self,
        thread_id: i64,
        form: &CommentForm,
    ) -> Result<(), ClientError> {
        self.throttle.begin()?;

        let ip_address = self.client_ip().await;
        self.api
            .create(
                "/create/comments",
                json!({
                    "thread_id": thread_id,
                    "author_name": form.author_name,
                    "author_email": form.author_email,
                    "message": form.message,
                    "ip_address": ip_address,
                    "visible": false,
                }),
            )
            .await?;
        Ok(())
    }

    /// Best-effort public IP for the moderation view. Any failure falls
    /// back to the sentinel; submission is never blocked on this.
    async fn client_ip(&self) -> String {
        #[derive(Deserialize)]
        struct IpEcho {
            ip: String,
        }

        let sent = self.api.http().get(self.ip_echo_url.as_str()).send().await;
        match sent {
            Ok(mut response) if response.status().is_success() => {
                match response.json::<IpEcho>().await {
                    Ok(echo) => echo.ip,
                    Err(_) => IP_FALLBACK.to_owned(),
                }
            }
            _ => IP_FALLBACK.to_owned(),
        }
    }
}

/// Read-then-create on (site, page path). A racing page load can insert a
/// duplicate thread, which only fragments comment counts; kept behind one
/// function so an atomic create-if-absent could replace it.
pub async fn find_or_create_thread(
    api: &Api,
    site_id: i64,
    page: &PageContext,
) -> Result<i64, ClientError> {
    let found: ReadResponse<crate::models::Thread> = api
        .read(&format!(
            "/read/threads?site_id={}&page_identifier={}&includeTotal=true",
            site_id,
            encode(&page.path)
        ))
        .await?;
    if let Some(thread) = found.data.into_iter().next() {
        return Ok(thread.id);
    }

    let created = api
        .create(
            "/create/threads",
            json!({
                "site_id": site_id,
                "page_identifier": page.path,
                "page_title": page.title,
            }),
        )
        .await?;
    Ok(created.id)
}

fn failure_message(error: &ClientError) -> String {
    let mut message = String::from("Comments could not be loaded.");
    match error {
        ClientError::InvalidKey => message.push_str(" Check that the API key is correct."),
        ClientError::Network => message.push_str(" Check your internet connection."),
        _ => {}
    }
    message
}
