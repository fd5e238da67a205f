//! Admin panel controller: view switching, the persisted login, and the
//! dashboard actions. Rendering is the host page's job; this module owns
//! the state those views are drawn from.

use crate::api::Api;
use crate::auth;
use crate::error::ClientError;
use crate::models::{Comment, Plan, Site, User};
use crate::moderation;
use crate::sites;
use crate::widget::CONTAINER_ID;
use std::sync::Mutex;

/// Where the logged-in user (id, name, email, plan; never the hash) is
/// persisted between page loads. Presence alone grants dashboard access;
/// there is no server-side revalidation. The trait seam exists so a
/// server-validated token store can replace this without touching callers.
pub trait SessionStore {
    fn save(&self, user: &User);
    fn load(&self) -> Option<User>;
    fn clear(&self);
}

#[derive(Default)]
pub struct MemorySessionStore {
    user: Mutex<Option<User>>,
}

impl SessionStore for MemorySessionStore {
    fn save(&self, user: &User) {
        *self.user.lock().unwrap() = Some(user.clone());
    }

    fn load(&self) -> Option<User> {
        self.user.lock().unwrap().clone()
    }

    fn clear(&self) {
        *self.user.lock().unwrap() = None;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum View {
    Login,
    Signup,
    Dashboard,
}

#[derive(Debug)]
pub enum AddSite {
    Created(Site),
    /// Plan allowance exhausted; the panel opens the upgrade flow instead
    /// of showing a plain error.
    NeedsUpgrade,
}

pub struct Panel<S: SessionStore> {
    api: Api,
    store: S,
    view: View,
    user: Option<User>,
}

impl<S: SessionStore> Panel<S> {
    /// `api` points at the gateway.
    pub fn new(api: Api, store: S) -> Self {
        Panel {
            api,
            store,
            view: View::Login,
            user: None,
        }
    }

    /// Restores a persisted login on page load.
    pub fn check_auth(&mut self) -> View {
        match self.store.load() {
            Some(user) => {
                self.user = Some(user);
                self.view = View::Dashboard;
            }
            None => self.view = View::Login,
        }
        self.view
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn show(&mut self, view: View) {
        self.view = view;
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let mut user = auth::login(&self.api, email, password).await?;
        user.password_hash = None;
        self.store.save(&user);
        self.user = Some(user);
        self.view = View::Dashboard;
        Ok(())
    }

    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), ClientError> {
        if password != confirm_password {
            return Err(ClientError::validation("Passwords do not match."));
        }

        let user = auth::signup(&self.api, name, email, password).await?;
        self.store.save(&user);
        self.user = Some(user);
        self.view = View::Dashboard;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.store.clear();
        self.view = View::Login;
    }

    pub async fn sites(&self) -> Vec<Site> {
        match &self.user {
            Some(user) => sites::get_sites(&self.api, user.id).await,
            None => Vec::new(),
        }
    }

    pub async fn add_site(&self, site_url: &str, site_name: &str) -> Result<AddSite, ClientError> {
        let user = self.user.as_ref().ok_or(ClientError::Auth)?;
        match sites::create_site(&self.api, user.id, site_url, site_name).await {
            Ok(site) => Ok(AddSite::Created(site)),
            Err(ClientError::PlanLimit { .. }) => Ok(AddSite::NeedsUpgrade),
            Err(e) => Err(e),
        }
    }

    pub async fn remove_site(&self, site_id: i64) -> Result<(), ClientError> {
        sites::delete_site(&self.api, site_id).await
    }

    pub async fn pending_comments(&self) -> Vec<Comment> {
        match &self.user {
            Some(user) => moderation::get_pending_comments(&self.api, user.id).await,
            None => Vec::new(),
        }
    }

    pub async fn approve(&self, comment_id: i64) -> Result<(), ClientError> {
        moderation::approve_comment(&self.api, comment_id).await
    }

    pub async fn reject(&self, comment_id: i64) -> Result<(), ClientError> {
        moderation::reject_comment(&self.api, comment_id).await
    }

    /// Flips the session user to the paid plan and persists the change so
    /// the dashboard badge updates on the next render.
    pub async fn upgrade(&mut self, payment_proof: &str) -> Result<(), ClientError> {
        if payment_proof.trim().is_empty() {
            return Err(ClientError::validation(
                "Paste the transaction code or email from your payment.",
            ));
        }

        let user = self.user.as_mut().ok_or(ClientError::Auth)?;
        sites::upgrade_plan(&self.api, user.id, payment_proof).await?;
        user.plan = Plan::Paid;
        self.store.save(user);
        Ok(())
    }
}

pub fn plan_badge(plan: Plan) -> &'static str {
    if plan.is_supporter() {
        "Supporter"
    } else {
        "Free"
    }
}

/// The copy-paste snippet a site owner drops into their pages.
pub fn embed_snippet(widget_url: &str, site: &Site) -> String {
    format!(
        "<div id=\"{}\"></div>\n<script async src=\"{}\" data-api-key=\"{}\"></script>",
        CONTAINER_ID, widget_url, site.api_key
    )
}
