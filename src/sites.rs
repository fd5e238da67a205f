//! Site management: reads, creation with the per-plan allowance check, and
//! the plan upgrade.

use crate::api::Api;
use crate::error::ClientError;
use crate::models::{ReadResponse, Site, User};
use crate::validate;
use serde_json::json;

pub async fn find_user(api: &Api, user_id: i64) -> Result<Option<User>, ClientError> {
    let found: ReadResponse<User> = api.read(&format!("/read/users?id={}", user_id)).await?;
    Ok(found.data.into_iter().next())
}

/// Read operation with an empty-result fallback; callers render "no sites"
/// rather than an error page.
pub async fn get_sites(api: &Api, user_id: i64) -> Vec<Site> {
    match api
        .read::<Site>(&format!("/read/sites?user_id={}&includeTotal=true", user_id))
        .await
    {
        Ok(found) => found.data,
        Err(e) => {
            log::error!("get_sites: {}", e);
            Vec::new()
        }
    }
}

/// Owner lookup, allowance check, URL check, key generation, then the
/// create call, stopping at the first failure.
pub async fn create_site(
    api: &Api,
    user_id: i64,
    site_url: &str,
    site_name: &str,
) -> Result<Site, ClientError> {
    let user = find_user(api, user_id).await?.ok_or(ClientError::Auth)?;
    ensure_site_capacity(api, &user).await?;
    validate::site_url(site_url)?;

    let api_key = generate_api_key();
    let created = api
        .create(
            "/create/sites",
            json!({
                "user_id": user_id,
                "site_url": site_url,
                "site_name": site_name,
                "api_key": api_key,
            }),
        )
        .await?;

    Ok(Site {
        id: created.id,
        user_id,
        site_url: site_url.to_owned(),
        site_name: site_name.to_owned(),
        api_key,
    })
}

/// Count-then-create; two concurrent creations can both pass the count.
/// Kept behind one function so an atomic upstream check can replace it.
pub async fn ensure_site_capacity(api: &Api, user: &User) -> Result<(), ClientError> {
    let existing = get_sites(api, user.id).await;
    if existing.len() >= user.plan.site_limit() {
        Err(ClientError::PlanLimit { plan: user.plan })
    } else {
        Ok(())
    }
}

pub async fn delete_site(api: &Api, site_id: i64) -> Result<(), ClientError> {
    api.delete(&format!("/delete/sites/{}", site_id)).await?;
    Ok(())
}

/// Flips the owner to the paid plan. The payment proof is a free-form
/// transaction reference reviewed by hand; it rides along on the update.
pub async fn upgrade_plan(
    api: &Api,
    user_id: i64,
    payment_proof: &str,
) -> Result<(), ClientError> {
    api.update(
        &format!("/update/users/{}", user_id),
        json!({ "plan": "paid", "payment_proof": payment_proof }),
    )
    .await?;
    Ok(())
}

/// Opaque site token: `ic_<unix millis>_<9 alphanumerics>`. Uniqueness is
/// probabilistic, not enforced anywhere.
pub fn generate_api_key() -> String {
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("ic_{}_{}", chrono::Utc::now().timestamp_millis(), suffix)
}
