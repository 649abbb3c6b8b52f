//! Shopper account: profile, saved addresses and order history.

use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::db::{RepositoryError, StorefrontStore};
use crate::models::{Address, CurrentUser, UserProfile};
use crate::services::orders::{OrderHistory, order_history};

const MIN_DISPLAY_NAME_LEN: usize = 2;

/// Errors from account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Name must be at least 2 characters.")]
    InvalidDisplayName,

    #[error("profile not found")]
    ProfileNotFound,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Everything the account page shows.
#[derive(Debug, Clone, Serialize)]
pub struct AccountOverview {
    pub profile: UserProfile,
    pub orders: OrderHistory,
}

/// Load the profile for `user`, creating it on first visit.
///
/// # Errors
///
/// Returns `AccountError::Repository` if the store fails.
#[instrument(skip(store, user), fields(uid = %user.uid))]
pub async fn ensure_profile(
    store: &dyn StorefrontStore,
    user: &CurrentUser,
) -> Result<UserProfile, AccountError> {
    if let Some(profile) = store.get_profile(&user.uid).await? {
        return Ok(profile);
    }

    let profile = UserProfile::new(
        user.uid.clone(),
        user.email.clone().unwrap_or_default(),
        user.display_name.clone(),
    );
    match store.create_profile(&profile).await {
        Ok(()) => {
            tracing::info!("created profile");
            Ok(profile)
        }
        // Lost a race with a concurrent first visit.
        Err(RepositoryError::Conflict(_)) => store
            .get_profile(&user.uid)
            .await?
            .ok_or(AccountError::ProfileNotFound),
        Err(e) => Err(e.into()),
    }
}

/// Profile and order history, fetched concurrently.
///
/// # Errors
///
/// Returns `AccountError::Repository` if either read fails.
#[instrument(skip(store, user), fields(uid = %user.uid))]
pub async fn overview(
    store: &dyn StorefrontStore,
    user: &CurrentUser,
) -> Result<AccountOverview, AccountError> {
    let (profile, orders) = tokio::try_join!(
        ensure_profile(store, user),
        async { order_history(store, &user.uid).await.map_err(AccountError::from) },
    )?;
    Ok(AccountOverview { profile, orders })
}

/// Saved addresses in insertion order.
///
/// # Errors
///
/// Returns `AccountError::Repository` if the store fails.
pub async fn addresses(
    store: &dyn StorefrontStore,
    user: &CurrentUser,
) -> Result<Vec<Address>, AccountError> {
    Ok(ensure_profile(store, user).await?.addresses)
}

/// Change the shopper's display name.
///
/// # Errors
///
/// Returns `InvalidDisplayName` for names shorter than two characters after
/// trimming, `ProfileNotFound` if the shopper has no profile.
#[instrument(skip(store, user), fields(uid = %user.uid))]
pub async fn update_display_name(
    store: &dyn StorefrontStore,
    user: &CurrentUser,
    display_name: &str,
) -> Result<String, AccountError> {
    let display_name = display_name.trim();
    if display_name.chars().count() < MIN_DISPLAY_NAME_LEN {
        return Err(AccountError::InvalidDisplayName);
    }

    match store.update_display_name(&user.uid, display_name).await {
        Ok(()) => Ok(display_name.to_owned()),
        Err(RepositoryError::NotFound) => Err(AccountError::ProfileNotFound),
        Err(e) => Err(e.into()),
    }
}
