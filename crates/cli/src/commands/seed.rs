//! Seed the database with development data.
//!
//! Creates a shopper profile with two saved addresses so checkout can be
//! exercised locally without going through the account page first.

use tracing::info;

use greengrocer_core::{AddressId, UserId, ZipCode};
use greengrocer_storefront::db::{self, PgStore, StorefrontStore};
use greengrocer_storefront::models::{Address, UserProfile};

use super::{CommandError, database_url};

/// Sample addresses: (id, street, city, state, zip, `is_default`).
const SAMPLE_ADDRESSES: &[(&str, &str, &str, &str, &str, bool)] = &[
    ("addr1", "123 Market St", "Greenfield", "CA", "90210", true),
    ("addr2", "456 Orchard Ave", "Greenfield", "CA", "90210", false),
];

/// Build the sample address book.
fn sample_addresses() -> Result<Vec<Address>, CommandError> {
    SAMPLE_ADDRESSES
        .iter()
        .map(|&(id, street, city, state, zip, is_default)| {
            let zip = ZipCode::parse(zip).map_err(|e| CommandError::InvalidArgument(e.to_string()))?;
            Ok(Address {
                id: AddressId::new(id),
                street: street.to_owned(),
                city: city.to_owned(),
                state: state.to_owned(),
                zip,
                is_default,
            })
        })
        .collect()
}

/// Create a shopper profile.
///
/// # Errors
///
/// Returns an error if the uid is blank, the database is unreachable, or a
/// profile with this uid already exists.
pub async fn profile(
    uid: &str,
    email: &str,
    name: Option<String>,
    with_addresses: bool,
) -> Result<(), CommandError> {
    let uid = uid.trim();
    if uid.is_empty() {
        return Err(CommandError::InvalidArgument("uid must not be blank".into()));
    }

    let pool = db::create_pool(&database_url()?).await?;
    let store = PgStore::new(pool);

    let mut profile = UserProfile::new(UserId::new(uid), email, name);
    if with_addresses {
        profile.addresses = sample_addresses()?;
    }
    store.create_profile(&profile).await?;

    info!(
        uid = %profile.uid,
        addresses = profile.addresses.len(),
        "Profile created"
    );
    Ok(())
}
