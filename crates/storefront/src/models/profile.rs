//! User profile domain type.

use serde::{Deserialize, Serialize};

use greengrocer_core::{AddressId, UserId};

use super::Address;

/// Server-of-record profile for an authenticated shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identifier issued by the authentication provider.
    pub uid: UserId,
    pub email: String,
    pub display_name: String,
    /// Saved addresses in insertion order.
    pub addresses: Vec<Address>,
}

impl UserProfile {
    /// Display name given to profiles created without one.
    pub const DEFAULT_DISPLAY_NAME: &'static str = "New User";

    /// A fresh profile with no saved addresses.
    #[must_use]
    pub fn new(uid: UserId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            uid,
            email: email.into(),
            display_name: display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| Self::DEFAULT_DISPLAY_NAME.to_owned()),
            addresses: Vec::new(),
        }
    }

    /// Look up a saved address by id.
    #[must_use]
    pub fn find_address(&self, id: &AddressId) -> Option<&Address> {
        self.addresses.iter().find(|address| &address.id == id)
    }

    /// The address flagged as default, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|address| address.is_default)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use greengrocer_core::ZipCode;

    use super::*;

    fn address(id: &str, is_default: bool) -> Address {
        Address {
            id: AddressId::new(id),
            street: "123 Market St".to_owned(),
            city: "Greenfield".to_owned(),
            state: "CA".to_owned(),
            zip: ZipCode::parse("90210").unwrap(),
            is_default,
        }
    }

    #[test]
    fn test_new_profile_defaults_display_name() {
        let profile = UserProfile::new(UserId::new("u1"), "a@b.c", Some("  ".to_owned()));
        assert_eq!(profile.display_name, "New User");
        assert!(profile.addresses.is_empty());
    }

    #[test]
    fn test_find_and_default_address() {
        let mut profile = UserProfile::new(UserId::new("u1"), "a@b.c", None);
        profile.addresses = vec![address("addr1", true), address("addr2", false)];

        assert_eq!(
            profile.find_address(&AddressId::new("addr2")).unwrap().id,
            AddressId::new("addr2")
        );
        assert!(profile.find_address(&AddressId::new("nope")).is_none());
        assert_eq!(
            profile.default_address().unwrap().id,
            AddressId::new("addr1")
        );
    }
}
