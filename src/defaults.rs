//! Fallback values for fields the LINE schema cannot resolve
//!
//! Extractors never invent a value on their own: whenever a column is missing,
//! NULL or unparsable they ask the injected [`DefaultsProvider`].

use crate::models::{Address, CallMediaType, ReadStatus, Recipients};

/// Time reported when a source timestamp cannot be resolved
pub const UNKNOWN_TIME: i64 = -1;

/// One method per fallback-able field.
///
/// Every method has a default so a provider only overrides what it knows.
pub trait DefaultsProvider {
    /// Sender when the row does not name one
    fn from_address(&self) -> Option<Address> {
        None
    }

    /// Recipients when the row does not name them
    fn to_address(&self) -> Option<Recipients> {
        None
    }

    /// Callee of a call when the row does not name one
    fn call_to_address(&self) -> Option<Address> {
        None
    }

    /// Message time when `created_time` is absent or unparsable
    fn message_timestamp(&self) -> i64 {
        UNKNOWN_TIME
    }

    /// LINE does not record read state
    fn read_status(&self) -> ReadStatus {
        ReadStatus::Unknown
    }

    /// LINE messages have no subject
    fn subject(&self) -> Option<String> {
        None
    }

    /// Thread for a one-to-one conversation with `counterpart`
    fn thread_id(&self, counterpart: Option<&Address>) -> Option<String> {
        counterpart.map(|address| address.id.clone())
    }

    /// Call start when `start_time` is absent or unparsable
    fn call_start_time(&self) -> i64 {
        UNKNOWN_TIME
    }

    /// Call end when `end_time` is absent or unparsable
    fn call_end_time(&self) -> i64 {
        UNKNOWN_TIME
    }

    /// Call media when `voip_type` is not a known code
    fn call_media_type(&self) -> CallMediaType {
        CallMediaType::Unknown
    }

    /// Contact phone number
    fn phone(&self) -> Option<String> {
        None
    }

    /// Contact home phone number
    fn home_phone(&self) -> Option<String> {
        None
    }

    /// Contact mobile phone number
    fn mobile_phone(&self) -> Option<String> {
        None
    }

    /// Contact email address
    fn email(&self) -> Option<String> {
        None
    }
}

/// Resolves unknown parties to the device owner, when one is configured
#[derive(Debug, Clone, Default)]
pub struct OwnerDefaults {
    owner: Option<Address>,
}

impl OwnerDefaults {
    /// Defaults that attribute unresolved parties to `owner`
    #[must_use]
    pub const fn with_owner(owner: Address) -> Self {
        Self { owner: Some(owner) }
    }

    /// The configured device owner
    #[must_use]
    pub const fn owner(&self) -> Option<&Address> {
        self.owner.as_ref()
    }
}

impl DefaultsProvider for OwnerDefaults {
    fn from_address(&self) -> Option<Address> {
        self.owner.clone()
    }

    fn to_address(&self) -> Option<Recipients> {
        self.owner.clone().map(Recipients::Single)
    }

    fn call_to_address(&self) -> Option<Address> {
        self.owner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_owner_parties_are_absent() {
        let defaults = OwnerDefaults::default();
        assert_eq!(defaults.from_address(), None);
        assert_eq!(defaults.to_address(), None);
        assert_eq!(defaults.message_timestamp(), UNKNOWN_TIME);
        assert_eq!(defaults.call_media_type(), CallMediaType::Unknown);
        assert_eq!(defaults.read_status(), ReadStatus::Unknown);
    }

    #[test]
    fn test_owner_fills_both_sides() {
        let owner = Address::new("u-owner", "Me");
        let defaults = OwnerDefaults::with_owner(owner.clone());
        assert_eq!(defaults.from_address(), Some(owner.clone()));
        assert_eq!(defaults.call_to_address(), Some(owner.clone()));
        assert_eq!(defaults.to_address(), Some(Recipients::Single(owner)));
    }

    #[test]
    fn test_thread_id_follows_counterpart() {
        let defaults = OwnerDefaults::default();
        let peer = Address::new("u-peer", "Peer");
        assert_eq!(defaults.thread_id(Some(&peer)).as_deref(), Some("u-peer"));
        assert_eq!(defaults.thread_id(None), None);
    }
}
