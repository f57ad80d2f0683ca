//! Member record types
//!
//! `MemberRecord` is the authoritative row shape owned by the record store.
//! The search index holds a projection of it and may lag behind; the record
//! store always reflects the true state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A member as persisted in the record store.
///
/// `id` is assigned by the store and immutable afterwards. Records are never
/// physically deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub zipcode: Option<String>,
    pub address: Option<String>,
    pub detail_address: Option<String>,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// Fields supplied when registering a member.
#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub zipcode: Option<String>,
    pub address: Option<String>,
    pub detail_address: Option<String>,
    pub interests: Vec<String>,
}

/// A partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub zipcode: Option<String>,
    pub address: Option<String>,
    pub detail_address: Option<String>,
    pub interests: Option<Vec<String>>,
}

impl MemberPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.zipcode.is_none()
            && self.address.is_none()
            && self.detail_address.is_none()
            && self.interests.is_none()
    }

    /// Apply the patch to a record, leaving unset fields intact.
    pub fn apply(&self, record: &mut MemberRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(phone) = &self.phone_number {
            record.phone_number = Some(phone.clone());
        }
        if let Some(zipcode) = &self.zipcode {
            record.zipcode = Some(zipcode.clone());
        }
        if let Some(address) = &self.address {
            record.address = Some(address.clone());
        }
        if let Some(detail) = &self.detail_address {
            record.detail_address = Some(detail.clone());
        }
        if let Some(interests) = &self.interests {
            record.interests = interests.clone();
        }
    }
}
