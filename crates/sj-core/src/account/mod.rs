//! Account domain models
//!
//! Typed views of the user, profile and transaction payloads returned by the
//! remote API. Wire names follow the API (`_id`, `profileName`, ...);
//! decoding is lenient about missing collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User snapshot returned by `GET /user/details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub phone_number: Option<u64>,
    #[serde(
        default,
        rename = "profilePicture",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, rename = "profile")]
    pub profiles: Vec<Profile>,
}

impl UserSnapshot {
    pub fn profile_at(&self, index: usize) -> Option<&Profile> {
        self.profiles.get(index)
    }

    /// Clamp a cached profile index to the profiles this user actually has.
    ///
    /// Returns `None` when the user has no profile at all.
    pub fn clamp_profile_index(&self, index: usize) -> Option<usize> {
        if self.profiles.is_empty() {
            None
        } else {
            Some(index.min(self.profiles.len() - 1))
        }
    }
}

/// A named sub-ledger of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub profile_name: String,
    #[serde(default)]
    pub profile_number: Option<u64>,
    #[serde(default, rename = "profileTotalCredit")]
    pub total_credit: f64,
    #[serde(default, rename = "profileTotalDebit")]
    pub total_debit: f64,
    #[serde(default, rename = "transactionCollection")]
    pub transaction_collections: Vec<TransactionCollection>,
    #[serde(default)]
    pub notification_collection: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Credit minus debit across the whole profile.
    pub fn net_balance(&self) -> f64 {
        self.total_credit - self.total_debit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCollection {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, rename = "transactionId")]
    pub transactions: Vec<LedgerTransaction>,
}

/// Running account with one partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTransaction {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, rename = "transactionPartnerName")]
    pub partner_name: String,
    #[serde(default, rename = "transactionPartnerPhoneNumber")]
    pub partner_phone_number: Option<u64>,
    #[serde(
        default,
        rename = "transactionPartnerProfilePicture",
        skip_serializing_if = "Option::is_none"
    )]
    pub partner_profile_picture: Option<String>,
    #[serde(default)]
    pub total_balance: f64,
    #[serde(default)]
    pub total_credit: f64,
    #[serde(default)]
    pub total_debit: f64,
    #[serde(default)]
    pub is_active: bool,
}

/// Response of `POST /transaction/transactions`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub data: Vec<LedgerTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_JSON: &str = r#"{
        "user_id": "u-1",
        "user_name": "Asha",
        "phone_number": 9876543210,
        "profilePicture": "https://cdn.example/a.png",
        "profile": [
            {
                "_id": "p-1",
                "userId": "u-1",
                "profileName": "Shop",
                "profileNumber": 1,
                "profileTotalCredit": 1500.5,
                "profileTotalDebit": 500,
                "transactionCollection": [
                    {
                        "_id": "c-1",
                        "transactionId": [
                            {
                                "_id": "t-1",
                                "transactionPartnerName": "Ravi",
                                "transactionPartnerPhoneNumber": 9000000000,
                                "totalBalance": 200,
                                "totalCredit": 300,
                                "totalDebit": 100,
                                "isActive": true
                            }
                        ]
                    }
                ],
                "notificationCollection": [],
                "createdAt": "2024-05-01T10:00:00Z"
            }
        ]
    }"#;

    #[test]
    fn decodes_user_snapshot_with_nested_transactions() {
        let user: UserSnapshot = serde_json::from_str(USER_JSON).unwrap();

        assert_eq!(user.user_name, "Asha");
        assert_eq!(user.profiles.len(), 1);
        let profile = &user.profiles[0];
        assert_eq!(profile.profile_name, "Shop");
        assert_eq!(profile.net_balance(), 1000.5);
        let tx = &profile.transaction_collections[0].transactions[0];
        assert_eq!(tx.partner_name, "Ravi");
        assert!(tx.is_active);
        assert!(profile.created_at.is_some());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let user: UserSnapshot =
            serde_json::from_str(r#"{"user_id":"u-2","user_name":"Dev"}"#).unwrap();

        assert!(user.profiles.is_empty());
        assert_eq!(user.clamp_profile_index(3), None);
    }

    #[test]
    fn clamp_profile_index_stays_in_range() {
        let user: UserSnapshot = serde_json::from_str(USER_JSON).unwrap();

        assert_eq!(user.clamp_profile_index(0), Some(0));
        assert_eq!(user.clamp_profile_index(7), Some(0));
        assert_eq!(user.profile_at(0).map(|p| p.id.as_str()), Some("p-1"));
    }
}
