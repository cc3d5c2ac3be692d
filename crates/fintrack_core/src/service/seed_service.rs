//! First-run defaults for the finance data keys.
//!
//! # Invariants
//! - Only absent or empty keys are written; non-empty data is never overwritten.

use crate::store::{Store, StoreResult, StorageKey, StoredValue};
use log::info;
use serde_json::{json, Value};

const DEFAULT_CATEGORIES: [&str; 13] = [
    "Food",
    "Shopping",
    "Utilities",
    "Salary",
    "Transportation",
    "Entertainment",
    "Freelance",
    "Housing",
    "Healthcare",
    "Education",
    "Investments",
    "Savings",
    "Personal",
];

fn default_bank_accounts() -> Value {
    json!([
        {
            "id": 1,
            "name": "HDFC Bank",
            "type": "Savings",
            "balance": 0,
            "accountNumber": "XXXX1234",
            "ifsc": "HDFC0001234"
        },
        {
            "id": 2,
            "name": "SBI Bank",
            "type": "Current",
            "balance": 0,
            "accountNumber": "XXXX5678",
            "ifsc": "SBIN0005678"
        }
    ])
}

fn default_for(key: StorageKey) -> Option<Value> {
    match key {
        StorageKey::Categories => Some(json!(DEFAULT_CATEGORIES)),
        StorageKey::BankAccounts => Some(default_bank_accounts()),
        StorageKey::Transactions | StorageKey::Investments | StorageKey::Budgets => {
            Some(json!([]))
        }
        _ => None,
    }
}

/// Seeds missing finance keys and returns the keys that were written.
pub fn initialize_default_data<S: Store>(store: &S) -> StoreResult<Vec<StorageKey>> {
    let mut seeded = Vec::new();
    for key in StorageKey::ALL {
        let Some(value) = default_for(key) else {
            continue;
        };
        let present = store
            .get(key.as_str())?
            .is_some_and(|text| !text.is_empty());
        if present {
            continue;
        }
        store.set_value(key.as_str(), &StoredValue::Json(value))?;
        seeded.push(key);
    }

    if !seeded.is_empty() {
        info!("event=seed_defaults module=seed status=ok keys={}", seeded.len());
    }
    Ok(seeded)
}
