//! Keys the application itself writes.

use std::fmt::{Display, Formatter};

/// Well-known store keys. Incidental keys outside this set are still valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    BankAccounts,
    Transactions,
    Investments,
    Budgets,
    Categories,
    Reports,
    UserProfile,
    Settings,
    Goals,
    RecurringTransactions,
    Theme,
    CustomColors,
}

impl StorageKey {
    pub const ALL: [StorageKey; 12] = [
        Self::BankAccounts,
        Self::Transactions,
        Self::Investments,
        Self::Budgets,
        Self::Categories,
        Self::Reports,
        Self::UserProfile,
        Self::Settings,
        Self::Goals,
        Self::RecurringTransactions,
        Self::Theme,
        Self::CustomColors,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BankAccounts => "bankAccounts",
            Self::Transactions => "transactions",
            Self::Investments => "investments",
            Self::Budgets => "budgets",
            Self::Categories => "categories",
            Self::Reports => "reports",
            Self::UserProfile => "userProfile",
            Self::Settings => "settings",
            Self::Goals => "financialGoals",
            Self::RecurringTransactions => "recurringTransactions",
            Self::Theme => "themeMode",
            Self::CustomColors => "customColors",
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
