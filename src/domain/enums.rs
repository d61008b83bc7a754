//! Enumerated catalogs: categories, payment methods, investment types,
//! recurrences and report filters.
//!
//! Every catalog is stored and serialised by its upper-case code and carries a
//! human-readable label and description for the `/api/enums` endpoints.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("invalid {kind} code: {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}

/// One catalog entry as exposed by the enums endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnumOption {
    pub value: String,
    pub label: String,
    pub description: String,
}

macro_rules! catalog {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => ($code:literal, $label:literal, $description:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $code)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $($name::$variant => $description),+
                }
            }

            pub fn options() -> Vec<EnumOption> {
                Self::ALL
                    .iter()
                    .map(|item| EnumOption {
                        value: item.code().to_string(),
                        label: item.label().to_string(),
                        description: item.description().to_string(),
                    })
                    .collect()
            }
        }

        impl FromStr for $name {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|item| item.code() == s)
                    .ok_or_else(|| UnknownCode { kind: $kind, code: s.to_string() })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

catalog! {
    IncomeCategory, "income category" {
        Salary => ("SALARY", "Salary", "Fixed monthly pay from employment"),
        Freelance => ("FREELANCE", "Freelance", "Self-employed work and one-off projects"),
        Business => ("BUSINESS", "Own Business", "Profits from a company or sole proprietorship"),
        Dividends => ("DIVIDENDS", "Dividends", "Payouts from stocks and real estate funds"),
        Interest => ("INTEREST", "Interest", "Fixed income yields"),
        Rental => ("RENTAL", "Rental", "Income from rented property"),
        Bonus => ("BONUS", "Bonus", "Bonuses, profit sharing and commissions"),
        Gift => ("GIFT", "Gift", "Money received as a gift"),
        Refund => ("REFUND", "Refund", "Returns and reimbursements"),
        Sale => ("SALE", "Sale", "Sale of personal belongings"),
        Other => ("OTHER", "Other", "Other sources of income"),
    }
}

catalog! {
    ExpenseCategory, "expense category" {
        Housing => ("HOUSING", "Housing", "Rent, building fees, property tax"),
        Utilities => ("UTILITIES", "Utilities", "Water, power, gas, internet"),
        Transportation => ("TRANSPORTATION", "Transportation", "Fuel, public transport, ride hailing"),
        Vehicle => ("VEHICLE", "Vehicle", "Maintenance, insurance, vehicle tax"),
        Food => ("FOOD", "Groceries", "Supermarket and street market"),
        Restaurant => ("RESTAURANT", "Restaurant", "Meals eaten out"),
        Health => ("HEALTH", "Health", "Health plan, doctors, pharmacy"),
        Education => ("EDUCATION", "Education", "Courses, books, school supplies"),
        Entertainment => ("ENTERTAINMENT", "Entertainment", "Cinema, streaming, games"),
        Travel => ("TRAVEL", "Travel", "Tickets, lodging, tours"),
        Clothing => ("CLOTHING", "Clothing", "Clothes and accessories"),
        PersonalCare => ("PERSONAL_CARE", "Personal Care", "Salon, gym, aesthetics"),
        Subscription => ("SUBSCRIPTION", "Subscription", "Recurring services"),
        Insurance => ("INSURANCE", "Insurance", "Assorted insurance policies"),
        Tax => ("TAX", "Taxes", "Taxes and fees"),
        Debt => ("DEBT", "Debt", "Instalments and loans"),
        Pet => ("PET", "Pet", "Spending on pets"),
        Kids => ("KIDS", "Kids", "School, activities, allowance"),
        Donation => ("DONATION", "Donation", "Charity and help"),
        Other => ("OTHER", "Other", "Uncategorised spending"),
    }
}

catalog! {
    PaymentMethod, "payment method" {
        Cash => ("CASH", "Cash", "Paid in cash"),
        CreditCard => ("CREDIT_CARD", "Credit Card", "Paid on credit"),
        DebitCard => ("DEBIT_CARD", "Debit Card", "Paid on debit"),
        Pix => ("PIX", "PIX", "Instant transfer"),
        BankTransfer => ("BANK_TRANSFER", "Bank Transfer", "Wire transfer"),
        DigitalWallet => ("DIGITAL_WALLET", "Digital Wallet", "Wallet apps"),
        Boleto => ("BOLETO", "Boleto", "Bank payment slip"),
        Financing => ("FINANCING", "Financing", "Instalments with interest"),
        Other => ("OTHER", "Other", "Other ways of paying"),
    }
}

catalog! {
    InvestmentType, "investment type" {
        Savings => ("SAVINGS", "Savings", "Savings account"),
        Cdb => ("CDB", "CDB", "Bank deposit certificate"),
        LciLca => ("LCI_LCA", "LCI/LCA", "Real estate and agribusiness credit notes"),
        Treasury => ("TREASURY", "Treasury", "Government bonds"),
        Debentures => ("DEBENTURES", "Debentures", "Corporate debt securities"),
        Stocks => ("STOCKS", "Stocks", "Shares listed on an exchange"),
        Reits => ("REITS", "REITs", "Real estate investment funds"),
        Etfs => ("ETFS", "ETFs", "Index funds"),
        Bdrs => ("BDRS", "BDRs", "Brazilian depositary receipts"),
        InvestmentFund => ("INVESTMENT_FUND", "Investment Fund", "Multimarket, fixed income and other funds"),
        Pension => ("PENSION", "Private Pension", "PGBL/VGBL plans"),
        Crypto => ("CRYPTO", "Crypto", "Bitcoin, Ethereum and others"),
        International => ("INTERNATIONAL", "International", "Investments abroad"),
        RealEstate => ("REAL_ESTATE", "Real Estate", "Direct property investment"),
        Commodities => ("COMMODITIES", "Commodities", "Gold, silver and others"),
        Other => ("OTHER", "Other", "Other kinds of investment"),
    }
}

catalog! {
    /// How often an income or expense repeats.
    RecurrenceType, "recurrence" {
        Once => ("ONCE", "Once", "Single transaction, no repetition"),
        Daily => ("DAILY", "Daily", "Repeats every day"),
        Weekly => ("WEEKLY", "Weekly", "Repeats every week"),
        Biweekly => ("BIWEEKLY", "Biweekly", "Repeats every two weeks"),
        Monthly => ("MONTHLY", "Monthly", "Repeats every month"),
        Bimonthly => ("BIMONTHLY", "Bimonthly", "Repeats every two months"),
        Quarterly => ("QUARTERLY", "Quarterly", "Repeats every three months"),
        Semiannual => ("SEMIANNUAL", "Semiannual", "Repeats every six months"),
        Annual => ("ANNUAL", "Annual", "Repeats every year"),
    }
}

catalog! {
    ReportType, "report type" {
        All => ("ALL", "All", "Every transaction"),
        Income => ("INCOME", "Income", "Incomes only"),
        Expense => ("EXPENSE", "Expense", "Expenses only"),
    }
}

impl Default for RecurrenceType {
    fn default() -> Self {
        RecurrenceType::Once
    }
}

impl Default for ReportType {
    fn default() -> Self {
        ReportType::All
    }
}

impl RecurrenceType {
    pub fn is_recurring(&self) -> bool {
        *self != RecurrenceType::Once
    }

    /// The date one interval after `date`. Month steps clamp to the last day of
    /// the target month (Jan 31 + 1 month = Feb 28/29).
    pub fn next_due_date(&self, date: NaiveDate) -> NaiveDate {
        let next = match self {
            RecurrenceType::Once => Some(date),
            RecurrenceType::Daily => date.checked_add_days(Days::new(1)),
            RecurrenceType::Weekly => date.checked_add_days(Days::new(7)),
            RecurrenceType::Biweekly => date.checked_add_days(Days::new(14)),
            RecurrenceType::Monthly => date.checked_add_months(Months::new(1)),
            RecurrenceType::Bimonthly => date.checked_add_months(Months::new(2)),
            RecurrenceType::Quarterly => date.checked_add_months(Months::new(3)),
            RecurrenceType::Semiannual => date.checked_add_months(Months::new(6)),
            RecurrenceType::Annual => date.checked_add_months(Months::new(12)),
        };
        next.unwrap_or(date)
    }
}

impl ReportType {
    /// Report filters are accepted in any letter case.
    pub fn parse_lenient(value: &str) -> Result<Self, UnknownCode> {
        ReportType::ALL
            .iter()
            .copied()
            .find(|item| item.code().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownCode {
                kind: "report type",
                code: value.to_string(),
            })
    }

    pub fn includes_incomes(&self) -> bool {
        matches!(self, ReportType::All | ReportType::Income)
    }

    pub fn includes_expenses(&self) -> bool {
        matches!(self, ReportType::All | ReportType::Expense)
    }
}
