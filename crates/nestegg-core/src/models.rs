//! Domain models for Nestegg
//!
//! Records carry a single normalized identifier plus an explicit [`Origin`].
//! The finance API names its identifier `_id`; local drafts use `id`. Both
//! spellings are accepted when reading.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::money;

/// Length of a "month" when computing elapsed time on an instrument
const MONTH_MILLIS: i64 = 30 * 24 * 60 * 60 * 1000;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque record identifier (server ObjectId or local timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) if !s.is_empty() => Ok(RecordId(s)),
            Value::Number(n) => Ok(RecordId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "invalid record id: {}",
                other
            ))),
        }
    }
}

/// Where a record lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Held only on this device, with a client-generated id
    Local,
    /// Owned by the finance API
    #[default]
    Remote,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// API collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Transactions,
    Savings,
}

impl Resource {
    /// Path segment under `/api/`
    pub fn path(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Savings => "savings",
        }
    }

    /// Singular label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transactions => "Transaction",
            Self::Savings => "Savings instrument",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// A record kind that can be listed, created, edited and deleted
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// User-supplied fields, as submitted from a form
    type Draft: Clone + fmt::Debug + PartialEq + Serialize + Send + Sync;

    const RESOURCE: Resource;

    fn id(&self) -> &RecordId;

    fn origin(&self) -> Origin;

    fn from_draft(id: RecordId, origin: Origin, draft: Self::Draft) -> Self;

    fn to_draft(&self) -> Self::Draft;

    fn with_origin(self, origin: Origin) -> Self;
}

// =============================================================================
// Dates
// =============================================================================

/// Parse a calendar date from `YYYY-MM-DD` or a full ISO-8601 timestamp.
///
/// Timestamps keep their UTC date.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    None
}

/// Whole 30-day months between `start` (midnight UTC) and `now`.
///
/// Rounds toward negative infinity, so a future start date gives a
/// negative count.
pub fn months_between(start: NaiveDate, now: DateTime<Utc>) -> i64 {
    let start = start.and_time(NaiveTime::MIN).and_utc();
    (now - start).num_milliseconds().div_euclid(MONTH_MILLIS)
}

mod iso_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_iso_date(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s)))
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// Income or expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Label used by the finance API
    pub fn wire_label(&self) -> &'static str {
        match self {
            Self::Income => "הכנסה",
            Self::Expense => "הוצאה",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "הכנסה" => return Ok(Self::Income),
            "הוצאה" => return Ok(Self::Expense),
            _ => {}
        }
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl Serialize for TransactionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_label())
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A dated income or expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransaction")]
pub struct Transaction {
    pub id: RecordId,
    pub origin: Origin,
    pub description: String,
    #[serde(serialize_with = "money::serialize_number")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
}

/// Wire shape accepting both `id` and `_id`
#[derive(Deserialize)]
struct RawTransaction {
    id: Option<RecordId>,
    #[serde(rename = "_id")]
    object_id: Option<RecordId>,
    #[serde(default)]
    origin: Origin,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "money::deserialize_lenient")]
    amount: Decimal,
    #[serde(rename = "type")]
    kind: TransactionType,
    #[serde(default)]
    category: String,
    #[serde(with = "iso_date")]
    date: NaiveDate,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = String;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let id = raw
            .object_id
            .or(raw.id)
            .ok_or_else(|| "transaction without id".to_string())?;
        Ok(Self {
            id,
            origin: raw.origin,
            description: raw.description,
            amount: raw.amount,
            kind: raw.kind,
            category: raw.category,
            date: raw.date,
        })
    }
}

/// User-supplied transaction fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub description: String,
    #[serde(
        serialize_with = "money::serialize_number",
        deserialize_with = "money::deserialize_lenient"
    )]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
}

impl Record for Transaction {
    type Draft = TransactionDraft;

    const RESOURCE: Resource = Resource::Transactions;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn origin(&self) -> Origin {
        self.origin
    }

    fn from_draft(id: RecordId, origin: Origin, draft: TransactionDraft) -> Self {
        Self {
            id,
            origin,
            description: draft.description,
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category,
            date: draft.date,
        }
    }

    fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            description: self.description.clone(),
            amount: self.amount,
            kind: self.kind,
            category: self.category.clone(),
            date: self.date,
        }
    }

    fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}

// =============================================================================
// Savings instruments
// =============================================================================

/// Kind of savings vehicle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    EducationFund,
    Pension,
    ProvidentFund,
    Bank,
    GeneralSavings,
    InvestmentPortfolio,
    /// Any label the client does not recognize, kept verbatim
    Other(String),
}

impl Location {
    /// All recognized kinds, in display order
    pub fn known() -> &'static [Location] {
        &[
            Location::EducationFund,
            Location::Pension,
            Location::ProvidentFund,
            Location::Bank,
            Location::GeneralSavings,
            Location::InvestmentPortfolio,
        ]
    }

    /// Read a label; unrecognized labels become [`Location::Other`]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed {
            "קרן השתלמות" => return Self::EducationFund,
            "פנסיה" => return Self::Pension,
            "קופת גמל" => return Self::ProvidentFund,
            "בנק" => return Self::Bank,
            "חסכון" => return Self::GeneralSavings,
            "תיק השקעות" => return Self::InvestmentPortfolio,
            _ => {}
        }
        let normalized: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "educationfund" => Self::EducationFund,
            "pension" => Self::Pension,
            "providentfund" => Self::ProvidentFund,
            "bank" => Self::Bank,
            "generalsavings" | "savings" => Self::GeneralSavings,
            "investmentportfolio" | "portfolio" => Self::InvestmentPortfolio,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Label used by the finance API
    pub fn wire_label(&self) -> &str {
        match self {
            Self::EducationFund => "קרן השתלמות",
            Self::Pension => "פנסיה",
            Self::ProvidentFund => "קופת גמל",
            Self::Bank => "בנק",
            Self::GeneralSavings => "חסכון",
            Self::InvestmentPortfolio => "תיק השקעות",
            Self::Other(label) => label,
        }
    }

    /// English display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::EducationFund => "Education fund",
            Self::Pension => "Pension",
            Self::ProvidentFund => "Provident fund",
            Self::Bank => "Bank",
            Self::GeneralSavings => "General savings",
            Self::InvestmentPortfolio => "Investment portfolio",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_label())
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self::from_label(&label))
    }
}

/// Whether an instrument is still being contributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SavingsStatus {
    #[default]
    #[serde(alias = "active")]
    Active,
    #[serde(alias = "inactive")]
    Inactive,
}

impl SavingsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for SavingsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SavingsStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("Unknown savings status: {}", s)),
        }
    }
}

/// A named savings vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSavingsInstrument")]
pub struct SavingsInstrument {
    pub id: RecordId,
    pub origin: Origin,
    pub name: String,
    #[serde(serialize_with = "money::serialize_number")]
    pub amount: Decimal,
    pub location: Location,
    /// Start date
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    /// Annual yield in percent
    #[serde(rename = "yieldRate", serialize_with = "money::serialize_number")]
    pub yield_rate: Decimal,
    pub status: SavingsStatus,
}

#[derive(Deserialize)]
struct RawSavingsInstrument {
    id: Option<RecordId>,
    #[serde(rename = "_id")]
    object_id: Option<RecordId>,
    #[serde(default)]
    origin: Origin,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "money::deserialize_lenient")]
    amount: Decimal,
    #[serde(default = "unknown_location")]
    location: Location,
    #[serde(with = "iso_date")]
    date: NaiveDate,
    #[serde(
        rename = "yieldRate",
        default,
        deserialize_with = "money::deserialize_lenient"
    )]
    yield_rate: Decimal,
    #[serde(default, deserialize_with = "status_or_default")]
    status: SavingsStatus,
}

fn unknown_location() -> Location {
    Location::Other(String::new())
}

fn status_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SavingsStatus, D::Error> {
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.parse().ok()).unwrap_or_default())
}

impl TryFrom<RawSavingsInstrument> for SavingsInstrument {
    type Error = String;

    fn try_from(raw: RawSavingsInstrument) -> Result<Self, Self::Error> {
        let id = raw
            .object_id
            .or(raw.id)
            .ok_or_else(|| "savings instrument without id".to_string())?;
        Ok(Self {
            id,
            origin: raw.origin,
            name: raw.name,
            amount: raw.amount,
            location: raw.location,
            date: raw.date,
            yield_rate: raw.yield_rate,
            status: raw.status,
        })
    }
}

impl SavingsInstrument {
    /// Whole 30-day months since the start date
    pub fn months_elapsed(&self, now: DateTime<Utc>) -> i64 {
        months_between(self.date, now)
    }
}

/// User-supplied savings fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsDraft {
    pub name: String,
    #[serde(
        serialize_with = "money::serialize_number",
        deserialize_with = "money::deserialize_lenient"
    )]
    pub amount: Decimal,
    pub location: Location,
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    #[serde(
        rename = "yieldRate",
        default,
        serialize_with = "money::serialize_number",
        deserialize_with = "money::deserialize_lenient"
    )]
    pub yield_rate: Decimal,
    #[serde(default)]
    pub status: SavingsStatus,
}

impl Record for SavingsInstrument {
    type Draft = SavingsDraft;

    const RESOURCE: Resource = Resource::Savings;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn origin(&self) -> Origin {
        self.origin
    }

    fn from_draft(id: RecordId, origin: Origin, draft: SavingsDraft) -> Self {
        Self {
            id,
            origin,
            name: draft.name,
            amount: draft.amount,
            location: draft.location,
            date: draft.date,
            yield_rate: draft.yield_rate,
            status: draft.status,
        }
    }

    fn to_draft(&self) -> SavingsDraft {
        SavingsDraft {
            name: self.name.clone(),
            amount: self.amount,
            location: self.location.clone(),
            date: self.date,
            yield_rate: self.yield_rate,
            status: self.status,
        }
    }

    fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}

// =============================================================================
// Users
// =============================================================================

/// Signed-in user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    /// First name, or "User" when the profile has none
    pub fn first_name(&self) -> &str {
        match self.first_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "User",
        }
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_deref().unwrap_or("")
    }

    pub fn display_name(&self) -> String {
        let last = self.last_name();
        if last.is_empty() {
            self.first_name().to_string()
        } else {
            format!("{} {}", self.first_name(), last)
        }
    }
}

/// Body of `POST /api/login` and `POST /api/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Response of `POST /api/login` and `POST /api/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Body of `PUT /api/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_transaction_from_api_shape() {
        let json = r#"{
            "_id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "description": "Salary",
            "amount": "5000",
            "type": "הכנסה",
            "category": "Work",
            "date": "2024-01-15T00:00:00.000Z",
            "__v": 0
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(tx.origin, Origin::Remote);
        assert_eq!(tx.amount, Decimal::from(5000));
        assert_eq!(tx.kind, TransactionType::Income);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_transaction_non_numeric_amount_is_zero() {
        let json = r#"{"id": "1", "amount": "lots", "type": "Expense", "date": "2024-02-01"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, Decimal::ZERO);
        assert_eq!(tx.kind, TransactionType::Expense);
        assert_eq!(tx.category, "");
    }

    #[test]
    fn test_transaction_without_id_is_rejected() {
        let json = r#"{"amount": 1, "type": "הוצאה", "date": "2024-02-01"}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn test_unknown_transaction_type_is_rejected() {
        let json = r#"{"id": "1", "amount": 1, "type": "transfer", "date": "2024-02-01"}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn test_local_transaction_roundtrip_keeps_origin() {
        let tx = Transaction::from_draft(
            RecordId::new("1718000000000"),
            Origin::Local,
            TransactionDraft {
                description: "Coffee".into(),
                amount: Decimal::new(125, 1),
                kind: TransactionType::Expense,
                category: "Food".into(),
                date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            },
        );
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains(r#""type":"הוצאה""#));
        assert!(json.contains(r#""amount":12.5"#));
        assert!(json.contains(r#""date":"2024-06-10""#));
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_savings_defaults() {
        let json = r#"{"_id": "a1", "name": "Rainy day", "amount": 3000,
                       "location": "בנק", "date": "2024-01-01"}"#;
        let s: SavingsInstrument = serde_json::from_str(json).unwrap();
        assert_eq!(s.location, Location::Bank);
        assert_eq!(s.yield_rate, Decimal::ZERO);
        assert_eq!(s.status, SavingsStatus::Active);
    }

    #[test]
    fn test_savings_null_yield_and_unknown_location() {
        let json = r#"{"_id": "a2", "name": "Crypto", "amount": 10,
                       "location": "ארנק דיגיטלי", "date": "2024-01-01",
                       "yieldRate": null, "status": "Inactive"}"#;
        let s: SavingsInstrument = serde_json::from_str(json).unwrap();
        assert_eq!(s.location, Location::Other("ארנק דיגיטלי".into()));
        assert_eq!(s.yield_rate, Decimal::ZERO);
        assert_eq!(s.status, SavingsStatus::Inactive);
    }

    #[test]
    fn test_location_labels() {
        assert_eq!(Location::from_label("קרן השתלמות"), Location::EducationFund);
        assert_eq!(Location::from_label("education-fund"), Location::EducationFund);
        assert_eq!(Location::from_label("InvestmentPortfolio"), Location::InvestmentPortfolio);
        assert_eq!(Location::from_label("general_savings"), Location::GeneralSavings);
        for kind in Location::known() {
            assert_eq!(&Location::from_label(kind.wire_label()), kind);
        }
    }

    #[test]
    fn test_parse_iso_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_iso_date("2024-03-09"), Some(expected));
        assert_eq!(parse_iso_date("2024-03-09T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_iso_date("2024-03-09T10:30:00"), Some(expected));
        assert_eq!(parse_iso_date("09/03/2024"), None);
    }

    #[test]
    fn test_months_between() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 30, 12, 0, 0).unwrap();
        assert_eq!(months_between(start, now), 0);
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(months_between(start, now), 1);
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(months_between(start, now), 12);
    }

    #[test]
    fn test_months_between_future_is_negative() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 2, 20, 0, 0, 0).unwrap();
        assert_eq!(months_between(start, now), -1);
    }

    #[test]
    fn test_user_defaults() {
        let user: User = serde_json::from_str(r#"{"id": 7, "email": "a@b.c"}"#).unwrap();
        assert_eq!(user.first_name(), "User");
        assert_eq!(user.last_name(), "");
        assert_eq!(user.display_name(), "User");
        assert_eq!(user.id, Some(RecordId::new("7")));
    }
}
