//! State service - the single owner of persisted state
//!
//! Every value is written inside a versioned envelope:
//! ```json
//! { "version": 1, "data": ... }
//! ```
//! Values written by older releases (bare JSON, no envelope) are read as
//! version 0 and migrated on first access.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::result::{Error, Result};
use crate::ports::StateStore;

/// Envelope version written by this release
pub const STATE_VERSION: u32 = 1;

/// Persisted state slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StateKey {
    Transactions,
    Income,
    Budgets,
    Notifications,
    Reflections,
    Goals,
}

impl StateKey {
    pub const ALL: [StateKey; 6] = [
        StateKey::Transactions,
        StateKey::Income,
        StateKey::Budgets,
        StateKey::Notifications,
        StateKey::Reflections,
        StateKey::Goals,
    ];

    /// Storage key
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::Transactions => "spendwise_transactions",
            StateKey::Income => "spendwise_income",
            StateKey::Budgets => "spendwise_budgets",
            StateKey::Notifications => "spendwise_notifications",
            StateKey::Reflections => "spendwise_reflections",
            StateKey::Goals => "spendwise_goals",
        }
    }
}

/// Notification sent to subscribers after a successful write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Set(StateKey),
    Removed(StateKey),
    Cleared,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    data: Value,
}

/// Typed, versioned access to the state store
pub struct StateService {
    store: Arc<dyn StateStore>,
    subscribers: Mutex<Vec<Sender<StateChange>>>,
}

impl StateService {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Read a value, migrating legacy data if needed
    pub fn get<T: DeserializeOwned>(&self, key: StateKey) -> Result<Option<T>> {
        let Some(raw) = self.store.read(key.as_str())? else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&raw)?;

        let data = match envelope_of(&value) {
            Some(envelope) if envelope.version > STATE_VERSION => {
                return Err(Error::Schema(format!(
                    "{} was written by a newer version (schema {}, supported {})",
                    key.as_str(),
                    envelope.version,
                    STATE_VERSION
                )));
            }
            Some(envelope) => envelope.data,
            None => {
                tracing::warn!(key = key.as_str(), "Migrating legacy state to schema {}", STATE_VERSION);
                let migrated = migrate_legacy(key, value);
                self.store.write(key.as_str(), &encode(&migrated)?)?;
                migrated
            }
        };

        serde_json::from_value(data)
            .map(Some)
            .map_err(|e| Error::Schema(format!("{}: {}", key.as_str(), e)))
    }

    /// Read a value, falling back to `T::default()` when unset
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: StateKey) -> Result<T> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Write a value and notify subscribers
    pub fn set<T: Serialize>(&self, key: StateKey, value: &T) -> Result<()> {
        self.store.write(key.as_str(), &encode(value)?)?;
        self.notify(StateChange::Set(key));
        Ok(())
    }

    pub fn remove(&self, key: StateKey) -> Result<()> {
        self.store.remove(key.as_str())?;
        self.notify(StateChange::Removed(key));
        Ok(())
    }

    /// Remove every persisted value
    pub fn clear_all(&self) -> Result<()> {
        self.store.clear()?;
        self.notify(StateChange::Cleared);
        Ok(())
    }

    /// Receive a `StateChange` after every successful write
    pub fn subscribe(&self) -> Receiver<StateChange> {
        let (tx, rx) = channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }

    fn notify(&self, change: StateChange) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            // Receivers that were dropped are pruned here
            subscribers.retain(|tx| tx.send(change).is_ok());
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: STATE_VERSION,
        data: value,
    })?)
}

fn envelope_of(value: &Value) -> Option<Envelope> {
    let obj = value.as_object()?;
    if obj.len() != 2 || !obj.contains_key("data") || !obj.get("version")?.is_u64() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

/// Upgrade a bare (version 0) value to the current data shape
fn migrate_legacy(key: StateKey, value: Value) -> Value {
    match key {
        StateKey::Transactions => match value {
            Value::Array(items) => Value::Array(items.into_iter().map(migrate_transaction).collect()),
            other => other,
        },
        StateKey::Income => numbers_to_strings(value),
        StateKey::Budgets => numbers_to_strings(value),
        StateKey::Notifications | StateKey::Reflections | StateKey::Goals => value,
    }
}

fn migrate_transaction(value: Value) -> Value {
    let Value::Object(mut tx) = value else {
        return value;
    };

    if let Some(Value::Number(id)) = tx.get("id") {
        let id = id.to_string();
        tx.insert("id".to_string(), Value::String(id));
    }

    if let Some(Value::String(date)) = tx.get_mut("date") {
        if let Some(day) = legacy_calendar_date(date, &Local) {
            *date = day.format("%Y-%m-%d").to_string();
        } else if date.len() > 10 && date.is_char_boundary(10) {
            date.truncate(10);
        }
    }

    if let Some(amount) = tx.remove("amount") {
        tx.insert("amount".to_string(), numbers_to_strings(amount));
    }

    let mood = match tx.remove("mood") {
        Some(Value::String(m)) if !m.trim().is_empty() => {
            let m = m.trim().to_lowercase();
            crate::domain::Mood::ALL
                .iter()
                .any(|known| known.label().eq_ignore_ascii_case(&m))
                .then_some(m)
        }
        _ => None,
    };

    let is_credit = tx.get("type").and_then(Value::as_str) == Some("credit");
    let is_impulse = !is_credit && tx.get("isImpulse").and_then(Value::as_bool).unwrap_or(false);
    tx.insert("isImpulse".to_string(), Value::Bool(is_impulse));
    if let Some(mood) = mood.filter(|_| !is_credit) {
        tx.insert("mood".to_string(), Value::String(mood));
    }

    Value::Object(tx)
}

/// Calendar day of a legacy UTC timestamp as seen in `tz`
///
/// Older releases stored the moment of local midnight serialized in UTC, so
/// `2024-02-01T18:30:00.000Z` is 2 February for a user at UTC+05:30.
fn legacy_calendar_date<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(tz).date_naive())
}

/// Decimals are stored as strings; legacy values used JSON numbers
fn numbers_to_strings(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, numbers_to_strings(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::{BudgetLimits, Mood, Transaction, TransactionType};
    use chrono::{FixedOffset, NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn service() -> (Arc<MemoryStore>, StateService) {
        let store = Arc::new(MemoryStore::new());
        let service = StateService::new(store.clone());
        (store, service)
    }

    #[test]
    fn test_set_get_envelope() {
        let (store, service) = service();
        service.set(StateKey::Income, &Decimal::new(60000, 0)).unwrap();

        let raw = store.read("spendwise_income").unwrap().unwrap();
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["data"], "60000");

        let income: Decimal = service.get(StateKey::Income).unwrap().unwrap();
        assert_eq!(income, Decimal::new(60000, 0));
    }

    #[test]
    fn test_missing_value() {
        let (_, service) = service();
        assert_eq!(service.get::<Decimal>(StateKey::Income).unwrap(), None);
        let budgets: BudgetLimits = service.get_or_default(StateKey::Budgets).unwrap();
        assert_eq!(budgets, BudgetLimits::default());
    }

    #[test]
    fn test_newer_schema_rejected() {
        let (store, service) = service();
        store
            .write("spendwise_income", r#"{"version":2,"data":"1"}"#)
            .unwrap();
        assert!(matches!(
            service.get::<Decimal>(StateKey::Income),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_legacy_transactions_migrated() {
        let (store, service) = service();
        store
            .write(
                "spendwise_transactions",
                r#"[
                    {"id":"1706800000000","date":"2024-02-01T18:30:00.000Z","amount":250,
                     "type":"debit","category":"Food & Dining","description":"Starbucks Coffee",
                     "mood":"Stressed","isImpulse":true},
                    {"id":1706800000001,"date":"2024-02-02T00:00:00.000Z","amount":45000.5,
                     "type":"credit","category":"Other","description":"Salary",
                     "mood":"happy","isImpulse":true},
                    {"id":"x","date":"2024-02-03","amount":99,"type":"debit",
                     "category":"Shopping","description":"Gift","mood":""}
                ]"#,
            )
            .unwrap();

        let txs: Vec<Transaction> = service.get(StateKey::Transactions).unwrap().unwrap();
        assert_eq!(txs.len(), 3);

        let local_day = |raw: &str| legacy_calendar_date(raw, &Local).unwrap();
        assert_eq!(txs[0].date, local_day("2024-02-01T18:30:00.000Z"));
        assert_eq!(txs[1].date, local_day("2024-02-02T00:00:00.000Z"));
        assert_eq!(txs[2].date, NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
        assert_eq!(txs[0].amount, Decimal::new(250, 0));
        assert_eq!(txs[0].mood, Some(Mood::Stressed));
        assert!(txs[0].is_impulse);

        assert_eq!(txs[1].id, "1706800000001");
        assert_eq!(txs[1].kind, TransactionType::Credit);
        assert_eq!(txs[1].amount, Decimal::new(450005, 1));
        assert!(!txs[1].is_impulse);
        assert_eq!(txs[1].mood, None);

        assert_eq!(txs[2].mood, None);
        assert!(!txs[2].is_impulse);

        // Rewritten with an envelope
        let raw = store.read("spendwise_transactions").unwrap().unwrap();
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["version"], STATE_VERSION);
    }

    #[test]
    fn test_legacy_timestamps_use_the_local_calendar_day() {
        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        // Local midnight in India, written out as UTC
        assert_eq!(legacy_calendar_date("2024-02-01T18:30:00.000Z", &ist), Some(ymd(2024, 2, 2)));
        assert_eq!(legacy_calendar_date("2024-02-01T18:30:00.000Z", &Utc), Some(ymd(2024, 2, 1)));
        assert_eq!(legacy_calendar_date("2024-02-01T10:00:00+05:30", &ist), Some(ymd(2024, 2, 1)));
        assert_eq!(legacy_calendar_date("2024-02-03", &ist), None);
    }

    #[test]
    fn test_legacy_income_and_budgets() {
        let (store, service) = service();
        store.write("spendwise_income", "65000").unwrap();
        store
            .write(
                "spendwise_budgets",
                r#"{"monthly":40000,"categories":{"Food & Dining":12000}}"#,
            )
            .unwrap();

        let income: Decimal = service.get(StateKey::Income).unwrap().unwrap();
        assert_eq!(income, Decimal::new(65000, 0));

        let budgets: BudgetLimits = service.get(StateKey::Budgets).unwrap().unwrap();
        assert_eq!(budgets.monthly, Decimal::new(40000, 0));
        assert_eq!(budgets.categories["Food & Dining"], Decimal::new(12000, 0));
    }

    #[test]
    fn test_subscribers_notified() {
        let (_, service) = service();
        let rx = service.subscribe();
        let dropped = service.subscribe();
        drop(dropped);

        service.set(StateKey::Goals, &Vec::<String>::new()).unwrap();
        service.remove(StateKey::Goals).unwrap();
        service.clear_all().unwrap();

        let changes: Vec<StateChange> = rx.try_iter().collect();
        assert_eq!(
            changes,
            vec![
                StateChange::Set(StateKey::Goals),
                StateChange::Removed(StateKey::Goals),
                StateChange::Cleared
            ]
        );
        assert_eq!(service.subscribers.lock().unwrap().len(), 1);
    }
}
