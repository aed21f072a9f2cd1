//! In-process stand-ins for the document store.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use rocket::serde::json::Value;

use super::*;

/// Keeps records in insertion order and sorts them the way the document store does.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ScoreRecord>>,
    broken: AtomicBool,
}

impl MemoryStore {
    /// Makes every following read and write fail.
    pub fn break_down(&self) {
        self.broken.store(true, AtomicOrdering::SeqCst);
    }

    pub fn records(&self) -> Vec<ScoreRecord> {
        self.records.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.broken.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is broken".to_owned()));
        }
        Ok(())
    }
}

#[rocket::async_trait]
impl ScoreStore for MemoryStore {
    async fn insert_one(&self, record: &ScoreRecord) -> Result<(), StoreError> {
        self.check()?;
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn top_scores(&self, limit: i64) -> Result<Vec<ScoreRecord>, StoreError> {
        self.check()?;
        let mut records = self.records();
        // Stable, so equal scores stay in insertion order.
        records.sort_by(|a, b| compare_values(descending_key(&b.score), descending_key(&a.score)));
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }
}

/// Position of a value's type in the store's cross-type sort order.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

/// Orders values like the document store: null < numbers < strings < objects < arrays < booleans.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Value an array is ranked by in a descending sort: its largest element.
/// An empty array ranks with null.
fn descending_key(value: &Value) -> &Value {
    static NULL: Value = Value::Null;
    match value {
        Value::Array(items) => items
            .iter()
            .max_by(|a, b| compare_values(a, b))
            .unwrap_or(&NULL),
        other => other,
    }
}

/// Always hands out the same [`MemoryStore`].
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[rocket::async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> Result<SharedStore, StoreError> {
        Ok(self.store.clone())
    }
}

/// Never manages to connect.
pub struct FailingConnector;

#[rocket::async_trait]
impl Connector for FailingConnector {
    async fn connect(&self) -> Result<SharedStore, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::json;

    use super::*;

    #[test]
    fn numbers_compare_across_integer_and_float() {
        assert_eq!(compare_values(&json!(2), &json!(1.5)), Ordering::Greater);
        assert_eq!(compare_values(&json!(-3), &json!(-3.0)), Ordering::Equal);
    }

    #[test]
    fn types_follow_store_order() {
        let ordered = [json!(null), json!(1000), json!("a"), json!({}), json!([]), json!(false)];
        for pair in ordered.windows(2) {
            assert_eq!(compare_values(&pair[0], &pair[1]), Ordering::Less);
        }
    }

    #[rocket::async_test]
    async fn top_scores_sorts_descending_and_limits() {
        let store = MemoryStore::default();
        for score in [5, 9, 1, 7] {
            let record = ScoreRecord::new(json!("p"), json!(score), String::new());
            store.insert_one(&record).await.unwrap();
        }

        let top = store.top_scores(3).await.unwrap();
        let scores: Vec<_> = top.iter().map(|r| r.score.clone()).collect();
        assert_eq!(scores, vec![json!(9), json!(7), json!(5)]);
    }

    #[rocket::async_test]
    async fn arrays_rank_by_their_largest_element() {
        let store = MemoryStore::default();
        for score in [json!(10), json!([3, 5]), json!([1, 50]), json!([]), json!(4)] {
            let record = ScoreRecord::new(json!("p"), score, String::new());
            store.insert_one(&record).await.unwrap();
        }

        let top = store.top_scores(20).await.unwrap();
        let scores: Vec<_> = top.iter().map(|r| r.score.clone()).collect();
        assert_eq!(
            scores,
            vec![json!([1, 50]), json!(10), json!([3, 5]), json!(4), json!([])]
        );
    }

    #[rocket::async_test]
    async fn broken_store_fails() {
        let store = MemoryStore::default();
        store.break_down();
        let record = ScoreRecord::new(json!("p"), json!(1), String::new());
        assert!(store.insert_one(&record).await.is_err());
        assert!(store.top_scores(20).await.is_err());
    }
}
