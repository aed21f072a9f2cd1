use chrono::{DateTime, SecondsFormat, Utc};
use rocket::data::{self, Data, FromData, Limits};
use rocket::http::Status;
use rocket::serde::json::serde_json::{self, Number};
use rocket::serde::json::Value;
use rocket::serde::{Deserialize, Serialize};
use rocket::Request;
use thiserror::Error;

// Neither field is type-checked: whatever JSON the client sends is stored as is.
pub type Player = Value;
pub type GameScore = Value;

/// A score document as it is persisted in the `scores` collection.
///
/// Fields the store adds on its own (such as `_id`) are dropped on read.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(crate = "rocket::serde")]
pub struct ScoreRecord {
    #[serde(default)]
    pub player: Player,
    #[serde(default)]
    pub score: GameScore,
    #[serde(default)]
    pub time: String,
}

impl ScoreRecord {
    pub fn new(player: Player, score: GameScore, time: String) -> Self {
        Self {
            player,
            score,
            time,
        }
    }

    /// Builds the record for a submission received at `now`.
    pub fn stamp(submission: ScoreSubmission, now: DateTime<Utc>) -> Self {
        Self::new(submission.player, submission.score, iso_timestamp(now))
    }
}

/// Body of `POST /score`.
///
/// Any JSON value is accepted, and so is an empty body. Fields are picked out
/// of an object body; missing fields and non-object bodies leave them `null`.
#[derive(Clone, Deserialize, PartialEq, Debug, Default)]
#[serde(crate = "rocket::serde", from = "Value")]
pub struct ScoreSubmission {
    pub player: Player,
    pub score: GameScore,
}

impl From<Value> for ScoreSubmission {
    fn from(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => Self {
                player: storable(fields.remove("player").unwrap_or(Value::Null)),
                score: storable(fields.remove("score").unwrap_or(Value::Null)),
            },
            _ => Self::default(),
        }
    }
}

/// Why a `POST /score` body could not be read.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("failed to read body: {0}")]
    Io(#[from] std::io::Error),

    #[error("body exceeds the json size limit")]
    TooLarge,

    #[error("body is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[rocket::async_trait]
impl<'r> FromData<'r> for ScoreSubmission {
    type Error = SubmissionError;

    async fn from_data(request: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        let limit = request.limits().get("json").unwrap_or(Limits::JSON);
        let body = match data.open(limit).into_string().await {
            Ok(body) if body.is_complete() => body.into_inner(),
            Ok(_) => return data::Outcome::Error((Status::PayloadTooLarge, SubmissionError::TooLarge)),
            Err(error) => return data::Outcome::Error((Status::BadRequest, error.into())),
        };

        // An empty body is an empty object, not a syntax error.
        if body.trim().is_empty() {
            return data::Outcome::Success(Self::default());
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => data::Outcome::Success(Self::from(value)),
            Err(error) => data::Outcome::Error((Status::BadRequest, error.into())),
        }
    }
}

/// Rewrites integers above `i64::MAX` as doubles, which is the widest
/// integer the store can hold.
fn storable(value: Value) -> Value {
    match value {
        Value::Number(number) if number.is_u64() && number.as_i64().is_none() => number
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
        Value::Array(items) => Value::Array(items.into_iter().map(storable).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key, storable(value)))
                .collect(),
        ),
        other => other,
    }
}

/// UTC timestamp with millisecond precision and a `Z` suffix,
/// e.g. `2024-05-01T12:30:00.000Z`.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
