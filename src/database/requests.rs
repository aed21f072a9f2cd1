use chrono::Utc;
use rocket::serde::json::Json;
use rocket::serde::Serialize;
use rocket::*;

use super::*;

/// Body returned by a successful `POST /score`.
#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct SaveResponse {
    pub status: &'static str,
    pub saved: bool,
    pub data: ScoreRecord,
}

/// Stores a new score, stamped with the current server time.
/// The submitted fields are not validated.
#[post("/score", data = "<submission>")]
pub async fn add_score(
    submission: ScoreSubmission,
    connection: &State<ConnectionManager>,
) -> RequestResult<Json<SaveResponse>> {
    let scores = connection
        .get_scores_collection()
        .await
        .ok_or(ApiError::ConnectionFailed)?;

    let record = ScoreRecord::stamp(submission, Utc::now());
    if let Err(error) = scores.insert_one(&record).await {
        tracing::error!(%error, "failed to save score");
        return Err(error.into());
    }

    tracing::info!(player = %record.player, score = %record.score, "score saved");
    Ok(Json(SaveResponse {
        status: "ok",
        saved: true,
        data: record,
    }))
}

/// Fetches the top scores, highest first.
#[get("/ranking")]
pub async fn get_ranking(
    connection: &State<ConnectionManager>,
) -> RequestResult<Json<Vec<ScoreRecord>>> {
    let scores = connection
        .get_scores_collection()
        .await
        .ok_or(ApiError::ConnectionFailed)?;

    match scores.top_scores(RANKING_LIMIT).await {
        Ok(ranking) => Ok(Json(ranking)),
        Err(error) => {
            tracing::error!(%error, "failed to read ranking");
            Err(error.into())
        }
    }
}

/// JSON bodies for requests that never reach a handler, such as unparsable bodies.
#[catch(default)]
pub fn default_catcher(status: http::Status, _request: &Request<'_>) -> (http::Status, Json<serde::json::Value>) {
    (status, Json(serde::json::json!({ "status": "error" })))
}
