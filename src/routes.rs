//! HTTP surface: the four questionnaire routes plus the analytics endpoint
//! used by the completion page charts.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::analysis::{aggregate, EmotionLabel, SentimentLabel};
use crate::capture;
use crate::error::{AppError, Result};
use crate::questions;
use crate::report;
use crate::session::{AnswerRecord, SessionPhase};
use crate::AppState;

pub const SESSION_COOKIE: &str = "mindscreen_session";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/submit", post(submit))
        .route("/complete", get(complete))
        .route("/download", get(download))
        .route("/api/analytics", get(analytics))
        .with_state(state)
}

#[derive(Serialize)]
struct HomeResponse {
    question: &'static str,
    total: usize,
}

#[derive(Deserialize)]
struct SubmitRequest {
    answer: String,
    /// Webcam frame as a base64 data-URL.
    image: String,
}

#[derive(Serialize)]
struct SubmitResponse {
    done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_question: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<usize>,
}

#[derive(Serialize)]
struct CompleteResponse {
    summary: String,
}

#[derive(Serialize)]
struct AnalyticsResponse {
    sentiment_counts: BTreeMap<String, usize>,
    emotion_counts: BTreeMap<String, usize>,
}

/// Resets the caller's run and serves the first question.
async fn home(
    State(app): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<HomeResponse>) {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    app.store.start(&token);
    info!("🧭 Session {} at question 1 of {}", token, questions::total());

    let jar = jar.add(Cookie::new(SESSION_COOKIE, token));
    (
        jar,
        Json(HomeResponse {
            question: questions::QUESTIONS[0],
            total: questions::total(),
        }),
    )
}

/// One answer + capture for the current question: persist the frame, run both
/// classifiers, append the record, and on the final question compute the
/// summary and render the report.
async fn submit(
    State(app): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AppError::NoSession)?;
    let index = app.store.current_index(&token)?;

    let image_bytes = capture::decode_data_url(&request.image)?;
    let image = image::load_from_memory(&image_bytes)
        .map_err(|e| AppError::InvalidImage(e.to_string()))?;
    let image_path = capture::store_capture(&app.settings.capture_dir, &token, index, &image_bytes)?;

    let answer = request.answer;
    let (sentiment, emotion) = classify(app.clone(), answer.clone(), image).await?;
    info!(
        "📝 Session {} q{}: sentiment={}, emotion={}",
        token,
        index + 1,
        sentiment,
        emotion
    );

    let question = questions::get(index).ok_or(AppError::AlreadyComplete)?;
    let record = AnswerRecord {
        question: question.to_string(),
        answer,
        sentiment,
        emotion,
        image_path,
    };

    match app.store.push_record(&token, index, record)? {
        SessionPhase::AwaitingAnswer(next) => Ok(Json(SubmitResponse {
            done: false,
            next_question: questions::get(next),
            current: Some(next + 1),
        })),
        SessionPhase::Complete => {
            let session = app.store.snapshot(&token).ok_or(AppError::NoSession)?;
            let tier = aggregate::assess(&session.sentiment_labels(), &session.emotion_labels());
            let summary = tier.message().to_string();
            app.store.set_summary(&token, summary.clone())?;
            info!("✅ Session {} complete: {:?}", token, tier);

            let report_path = app.settings.report_path.clone();
            let records = session.records;
            tokio::task::spawn_blocking(move || report::generate(&records, &summary, &report_path))
                .await
                .map_err(|e| AppError::Report(format!("report task failed: {}", e)))??;

            Ok(Json(SubmitResponse {
                done: true,
                next_question: None,
                current: None,
            }))
        }
    }
}

/// Both classifiers are synchronous CPU work, so they run on the blocking pool.
async fn classify(
    app: Arc<AppState>,
    answer: String,
    image: image::DynamicImage,
) -> Result<(SentimentLabel, EmotionLabel)> {
    tokio::task::spawn_blocking(move || {
        let sentiment = app.sentiment.classify(&answer);
        let emotion = app.emotion.classify(&image)?;
        Ok((sentiment, emotion))
    })
    .await
    .map_err(|e| AppError::Inference(format!("classification task failed: {}", e)))?
}

async fn complete(State(app): State<Arc<AppState>>, jar: CookieJar) -> Json<CompleteResponse> {
    let summary = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| app.store.summary(cookie.value()))
        .unwrap_or_else(|| "No summary available.".to_string());
    Json(CompleteResponse { summary })
}

/// Label distributions for the completion page charts.
async fn analytics(State(app): State<Arc<AppState>>, jar: CookieJar) -> Json<AnalyticsResponse> {
    let mut sentiment_counts = BTreeMap::new();
    let mut emotion_counts = BTreeMap::new();
    if let Some(session) = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| app.store.snapshot(cookie.value()))
    {
        for record in &session.records {
            *sentiment_counts
                .entry(record.sentiment.as_str().to_string())
                .or_insert(0) += 1;
            *emotion_counts
                .entry(record.emotion.as_str().to_string())
                .or_insert(0) += 1;
        }
    }
    Json(AnalyticsResponse {
        sentiment_counts,
        emotion_counts,
    })
}

async fn download(State(app): State<Arc<AppState>>) -> Result<Response> {
    let bytes = match tokio::fs::read(&app.settings.report_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::ReportNotReady)
        }
        Err(e) => return Err(AppError::Io(e)),
    };
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"report.pdf\"".to_string(),
            ),
        ],
        bytes,
    )
        .into_response())
}
