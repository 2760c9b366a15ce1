use actix_cors::Cors;
use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, Result as ActixResult};
use docsim_core::Error;
use docsim_similarity::{ComparisonEngine, SimilarityResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::request::CompareRequest;

/// Largest accepted request body; recognition payloads can be sizeable
const MAX_JSON_BYTES: usize = 16 * 1024 * 1024;

#[derive(Serialize)]
struct CompareResponse {
    request_id: Uuid,
    #[serde(flatten)]
    result: SimilarityResult,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(engine: Arc<ComparisonEngine>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(engine.clone()))
                .app_data(web::JsonConfig::default().limit(MAX_JSON_BYTES))
                .configure(routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register the API routes; expects `web::Data<Arc<ComparisonEngine>>` app data
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/config", web::get().to(get_config))
        .route("/compare", web::post().to(compare));
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

async fn get_config(engine: web::Data<Arc<ComparisonEngine>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(engine.config()))
}

async fn compare(
    engine: web::Data<Arc<ComparisonEngine>>,
    req: web::Json<CompareRequest>,
) -> ActixResult<HttpResponse> {
    let request_id = Uuid::new_v4();
    let span = info_span!("compare", %request_id);
    let engine = engine.get_ref().clone();
    let request = req.into_inner();

    let outcome = web::block(move || {
        let _entered = span.enter();
        request.run(&engine)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => {
            let summary = result.summary();
            info!(
                %request_id,
                similarity_index = summary.similarity_index,
                anomalies = summary.anomaly_count,
                variations = summary.variation_count,
                inconsistencies = summary.inconsistency_count,
                "comparison served"
            );
            Ok(HttpResponse::Ok().json(CompareResponse { request_id, result }))
        }
        Ok(Err(e)) => {
            warn!(%request_id, error = %e, "comparison failed");
            Ok(error_response(request_id, &e))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "request_id": request_id,
            "error": e.to_string()
        }))),
    }
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::EmptyInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::InvalidWeight(_) | Error::InvalidDimension { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(request_id: Uuid, error: &Error) -> HttpResponse {
    HttpResponse::build(status_for(error)).json(serde_json::json!({
        "request_id": request_id,
        "error": error.to_string()
    }))
}
