use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::NaiveDate;
use log::error;
use serde::Deserialize;

use crate::actions::{generate_contacts, generate_message, ContactOptions, MessageOptions};
use crate::config::Config;
use crate::display::format_phone_list;
use crate::emoji::EmojiStyle;
use crate::error::CensusError;
use crate::session::Session;
use crate::sheets::SheetBackend;

pub struct AppState {
    pub session: Session,
    pub config: Config,
    pub backend: Box<dyn SheetBackend>,
}

impl AppState {
    pub fn new(config: Config, backend: Box<dyn SheetBackend>) -> Self {
        Self {
            session: Session::new(),
            config,
            backend,
        }
    }
}

/// Message options from the form; anything left out comes from the config
#[derive(Debug, Default, Deserialize)]
pub struct MessageRequest {
    style: Option<EmojiStyle>,
    include_orange: Option<bool>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactsRequest {
    include_interns: Option<bool>,
    include_orange: Option<bool>,
    threshold: Option<f64>,
    today: Option<NaiveDate>,
}

fn error_response(err: &CensusError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    match err {
        CensusError::Busy => HttpResponse::Conflict().json(body),
        CensusError::Backend { .. } => HttpResponse::BadGateway().json(body),
        CensusError::HeaderAnchorMissing | CensusError::MissingDirectoryColumn(_) => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        CensusError::Config(_) => HttpResponse::InternalServerError().json(body),
    }
}

// Census message endpoint
async fn post_message(
    req: web::Json<MessageRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let mut options = MessageOptions::from_config(&state.config);
    if let Some(style) = req.style {
        options.style = style;
    }
    if let Some(include_orange) = req.include_orange {
        options.include_orange = include_orange;
    }
    if req.seed.is_some() {
        options.seed = req.seed;
    }

    match generate_message(&state.session, &*state.backend, &state.config, &options).await {
        Ok(report) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": report.message,
            "entries": report.entries,
            "row_errors": report.row_errors,
        }))),
        Err(e) => {
            error!("Census message failed: {}", e);
            Ok(error_response(&e))
        }
    }
}

// Contacts endpoint
async fn post_contacts(
    req: web::Json<ContactsRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let mut options = ContactOptions::from_config(&state.config);
    if let Some(include_interns) = req.include_interns {
        options.include_interns = include_interns;
    }
    if let Some(include_orange) = req.include_orange {
        options.include_orange = include_orange;
    }
    if let Some(threshold) = req.threshold {
        options.threshold = threshold;
    }
    if let Some(today) = req.today {
        options.today = today;
    }
    if let Err(e) = options.validate() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": e.to_string()})));
    }

    match generate_contacts(&state.session, &*state.backend, &state.config, &options).await {
        Ok(report) => {
            let phone_list = format_phone_list(&report.phones, &state.config.contacts.separator);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "week_start": report.week_start,
                "buckets": report.buckets,
                "phones": report.phones,
                "phone_list": phone_list,
            })))
        }
        Err(e) => {
            error!("Contact lookup failed: {}", e);
            Ok(error_response(&e))
        }
    }
}

// Last results endpoint
async fn get_last(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.session.last()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/message", web::post().to(post_message))
        .route("/api/contacts", web::post().to(post_contacts))
        .route("/api/last", web::get().to(get_last));
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::MemoryBackend;
    use actix_web::{http::StatusCode, test};

    fn rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
    }

    fn state() -> web::Data<AppState> {
        let mut config = Config::default();
        config.sheets.roster = "roster".to_string();
        config.sheets.schedule = "schedule".to_string();
        config.sheets.directory = "missing".to_string();
        config.backend.attempts = 1;
        config.backend.retry_delay_ms = 0;

        let backend = MemoryBackend::new()
            .with_sheet("roster", rows(&[&["Green", "Doctor", "Team"], &["GREEN: 5", "Dr. A | notes", "Lead CALL"]]))
            .with_sheet("schedule", rows(&[&["6/2/2025"]]));
        web::Data::new(AppState::new(config, Box::new(backend)))
    }

    #[actix_web::test]
    async fn message_endpoint_returns_text() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/message")
            .set_json(serde_json::json!({"style": "circles"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Good morning! Please confirm census:\n\n🟢 Lead/Dr. A: 5\n");
    }

    #[actix_web::test]
    async fn backend_failure_is_bad_gateway() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(serde_json::json!({"today": "2025-06-03"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn out_of_range_threshold_is_bad_request() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(serde_json::json!({"threshold": 150.0, "today": "2025-06-03"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn busy_session_is_conflict() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let _guard = state.session.begin().unwrap();

        let req = test::TestRequest::post()
            .uri("/api/message")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
