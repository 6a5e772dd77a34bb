pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{
    candidate_service::CandidateService, exam_service::ExamService,
    notification_service::NotificationService, question_service::QuestionService,
    result_service::ResultService, session_service::SessionService, user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_service: UserService,
    pub exam_service: ExamService,
    pub question_service: QuestionService,
    pub candidate_service: CandidateService,
    pub session_service: SessionService,
    pub result_service: ResultService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let user_service = UserService::new(pool.clone());
        let exam_service = ExamService::new(pool.clone());
        let question_service = QuestionService::new(pool.clone());
        let candidate_service = CandidateService::new(pool.clone());
        let session_service = SessionService::new(pool.clone());
        let result_service = ResultService::new(pool.clone());
        let notification_service =
            NotificationService::new(pool.clone(), config.mail_webhook_url.clone());

        Self {
            pool,
            user_service,
            exam_service,
            question_service,
            candidate_service,
            session_service,
            result_service,
            notification_service,
        }
    }
}

/// Full API router: health, anonymous auth, the bearer-gated creator
/// surface and the link-gated public surface. Shared by `main` and the
/// integration tests.
pub fn app(state: AppState) -> Router {
    let config = crate::config::get_config();

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let auth_api = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login));

    let creator_api = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/exams",
            get(routes::exams::list_exams).post(routes::exams::create_exam),
        )
        .route(
            "/exams/:id",
            get(routes::exams::get_exam)
                .put(routes::exams::update_exam)
                .delete(routes::exams::delete_exam),
        )
        .route(
            "/exams/:id/questions",
            get(routes::questions::list_questions_for_exam),
        )
        .route(
            "/exams/:id/candidates",
            get(routes::candidates::list_candidates_for_exam),
        )
        .route(
            "/exams/:id/results",
            get(routes::results::list_results_for_exam),
        )
        .route("/questions", post(routes::questions::create_question))
        .route(
            "/questions/:id",
            get(routes::questions::get_question)
                .put(routes::questions::update_question)
                .delete(routes::questions::delete_question),
        )
        .route(
            "/candidates",
            get(routes::candidates::list_candidates).post(routes::candidates::create_candidate),
        )
        .route(
            "/candidates/:id",
            get(routes::candidates::get_candidate)
                .put(routes::candidates::update_candidate)
                .delete(routes::candidates::delete_candidate),
        )
        .route(
            "/candidates/:id/send-invitation",
            post(routes::candidates::send_invitation),
        )
        .route(
            "/candidates/:id/result",
            get(routes::results::get_candidate_result),
        )
        .route("/results/:id", get(routes::results::get_result))
        .route("/results/:id/evaluate", put(routes::results::evaluate_result))
        .route("/results/:id/export", get(routes::results::export_result))
        .layer(axum::middleware::from_fn(
            middleware::auth::require_bearer_auth,
        ))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.creator_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let public_api = Router::new()
        .route(
            "/exams/access/:unique_link",
            get(routes::public::access_exam),
        )
        .route(
            "/exams/submit/:unique_link",
            post(routes::public::submit_exam),
        )
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.public_rps),
            middleware::rate_limit::rps_middleware,
        ));

    base_routes
        .merge(auth_api)
        .merge(creator_api)
        .merge(public_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
