//! HTTP handler functions for the library checkouts API.

use std::str::FromStr as _;

use actix_web::{HttpResponse, web};
use library_checkouts_checkout_models::SortColumn;
use library_checkouts_dashboard::DashboardError;
use library_checkouts_server_models::{
    ApiError, ApiHealth, ApiView, CheckoutQueryParams, PopularityQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/checkouts`
///
/// Applies the criteria, fetching the month's rows if the period changed.
pub async fn checkouts(
    state: web::Data<AppState>,
    params: web::Query<CheckoutQueryParams>,
) -> HttpResponse {
    let criteria = match params.into_inner().into_criteria() {
        Ok(criteria) => criteria,
        Err(e) => return bad_request(e.to_string()),
    };

    match state.dashboard.update(criteria).await {
        Ok(view) => HttpResponse::Ok().json(ApiView::from(&view)),
        Err(e) => dashboard_error(&e),
    }
}

/// `GET /api/view`
pub async fn view(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiView::from(&state.dashboard.view()))
}

/// `POST /api/sort/{column}`
///
/// Toggles the direction if `column` is already active, otherwise sorts by
/// it descending.
pub async fn sort(state: web::Data<AppState>, column: web::Path<String>) -> HttpResponse {
    let Ok(column) = SortColumn::from_str(&column) else {
        return bad_request(format!("Unknown sort column: {column}"));
    };

    match state.dashboard.select_sort(column) {
        Ok(view) => HttpResponse::Ok().json(ApiView::from(&view)),
        Err(e) => dashboard_error(&e),
    }
}

/// `GET /api/types`
///
/// Lists the material types present in the loaded month.
pub async fn types(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.dashboard.material_types())
}

/// `GET /api/popularity`
pub async fn popularity(
    state: web::Data<AppState>,
    params: web::Query<PopularityQueryParams>,
) -> HttpResponse {
    let highlight = match params.highlight() {
        Ok(highlight) => highlight,
        Err(e) => return bad_request(e.to_string()),
    };

    match state.dashboard.popularity(&params.title, highlight).await {
        Ok(chart) => HttpResponse::Ok().json(chart),
        Err(e) => dashboard_error(&e),
    }
}

fn bad_request(error: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiError {
        error,
        retryable: false,
    })
}

fn dashboard_error(e: &DashboardError) -> HttpResponse {
    let (mut response, retryable) = match e {
        DashboardError::PeriodOutOfRange { .. } => (HttpResponse::BadRequest(), false),
        DashboardError::PeriodNotLoaded { .. } => (HttpResponse::Conflict(), true),
        DashboardError::Engine(_) => (HttpResponse::UnprocessableEntity(), false),
        DashboardError::PopularityUnavailable { .. } => {
            (HttpResponse::ServiceUnavailable(), true)
        }
    };

    log::warn!("Request failed: {e}");
    response.json(ApiError {
        error: e.to_string(),
        retryable,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use library_checkouts_checkout_models::{CheckoutRecord, Period};
    use library_checkouts_dashboard::Dashboard;
    use library_checkouts_source::{CheckoutGateway, SourceError};
    use serde_json::Value;

    use super::*;

    struct FakeGateway {
        rows: Vec<CheckoutRecord>,
        titles_available: bool,
    }

    #[async_trait]
    impl CheckoutGateway for FakeGateway {
        async fn fetch_by_period(
            &self,
            period: Period,
        ) -> Result<Vec<CheckoutRecord>, SourceError> {
            Ok(self
                .rows
                .iter()
                .filter(|r| r.period().is_ok_and(|p| p == period))
                .cloned()
                .collect())
        }

        async fn fetch_by_title(&self, title: &str) -> Result<Vec<CheckoutRecord>, SourceError> {
            if !self.titles_available {
                return Err(SourceError::Status {
                    status: 503,
                    url: "https://data.seattle.gov/resource/tjb6-zsmc.json".to_string(),
                });
            }
            Ok(self
                .rows
                .iter()
                .filter(|r| r.title == title)
                .cloned()
                .collect())
        }
    }

    fn record(title: &str, material_type: &str, checkouts: &str, month: u8) -> CheckoutRecord {
        CheckoutRecord {
            title: title.to_string(),
            material_type: material_type.to_string(),
            checkouts: checkouts.to_string(),
            checkout_month: month.to_string(),
            checkout_year: "2020".to_string(),
            ..CheckoutRecord::default()
        }
    }

    fn rows() -> Vec<CheckoutRecord> {
        vec![
            record("Dune", "BOOK", "5", 1),
            record("Emma", "EBOOK", "20", 1),
            record("Ulysses", "BOOK", "12", 1),
            record("Dune", "BOOK", "30", 2),
            record("Broken", "BOOK", "lots", 3),
        ]
    }

    fn state(titles_available: bool) -> web::Data<AppState> {
        let gateway = Arc::new(FakeGateway {
            rows: rows(),
            titles_available,
        });
        let dashboard = Dashboard::new(gateway)
            .with_clock(|| NaiveDate::from_ymd_opt(2024, 6, 15).unwrap_or_default());
        web::Data::new(AppState {
            dashboard: Arc::new(dashboard),
        })
    }

    fn titles(view: &Value) -> Vec<&str> {
        view["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["title"].as_str().unwrap())
            .collect()
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(crate::configure)).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn view_awaits_period_before_first_query() {
        let app = test::init_service(
            App::new()
                .app_data(state(true))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/view").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, serde_json::json!({"status": "awaitingPeriod"}));
    }

    #[actix_web::test]
    async fn checkouts_then_sort() {
        let app = test::init_service(
            App::new()
                .app_data(state(true))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/checkouts?year=2020&month=1&type=BOOK")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ready");
        assert_eq!(body["criteria"]["type"], "All");
        assert_eq!(body["loaded"], 3);
        assert_eq!(titles(&body), vec!["Dune", "Emma", "Ulysses"]);

        let req = test::TestRequest::post()
            .uri("/api/sort/checkouts")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(titles(&body), vec!["Emma", "Ulysses", "Dune"]);

        let req = test::TestRequest::get()
            .uri("/api/checkouts?year=2020&month=1&type=BOOK")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["criteria"]["type"], "BOOK");
        assert_eq!(titles(&body), vec!["Ulysses", "Dune"]);

        let req = test::TestRequest::get().uri("/api/types").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, serde_json::json!(["BOOK", "EBOOK"]));
    }

    #[actix_web::test]
    async fn unknown_sort_column_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(state(true))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/sort/author").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn period_errors_are_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(state(true))
                .configure(crate::configure),
        )
        .await;

        for uri in [
            "/api/checkouts?year=2005&month=4",
            "/api/checkouts?year=2024&month=6",
            "/api/checkouts?year=2020&month=13",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[actix_web::test]
    async fn invalid_rows_are_unprocessable() {
        let app = test::init_service(
            App::new()
                .app_data(state(true))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/sort/checkouts")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/checkouts?year=2020&month=3")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["retryable"], false);
    }

    #[actix_web::test]
    async fn popularity_highlights_period() {
        let app = test::init_service(
            App::new()
                .app_data(state(true))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/popularity?title=Dune&year=2020&month=2")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["highlight"], "2020/2");
        assert_eq!(body["series"]["title"], "Dune");
        assert_eq!(
            body["series"]["points"],
            serde_json::json!([
                {"period": "2020/1", "checkouts": 5},
                {"period": "2020/2", "checkouts": 30},
            ])
        );
    }

    #[actix_web::test]
    async fn popularity_rejects_bad_highlight_month() {
        let app = test::init_service(
            App::new()
                .app_data(state(true))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/popularity?title=Dune&year=2020&month=13")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["retryable"], false);
    }

    #[actix_web::test]
    async fn popularity_outage_is_retryable() {
        let app = test::init_service(
            App::new()
                .app_data(state(false))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/popularity?title=Dune")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["retryable"], true);
    }
}
