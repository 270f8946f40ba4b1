//! HTTP server with WebSocket dashboard sessions

use actix_web::{middleware, web, App, Error, HttpRequest, HttpResponse, HttpServer};
use actix_web_actors::ws;
use log::{error, info};

use crate::config::DashboardConfig;
use crate::dashboard::SharedTables;
use crate::websocket::{AppState, DashboardSession};

/// WebSocket endpoint handler; every connection gets its own dashboard
async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let dashboard = state.dashboard().map_err(|e| {
        error!("Cannot create dashboard: {}", e);
        actix_web::error::ErrorInternalServerError(e.to_string())
    })?;
    let resp = ws::start(DashboardSession::new(dashboard), &req, stream)?;
    Ok(resp)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "raw_rows": state.tables.raw.len(),
        "cleaned_rows": state.tables.cleaned.len(),
        "polygon_vertices": state.tables.geometry.len(),
    }))
}

/// Start the HTTP server with WebSocket support
pub async fn run_server(
    host: &str,
    port: u16,
    tables: SharedTables,
    config: DashboardConfig,
) -> std::io::Result<()> {
    info!(
        "Serving {} listings ({} cleaned) on ws://{}:{}/ws",
        tables.raw.len(),
        tables.cleaned.len(),
        host,
        port
    );
    info!("Health check: http://{}:{}/health", host, port);

    let state = web::Data::new(AppState::new(tables, config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            // CORS for browser clients served elsewhere
            .wrap(
                actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/ws", web::get().to(ws_index))
            .route("/health", web::get().to(health_check))
    })
    .bind((host, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::listing::ListingTable;
    use actix_web::test;

    fn state() -> web::Data<AppState> {
        let csv = "price,bed,bath,acre_lot,house_size,state,city,status\n\
                   100,3,2,0.1,1000,Ohio,Akron,for_sale\n\
                   200,,2,0.1,1000,Ohio,Akron,for_sale\n";
        let raw = ListingTable::from_csv_reader("listings", csv.as_bytes()).unwrap();
        web::Data::new(AppState::new(
            SharedTables::new(raw, Geometry::default()),
            DashboardConfig::default(),
        ))
    }

    #[actix_web::test]
    async fn test_health_reports_row_counts() {
        let app = test::init_service(
            App::new()
                .app_data(state())
                .route("/health", web::get().to(health_check)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["raw_rows"], 2);
        assert_eq!(body["cleaned_rows"], 1);
        assert_eq!(body["polygon_vertices"], 0);
    }
}
