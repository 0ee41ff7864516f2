//! Application router configuration.

use axum::{Router, middleware, routing::get};

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    logging::logging_middleware,
    not_found::get_404_not_found,
    transaction::{get_transaction_details_endpoint, get_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_API, get(get_transactions_endpoint))
        .route(
            endpoints::TRANSACTION_DETAILS_API,
            get(get_transaction_details_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState,
        endpoints::{self, format_endpoint},
        sms_import::{ImportRun, parse_batch},
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap())
            .expect("Could not create app state");
        {
            let connection = state.db_connection.lock().unwrap();
            let messages = parse_batch(
                r#"<smses>
                    <sms body="You have received 5,000 RWF from Jane Doe. Your new balance 10,000. TxId: 123" date="1" readable_date="10 May 2024 4:30:58 PM" />
                    <sms body="Dial *182# to see our latest offers" date="2" readable_date="10 May 2024 4:31:58 PM" />
                </smses>"#,
            )
            .unwrap();
            ImportRun::new().import_all(&messages, &connection).unwrap();
        }

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn serves_imported_transactions() {
        let server = get_test_server();

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        let entries = response.json::<Value>();
        assert_eq!(entries.as_array().map(Vec::len), Some(2));
        assert_eq!(entries[0]["category"], json!("incoming_money"));
        assert_eq!(entries[0]["amount"], json!(5000));
        assert_eq!(entries[1]["amount"], Value::Null);
        assert_eq!(entries[1]["total_transactions"], json!(5000));
    }

    #[tokio::test]
    async fn serves_transaction_details() {
        let server = get_test_server();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION_DETAILS_API, "123"))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([{
            "id": 1,
            "transaction_id": "123",
            "status": "Completed",
            "description": "Transaction completed",
            "additional_info": {"note": "Automated transaction"}
        }]));
    }

    #[tokio::test]
    async fn serves_dashboard() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        assert!(response.text().contains("Incoming Money"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("404"));
    }
}
