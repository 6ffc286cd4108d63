// src/app.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

// Arquivos do planejamento chegam no mesmo formulário
const PLANNING_BODY_LIMIT: usize = 25 * 1024 * 1024;

pub fn router(app_state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/", post(handlers::users::create_user).get(handlers::users::list_users))
        .route("/{id}", get(handlers::users::get_user))
        .route("/{id}/last-login", post(handlers::users::record_login));

    let crm_routes = Router::new()
        // Leads
        .route("/leads", post(handlers::crm::create_lead).get(handlers::crm::list_leads))
        .route("/leads/{id}", get(handlers::crm::get_lead))
        .route("/leads/{id}/status", put(handlers::crm::update_lead_status))
        // Contas
        .route("/accounts", post(handlers::crm::create_account).get(handlers::crm::list_accounts))
        .route("/accounts/{id}", get(handlers::crm::get_account))
        .route("/accounts/{id}/parent", put(handlers::crm::set_account_parent))
        // Contatos
        .route("/contacts", post(handlers::crm::create_contact).get(handlers::crm::list_contacts))
        // Oportunidades
        .route(
            "/opportunities",
            post(handlers::crm::create_opportunity).get(handlers::crm::list_opportunities),
        )
        .route("/opportunities/{id}/stage", put(handlers::crm::update_opportunity_stage))
        // Tarefas e atividades
        .route("/tasks", post(handlers::crm::create_task).get(handlers::crm::list_tasks))
        .route("/activities", post(handlers::crm::create_activity).get(handlers::crm::list_activities))
        .route(
            "/deal-stages",
            post(handlers::crm::create_deal_stage).get(handlers::crm::list_deal_stages),
        );

    let support_routes = Router::new()
        .route(
            "/tickets",
            post(handlers::support::create_ticket).get(handlers::support::list_tickets),
        )
        .route("/tickets/{id}", get(handlers::support::get_ticket))
        .route("/tickets/{id}/status", put(handlers::support::update_ticket_status))
        .route(
            "/tickets/{id}/messages",
            post(handlers::support::add_ticket_message).get(handlers::support::list_ticket_messages),
        )
        .route(
            "/statuses",
            post(handlers::support::create_ticket_status).get(handlers::support::list_ticket_statuses),
        );

    let invoice_routes = Router::new()
        .route("/", post(handlers::billing::create_invoice).get(handlers::billing::list_invoices))
        .route("/{id}", get(handlers::billing::get_invoice))
        .route("/{id}/pay", post(handlers::billing::pay_invoice));

    let catalog_routes = Router::new()
        .route("/categories", get(handlers::catalog::list_categories))
        .route("/apps", get(handlers::catalog::list_apps))
        .route("/apps/resolve", get(handlers::catalog::resolve_fragment));

    let api = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/users", user_routes)
        .nest("/crm", crm_routes)
        .nest("/support", support_routes)
        .nest("/invoices", invoice_routes)
        .nest("/catalog", catalog_routes)
        .route(
            "/projects",
            post(handlers::support::create_project).get(handlers::support::list_projects),
        )
        .route("/audit-logs", get(handlers::audit::list_audit_logs))
        .route(
            "/contact-submissions",
            post(handlers::inquiries::submit_contact_form).get(handlers::inquiries::list_contact_submissions),
        )
        .route(
            "/services",
            post(handlers::catalog::create_service).get(handlers::catalog::list_services),
        )
        .route("/services/{id}", get(handlers::catalog::get_service))
        .route(
            "/mobile-app-planning",
            post(handlers::planning::submit_planning).layer(DefaultBodyLimit::max(PLANNING_BODY_LIMIT)),
        );

    Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app() -> Router {
        router(AppState::in_memory(&Config::default()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_the_memory_backend() {
        let (status, body) = send(&app(), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "store": "memory" }));
    }

    #[tokio::test]
    async fn creates_and_fetches_a_lead() {
        let app = app();
        let (status, lead) = send(
            &app,
            json_request("POST", "/api/crm/leads", json!({ "name": "Salem", "email": "salem@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(lead["status"], "new");
        assert_eq!(lead["leadSource"], "website");

        let uri = format!("/api/crm/leads/{}", lead["id"].as_str().unwrap());
        let (status, fetched) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Salem");
    }

    #[tokio::test]
    async fn validation_errors_follow_accept_language() {
        let app = app();
        let mut request = json_request("POST", "/api/crm/leads", json!({ "name": "" }));
        request
            .headers_mut()
            .insert(header::ACCEPT_LANGUAGE, "en-US".parse().unwrap());

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "One or more fields are invalid.");
        assert!(body["details"]["name"].is_array());

        let (_, body) = send(&app, json_request("POST", "/api/crm/leads", json!({ "name": "" }))).await;
        assert_eq!(body["error"], "حقل واحد أو أكثر غير صالح.");
    }

    #[tokio::test]
    async fn server_fields_are_rejected_on_insert() {
        let (status, _) = send(
            &app(),
            json_request("POST", "/api/crm/leads", json!({ "id": Uuid::new_v4(), "name": "Ali" })),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn account_cycles_are_a_conflict() {
        let app = app();
        let (_, parent) = send(&app, json_request("POST", "/api/crm/accounts", json!({ "name": "Holding" }))).await;
        let (_, child) = send(
            &app,
            json_request("POST", "/api/crm/accounts", json!({ "name": "Branch", "parentAccountId": parent["id"] })),
        )
        .await;

        let uri = format!("/api/crm/accounts/{}/parent", parent["id"].as_str().unwrap());
        let (status, _) = send(&app, json_request("PUT", &uri, json!({ "parentAccountId": child["id"] }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn actor_header_produces_an_audit_entry() {
        let app = app();
        let (_, user) = send(
            &app,
            json_request("POST", "/api/users", json!({ "username": "billing-agent", "password": "s3cret-pass" })),
        )
        .await;
        let actor = user["id"].as_str().unwrap().to_string();
        let mut request = json_request(
            "POST",
            "/api/invoices",
            json!({ "invoiceNumber": "INV-100", "amount": "250.00" }),
        );
        request
            .headers_mut()
            .insert("x-actor-id", actor.parse().unwrap());
        let (status, invoice) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!(
            "/api/audit-logs?entityType=invoices&entityId={}",
            invoice["id"].as_str().unwrap()
        );
        let (_, logs) = send(&app, get(&uri)).await;
        assert_eq!(logs.as_array().map(Vec::len), Some(1));
        assert_eq!(logs[0]["actorId"], json!(actor));

        // Ator desconhecido: a operação passa, mas não há auditoria
        let mut request = json_request(
            "POST",
            "/api/invoices",
            json!({ "invoiceNumber": "INV-101", "amount": "10.00" }),
        );
        request
            .headers_mut()
            .insert("x-actor-id", Uuid::new_v4().to_string().parse().unwrap());
        let (status, invoice) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/audit-logs?entityId={}", invoice["id"].as_str().unwrap());
        let (_, logs) = send(&app, get(&uri)).await;
        assert_eq!(logs, json!([]));
        assert_eq!(logs[0]["action"], "create");
    }

    #[tokio::test]
    async fn dangling_references_are_not_found() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/crm/opportunities",
                json!({ "name": "Ghost", "accountId": Uuid::new_v4(), "stageId": Uuid::new_v4() }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["details"]["resource"].is_string());

        let (status, _) = send(
            &app,
            json_request("POST", "/api/crm/contacts", json!({ "name": "Huda", "leadId": Uuid::new_v4() })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ticket_conversation_is_kept_in_order() {
        let app = app();
        let (status, ticket) = send(
            &app,
            json_request(
                "POST",
                "/api/support/tickets",
                json!({ "subject": "Login", "description": "Cannot sign in" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/support/tickets/{}/messages", ticket["id"].as_str().unwrap());

        for (message, staff) in [("Still failing", false), ("Password reset sent", true)] {
            let (status, created) = send(
                &app,
                json_request("POST", &uri, json!({ "message": message, "isStaff": staff })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(created["ticketId"], ticket["id"]);
        }

        let (status, messages) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        let texts: Vec<&str> = messages
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["message"].as_str().unwrap())
            .collect();
        assert_eq!(texts, ["Still failing", "Password reset sent"]);

        let missing = format!("/api/support/tickets/{}/messages", Uuid::new_v4());
        let (status, _) = send(&app, get(&missing)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, json_request("POST", &missing, json!({ "message": "hello" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn contact_form_is_stored_and_listed() {
        let app = app();
        let (status, created) = send(
            &app,
            json_request(
                "POST",
                "/api/contact-submissions",
                json!({
                    "name": "Salem",
                    "email": "salem@example.com",
                    "serviceApplication": "delivery",
                    "message": "Need a delivery app"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["id"].is_string());

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/contact-submissions",
                json!({ "name": "Salem", "email": "not-an-email", "message": "hi" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, listed) = send(&app, get("/api/contact-submissions")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["serviceApplication"], "delivery");
    }

    #[tokio::test]
    async fn malformed_actor_header_is_a_bad_request() {
        let mut request = json_request("POST", "/api/crm/leads", json!({ "name": "Ali" }));
        request.headers_mut().insert("x-actor-id", "admin".parse().unwrap());
        let (status, _) = send(&app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn lookup_lists_come_back_in_position_order() {
        let (status, stages) = send(&app(), get("/api/crm/deal-stages")).await;
        assert_eq!(status, StatusCode::OK);
        let positions: Vec<i64> = stages
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["position"].as_i64().unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[tokio::test]
    async fn catalog_filter_and_fragment_resolution() {
        let app = app();
        let (_, all) = send(&app, get("/api/catalog/apps?category=all")).await;
        assert_eq!(all.as_array().map(Vec::len), Some(20));
        assert_eq!(all[0]["id"], "ec1");

        let (_, fintech) = send(&app, get("/api/catalog/apps?category=fintech")).await;
        let ids: Vec<_> = fintech.as_array().unwrap().iter().map(|c| c["id"].clone()).collect();
        assert_eq!(ids, [json!("fi1"), json!("fi2"), json!("fi3")]);

        let (_, none) = send(&app, get("/api/catalog/apps?category=gaming")).await;
        assert_eq!(none, json!([]));

        let (status, hit) = send(&app, get("/api/catalog/apps/resolve?fragment=%23details-lg1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hit["open"], true);
        assert_eq!(hit["entry"]["fragment"], "#details-lg1");

        let (status, miss) = send(&app, get("/api/catalog/apps/resolve?fragment=%23details-xx")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(miss, json!({ "open": false, "entry": null }));
    }

    #[tokio::test]
    async fn categories_are_labelled_in_the_request_language() {
        let mut request = get("/api/catalog/categories");
        request
            .headers_mut()
            .insert(header::ACCEPT_LANGUAGE, "en".parse().unwrap());
        let (_, categories) = send(&app(), request).await;
        assert_eq!(categories[0], json!({ "key": "all", "label": "All types" }));
    }

    #[tokio::test]
    async fn services_endpoint_serves_the_seeded_catalog() {
        let app = app();
        let (status, services) = send(&app, get("/api/services")).await;
        assert_eq!(status, StatusCode::OK);
        let first = &services[0];
        assert!(first["technologies"].is_array());

        let uri = format!("/api/services/{}", first["id"].as_str().unwrap());
        let (status, one) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(one["title"], first["title"]);

        let (status, _) = send(&app, get(&format!("/api/services/{}", Uuid::new_v4()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, doc) = send(&app(), get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/mobile-app-planning"].is_object());
    }
}
