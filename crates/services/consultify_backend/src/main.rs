// File: services/consultify_backend/src/main.rs
use axum::{routing::get, Router};
use consultify_catalog::routes as catalog_routes;
use consultify_common::services::ServiceFactory;
use consultify_config::load_config;
use consultify_flow::routes as flow_routes;
#[cfg(feature = "razorpay")]
use consultify_razorpay::routes as razorpay_routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

mod service_factory;
use service_factory::ConsultifyServiceFactory;

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config().expect("Failed to load config"));
    consultify_common::logging::init();

    let service_factory: Arc<dyn ServiceFactory> =
        Arc::new(ConsultifyServiceFactory::new(config.clone()));

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to Consultify API!" }))
        .with_state(config.clone());
    let catalog_router = catalog_routes(config.clone());
    let flow_router = flow_routes(config.clone(), service_factory.clone());
    #[cfg(feature = "razorpay")]
    let razorpay_router = razorpay_routes(config.clone());

    let api_router = Router::new().nest("/api", {
        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut router = api_router.merge(catalog_router).merge(flow_router);
        #[cfg(feature = "razorpay")]
        {
            router = router.merge(razorpay_router);
        }
        router
    });

    let mut app = api_router;

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use consultify_catalog::doc::CatalogApiDoc;
        use consultify_flow::doc::FlowApiDoc;
        #[cfg(feature = "razorpay")]
        use consultify_razorpay::doc::RazorpayApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        // Define the Merged OpenAPI Documentation struct
        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Consultify API",
                version = "0.1.0",
                description = "Consultify booking service API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Consultify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        // Create the merged OpenAPI document
        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(CatalogApiDoc::openapi());
        openapi_doc.merge(FlowApiDoc::openapi());
        #[cfg(feature = "razorpay")]
        openapi_doc.merge(RazorpayApiDoc::openapi());
        println!("📖 Adding Swagger UI at /api/docs");

        // Create the Swagger UI route, referencing the merged doc
        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    // Serve static files in dev mode
    if cfg!(debug_assertions) {
        println!("Running in development mode, serving static files from ../../dist");
        let static_router = Router::new().nest_service("/static", ServeDir::new("../../dist"));
        app = app.merge(static_router);
        app = app.fallback_service(ServeDir::new("../dist"));
    }

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    println!("Starting server at http://{}", addr);
    println!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
