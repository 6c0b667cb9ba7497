use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::controller::openapi::{ApiDoc, OPENAPI_URL};
use crate::controller::subscriptions;
use crate::repo::SubscriptionRepo;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener, backed by the given repository
pub fn run(listener: TcpListener, repo: Arc<dyn SubscriptionRepo>) -> anyhow::Result<Server> {
    // Wrap application data
    let repo: web::Data<dyn SubscriptionRepo> = web::Data::from(repo);
    let openapi = ApiDoc::openapi();

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(repo.clone())
            .service(health_check)
            .service(subscriptions::scope())
            .service(SwaggerUi::new("/swagger/{_:.*}").url(OPENAPI_URL, openapi.clone()))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
