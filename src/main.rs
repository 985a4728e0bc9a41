use tracing::error;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(err) = agentpro::run().await {
        error!(error = %err, "server exited with error");
        std::process::exit(1);
    }
}
