#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use mood_predict_model::MoodModel;
use mood_predict_service::{ServiceConfig, ServiceState, service_router};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting Mood Predict API Service");

    let config = ServiceConfig::from_env()?;
    tracing::info!(
        model = %config.model_path.display(),
        origins = ?config.allowed_origins,
        "Loaded configuration"
    );

    let model = match MoodModel::load(&config.model_path) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!("Cannot start without a model: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Serving {}", model);

    let addr = config.bind_addr();
    let app = service_router(ServiceState::new(model, config));

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
