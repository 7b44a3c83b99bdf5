use crate::config::{HealthConfig, LlmBackend, StoreBackend};
use crate::models::{
    Entity, HealthInsight, HealthInsurance, LabResult, MealLog, MedicalDocument, Medication,
    Profile, ShareableLink, User, VitalMeasurement,
};
use crate::services::{
    EmailProvider, EntityStore, GeminiConfig, GeminiProvider, JwtVerifier, LlmProvider,
    LocalStorage, MemoryStore, MockLlmProvider, MongoStore, Repository, SmtpProvider, Storage,
    Translator,
};
use crate::{build_router, AppState};
use service_core::error::AppError;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const COLLECTIONS: &[&str] = &[
    Profile::COLLECTION,
    User::COLLECTION,
    MedicalDocument::COLLECTION,
    VitalMeasurement::COLLECTION,
    Medication::COLLECTION,
    MealLog::COLLECTION,
    LabResult::COLLECTION,
    HealthInsight::COLLECTION,
    HealthInsurance::COLLECTION,
    ShareableLink::COLLECTION,
];

pub struct Application {
    port: u16,
    server: Box<dyn Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Wires every collaborator from configuration and binds the listener.
    /// `shutdown` resolves when the server should drain and stop.
    pub async fn build(
        config: HealthConfig,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<Self, AppError> {
        let state = build_state(config).await?;

        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, build_router(state)).with_graceful_shutdown(shutdown);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub async fn build_state(config: HealthConfig) -> Result<AppState, AppError> {
    let store: Arc<dyn EntityStore> = match (&config.store.backend, &config.store.mongodb) {
        (StoreBackend::Mongo, Some(mongodb)) => {
            let store = MongoStore::connect(&mongodb.uri, &mongodb.database).await?;
            store.initialize_indexes(COLLECTIONS).await.map_err(|e| {
                tracing::error!("Failed to initialize database indexes: {}", e);
                e
            })?;
            Arc::new(store)
        }
        (StoreBackend::Mongo, None) => {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "MongoDB settings are required for the mongo store backend"
            )))
        }
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using the in-memory entity store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let llm: Arc<dyn LlmProvider> = match config.llm.backend {
        LlmBackend::Gemini => {
            if config.llm.api_key.is_empty() {
                tracing::warn!("GOOGLE_API_KEY is empty; LLM-backed endpoints will fail");
            }
            Arc::new(
                GeminiProvider::new(GeminiConfig {
                    api_key: config.llm.api_key.clone(),
                    model: config.llm.text_model.clone(),
                    request_timeout: Duration::from_secs(config.llm.request_timeout_secs),
                })
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
            )
        }
        LlmBackend::Mock => {
            tracing::warn!("Using the mock LLM provider");
            Arc::new(MockLlmProvider::offline())
        }
    };

    let email: Arc<dyn EmailProvider> = Arc::new(
        SmtpProvider::new(config.smtp.clone())
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
    );
    if !email.is_enabled() {
        tracing::info!("SMTP disabled; share-link emails will be reported as failed");
    }

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(&config.storage.local_path)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to initialize local storage at {}: {}",
                    config.storage.local_path,
                    e
                );
                e
            })?,
    );

    let translator = Arc::new(Translator::new(&config.i18n.default_locale));
    let jwt = JwtVerifier::new(&config.auth.jwt_secret)?;

    Ok(AppState {
        config,
        repo: Repository::new(store),
        llm,
        email,
        storage,
        translator,
        jwt,
    })
}
