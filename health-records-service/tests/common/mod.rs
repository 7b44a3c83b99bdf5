#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use health_records_service::{
    build_router,
    config::{
        AuthConfig, CorsConfig, HealthConfig, I18nConfig, LlmBackend, LlmConfig, ShareConfig,
        SmtpConfig, StorageConfig, StoreBackend, StoreConfig,
    },
    models::Profile,
    services::{
        EmailProvider, JwtVerifier, LlmProvider, LocalStorage, MemoryStore, MockEmailProvider,
        MockLlmProvider, Repository, Translator,
    },
    AppState,
};
use http_body_util::BodyExt;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-for-health-records";
pub const TEST_USER_ID: &str = "user-123";
pub const TEST_USER_EMAIL: &str = "patient@example.com";
pub const TEST_PROFILE_ID: &str = "profile-123";
pub const SHARE_BASE_URL: &str = "https://records.test";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub llm: Arc<MockLlmProvider>,
    pub email: Arc<MockEmailProvider>,
    pub jwt: JwtVerifier,
    pub storage_path: String,
}

pub struct TestAppBuilder {
    llm: MockLlmProvider,
    email: MockEmailProvider,
}

impl TestAppBuilder {
    pub fn llm(mut self, llm: MockLlmProvider) -> Self {
        self.llm = llm;
        self
    }

    pub fn email(mut self, email: MockEmailProvider) -> Self {
        self.email = email;
        self
    }

    pub async fn build(self) -> TestApp {
        let storage_path = format!("target/test-storage-{}", Uuid::new_v4());
        let config = test_config(&storage_path);

        let store = Arc::new(MemoryStore::new());
        let llm = Arc::new(self.llm);
        let email = Arc::new(self.email);
        let jwt = JwtVerifier::new(TEST_JWT_SECRET).expect("Failed to create JWT verifier");
        let storage = LocalStorage::new(&storage_path)
            .await
            .expect("Failed to create test storage");

        let state = AppState {
            config,
            repo: Repository::new(store.clone()),
            llm: llm.clone() as Arc<dyn LlmProvider>,
            email: email.clone() as Arc<dyn EmailProvider>,
            storage: Arc::new(storage),
            translator: Arc::new(Translator::new("en")),
            jwt: jwt.clone(),
        };

        TestApp {
            router: build_router(state),
            store,
            llm,
            email,
            jwt,
            storage_path,
        }
    }
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            llm: MockLlmProvider::default(),
            email: MockEmailProvider::new(true),
        }
    }

    pub async fn spawn() -> Self {
        Self::builder().build().await
    }

    pub fn token(&self) -> String {
        self.jwt
            .issue(TEST_USER_ID, TEST_USER_EMAIL, chrono::Duration::hours(1))
            .expect("Failed to issue test token")
    }

    pub fn seed_profile(&self) -> Profile {
        let profile = Profile {
            id: TEST_PROFILE_ID.to_string(),
            full_name: "Jane Doe".to_string(),
            date_of_birth: Some("1985-04-12".to_string()),
            gender: None,
            blood_type: Some("O+".to_string()),
            chronic_conditions: vec![],
            allergies: vec!["penicillin".to_string()],
        };
        self.store.seed(std::slice::from_ref(&profile));
        profile
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }

    /// Authenticated JSON POST.
    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token()))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub fn total_queries(&self) -> usize {
        [
            "profiles",
            "users",
            "medical_documents",
            "vital_measurements",
            "medications",
            "meal_logs",
            "lab_results",
            "health_insights",
            "health_insurance",
            "shareable_links",
        ]
        .iter()
        .map(|collection| self.store.query_count(collection))
        .sum()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.storage_path);
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}

fn test_config(storage_path: &str) -> HealthConfig {
    HealthConfig {
        common: CoreConfig {
            port: 0,
            log_level: "error".to_string(),
            ..CoreConfig::default()
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
            mongodb: None,
        },
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
        },
        llm: LlmConfig {
            backend: LlmBackend::Mock,
            api_key: String::new(),
            text_model: "test-model".to_string(),
            request_timeout_secs: 5,
        },
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 25,
            user: String::new(),
            password: String::new(),
            from_email: "noreply@records.test".to_string(),
            from_name: "Health Records".to_string(),
            enabled: false,
        },
        share: ShareConfig {
            default_base_url: SHARE_BASE_URL.to_string(),
        },
        storage: StorageConfig {
            local_path: storage_path.to_string(),
        },
        i18n: I18nConfig {
            default_locale: "en".to_string(),
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}
