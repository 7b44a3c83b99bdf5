pub mod email;
pub mod i18n;
pub mod jwt;
pub mod llm;
pub mod metrics;
pub mod prompts;
pub mod reports;
pub mod share;
pub mod storage;
pub mod store;

pub use email::{EmailError, EmailMessage, EmailProvider, MockEmailProvider, SmtpProvider};
pub use i18n::Translator;
pub use jwt::{JwtVerifier, SessionClaims};
pub use llm::{
    Completion, CompletionRequest, GeminiConfig, GeminiProvider, LlmError, LlmProvider,
    MockLlmProvider,
};
pub use storage::{LocalStorage, Storage};
pub use store::{EntityStore, Filter, MemoryStore, MongoStore, Repository};
