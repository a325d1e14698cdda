mod agents;
mod config;
mod db;
mod documents;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod profile;
mod routes;
mod state;
mod workflow;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agents::{register_default_handlers, AgentDeps};
use crate::config::Config;
use crate::db::create_pool;
use crate::documents::generator::LlmDocumentGenerator;
use crate::documents::storage::S3DocumentStore;
use crate::jobs::search::PgJobSearch;
use crate::llm_client::LlmClient;
use crate::profile::parser::ResumeParser;
use crate::profile::store::{InMemoryProfileStore, ProfileStore, RedisProfileStore};
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::classifier::LlmGoalClassifier;
use crate::workflow::executor::TaskExecutor;
use crate::workflow::orchestrator::WorkflowOrchestrator;
use crate::workflow::templates::{all_templates, validate_registry};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: a missing credential aborts startup
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Copilot API v{}", env!("CARGO_PKG_VERSION"));

    validate_registry()?;
    info!("Workflow templates validated ({} templates)", all_templates().len());

    let db = create_pool(&config.database_url).await?;

    let profiles: Arc<dyn ProfileStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Profile store: Redis");
            Arc::new(RedisProfileStore::new(client))
        }
        None => {
            warn!("REDIS_URL not set; profiles are kept in memory and lost on restart");
            Arc::new(InMemoryProfileStore::new())
        }
    };

    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let resume_parser = ResumeParser::new(llm.clone());
    let documents = Arc::new(LlmDocumentGenerator::new(llm.clone()));
    let job_search = Arc::new(PgJobSearch::new(db));

    let deps = AgentDeps {
        profiles: profiles.clone(),
        resume_parser: resume_parser.clone(),
        job_search: job_search.clone(),
        job_search_limit: config.job_search_limit,
        documents: documents.clone(),
        document_store: Arc::new(S3DocumentStore::new(s3, config.s3_bucket.clone())),
    };

    let mut executor = TaskExecutor::new(config.task_timeout);
    register_default_handlers(&mut executor, &deps);
    info!(
        "Registered task handlers: {:?} (timeout {:?}, failure policy {:?})",
        executor.handler_names(),
        config.task_timeout,
        config.failure_policy
    );

    let orchestrator = Arc::new(WorkflowOrchestrator::new(
        Arc::new(LlmGoalClassifier::new(llm)),
        executor,
        config.failure_policy,
    ));

    let state = AppState {
        orchestrator,
        profiles,
        job_search,
        documents,
        resume_parser,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "copilot-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
