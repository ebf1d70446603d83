//! Courseflow dev bootstrap
//!
//! Wires the in-memory stores, the queued event bus and the workflow
//! services, seeds development data, then idles until Ctrl+C. The HTTP
//! layer is a separate concern; this binary exists to run the engine.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use courseflow::application::services::proposal::ProposalDraft;
use courseflow::application::services::ProposalService;
use courseflow::config::{default_config_path, AppConfig};
use courseflow::domain::{User, UserRepository, UserRole};
use courseflow::events::AsyncEventBus;
use courseflow::infrastructure::crypto::password::hash_password;
use courseflow::infrastructure::memory::{InMemoryProposalStore, InMemoryUserStore};
use courseflow::notifications::{register_email_subscribers, NullSender};
use courseflow::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("COURSEFLOW_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Courseflow...");

    // ── Stores ─────────────────────────────────────────────────
    let users = Arc::new(InMemoryUserStore::new());
    let proposals = Arc::new(InMemoryProposalStore::new());

    // ── Event bus + subscribers ────────────────────────────────
    let bus = Arc::new(AsyncEventBus::start(
        cfg.events.workers,
        cfg.events.queue_capacity,
    ));
    register_email_subscribers(bus.as_ref(), Arc::new(NullSender), users.clone());
    info!("🔔 Event bus initialized");

    // ── Workflow services ──────────────────────────────────────
    let proposal_service = ProposalService::new(proposals.clone(), users.clone(), bus.clone());

    if cfg.seed.enabled {
        seed_dev_data(&cfg, users.as_ref(), &proposal_service).await?;
    }

    // ── Run until a shutdown signal arrives ────────────────────
    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));

    info!("Courseflow ready (Ctrl+C to stop)");
    shutdown.notified().wait().await;

    bus.shutdown().await;
    info!("✅ Graceful shutdown completed");

    Ok(())
}

/// Seed an admin plus an instructor with a submitted demo proposal, so the
/// review queue has something in it on first run.
async fn seed_dev_data(
    cfg: &AppConfig,
    users: &dyn UserRepository,
    proposal_service: &ProposalService,
) -> Result<(), Box<dyn std::error::Error>> {
    if users.get_by_email(&cfg.seed.admin_email).await?.is_none() {
        users
            .create(User {
                id: 0,
                email: cfg.seed.admin_email.clone(),
                name: "Admin".to_string(),
                password_hash: hash_password(&cfg.seed.admin_password)?,
                role: UserRole::Admin,
                created_at: chrono::Utc::now(),
            })
            .await?;
        info!(email = %cfg.seed.admin_email, "seeded admin user");
    }

    let instructor = users
        .create(User {
            id: 0,
            email: "instructor@courseflow.local".to_string(),
            name: "Demo Instructor".to_string(),
            password_hash: hash_password("instructor")?,
            role: UserRole::Instructor,
            created_at: chrono::Utc::now(),
        })
        .await?;

    let proposal = proposal_service
        .create(
            instructor.id,
            ProposalDraft {
                title: "Distributed Systems in Practice".to_string(),
                summary: "Failure modes, timeouts, retries and idempotency in \
                          real production services."
                    .to_string(),
                qualifications: "Years of operating distributed services with \
                                 queues, background workers and partial failures."
                    .to_string(),
                target_audience: "Backend engineers moving beyond a single box".to_string(),
                learning_objectives: "Reason about failure, design for retry safety".to_string(),
                outline: "1. What makes systems distributed\n\
                          2. Failure modes and fallacies\n\
                          3. Timeouts, retries, and idempotency\n\
                          4. Background workers and queues"
                    .to_string(),
                assumed_prerequisites: "Comfort with one backend language".to_string(),
            },
        )
        .await?;
    proposal_service.submit(instructor.id, proposal.id).await?;
    info!(proposal_id = proposal.id, "seeded demo proposal");

    Ok(())
}
