use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::config::AppConfig;
use crate::db::{self, DbPool};
use crate::generation::GenerationClient;
use crate::graph::{GraphHandle, GraphStatus};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub database: &'static str,
    pub neo4j: &'static str,
    pub identity: &'static str,
    pub text_generation: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub timestamp: String,
    pub status: &'static str,
    pub environment: &'static str,
    pub services: ServiceStatus,
    pub missing_vars: Vec<String>,
    pub warnings: Vec<String>,
}

fn configured(present: bool) -> &'static str {
    if present { "configured" } else { "missing" }
}

/// GET /ai-status - Active text generation provider
pub async fn ai_status(generation: web::Data<GenerationClient>) -> HttpResponse {
    HttpResponse::Ok().json(generation.status())
}

/// GET /health - Dependency and configuration report
///
/// Always answers 200; a failed database ping or an unreachable, configured
/// Neo4j marks the report `degraded`.
pub async fn health(
    pool: web::Data<DbPool>,
    graph: web::Data<GraphHandle>,
    config: web::Data<AppConfig>,
    generation: web::Data<GenerationClient>,
) -> HttpResponse {
    let database_ok = db::ping(&pool).await;
    let graph_status = graph.ping().await;
    let degraded = !database_ok || graph_status == GraphStatus::Disconnected;

    let report = HealthReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        status: if degraded { "degraded" } else { "healthy" },
        environment: if config.missing_vars.is_empty() { "configured" } else { "missing_variables" },
        services: ServiceStatus {
            database: if database_ok { "connected" } else { "error" },
            neo4j: graph_status.as_str(),
            identity: configured(config.identity_publishable_key.is_some()),
            text_generation: configured(!generation.status().is_offline),
        },
        missing_vars: config.missing_vars.clone(),
        warnings: config.warnings.clone(),
    };
    HttpResponse::Ok().json(report)
}
