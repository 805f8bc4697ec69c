use neo4rs::Graph;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Neo4jConfig;

/// Result of a graph health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphStatus {
    Connected,
    Disconnected,
    NotConfigured,
}

impl GraphStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphStatus::Connected => "connected",
            GraphStatus::Disconnected => "disconnected",
            GraphStatus::NotConfigured => "not_configured",
        }
    }
}

/// Lazily connected Neo4j driver. The graph is only used for health
/// reporting, so a failed connection is logged and retried on the next check.
pub struct GraphHandle {
    config: Option<Neo4jConfig>,
    graph: Mutex<Option<Arc<Graph>>>,
}

impl GraphHandle {
    pub fn new(config: Option<Neo4jConfig>) -> Self {
        GraphHandle {
            config,
            graph: Mutex::new(None),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    async fn connect(&self) -> Option<Arc<Graph>> {
        let config = self.config.as_ref()?;
        let mut slot = self.graph.lock().await;
        if let Some(graph) = slot.as_ref() {
            return Some(graph.clone());
        }
        match Graph::new(&config.uri, &config.username, &config.password).await {
            Ok(graph) => {
                log::info!("Connected to Neo4j at {}", config.uri);
                let graph = Arc::new(graph);
                *slot = Some(graph.clone());
                Some(graph)
            }
            Err(e) => {
                log::warn!("Neo4j unavailable ({}), reporting graph as disconnected", e);
                None
            }
        }
    }

    /// Run `RETURN 1 AS test` against the graph.
    pub async fn ping(&self) -> GraphStatus {
        if !self.is_configured() {
            return GraphStatus::NotConfigured;
        }
        let Some(graph) = self.connect().await else {
            return GraphStatus::Disconnected;
        };
        match graph.execute(neo4rs::query("RETURN 1 AS test")).await {
            Ok(mut rows) => match rows.next().await {
                Ok(Some(row)) if row.get::<i64>("test").is_ok_and(|v| v == 1) => GraphStatus::Connected,
                Ok(_) => GraphStatus::Disconnected,
                Err(e) => {
                    log::warn!("Neo4j health query failed: {}", e);
                    GraphStatus::Disconnected
                }
            },
            Err(e) => {
                log::warn!("Neo4j health query failed: {}", e);
                // Drop the cached driver so the next check reconnects.
                self.graph.lock().await.take();
                GraphStatus::Disconnected
            }
        }
    }

    /// Release the driver. Safe to call more than once.
    pub async fn close(&self) {
        if self.graph.lock().await.take().is_some() {
            log::info!("Neo4j connection closed");
        }
    }
}
