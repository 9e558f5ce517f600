//! Doctor command for system diagnostics
//!
//! Checks that the search engine answers, the article index exists and the
//! configured model provider is healthy.

use colored::*;
use std::sync::Arc;

use crate::cli::config::Config;
use crate::llm::{self, GenerativeModel};
use crate::search::{ArticleSearch, ElasticsearchClient, IndexManager};

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    config: Config,
}

impl Doctor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks = vec![self.check_config()];

        match ElasticsearchClient::new(&self.config.search) {
            Ok(client) => checks.push(check_search(&client).await),
            Err(e) => checks.push(HealthCheck::new("Search Engine", HealthStatus::Fail(e.to_string()))),
        }

        checks.push(self.check_index().await);

        match llm::from_config(&self.config) {
            Ok(model) => checks.push(check_model(model).await),
            Err(e) => checks.push(HealthCheck::new("Model Provider", HealthStatus::Fail(e.to_string()))),
        }

        checks.push(self.check_state_dir());
        checks
    }

    fn check_config(&self) -> HealthCheck {
        match self.config.validate() {
            Ok(()) => HealthCheck::new("Configuration", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Configuration", HealthStatus::Fail(e.to_string())),
        }
    }

    async fn check_index(&self) -> HealthCheck {
        let name = "Article Index";
        let manager = match IndexManager::new(&self.config.search) {
            Ok(manager) => manager,
            Err(e) => return HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
        };

        match manager.exists().await {
            Ok(true) => HealthCheck::new(name, HealthStatus::Pass),
            Ok(false) => HealthCheck::new(
                name,
                HealthStatus::Fail(format!(
                    "Index '{}' not found (run `newsbuddy index --file <jsonl>`)",
                    self.config.search.index
                )),
            ),
            Err(e) => HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
        }
    }

    /// Missing state dir is only a warning: it is created on first save
    fn check_state_dir(&self) -> HealthCheck {
        let dir = self.config.state_dir();
        if dir.is_dir() {
            HealthCheck::new("State Directory", HealthStatus::Pass)
        } else {
            HealthCheck::new(
                "State Directory",
                HealthStatus::Warn(format!("{} does not exist yet", dir.display())),
            )
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "NewsBuddy System Diagnostics".bold().cyan());
        println!("{:<20} {}", "Check", "Status");
        println!("{}", "=".repeat(50));

        for check in checks {
            let status = match &check.status {
                HealthStatus::Pass => "PASS".green(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red(),
            };
            println!("{:<20} {}", check.name, status);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

/// Search engine reachability
pub async fn check_search(search: &dyn ArticleSearch) -> HealthCheck {
    if search.ping().await {
        HealthCheck::new("Search Engine", HealthStatus::Pass)
    } else {
        HealthCheck::new(
            "Search Engine",
            HealthStatus::Fail("Search engine not running or not reachable".to_string()),
        )
    }
}

/// Model provider health
pub async fn check_model(model: Arc<dyn GenerativeModel>) -> HealthCheck {
    let name = "Model Provider";
    match model.health_check().await {
        Ok(true) => HealthCheck::new(name, HealthStatus::Pass),
        Ok(false) => HealthCheck::new(
            name,
            HealthStatus::Fail(format!("{} model '{}' unavailable", model.name(), model.model())),
        ),
        Err(e) => HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
    }
}
