//! Component auditor.
//!
//! Reduces endpoint health to a per-component verdict over the fixed
//! [`COMPONENTS`] table. Every dependency of a component must resolve; only
//! the dependencies selected by the [`SamplingPolicy`] are actually called.

mod components;
mod config;


pub use components::*;
pub use config::*;

use crate::client::{ApiSurface, Endpoint};
use crate::scanner::{RunGuard, ScanError};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use std::time::Duration;

pub struct AppAuditor {
    api: Arc<dyn ApiSurface>,
    config: AuditConfig,
    components: Vec<ComponentSpec>,
    results: RwLock<Vec<ComponentAudit>>,
    running: AtomicBool,
}

impl AppAuditor {
    pub fn new(api: Arc<dyn ApiSurface>, config: AuditConfig) -> Self {
        Self {
            api,
            config,
            components: COMPONENTS.to_vec(),
            results: RwLock::new(Vec::new()),
            running: AtomicBool::new(false),
        }
    }

    /// Audit `components` instead of the built-in table.
    pub fn with_components(mut self, components: Vec<ComponentSpec>) -> Self {
        self.components = components;
        self
    }

    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    /// Audit a single component.
    pub async fn audit(&self, spec: &ComponentSpec) -> ComponentAudit {
        let mut audit = ComponentAudit::pending(spec);

        if spec.dependencies.is_empty() {
            audit.import_verified = true;
            audit.call_verified = true;
            audit.payload_valid = true;
            audit.status = AuditStatus::Ok;
            return audit;
        }

        let mut errors = Vec::new();

        let missing: Vec<&str> = spec
            .dependencies
            .iter()
            .filter(|dep| self.api.resolve(**dep).is_none())
            .map(|dep| dep.path())
            .collect();
        audit.import_verified = missing.is_empty();

        if audit.import_verified {
            let sampled: &[Endpoint] = match self.config.sampling {
                SamplingPolicy::FirstDependency => &spec.dependencies[..1],
                SamplingPolicy::AllDependencies => spec.dependencies,
            };

            let mut calls_ok = true;
            let mut payloads_ok = true;
            for &dep in sampled {
                match self.call(dep).await {
                    Ok(payload) => payloads_ok &= !payload.is_null(),
                    Err(message) => {
                        calls_ok = false;
                        payloads_ok = false;
                        errors.push(format!("{}: {}", dep.path(), message));
                    }
                }
            }
            audit.call_verified = calls_ok;
            audit.payload_valid = payloads_ok;
        } else {
            errors.push(format!("Unresolved dependencies: {}", missing.join(", ")));
        }

        audit.status = if audit.import_verified && audit.call_verified && audit.payload_valid {
            AuditStatus::Ok
        } else {
            AuditStatus::Fail
        };
        if !errors.is_empty() {
            audit.error_log = Some(errors.join("\n"));
        }
        audit
    }

    async fn call(&self, endpoint: Endpoint) -> Result<serde_json::Value, String> {
        let budget = Duration::from_millis(self.config.call_timeout_ms);
        match tokio::time::timeout(budget, self.api.invoke(endpoint, endpoint.dummy_args())).await
        {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(_) => Err(format!("Timeout after {}ms", self.config.call_timeout_ms)),
        }
    }

    /// Audit every component in table order.
    pub async fn run_full_app_audit<F>(
        &self,
        mut on_progress: F,
    ) -> Result<Vec<ComponentAudit>, ScanError>
    where
        F: FnMut(&ComponentAudit),
    {
        let _guard = RunGuard::acquire(&self.running, "audit")?;
        tracing::info!(components = self.components.len(), "App audit started");

        let mut results = Vec::with_capacity(self.components.len());
        for spec in &self.components {
            let audit = self.audit(spec).await;
            tracing::debug!(
                component = spec.name,
                status = ?audit.status,
                "Component audited"
            );
            on_progress(&audit);
            results.push(audit);

            let pacing = if spec.dependencies.is_empty() {
                self.config.trivial_pacing_ms
            } else {
                self.config.pacing_ms
            };
            if pacing > 0 {
                tokio::time::sleep(Duration::from_millis(pacing)).await;
            }
        }

        let failed = results
            .iter()
            .filter(|a| a.status == AuditStatus::Fail)
            .count();
        metrics::gauge!("livego_audit_failed_components").set(failed as f64);
        tracing::info!(total = results.len(), failed, "App audit completed");

        *self.results.write().unwrap_or_else(|p| p.into_inner()) = results.clone();
        Ok(results)
    }

    /// Results of the most recent completed audit.
    pub fn last_results(&self) -> Vec<ComponentAudit> {
        self.results
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}
