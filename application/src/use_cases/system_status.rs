//! System status use case.
//!
//! Backs the `health` and `status` commands: a per-component health map and
//! a snapshot of both models plus the workflow settings.

use crate::config::WorkflowParams;
use crate::ports::model_gateway::ModelGateway;
use crate::use_cases::analyze_context::ContextRouter;
use duet_domain::ModelInfo;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Health of a single component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentHealth {
    Healthy,
    Unhealthy,
}

impl ComponentHealth {
    pub fn from_check(ok: bool) -> Self {
        if ok { Self::Healthy } else { Self::Unhealthy }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl std::fmt::Display for ComponentHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Component name → health, in a fixed display order.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub orchestrator: ComponentHealth,
    pub planner: ComponentHealth,
    pub heavylifter: ComponentHealth,
    pub context_router: ComponentHealth,
}

impl HealthReport {
    pub fn entries(&self) -> [(&'static str, ComponentHealth); 4] {
        [
            ("orchestrator", self.orchestrator),
            ("planner", self.planner),
            ("heavylifter", self.heavylifter),
            ("context_router", self.context_router),
        ]
    }

    pub fn all_healthy(&self) -> bool {
        self.entries().iter().all(|(_, health)| health.is_healthy())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSettings {
    pub verification_enabled: bool,
    pub max_iterations: u32,
    pub debate_rounds: u32,
    pub streaming_threshold: u64,
    pub small_threshold: u64,
    pub medium_threshold: u64,
}

/// Model info for both gateways plus the active workflow settings.
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub planner: ModelInfo,
    pub heavylifter: ModelInfo,
    pub settings: WorkflowSettings,
}

pub struct SystemStatusUseCase<P: ModelGateway + 'static, H: ModelGateway + 'static> {
    planner: Arc<P>,
    heavylifter: Arc<H>,
    router: ContextRouter,
    params: WorkflowParams,
}

impl<P, H> SystemStatusUseCase<P, H>
where
    P: ModelGateway + 'static,
    H: ModelGateway + 'static,
{
    pub fn new(
        planner: Arc<P>,
        heavylifter: Arc<H>,
        router: ContextRouter,
        params: WorkflowParams,
    ) -> Self {
        Self {
            planner,
            heavylifter,
            router,
            params,
        }
    }

    /// Probe both gateways concurrently. Never fails; an unreachable
    /// backend is reported as unhealthy.
    pub async fn health(&self) -> HealthReport {
        let (planner_ok, heavylifter_ok) =
            futures::join!(self.planner.check_health(), self.heavylifter.check_health());

        if !planner_ok {
            warn!(model = %self.planner.model_info().model_name, "Planner health check failed");
        }
        if !heavylifter_ok {
            warn!(
                model = %self.heavylifter.model_info().model_name,
                "HeavyLifter health check failed"
            );
        }

        let report = HealthReport {
            orchestrator: ComponentHealth::Healthy,
            planner: ComponentHealth::from_check(planner_ok),
            heavylifter: ComponentHealth::from_check(heavylifter_ok),
            context_router: ComponentHealth::Healthy,
        };
        info!(all_healthy = report.all_healthy(), "Health check complete");
        report
    }

    pub fn status(&self) -> SystemStatus {
        let policy = self.router.policy();
        SystemStatus {
            planner: self.planner.model_info(),
            heavylifter: self.heavylifter.model_info(),
            settings: WorkflowSettings {
                verification_enabled: self.params.verification_enabled,
                max_iterations: self.params.max_iterations,
                debate_rounds: self.params.debate_rounds,
                streaming_threshold: self.params.streaming_threshold,
                small_threshold: policy.small_threshold(),
                medium_threshold: policy.medium_threshold(),
            },
        }
    }
}
