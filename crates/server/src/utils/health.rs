//! Liveness report served on `GET /healthz`

use chrono::Utc;
use serde::Serialize;

/// Overall health of the service
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub components: Vec<ComponentHealth>,
    /// Unix timestamp when the check ran
    pub timestamp: i64,
}

impl HealthStatus {
    pub fn new() -> Self {
        Self { is_healthy: true, components: Vec::new(), timestamp: Utc::now().timestamp() }
    }

    /// Add a component; the service is healthy only while all components are
    #[must_use]
    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.is_healthy &= component.is_healthy;
        self.components.push(component);
        self
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: Some(message.into()) }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_status_is_healthy_and_empty() {
        let status = HealthStatus::new();
        assert!(status.is_healthy);
        assert!(status.components.is_empty());
    }

    #[test]
    fn one_unhealthy_component_marks_status_unhealthy() {
        let status = HealthStatus::new()
            .add_component(ComponentHealth::healthy("sessions", "2 active"))
            .add_component(ComponentHealth::unhealthy("graph", "unreachable"));

        assert!(!status.is_healthy);
        assert_eq!(status.components.len(), 2);
        assert_eq!(status.components[1].message.as_deref(), Some("unreachable"));
    }
}
