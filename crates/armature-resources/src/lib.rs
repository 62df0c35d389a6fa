//! Per-kind resource builders for armature.
//!
//! Each module implements the core builder protocol for one provider
//! resource kind and declares its `ResourceType` constants:
//! - Storage accounts
//! - Log-analytics workspaces
//! - Event-hub namespaces, hubs, and authorization rules
//! - Virtual networks and subnets
//! - Application gateways with backend pools
//! - Diagnostic settings (metric/log routing to sinks)

pub mod application_gateway;
pub mod diagnostic_settings;
pub mod event_hub;
pub mod log_analytics;
pub mod storage_account;
pub mod virtual_network;

pub use application_gateway::ApplicationGatewayConfig;
pub use diagnostic_settings::DiagnosticSettingsConfig;
pub use event_hub::EventHubConfig;
pub use log_analytics::LogAnalyticsConfig;
pub use storage_account::StorageAccountConfig;
pub use virtual_network::VirtualNetworkConfig;
