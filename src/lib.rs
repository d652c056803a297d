// Helpline - hybrid chat response router
// Library exports

// Core modules
pub mod backends;
pub mod config;
pub mod metrics;
pub mod router;
