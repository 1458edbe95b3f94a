pub mod redis;
pub mod rate_limiter;
pub mod quota_manager;
pub mod quota_store;
pub mod metrics;
pub mod validator;
pub mod origin_guard;
pub mod prompt_builder;
pub mod image_provider;
pub mod gateway;
