pub mod classifier_service;
pub mod ping_service;
pub mod pizza_service;
