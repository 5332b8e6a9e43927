pub mod auth_service;
pub mod feed_service;
pub mod follow_service;
pub mod post_service;
