//! HTTP integration tests driven through the router.

mod auth_test;
mod helpers;
mod notifications_test;
