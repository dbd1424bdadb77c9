pub mod app;

pub use app::{TestApp, call, get_json_body, make_fallback_app, make_test_app, request};
