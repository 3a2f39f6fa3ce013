pub mod app;

pub use app::{bearer, body_json, create_user, make_test_app};
