pub mod application_service;
pub mod dashboard_service;
pub mod error;
pub mod internship_removal;
pub mod internship_service;
pub mod retry;
pub mod supervision_service;
pub mod task_service;
pub mod user_service;
