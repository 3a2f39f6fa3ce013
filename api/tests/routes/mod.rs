mod admin_test;
mod auth_test;
mod health_test;
mod internship_delete_test;
mod student_test;
