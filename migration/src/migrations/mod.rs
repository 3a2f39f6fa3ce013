pub mod m202510010001_create_departments;
pub mod m202510010002_create_users;
pub mod m202510010003_create_internships;
pub mod m202510010004_create_applications;
pub mod m202510010005_create_internship_supervisions;
pub mod m202510010006_create_tasks;
pub mod m202510010007_create_task_submissions;
pub mod m202510010008_create_feedback;
pub mod m202510010009_create_reports;
