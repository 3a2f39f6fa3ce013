pub mod application;
pub mod department;
pub mod feedback;
pub mod internship;
pub mod internship_supervision;
pub mod report;
pub mod task;
pub mod task_submission;
pub mod user;

pub use application::Entity as Application;
pub use department::Entity as Department;
pub use feedback::Entity as Feedback;
pub use internship::Entity as Internship;
pub use internship_supervision::Entity as InternshipSupervision;
pub use report::Entity as Report;
pub use task::Entity as Task;
pub use task_submission::Entity as TaskSubmission;
pub use user::Entity as User;
