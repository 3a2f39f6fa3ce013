use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202510010001_create_departments::Migration),
            Box::new(migrations::m202510010002_create_users::Migration),
            Box::new(migrations::m202510010003_create_internships::Migration),
            Box::new(migrations::m202510010004_create_applications::Migration),
            Box::new(migrations::m202510010005_create_internship_supervisions::Migration),
            Box::new(migrations::m202510010006_create_tasks::Migration),
            Box::new(migrations::m202510010007_create_task_submissions::Migration),
            Box::new(migrations::m202510010008_create_feedback::Migration),
            Box::new(migrations::m202510010009_create_reports::Migration),
        ]
    }
}
