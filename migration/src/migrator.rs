use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202610190001_create_teachers::Migration),
            Box::new(migrations::m202610190002_create_groups::Migration),
            Box::new(migrations::m202610190003_create_questions::Migration),
            Box::new(migrations::m202610190004_create_tests::Migration),
            Box::new(migrations::m202610190005_create_students::Migration),
            Box::new(migrations::m202610190006_create_tasks::Migration),
            Box::new(migrations::m202610190007_create_subjects::Migration),
        ]
    }
}
