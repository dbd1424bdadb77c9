pub mod m202610190001_create_teachers;
pub mod m202610190002_create_groups;
pub mod m202610190003_create_questions;
pub mod m202610190004_create_tests;
pub mod m202610190005_create_students;
pub mod m202610190006_create_tasks;
pub mod m202610190007_create_subjects;
