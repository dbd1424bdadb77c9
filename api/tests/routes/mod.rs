mod attempt_test;
mod groups_test;
mod health_test;
mod questions_test;
mod students_test;
mod subjects_test;
mod tasks_test;
mod teachers_test;
