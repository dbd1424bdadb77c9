pub mod attempt;
pub mod group;
pub mod question;
pub mod student;
pub mod subject;
pub mod teacher;
