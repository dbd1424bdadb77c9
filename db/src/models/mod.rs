//! Entities shared by the primary and the fallback store.
//!
//! Every model derives `Serialize`/`Deserialize` with its column names, so the
//! fallback collections hold exactly the rows the primary store holds.

pub mod group;
pub mod question;
pub mod student;
pub mod subject;
pub mod task;
pub mod teacher;
pub mod types;

pub use group::Entity as Group;
pub use question::Entity as Question;
pub use student::Entity as Student;
pub use subject::Entity as Subject;
pub use task::Entity as Task;
pub use teacher::Entity as Teacher;
pub use test::Entity as Test;
