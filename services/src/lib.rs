//! Domain services of the assessment platform.
//!
//! Every operation takes a [`Session`]: the store selected for the request plus
//! the shared lock registry. Policy lives here once and runs unchanged against
//! either backend.

pub mod access_gate;
pub mod assignment_graph;
pub mod error;
pub mod identity_allocator;
pub mod population;
pub mod question_service;
pub mod session;
pub mod student_service;
pub mod subject_service;
pub mod submission_engine;
pub mod task_service;
pub mod teacher_service;
pub mod test_service;

pub use error::{ServiceError, ServiceResult};
pub use session::{Actor, Session};
