pub mod attendance;
pub mod auth;
pub mod classes;
pub mod fees;
pub mod schools;
pub mod stats;
pub mod students;
pub mod teachers;
pub mod timetable;
