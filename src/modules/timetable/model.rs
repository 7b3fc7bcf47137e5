pub use schoolhub_models::timetable::{
    CreateTimetableEntryDto, TimetableEntry, TimetableQuery, UpdateTimetableEntryDto, Weekday,
};
