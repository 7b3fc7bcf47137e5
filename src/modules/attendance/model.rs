pub use schoolhub_models::attendance::{
    Attendance, AttendanceMark, AttendanceStatus, ClassAttendanceQuery, MarkAttendanceDto,
    MarkAttendanceResponse, StudentAttendanceQuery, UpdateAttendanceDto,
};
