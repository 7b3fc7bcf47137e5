use schoolhub_core::Role;
use schoolhub_models::attendance::{
    Attendance, AttendanceMark, AttendanceStatus, MarkAttendanceDto, MarkAttendanceResponse,
    UpdateAttendanceDto,
};
use schoolhub_models::classes::{Class, CreateClassDto, UpdateClassDto};
use schoolhub_models::fees::{
    CreateFeeDto, Fee, FeeStatus, FeeStatusCounts, FeeSummary, PaymentMethod, UpdateFeeDto,
};
use schoolhub_models::principals::{
    CreateStudentDto, CreateTeacherDto, Gender, IssuedCredentials, PrincipalProfile,
    UpdateStudentDto, UpdateTeacherDto,
};
use schoolhub_models::schools::{
    CreateSchoolAdminDto, DeactivateSchoolResponse, RegisterSchoolDto, School, UpdateSchoolDto,
};
use schoolhub_models::stats::{PlatformStats, SchoolStats, UserBreakdown};
use schoolhub_models::timetable::{
    CreateTimetableEntryDto, TimetableEntry, UpdateTimetableEntryDto, Weekday,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    CheckSuperAdminResponse, LoginRequest, LoginResponse, LoginUser, MessageResponse,
    RegisterSchoolResponse,
};
use crate::modules::schools::model::SchoolAdminCreatedResponse;
use crate::modules::students::model::StudentCreatedResponse;
use crate::modules::teachers::model::TeacherCreatedResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::register_school,
        crate::modules::auth::controller::check_super_admin,
        crate::modules::auth::controller::get_me,
        crate::modules::schools::controller::get_schools,
        crate::modules::schools::controller::get_school,
        crate::modules::schools::controller::update_school,
        crate::modules::schools::controller::delete_school,
        crate::modules::schools::controller::create_school_admin,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::timetable::controller::get_timetable,
        crate::modules::timetable::controller::get_entry,
        crate::modules::timetable::controller::create_entry,
        crate::modules::timetable::controller::update_entry,
        crate::modules::timetable::controller::delete_entry,
        crate::modules::attendance::controller::mark_attendance,
        crate::modules::attendance::controller::get_class_attendance,
        crate::modules::attendance::controller::get_student_attendance,
        crate::modules::attendance::controller::update_attendance,
        crate::modules::fees::controller::get_class_fees,
        crate::modules::fees::controller::get_student_fees,
        crate::modules::fees::controller::create_fee,
        crate::modules::fees::controller::update_fee,
        crate::modules::fees::controller::delete_fee,
        crate::modules::fees::controller::get_fee_summary,
        crate::modules::stats::controller::get_stats,
        crate::modules::stats::controller::get_platform_stats,
    ),
    components(
        schemas(
            Role,
            ErrorResponse,
            MessageResponse,
            LoginRequest,
            LoginResponse,
            LoginUser,
            CheckSuperAdminResponse,
            RegisterSchoolDto,
            RegisterSchoolResponse,
            School,
            UpdateSchoolDto,
            DeactivateSchoolResponse,
            CreateSchoolAdminDto,
            SchoolAdminCreatedResponse,
            PrincipalProfile,
            IssuedCredentials,
            Gender,
            CreateTeacherDto,
            UpdateTeacherDto,
            TeacherCreatedResponse,
            CreateStudentDto,
            UpdateStudentDto,
            StudentCreatedResponse,
            Class,
            CreateClassDto,
            UpdateClassDto,
            Weekday,
            TimetableEntry,
            CreateTimetableEntryDto,
            UpdateTimetableEntryDto,
            AttendanceStatus,
            Attendance,
            AttendanceMark,
            MarkAttendanceDto,
            MarkAttendanceResponse,
            UpdateAttendanceDto,
            FeeStatus,
            PaymentMethod,
            Fee,
            CreateFeeDto,
            UpdateFeeDto,
            FeeSummary,
            FeeStatusCounts,
            SchoolStats,
            PlatformStats,
            UserBreakdown,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and school registration"),
        (name = "Schools", description = "School management"),
        (name = "Teachers", description = "Teacher accounts of a school"),
        (name = "Students", description = "Student accounts of a school"),
        (name = "Classes", description = "Classes of a school"),
        (name = "Timetable", description = "Weekly timetable with slot conflict checks"),
        (name = "Attendance", description = "Daily attendance"),
        (name = "Fees", description = "Fee records and summaries"),
        (name = "Stats", description = "Admin dashboard counters")
    ),
    info(
        title = "SchoolHub API",
        version = "0.1.0",
        description = "Multi-tenant school administration API built with Rust, Axum and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
