use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::{AttendanceId, ClassId, PrincipalId};
use tracing::instrument;

use super::model::{
    Attendance, ClassAttendanceQuery, MarkAttendanceDto, MarkAttendanceResponse,
    StudentAttendanceQuery, UpdateAttendanceDto,
};
use super::service::AttendanceService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_staff_or_self;
use crate::middleware::tenant::Tenant;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Mark attendance for a class
///
/// `attendanceData` is accepted in place of `records`.
#[utoipa::path(
    post,
    path = "/api/attendance/mark",
    params(crate::middleware::tenant::SchoolScopeQuery),
    request_body = MarkAttendanceDto,
    responses(
        (status = 201, description = "Attendance recorded", body = MarkAttendanceResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse),
        (status = 404, description = "Class or student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip_all, fields(principal.id = %auth_user.id()))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Tenant(tenant): Tenant,
    ValidatedJson(dto): ValidatedJson<MarkAttendanceDto>,
) -> Result<(StatusCode, Json<MarkAttendanceResponse>), AppError> {
    let records = AttendanceService::mark_attendance(
        &tenant,
        &auth_user.0,
        dto,
        state.attendance_config.policy,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MarkAttendanceResponse {
            message: "Attendance marked successfully".to_string(),
            records,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/attendance/class/{classId}",
    params(
        ("classId" = ClassId, Path, description = "Class ID"),
        ClassAttendanceQuery,
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Records of the class for the day", body = Vec<Attendance>),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip_all, fields(class.id = %class_id))]
pub async fn get_class_attendance(
    Tenant(tenant): Tenant,
    Path(class_id): Path<ClassId>,
    Query(query): Query<ClassAttendanceQuery>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    let records = AttendanceService::class_attendance(&tenant, class_id, query.date).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/attendance/student/{studentId}",
    params(
        ("studentId" = PrincipalId, Path, description = "Student ID"),
        StudentAttendanceQuery,
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Records of the student, newest first", body = Vec<Attendance>),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip_all, fields(student.id = %student_id))]
pub async fn get_student_attendance(
    auth_user: AuthUser,
    Tenant(tenant): Tenant,
    Path(student_id): Path<PrincipalId>,
    Query(query): Query<StudentAttendanceQuery>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    require_staff_or_self(&auth_user.0, student_id)?;
    let records = AttendanceService::student_attendance(
        &tenant,
        student_id,
        query.start_date,
        query.end_date,
    )
    .await?;
    Ok(Json(records))
}

#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(
        ("id" = AttendanceId, Path, description = "Attendance record ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    request_body = UpdateAttendanceDto,
    responses(
        (status = 200, description = "Record updated", body = Attendance),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip_all, fields(attendance.id = %id))]
pub async fn update_attendance(
    Tenant(tenant): Tenant,
    Path(id): Path<AttendanceId>,
    ValidatedJson(dto): ValidatedJson<UpdateAttendanceDto>,
) -> Result<Json<Attendance>, AppError> {
    Ok(Json(
        AttendanceService::update_attendance(&tenant, id, dto).await?,
    ))
}
