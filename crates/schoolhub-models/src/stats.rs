use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Dashboard counters for one school.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchoolStats {
    /// Active teachers.
    pub total_teachers: i64,
    /// Active students.
    pub total_students: i64,
    pub total_classes: i64,
    /// Attendance records dated today.
    pub total_attendance: i64,
    /// Outstanding amount over pending and partial fees.
    pub total_fees: f64,
}

/// Active accounts per school role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserBreakdown {
    pub admins: i64,
    pub teachers: i64,
    pub students: i64,
}

/// Counters for the super-admin dashboard, across every school.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    /// Active schools.
    pub total_schools: i64,
    /// Active accounts of every role, super-admins included.
    pub total_users: i64,
    pub user_breakdown: UserBreakdown,
}
