//! Fee records and the per-class fee summary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::{ClassId, FeeId, PrincipalId, SchoolId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "fee_status", rename_all = "lowercase")]
pub enum FeeStatus {
    #[default]
    Pending,
    Paid,
    Partial,
}

impl FeeStatus {
    /// Paid and partial fees must record how and with which receipt they were paid.
    pub fn requires_payment_details(self) -> bool {
        matches!(self, FeeStatus::Paid | FeeStatus::Partial)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Online,
    Cheque,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: FeeId,
    pub school_id: SchoolId,
    pub student_id: PrincipalId,
    pub class_id: ClassId,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: FeeStatus,
    pub paid_amount: f64,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub receipt_number: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fee {
    pub fn outstanding(&self) -> f64 {
        self.amount - self.paid_amount
    }

    /// Re-checks payment rules after a partial update was applied.
    pub fn validate_payment(&self) -> Result<(), ValidationError> {
        check_payment(
            self.amount,
            self.status,
            self.paid_amount,
            self.payment_method,
            self.receipt_number.as_deref(),
        )
    }
}

pub fn check_payment(
    amount: f64,
    status: FeeStatus,
    paid_amount: f64,
    method: Option<PaymentMethod>,
    receipt_number: Option<&str>,
) -> Result<(), ValidationError> {
    if paid_amount < 0.0 || paid_amount > amount {
        return Err(ValidationError::new("paid_amount")
            .with_message("paidAmount must be between 0 and amount".into()));
    }
    if status.requires_payment_details() {
        if method.is_none() {
            return Err(ValidationError::new("payment_method").with_message(
                "paymentMethod is required when status is paid or partial".into(),
            ));
        }
        if receipt_number.is_none_or(|r| r.trim().is_empty()) {
            return Err(ValidationError::new("receipt_number").with_message(
                "receiptNumber is required when status is paid or partial".into(),
            ));
        }
    }
    Ok(())
}

fn validate_create_payment(dto: &CreateFeeDto) -> Result<(), ValidationError> {
    check_payment(
        dto.amount,
        dto.status.unwrap_or_default(),
        dto.paid_amount.unwrap_or(0.0),
        dto.payment_method,
        dto.receipt_number.as_deref(),
    )
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_payment"))]
pub struct CreateFeeDto {
    pub student_id: PrincipalId,
    pub class_id: ClassId,
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: Option<FeeStatus>,
    pub paid_amount: Option<f64>,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    #[validate(length(min = 1, max = 100))]
    pub receipt_number: Option<String>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

impl CreateFeeDto {
    pub fn into_fee(self, school_id: SchoolId) -> Fee {
        let now = Utc::now();
        Fee {
            id: FeeId::new(),
            school_id,
            student_id: self.student_id,
            class_id: self.class_id,
            amount: self.amount,
            due_date: self.due_date,
            status: self.status.unwrap_or_default(),
            paid_amount: self.paid_amount.unwrap_or(0.0),
            payment_date: self.payment_date,
            payment_method: self.payment_method,
            receipt_number: self.receipt_number,
            remarks: self.remarks,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeDto {
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<FeeStatus>,
    pub paid_amount: Option<f64>,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    #[validate(length(min = 1, max = 100))]
    pub receipt_number: Option<String>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

impl UpdateFeeDto {
    pub fn apply(self, fee: &mut Fee) {
        if let Some(v) = self.amount {
            fee.amount = v;
        }
        if let Some(v) = self.due_date {
            fee.due_date = v;
        }
        if let Some(v) = self.status {
            fee.status = v;
        }
        if let Some(v) = self.paid_amount {
            fee.paid_amount = v;
        }
        if let Some(v) = self.payment_date {
            fee.payment_date = Some(v);
        }
        if let Some(v) = self.payment_method {
            fee.payment_method = Some(v);
        }
        if let Some(v) = self.receipt_number {
            fee.receipt_number = Some(v);
        }
        if let Some(v) = self.remarks {
            fee.remarks = Some(v);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeeStatusCounts {
    pub pending: u64,
    pub paid: u64,
    pub partial: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeSummary {
    pub total_amount: f64,
    pub total_paid: f64,
    pub total_pending: f64,
    pub status_counts: FeeStatusCounts,
}

impl FeeSummary {
    pub fn from_fees<'a>(fees: impl IntoIterator<Item = &'a Fee>) -> Self {
        fees.into_iter().fold(Self::default(), |mut acc, fee| {
            acc.total_amount += fee.amount;
            acc.total_paid += fee.paid_amount;
            acc.total_pending += fee.outstanding();
            match fee.status {
                FeeStatus::Pending => acc.status_counts.pending += 1,
                FeeStatus::Paid => acc.status_counts.paid += 1,
                FeeStatus::Partial => acc.status_counts.partial += 1,
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fee(amount: f64, paid: f64, status: FeeStatus) -> Fee {
        CreateFeeDto {
            student_id: PrincipalId::new(),
            class_id: ClassId::new(),
            amount,
            due_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            status: Some(status),
            paid_amount: Some(paid),
            payment_date: None,
            payment_method: Some(PaymentMethod::Cash),
            receipt_number: Some("R-1".into()),
            remarks: None,
        }
        .into_fee(SchoolId::new("GF-01"))
    }

    #[test]
    fn paid_fee_requires_method_and_receipt() {
        let dto: CreateFeeDto = serde_json::from_value(json!({
            "studentId": PrincipalId::new(),
            "classId": ClassId::new(),
            "amount": 100.0,
            "dueDate": "2024-12-01",
            "status": "paid",
            "paidAmount": 100.0
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn pending_fee_needs_no_payment_details() {
        let dto: CreateFeeDto = serde_json::from_value(json!({
            "studentId": PrincipalId::new(),
            "classId": ClassId::new(),
            "amount": 100.0,
            "dueDate": "2024-12-01"
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.into_fee(SchoolId::new("GF-01")).status, FeeStatus::Pending);
    }

    #[test]
    fn overpayment_is_rejected() {
        let mut f = fee(100.0, 50.0, FeeStatus::Partial);
        UpdateFeeDto {
            paid_amount: Some(150.0),
            ..Default::default()
        }
        .apply(&mut f);
        assert!(f.validate_payment().is_err());
    }

    #[test]
    fn summary_totals_and_counts() {
        let fees = vec![
            fee(100.0, 0.0, FeeStatus::Pending),
            fee(200.0, 200.0, FeeStatus::Paid),
            fee(300.0, 100.0, FeeStatus::Partial),
        ];
        let summary = FeeSummary::from_fees(&fees);
        assert_eq!(summary.total_amount, 600.0);
        assert_eq!(summary.total_paid, 300.0);
        assert_eq!(summary.total_pending, 300.0);
        assert_eq!(
            summary.status_counts,
            FeeStatusCounts {
                pending: 1,
                paid: 1,
                partial: 1
            }
        );
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let none: Vec<Fee> = Vec::new();
        let summary = FeeSummary::from_fees(&none);
        assert_eq!(summary, FeeSummary::default());
    }
}
