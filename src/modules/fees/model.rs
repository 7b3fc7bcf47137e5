pub use schoolhub_models::fees::{
    CreateFeeDto, Fee, FeeStatus, FeeStatusCounts, FeeSummary, PaymentMethod, UpdateFeeDto,
};
