pub use schoolhub_models::auth::{
    CheckSuperAdminResponse, LoginRequest, LoginResponse, LoginUser, MessageResponse,
    RegisterSchoolResponse,
};
pub use schoolhub_models::principals::{IssuedCredentials, PrincipalProfile};
pub use schoolhub_models::schools::RegisterSchoolDto;
