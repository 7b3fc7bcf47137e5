//! Login identifier and one-time password generation.
//!
//! Identifiers are short numerals that people can type:
//!
//! - students (and school admins): the last three digits of the admission year,
//!   zero padded, followed by a five digit random numeral, e.g. `02412345`
//! - teachers: a bare five digit random numeral, e.g. `48213`
//!
//! Random numerals are drawn from `10000..=99999` so they always have five digits.
//! Uniqueness is not decided here; callers retry against the store.

use rand::Rng;
use rand::distributions::Alphanumeric;

pub const PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIdKind {
    Student { admission_year: i32 },
    Teacher,
}

pub fn generate_login_id(kind: LoginIdKind) -> String {
    generate_login_id_with(&mut rand::thread_rng(), kind)
}

pub fn generate_login_id_with<R: Rng + ?Sized>(rng: &mut R, kind: LoginIdKind) -> String {
    let numeral: u32 = rng.gen_range(10_000..=99_999);
    match kind {
        LoginIdKind::Student { admission_year } => {
            format!("{:03}{}", admission_year.rem_euclid(1000), numeral)
        }
        LoginIdKind::Teacher => numeral.to_string(),
    }
}

pub fn generate_password() -> String {
    generate_password_with(&mut rand::thread_rng())
}

pub fn generate_password_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}
