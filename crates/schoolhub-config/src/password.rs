use crate::env_parse;

/// bcrypt work factor used when hashing new passwords.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
}

impl PasswordConfig {
    pub const MIN_COST: u32 = 4;
    pub const MAX_COST: u32 = 31;

    pub fn from_env() -> Self {
        let cost = env_parse("BCRYPT_COST", 10u32);
        Self {
            bcrypt_cost: cost.clamp(Self::MIN_COST, Self::MAX_COST),
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self { bcrypt_cost: 10 }
    }
}
