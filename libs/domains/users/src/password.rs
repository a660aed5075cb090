//! Password hashing collaborator

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng},
};

use crate::error::{UserError, UserResult};

/// One-way, salted password hashing
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash string with a fresh salt
    fn hash(&self, password: &str) -> UserResult<String>;
}

/// Argon2id with a fixed work factor
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// `work_factor` is the Argon2 time cost (iterations); memory and lanes use the defaults.
    pub fn new(work_factor: u32) -> UserResult<Self> {
        Self::with_params(Params::DEFAULT_M_COST, work_factor, Params::DEFAULT_P_COST)
    }

    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> UserResult<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }
}
