use super::{OfficeConfig, MAX_CLIENTS, MAX_SERVERS};
use crate::error::OfficeError;

impl OfficeConfig {
    /// Validate population bounds before any thread is created.
    pub fn validate(&self) -> Result<(), OfficeError> {
        Self::validate_pool(self.nurses)?;
        Self::validate_pool(self.doctors)?;
        self.validate_patients()?;
        Ok(())
    }

    fn validate_pool(servers: usize) -> Result<(), OfficeError> {
        if (1..=MAX_SERVERS).contains(&servers) {
            Ok(())
        } else {
            Err(OfficeError::Config(format!(
                "Doctor count is invalid. Max of {MAX_SERVERS}, min of 1"
            )))
        }
    }

    fn validate_patients(&self) -> Result<(), OfficeError> {
        if (1..=MAX_CLIENTS).contains(&self.patients) {
            Ok(())
        } else {
            Err(OfficeError::Config(format!(
                "Patient count is invalid. Max of {MAX_CLIENTS}, min of 1"
            )))
        }
    }
}
