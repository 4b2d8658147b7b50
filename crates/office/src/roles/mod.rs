//! The actors of the office: one patient per client, one staff member per server.

mod doctor;
mod nurse;
mod patient;
mod receptionist;

pub use doctor::Doctor;
pub use nurse::Nurse;
pub use patient::Patient;
pub use receptionist::Receptionist;
