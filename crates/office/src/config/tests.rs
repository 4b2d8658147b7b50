use super::{OfficeConfig, MAX_CLIENTS, MAX_SERVERS, RECEPTIONISTS};
use crate::error::OfficeError;

#[test]
fn equal_pools_by_default() {
    let cfg = OfficeConfig::new(2, 7);
    assert_eq!(cfg.nurses, 2);
    assert_eq!(cfg.doctors, 2);
    assert_eq!(cfg.patients, 7);
    assert_eq!(cfg.receptionists(), RECEPTIONISTS);
    assert!(cfg.validate().is_ok());
}

#[test]
fn doctor_pool_can_differ_from_nurse_pool() {
    let cfg = OfficeConfig::new(1, 4).with_doctors(3);
    assert_eq!(cfg.nurses, 1);
    assert_eq!(cfg.doctors, 3);
    assert!(cfg.validate().is_ok());
}

#[test]
fn every_bound_is_accepted() {
    for servers in 1..=MAX_SERVERS {
        for patients in 1..=MAX_CLIENTS {
            assert!(OfficeConfig::new(servers, patients).validate().is_ok());
        }
    }
}

#[test]
fn too_many_servers_is_rejected() {
    let err = OfficeConfig::new(4, 3).validate().unwrap_err();
    assert!(matches!(err, OfficeError::Config(_)));
    assert_eq!(err.to_string(), "Doctor count is invalid. Max of 3, min of 1");
}

#[test]
fn zero_servers_is_rejected() {
    assert!(OfficeConfig::new(0, 3).validate().is_err());
    assert!(OfficeConfig::new(2, 3).with_doctors(0).validate().is_err());
}

#[test]
fn patient_bounds_are_enforced() {
    let err = OfficeConfig::new(1, 0).validate().unwrap_err();
    assert_eq!(err.to_string(), "Patient count is invalid. Max of 15, min of 1");
    assert!(OfficeConfig::new(1, 16).validate().is_err());
}

#[test]
fn display_lists_every_population() {
    let cfg = OfficeConfig::new(2, 5).with_doctors(3);
    assert_eq!(cfg.to_string(), "5 patients, 2 nurses, 3 doctors");
}
