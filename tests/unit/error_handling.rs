//! Unit tests for error handling and connection checks

use crate::common::{create_mock_driver, reg, MockError, Operation};
use max1704x::{DeviceVariant, Error};

#[test]
fn test_read_failure_basic() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    interface.fail_next_read();

    assert_eq!(
        driver.read_voltage(),
        Err(Error::Bus(MockError::Communication))
    );
}

#[test]
fn test_read_failure_recovery() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    interface.fail_next_read();
    assert!(driver.read_soc().is_err(), "First read should fail");

    interface.set_register(reg::SOC, 0x3200);
    let soc = driver.read_soc().unwrap();
    assert!((soc - 50.0).abs() < 1e-6);
}

#[test]
fn test_write_failure_basic() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17043);

    interface.fail_next_write();

    assert_eq!(
        driver.set_threshold(10),
        Err(Error::Bus(MockError::Communication))
    );
    assert_eq!(interface.get_register(reg::CONFIG), 0x971C);
}

#[test]
fn test_modify_read_failure_skips_write() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    interface.fail_next_read();
    assert!(driver.set_valrt_max(0x10).is_err());
    assert!(interface.writes_to(reg::VALRT).is_empty());
}

#[test]
fn test_status_clear_failure_propagates() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
    interface.fail_next_write();

    assert_eq!(
        driver.is_reset(true),
        Err(Error::Bus(MockError::Communication))
    );
    assert_eq!(interface.get_register(reg::STATUS), 0x0100);
}

#[test]
fn test_sleep_failure_propagates() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
    interface.fail_next_write();

    assert!(driver.sleep().is_err());
    assert!(!driver.is_sleeping().unwrap());
}

#[test]
fn test_connected_legacy() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17043);

    // Legacy parts accept any version
    interface.set_register(reg::VERSION, 0x0003);
    assert!(driver.is_connected().unwrap());

    assert_eq!(
        interface.operations(),
        vec![
            Operation::Probe { ack: true },
            Operation::Read {
                address: reg::VERSION,
                value: 0x0003
            },
        ]
    );
}

#[test]
fn test_connected_requires_version_bit() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    interface.set_register(reg::VERSION, 0x0012);
    assert!(driver.is_connected().unwrap());

    interface.set_register(reg::VERSION, 0x0003);
    assert!(!driver.is_connected().unwrap());

    driver.set_variant(DeviceVariant::Max17043);
    assert!(driver.is_connected().unwrap());
}

#[test]
fn test_not_connected_without_ack() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
    interface.set_ack(false);

    assert!(!driver.is_connected().unwrap());
    assert_eq!(interface.operations(), vec![Operation::Probe { ack: false }]);
}

#[test]
fn test_version_read_failure_propagates() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
    interface.fail_next_read();

    assert_eq!(
        driver.is_connected(),
        Err(Error::Bus(MockError::Communication))
    );
}

#[test]
fn test_begin() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17049);
    assert_eq!(driver.begin(), Ok(()));

    interface.set_ack(false);
    assert_eq!(driver.begin(), Err(Error::NotConnected));

    interface.set_ack(true);
    interface.set_register(reg::VERSION, 0x0000);
    assert_eq!(driver.begin(), Err(Error::NotConnected));
}

#[test]
fn test_release_returns_interface() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
    driver.read_version().unwrap();

    let released = driver.release();
    assert_eq!(released.operation_count(), interface.operation_count());
}
