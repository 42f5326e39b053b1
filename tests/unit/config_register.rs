//! Unit tests for the CONFIG register: threshold, RCOMP, ALRT and ALSC

use crate::common::{create_mock_driver, reg, Operation};
use max1704x::{DeviceVariant, Error};

#[test]
fn test_default_threshold() {
    let (mut driver, _interface) = create_mock_driver(DeviceVariant::Max17048);

    // CONFIG default 0x971C: ATHD = 0x1C -> 4%
    assert_eq!(driver.read_threshold().unwrap(), 4);
}

#[test]
fn test_threshold_round_trip() {
    for variant in [DeviceVariant::Max17043, DeviceVariant::Max17048] {
        let (mut driver, _interface) = create_mock_driver(variant);

        for percent in 1..=32 {
            driver.set_threshold(percent).unwrap();
            assert_eq!(driver.read_threshold().unwrap(), percent);
        }
    }
}

#[test]
fn test_threshold_encoding() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    driver.set_threshold(32).unwrap();
    assert_eq!(interface.get_register(reg::CONFIG) & 0x1F, 0);

    driver.set_threshold(1).unwrap();
    assert_eq!(interface.get_register(reg::CONFIG) & 0x1F, 31);
}

#[test]
fn test_threshold_out_of_range() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    for percent in [0, 33, 50, 255] {
        assert_eq!(driver.set_threshold(percent), Err(Error::InvalidArgument));
    }

    assert_eq!(interface.operation_count(), 0);
    assert_eq!(interface.get_register(reg::CONFIG), 0x971C);
}

#[test]
fn test_threshold_preserves_other_fields() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    // RCOMP 0x97, SLEEP, ALSC and ALRT set, ATHD 0x1C
    interface.set_register(reg::CONFIG, 0x97FC);

    driver.set_threshold(10).unwrap();

    // ATHD = 32 - 10 = 0x16
    assert_eq!(interface.get_register(reg::CONFIG), 0x97F6);
    assert_eq!(
        interface.operations(),
        vec![
            Operation::Read {
                address: reg::CONFIG,
                value: 0x97FC
            },
            Operation::Write {
                address: reg::CONFIG,
                value: 0x97F6
            },
        ]
    );
}

#[test]
fn test_compensation() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17043);

    assert_eq!(driver.read_compensation().unwrap(), 0x97);

    driver.set_compensation(0x4D).unwrap();
    assert_eq!(interface.get_register(reg::CONFIG), 0x4D1C);
    assert_eq!(driver.read_compensation().unwrap(), 0x4D);
}

#[test]
fn test_read_alert_without_clear() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17043);
    interface.set_register(reg::CONFIG, 0x973C);

    assert!(driver.read_alert(false).unwrap());
    assert_eq!(interface.get_register(reg::CONFIG), 0x973C);
    assert!(interface.writes_to(reg::CONFIG).is_empty());
}

#[test]
fn test_read_alert_with_clear() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17043);
    interface.set_register(reg::CONFIG, 0x973C);

    assert!(driver.read_alert(true).unwrap());

    // Written back from the value just read, no second read
    assert_eq!(
        interface.operations(),
        vec![
            Operation::Read {
                address: reg::CONFIG,
                value: 0x973C
            },
            Operation::Write {
                address: reg::CONFIG,
                value: 0x971C
            },
        ]
    );

    assert!(!driver.read_alert(true).unwrap());
}

#[test]
fn test_read_alert_clear_when_not_set() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    assert!(!driver.read_alert(true).unwrap());
    assert_eq!(interface.operation_count(), 1);
}

#[test]
fn test_clear_alert() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17044);
    interface.set_register(reg::CONFIG, 0x973C);

    driver.clear_alert().unwrap();
    assert_eq!(interface.get_register(reg::CONFIG), 0x971C);
}

#[test]
fn test_soc_alert_enable_disable() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    assert!(!driver.is_soc_alert_enabled().unwrap());

    interface.clear_operations();
    driver.enable_soc_alert().unwrap();
    assert_eq!(interface.get_register(reg::CONFIG), 0x975C);

    // Read-modify-write followed by a verifying read
    let ops = interface.operations();
    assert_eq!(ops.len(), 3);
    assert!(matches!(ops[2], Operation::Read { address: reg::CONFIG, .. }));

    assert!(driver.is_soc_alert_enabled().unwrap());

    driver.disable_soc_alert().unwrap();
    assert_eq!(interface.get_register(reg::CONFIG), 0x971C);
}

#[test]
fn test_soc_alert_verify_failure() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17049);
    interface.lock_bits(reg::CONFIG, 0x0040);

    assert_eq!(driver.enable_soc_alert(), Err(Error::Verify));

    interface.set_register(reg::CONFIG, 0x975C);
    assert_eq!(driver.disable_soc_alert(), Err(Error::Verify));
}

#[test]
fn test_is_sleeping() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17043);
    assert!(!driver.is_sleeping().unwrap());

    interface.set_register(reg::CONFIG, 0x979C);
    assert!(driver.is_sleeping().unwrap());
}
