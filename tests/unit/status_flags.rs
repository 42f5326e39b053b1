//! Unit tests for the STATUS register

use crate::common::{create_mock_driver, reg, Operation};
use max1704x::{DeviceVariant, StatusFlag, StatusFlags};

#[test]
fn test_power_on_status() {
    let (mut driver, _interface) = create_mock_driver(DeviceVariant::Max17048);

    // STATUS default 0x0100: only RI
    let status = driver.read_status().unwrap();
    assert_eq!(status, StatusFlags::from(StatusFlag::ResetIndicator));
    assert_eq!(status.bits(), 0x01);
}

#[test]
fn test_read_status_decodes_every_flag() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17049);
    interface.set_register(reg::STATUS, 0x7F00);

    let status = driver.read_status().unwrap();
    assert!(status.reset_indicator);
    assert!(status.voltage_high);
    assert!(status.voltage_low);
    assert!(status.voltage_reset);
    assert!(status.soc_low);
    assert!(status.soc_change);
    assert!(status.voltage_reset_alert_enabled);
    assert_eq!(status.bits(), 0x7F);
}

#[test]
fn test_flag_read_without_clear() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
    interface.set_register(reg::STATUS, 0x0500);

    assert!(driver.is_voltage_low(false).unwrap());
    assert!(driver.is_reset(false).unwrap());
    assert!(!driver.is_voltage_high(false).unwrap());

    assert!(interface.writes_to(reg::STATUS).is_empty());
    assert_eq!(interface.get_register(reg::STATUS), 0x0500);
}

#[test]
fn test_flag_clear_sequence() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
    interface.set_register(reg::STATUS, 0x0500);

    assert!(driver.is_voltage_low(true).unwrap());

    // Read once to test, then read-modify-write clearing only VL
    assert_eq!(
        interface.operations(),
        vec![
            Operation::Read {
                address: reg::STATUS,
                value: 0x0500
            },
            Operation::Read {
                address: reg::STATUS,
                value: 0x0500
            },
            Operation::Write {
                address: reg::STATUS,
                value: 0x0100
            },
        ]
    );

    assert!(!driver.is_voltage_low(false).unwrap());
    assert!(driver.is_reset(false).unwrap());
}

#[test]
fn test_clear_of_unset_flag_skips_write() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    assert!(!driver.is_change(true).unwrap());
    assert_eq!(interface.operation_count(), 1);
}

#[test]
fn test_each_flag_accessor() {
    let cases: [(StatusFlag, u16); 6] = [
        (StatusFlag::ResetIndicator, 0x0100),
        (StatusFlag::VoltageHigh, 0x0200),
        (StatusFlag::VoltageLow, 0x0400),
        (StatusFlag::VoltageReset, 0x0800),
        (StatusFlag::SocLow, 0x1000),
        (StatusFlag::SocChange, 0x2000),
    ];

    for (flag, mask) in cases {
        let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
        // All flags plus EnVR
        interface.set_register(reg::STATUS, 0x7F00);

        let set = match flag {
            StatusFlag::ResetIndicator => driver.is_reset(true),
            StatusFlag::VoltageHigh => driver.is_voltage_high(true),
            StatusFlag::VoltageLow => driver.is_voltage_low(true),
            StatusFlag::VoltageReset => driver.is_voltage_reset(true),
            StatusFlag::SocLow => driver.is_low(true),
            StatusFlag::SocChange => driver.is_change(true),
        }
        .unwrap();

        assert!(set, "{flag:?} should read as set");
        assert_eq!(
            interface.get_register(reg::STATUS),
            0x7F00 & !mask,
            "{flag:?} should clear only its own bit"
        );
        assert_eq!(u16::from(1u8) << flag.register_bit(), mask);
    }
}

#[test]
fn test_generic_flag_read() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
    interface.set_register(reg::STATUS, 0x1100);

    assert!(driver.read_status_flag(StatusFlag::SocLow, true).unwrap());
    assert_eq!(interface.get_register(reg::STATUS), 0x0100);
}

#[test]
fn test_clear_multiple_flags() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
    interface.set_register(reg::STATUS, 0x7F00);

    let mut flags = StatusFlags::default();
    flags.insert(StatusFlag::VoltageHigh);
    flags.insert(StatusFlag::SocChange);
    // EnVR is a setting and must survive even when requested
    flags.voltage_reset_alert_enabled = true;

    driver.clear_status_flags(flags).unwrap();
    assert_eq!(interface.get_register(reg::STATUS), 0x5D00);
}

#[test]
fn test_reserved_bits_preserved() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);
    interface.set_register(reg::STATUS, 0x01A5);

    driver.is_reset(true).unwrap();
    assert_eq!(interface.get_register(reg::STATUS), 0x00A5);
}

#[test]
fn test_voltage_reset_alert_switch() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17048);

    assert!(!driver.is_voltage_reset_alert_enabled().unwrap());

    driver.enable_voltage_reset_alert().unwrap();
    assert_eq!(interface.get_register(reg::STATUS), 0x4100);
    assert!(driver.is_voltage_reset_alert_enabled().unwrap());

    driver.disable_voltage_reset_alert().unwrap();
    assert_eq!(interface.get_register(reg::STATUS), 0x0100);
    assert!(!driver.is_voltage_reset_alert_enabled().unwrap());
}
