//! Unit tests for variant-gated features
//!
//! MAX17043/44 lack HIBRT, STATUS, CRATE, VALRT and VRESET/ID. Every accessor
//! for those must fail without touching the bus.

use crate::common::{create_mock_driver, MockInterface};
use max1704x::{DeviceVariant, Error, Max1704xDriver, StatusFlag, StatusFlags};

const LEGACY: [DeviceVariant; 2] = [DeviceVariant::Max17043, DeviceVariant::Max17044];

fn assert_unsupported<T: core::fmt::Debug>(
    result: Result<T, Error<crate::common::MockError>>,
    name: &str,
) {
    assert_eq!(
        result.err(),
        Some(Error::Unsupported),
        "{name} should be unsupported"
    );
}

fn exercise_gated(driver: &mut Max1704xDriver<MockInterface>) {
    assert_unsupported(driver.read_id(), "read_id");
    assert_unsupported(driver.read_change_rate(), "read_change_rate");

    assert_unsupported(driver.read_reset_voltage_threshold(), "read_reset_voltage_threshold");
    assert_unsupported(driver.read_reset_voltage_volts(), "read_reset_voltage_volts");
    assert_unsupported(driver.set_reset_voltage_threshold(10), "set_reset_voltage_threshold");
    assert_unsupported(driver.set_reset_voltage_volts(3.0), "set_reset_voltage_volts");
    assert_unsupported(driver.enable_comparator(), "enable_comparator");
    assert_unsupported(driver.disable_comparator(), "disable_comparator");
    assert_unsupported(driver.is_comparator_enabled(), "is_comparator_enabled");

    assert_unsupported(driver.read_status(), "read_status");
    assert_unsupported(
        driver.clear_status_flags(StatusFlags::from_bits(0x3F)),
        "clear_status_flags",
    );
    assert_unsupported(driver.read_status_flag(StatusFlag::SocLow, true), "read_status_flag");
    assert_unsupported(driver.is_reset(true), "is_reset");
    assert_unsupported(driver.is_voltage_high(false), "is_voltage_high");
    assert_unsupported(driver.is_voltage_low(false), "is_voltage_low");
    assert_unsupported(driver.is_voltage_reset(false), "is_voltage_reset");
    assert_unsupported(driver.is_low(false), "is_low");
    assert_unsupported(driver.is_change(false), "is_change");
    assert_unsupported(driver.enable_voltage_reset_alert(), "enable_voltage_reset_alert");
    assert_unsupported(driver.disable_voltage_reset_alert(), "disable_voltage_reset_alert");
    assert_unsupported(
        driver.is_voltage_reset_alert_enabled(),
        "is_voltage_reset_alert_enabled",
    );

    assert_unsupported(driver.enable_soc_alert(), "enable_soc_alert");
    assert_unsupported(driver.disable_soc_alert(), "disable_soc_alert");
    assert_unsupported(driver.is_soc_alert_enabled(), "is_soc_alert_enabled");

    assert_unsupported(driver.read_valrt_max(), "read_valrt_max");
    assert_unsupported(driver.read_valrt_min(), "read_valrt_min");
    assert_unsupported(driver.read_valrt_max_volts(), "read_valrt_max_volts");
    assert_unsupported(driver.read_valrt_min_volts(), "read_valrt_min_volts");
    assert_unsupported(driver.set_valrt_max(0xAA), "set_valrt_max");
    assert_unsupported(driver.set_valrt_min(0x55), "set_valrt_min");
    assert_unsupported(driver.set_valrt_max_volts(4.2), "set_valrt_max_volts");
    assert_unsupported(driver.set_valrt_min_volts(3.3), "set_valrt_min_volts");

    assert_unsupported(driver.is_hibernating(), "is_hibernating");
    assert_unsupported(
        driver.read_hibernate_active_threshold(),
        "read_hibernate_active_threshold",
    );
    assert_unsupported(
        driver.set_hibernate_active_threshold(0x30),
        "set_hibernate_active_threshold",
    );
    assert_unsupported(
        driver.read_hibernate_active_threshold_volts(),
        "read_hibernate_active_threshold_volts",
    );
    assert_unsupported(
        driver.set_hibernate_active_threshold_volts(0.06),
        "set_hibernate_active_threshold_volts",
    );
    assert_unsupported(driver.read_hibernate_threshold(), "read_hibernate_threshold");
    assert_unsupported(driver.set_hibernate_threshold(0x80), "set_hibernate_threshold");
    assert_unsupported(
        driver.read_hibernate_threshold_percent(),
        "read_hibernate_threshold_percent",
    );
    assert_unsupported(
        driver.set_hibernate_threshold_percent(10.0),
        "set_hibernate_threshold_percent",
    );
    assert_unsupported(driver.enable_hibernate(), "enable_hibernate");
    assert_unsupported(driver.disable_hibernate(), "disable_hibernate");
}

#[test]
fn test_legacy_parts_reject_without_bus_traffic() {
    for variant in LEGACY {
        let (mut driver, interface) = create_mock_driver(variant);

        exercise_gated(&mut driver);

        assert_eq!(
            interface.operation_count(),
            0,
            "{variant:?} touched the bus on a gated accessor"
        );
    }
}

#[test]
fn test_legacy_parts_keep_registers_untouched() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17043);
    let before: Vec<u16> = [0x0A, 0x14, 0x18, 0x1A]
        .iter()
        .map(|&address| interface.get_register(address))
        .collect();

    exercise_gated(&mut driver);

    let after: Vec<u16> = [0x0A, 0x14, 0x18, 0x1A]
        .iter()
        .map(|&address| interface.get_register(address))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_common_features_work_on_legacy_parts() {
    for variant in LEGACY {
        let (mut driver, _interface) = create_mock_driver(variant);

        assert!(driver.read_voltage().is_ok());
        assert!(driver.read_soc().is_ok());
        assert!(driver.read_version().is_ok());
        assert!(driver.quick_start().is_ok());
        assert!(driver.read_threshold().is_ok());
        assert!(driver.set_threshold(10).is_ok());
        assert!(driver.read_compensation().is_ok());
        assert!(driver.read_alert(false).is_ok());
        assert!(driver.is_sleeping().is_ok());
    }
}

#[test]
fn test_new_parts_allow_gated_features() {
    for variant in [DeviceVariant::Max17048, DeviceVariant::Max17049] {
        let (mut driver, interface) = create_mock_driver(variant);

        assert_eq!(driver.read_id(), Ok(0x00));
        assert!(driver.read_status().is_ok());
        assert!(driver.read_valrt_max().is_ok());
        assert!(driver.is_hibernating().is_ok());
        assert!(interface.operation_count() > 0);
    }
}

#[test]
fn test_set_variant_changes_gating() {
    let (mut driver, interface) = create_mock_driver(DeviceVariant::Max17043);
    assert_eq!(driver.read_change_rate(), Err(Error::Unsupported));

    driver.set_variant(DeviceVariant::Max17048);
    assert_eq!(driver.variant(), DeviceVariant::Max17048);
    assert!(driver.read_change_rate().is_ok());
    assert_eq!(interface.operation_count(), 1);
}
