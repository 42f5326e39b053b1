//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use max1704x::{DeviceVariant, Max1704xDriver};

/// Create a mock driver for testing
/// Returns (driver, interface) where interface is a clone that shares state with the driver
#[allow(dead_code)]
pub fn create_mock_driver(
    variant: DeviceVariant,
) -> (Max1704xDriver<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let driver = Max1704xDriver::new(interface, variant);
    (driver, interface_clone)
}

/// Assert that two floating point values are approximately equal
#[allow(dead_code)]
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {a} vs {b} (diff: {diff}, epsilon: {epsilon})"
    );
}
