//! Register definitions for the MAX1704x family
//!
//! Every register on these parts is 16 bits wide and transferred MSB first.
//! Bit positions below count from the least significant bit of the 16-bit
//! value, matching the datasheet tables.
//!
//! ## Variant coverage
//! - **All parts**: VCELL, SOC, MODE, VERSION, CONFIG, COMMAND
//! - **MAX17048/49 only**: HIBRT, VALRT, CRATE, VRESET/ID, STATUS
//!
//! The register map itself does not know about variants. Gating is done by
//! [`DeviceVariant::supports`](crate::DeviceVariant::supports) before any
//! register is touched.

device_driver::create_device!(
    device_name: Max1704x,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        /// VCELL - Cell Voltage (0x02, read-only)
        ///
        /// MAX17043/44 report a 12-bit reading in the upper bits (1.25 mV or
        /// 2.5 mV per LSB after shifting right by 4). MAX17048/49 use all
        /// 16 bits (78.125 uV or 156.25 uV per LSB).
        register Vcell {
            const ADDRESS = 0x02;
            const SIZE_BITS = 16;

            /// Raw cell voltage
            voltage: uint = 0..16,
        },

        /// SOC - State of Charge (0x04, read-only)
        ///
        /// The high byte is whole percent, the low byte is 1/256 %.
        register Soc {
            const ADDRESS = 0x04;
            const SIZE_BITS = 16;

            /// Fractional percent in 1/256 % steps
            fraction: uint = 0..8,
            /// Whole percent
            percent: uint = 8..16,
        },

        /// MODE - Special Commands (0x06)
        ///
        /// Only `hib_stat` is meaningful on read, and only on MAX17048/49.
        register Mode {
            const ADDRESS = 0x06;
            const SIZE_BITS = 16;

            reserved_11_0: uint = 0..12,
            /// Hibernate status (MAX17048/49, read)
            hib_stat: bool = 12,
            /// Enable sleep mode (MAX17048/49)
            en_sleep: bool = 13,
            /// Quick-start: restart fuel-gauge calculations
            quick_start: bool = 14,
            reserved_15: uint = 15..16,
        },

        /// VERSION - Production Version (0x08, read-only)
        register Version {
            const ADDRESS = 0x08;
            const SIZE_BITS = 16;

            /// IC production version
            version: uint = 0..16,
        },

        /// HIBRT - Hibernate Thresholds (0x0A, MAX17048/49)
        ///
        /// Default 0x8030.
        register Hibrt {
            const ADDRESS = 0x0A;
            const SIZE_BITS = 16;

            /// Active threshold, 1.25 mV per LSB
            act_thr: uint = 0..8,
            /// Hibernate threshold, 0.208 %/hr per LSB
            hib_thr: uint = 8..16,
        },

        /// CONFIG - Compensation and Alert Configuration (0x0C)
        ///
        /// Default 0x971C.
        register Config {
            const ADDRESS = 0x0C;
            const SIZE_BITS = 16;

            /// Empty alert threshold, stored as 32 minus the percentage
            athd: uint = 0..5,
            /// Alert status bit, set by the IC and cleared by software
            alrt: bool = 5,
            /// SOC change alert enable (MAX17048/49)
            alsc: bool = 6,
            /// Sleep: forces the IC into sleep mode when set
            sleep: bool = 7,
            /// ModelGauge compensation (RCOMP), default 0x97
            rcomp: uint = 8..16,
        },

        /// VALRT - Voltage Alert Window (0x14, MAX17048/49)
        ///
        /// Default 0x00FF. Both thresholds are 20 mV per LSB.
        register Valrt {
            const ADDRESS = 0x14;
            const SIZE_BITS = 16;

            /// Alert while VCELL is above this value
            max: uint = 0..8,
            /// Alert while VCELL is below this value
            min: uint = 8..16,
        },

        /// CRATE - Charge Rate (0x16, MAX17048/49, read-only)
        ///
        /// Signed, 0.208 %/hr per LSB. Positive while charging.
        register ChargeRate {
            const ADDRESS = 0x16;
            const SIZE_BITS = 16;

            /// Raw two's-complement rate
            rate: uint = 0..16,
        },

        /// VRESET/ID - Reset Voltage and Factory ID (0x18, MAX17048/49)
        ///
        /// Default 0x96__ (3.0 V reset threshold, comparator enabled).
        register VresetId {
            const ADDRESS = 0x18;
            const SIZE_BITS = 16;

            /// One-time-programmable factory ID, writes are ignored
            id: uint = 0..8,
            /// Comparator disable: set to save 0.5 uA in hibernate
            dis: bool = 8,
            /// Reset voltage threshold, 40 mV per LSB
            vreset: uint = 9..16,
        },

        /// STATUS - Alert Status (0x1A, MAX17048/49)
        ///
        /// Default 0x01__. Flags are set by the IC and cleared by writing 0.
        register Status {
            const ADDRESS = 0x1A;
            const SIZE_BITS = 16;

            reserved_7_0: uint = 0..8,
            /// Reset indicator, set after power-up
            ri: bool = 8,
            /// Voltage high alert (VCELL > VALRT.MAX)
            vh: bool = 9,
            /// Voltage low alert (VCELL < VALRT.MIN)
            vl: bool = 10,
            /// Voltage reset alert
            vr: bool = 11,
            /// SOC low alert (below CONFIG.ATHD)
            hd: bool = 12,
            /// SOC changed by at least 1%
            sc: bool = 13,
            /// Enable voltage reset alert
            en_vr: bool = 14,
            reserved_15: uint = 15..16,
        },

        /// CMD - Command Register (0xFE, write-only)
        ///
        /// Writing 0x5400 forces a power-on reset. The IC does not ACK it.
        register Command {
            const ADDRESS = 0xFE;
            const SIZE_BITS = 16;

            /// Command word
            command: uint = 0..16,
        }
    }
);

// Re-export commonly used types for convenience
pub use Max1704x as RegisterDevice;

/// MODE value that starts a quick-start
pub const MODE_QUICK_START: u16 = 0x4000;

/// MODE value that enables sleep on MAX17048/49
pub const MODE_EN_SLEEP: u16 = 0x2000;

/// COMMAND value that triggers a power-on reset
pub const COMMAND_POWER_ON_RESET: u16 = 0x5400;

/// HIBRT value that keeps the IC in hibernate permanently
pub const HIBRT_ALWAYS_HIBERNATE: u8 = 0xFF;

/// HIBRT value that disables hibernate
pub const HIBRT_NEVER_HIBERNATE: u8 = 0x00;
