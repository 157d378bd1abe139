//! Integration tests for register access, the LED read-modify-write path,
//! and the dim-channel converters, run against the simulated chip.

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use lp3944::{BusError, BusOp, DimChannel, Error, LedState, Quantity, Register};

use crate::mock_hw::{Event, read_events, ready_driver, rig, write_events};

fn concat(parts: &[Vec<Event>]) -> Vec<Event> {
    parts.concat()
}

// ── Register access ──────────────────────────────────────────

#[test]
fn write_register_is_one_transaction_then_settle() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    driver.write_register(Register::Pwm0, 0x80).unwrap();

    assert_eq!(*timeline.borrow(), write_events(0x03, 0x80));
    assert_eq!(bus.registers[3], 0x80);
}

#[test]
fn read_register_latches_address_with_repeated_start() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    bus.registers[7] = 0xa5;
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    assert_eq!(driver.read_register(Register::LedSelect1), Ok(0xa5));
    assert_eq!(*timeline.borrow(), read_events(0x07));
}

#[test]
fn read_only_register_write_is_rejected_before_the_bus() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    assert_eq!(
        driver.write_register(Register::Input, 0xff),
        Err(Error::ReadOnlyRegister(Register::Input))
    );
    assert!(timeline.borrow().is_empty());
}

#[test]
fn failed_stop_is_reported_after_the_read() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    bus.fail_stop = true;
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    assert_eq!(
        driver.read_register(Register::Pwm1),
        Err(Error::Bus(BusError {
            op: BusOp::Stop,
            kind: ErrorKind::ArbitrationLoss,
        }))
    );
    assert_eq!(*timeline.borrow(), read_events(0x05));
}

// ── LED state encoder ────────────────────────────────────────

#[test]
fn set_led_changes_only_its_field() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    bus.registers[6] = 0b11_01_10_00;
    bus.registers[7] = 0b1010_1010;
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    driver.set_led(1, LedState::On).unwrap();

    assert_eq!(
        *timeline.borrow(),
        concat(&[read_events(0x06), write_events(0x06, 0b11_01_01_00)])
    );
    assert_eq!(bus.registers[6], 0b11_01_01_00);
    assert_eq!(bus.registers[7], 0b1010_1010);
}

#[test]
fn set_led_in_second_bank() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    bus.registers[7] = 0xff;
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    driver.set_led(6, LedState::Off).unwrap();

    assert_eq!(bus.registers[7], 0b11_00_11_11);
    assert_eq!(bus.registers[6], 0);
}

#[test]
fn set_led_twice_is_idempotent() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    bus.registers[7] = 0b0110_0100;
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    driver.set_led(5, LedState::Dim1).unwrap();
    let (once, ..) = driver.release();
    let after_once = once.registers[7];

    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);
    driver.set_led(5, LedState::Dim1).unwrap();
    assert_eq!(bus.registers[7], after_once);
    assert_eq!(after_once, 0b0110_1100);
}

#[test]
fn failed_read_prevents_the_write() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    bus.registers[6] = 0x55;
    bus.fail_reads = true;
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    assert_eq!(
        driver.set_led(2, LedState::On),
        Err(Error::Bus(BusError {
            op: BusOp::Read,
            kind: ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
        }))
    );

    assert!(timeline.borrow().contains(&Event::Stop), "bus must still be released");
    assert_eq!(bus.writes(), 0, "no write may follow a failed read");
    assert_eq!(bus.registers[6], 0x55);
}

#[test]
fn failed_address_write_skips_read_but_releases_bus() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    bus.fail_writes = true;
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    let err = driver.set_led(0, LedState::On).unwrap_err();
    assert!(matches!(
        err,
        Error::Bus(BusError {
            op: BusOp::Write,
            ..
        })
    ));

    let events = timeline.borrow();
    assert!(!events.iter().any(|e| matches!(e, Event::Read { .. })));
    assert_eq!(events.last(), Some(&Event::DelayNs(1_000)));
    assert!(events.contains(&Event::Stop));
}

#[test]
fn invalid_index_touches_nothing() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    assert_eq!(driver.set_led(8, LedState::On), Err(Error::InvalidIndex(8)));
    assert_eq!(driver.led_state(200), Err(Error::InvalidIndex(200)));
    assert!(timeline.borrow().is_empty());
}

#[test]
fn set_leds_does_one_read_modify_write_per_bank() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    driver
        .set_leds(&[
            (0, LedState::On),
            (5, LedState::Dim0),
            (0, LedState::Off),
            (3, LedState::Dim1),
        ])
        .unwrap();

    assert_eq!(
        *timeline.borrow(),
        concat(&[
            read_events(0x06),
            write_events(0x06, 0b11_00_00_00),
            read_events(0x07),
            write_events(0x07, 0b00_00_10_00),
        ])
    );
}

#[test]
fn set_leds_skips_untouched_banks_and_validates_first() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    assert_eq!(
        driver.set_leds(&[(1, LedState::On), (9, LedState::On)]),
        Err(Error::InvalidIndex(9))
    );
    assert!(timeline.borrow().is_empty());

    driver.set_leds(&[(7, LedState::On)]).unwrap();
    assert_eq!(
        *timeline.borrow(),
        concat(&[read_events(0x07), write_events(0x07, 0b01_00_00_00)])
    );
}

#[test]
fn set_leds_keeps_earlier_banks_when_a_later_one_fails() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    bus.fail_reads = true;
    bus.read_passes = 1;
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    assert_eq!(
        driver.set_leds(&[(0, LedState::On), (4, LedState::On)]),
        Err(Error::Bus(BusError {
            op: BusOp::Read,
            kind: ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
        }))
    );

    assert_eq!(bus.registers[6], 0b00_00_00_01);
    assert_eq!(bus.registers[7], 0);
    assert_eq!(bus.writes(), 1);
}

#[test]
fn led_state_and_inputs_read_back() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    bus.registers[0] = 0b1000_0001;
    bus.registers[6] = 0b00_10_00_00;
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    assert_eq!(driver.led_state(2), Ok(LedState::Dim0));
    assert_eq!(driver.led_state(3), Ok(LedState::Off));
    assert_eq!(driver.read_inputs(), Ok(0b1000_0001));
}

// ── Dim channels ─────────────────────────────────────────────

#[test]
fn duty_cycle_writes_pwm_register_directly() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    driver.set_duty_cycle(DimChannel::Dim0, 50).unwrap();
    assert_eq!(*timeline.borrow(), write_events(0x03, 128));

    driver.set_duty_cycle(DimChannel::Dim1, 100).unwrap();
    driver.set_duty_cycle(DimChannel::Dim0, 0).unwrap();
    let (bus, ..) = driver.release();
    assert_eq!(bus.registers[3], 0);
    assert_eq!(bus.registers[5], 255);
}

#[test]
fn duty_cycle_out_of_range_writes_nothing() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    assert_eq!(
        driver.set_duty_cycle(DimChannel::Dim1, 101),
        Err(Error::OutOfRange {
            quantity: Quantity::DutyCycle,
            value: 101,
            max: 100,
        })
    );
    assert!(timeline.borrow().is_empty());
}

#[test]
fn dim_period_writes_prescaler_register() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    bus.registers[4] = 0x77;
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    driver.set_dim_period(DimChannel::Dim0, 1600).unwrap();
    assert_eq!(*timeline.borrow(), write_events(0x02, 255));

    driver.set_dim_period(DimChannel::Dim1, 0).unwrap();
    assert_eq!(
        driver.set_dim_period(DimChannel::Dim1, 1601),
        Err(Error::OutOfRange {
            quantity: Quantity::DimPeriod,
            value: 1601,
            max: 1600,
        })
    );
    let (bus, ..) = driver.release();
    assert_eq!(bus.registers[2], 255);
    assert_eq!(bus.registers[4], 0);
}

#[test]
fn configure_channel_is_all_or_nothing() {
    let (mut bus, mut delay, mut pin, timeline) = rig();
    let mut driver = ready_driver(&mut bus, &mut delay, &mut pin, &timeline);

    assert!(driver.configure_channel(DimChannel::Dim1, 1000, 120).is_err());
    assert!(driver.configure_channel(DimChannel::Dim1, 2000, 50).is_err());
    assert!(timeline.borrow().is_empty());

    driver.configure_channel(DimChannel::Dim1, 1000, 25).unwrap();
    assert_eq!(
        *timeline.borrow(),
        concat(&[write_events(0x04, 159), write_events(0x05, 64)])
    );
}
