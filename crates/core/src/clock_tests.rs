// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn fake_clock_advances_both_instant_and_epoch() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    let epoch1 = clock.epoch_ms();
    clock.advance(Duration::from_secs(61));
    assert!(clock.now().duration_since(t1) >= Duration::from_secs(61));
    assert_eq!(clock.epoch_ms(), epoch1 + 61_000);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let epoch1 = clock1.epoch_ms();
    clock2.advance(Duration::from_secs(30));
    assert_eq!(clock1.epoch_ms(), epoch1 + 30_000);
}

#[test]
fn epoch_secs_truncates() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(61_500);
    assert_eq!(clock.epoch_secs(), 61);
}
