// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let start = clock.now();

    clock.advance(Duration::from_secs(90));

    assert_eq!(clock.now() - start, Duration::from_secs(90));
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::new();
    let other = clock.clone();
    clock.advance(Duration::from_millis(5));
    assert_eq!(clock.now(), other.now());
}

#[test]
fn age_saturates_when_now_is_earlier() {
    let clock = FakeClock::new();
    let earlier = clock.now();
    clock.advance(Duration::from_secs(1));
    assert_eq!(age(clock.now(), earlier), Duration::ZERO);
    assert_eq!(age(earlier, clock.now()), Duration::from_secs(1));
}
