/*!
 * Tests for the progress simulation state machine
 */

use subrelay::progress::ProgressSimulator;

/// Test that emissions never decrease across ticks
#[test]
fn test_tick_withAdvancingClock_shouldBeMonotonic() {
    let mut simulator = ProgressSimulator::new(500, 6.0);
    let mut last = 0u8;
    for step in 0..100 {
        let state = simulator.tick(step as f64 * 0.3);
        assert!(
            state.progress >= last,
            "progress decreased from {} to {} at step {}",
            last,
            state.progress,
            step
        );
        last = state.progress;
    }
}

/// Test that the simulator never exceeds the 95 ceiling on its own
#[test]
fn test_tick_withLongOverrun_shouldNeverExceedCeiling() {
    let mut simulator = ProgressSimulator::new(100, 1.0);
    for step in 0..300 {
        let state = simulator.tick(step as f64 * 0.5);
        assert!(state.progress <= 95, "emitted {} > 95", state.progress);
        assert!(!state.complete);
    }
}

/// Test that progress approaches the ceiling when elapsed nears the estimate
#[test]
fn test_tick_withElapsedNearEstimate_shouldReachCeiling() {
    let mut simulator = ProgressSimulator::new(200, 100.0);
    let mut state = simulator.tick(99.9);
    // Rate limiting means many ticks are needed to climb from 10 to 95
    for _ in 0..200 {
        state = simulator.tick(99.9);
    }
    assert_eq!(state.progress, 95);
}

/// Test the reference scenario: 500 cues, 6s estimate, 3s elapsed
#[test]
fn test_tick_withHalfElapsed_shouldBeBetweenPhases() {
    let mut simulator = ProgressSimulator::new(500, 6.0);
    let at_start = simulator.tick(0.0);
    let after_three = simulator.tick(3.0);

    assert!(after_three.progress > at_start.progress);
    assert!(after_three.progress >= 10);
    assert!(after_three.progress < 95);
}

/// Test that overrunning the estimate revises it upward, never downward
#[test]
fn test_tick_withOverrun_shouldReviseEstimateUpward() {
    let mut simulator = ProgressSimulator::new(500, 6.0);
    simulator.tick(3.0);
    assert_eq!(simulator.estimated_duration_secs(), 6.0);

    simulator.tick(7.0);
    let revised = simulator.estimated_duration_secs();
    assert!(revised > 6.0, "estimate was not revised upward: {}", revised);

    // A later tick inside the revised window must not shrink the estimate
    simulator.tick(8.0);
    assert!(simulator.estimated_duration_secs() >= revised);
}

/// Test that estimated time remaining never goes negative
#[test]
fn test_tick_withAnyElapsed_shouldKeepRemainingNonNegative() {
    let mut simulator = ProgressSimulator::new(300, 2.0);
    for step in 0..120 {
        let state = simulator.tick(step as f64 * 0.4);
        assert!(
            state.estimated_time_remaining >= 0.0,
            "negative remaining at step {}: {}",
            step,
            state.estimated_time_remaining
        );
    }
}

/// Test that the current-cue counter stays within bounds
#[test]
fn test_tick_withAnyElapsed_shouldClampCurrentToTotal() {
    let mut simulator = ProgressSimulator::new(50, 1.0);
    for step in 0..200 {
        let state = simulator.tick(step as f64 * 0.3);
        assert!(state.current <= state.total);
        assert_eq!(state.total, 50);
    }
}

/// Test that the message switches to finalization wording at 90
#[test]
fn test_tick_withHighProgress_shouldSwitchToFinalizationMessage() {
    let mut simulator = ProgressSimulator::new(200, 100.0);
    let mut state = simulator.tick(99.9);
    assert!(state.message.contains("Translating"));

    for _ in 0..200 {
        state = simulator.tick(99.9);
    }
    assert!(state.progress >= 90);
    assert_eq!(state.message, "Almost done, finalizing...");
}

/// Test that a zero-cue session saturates quietly instead of panicking
#[test]
fn test_tick_withZeroUnits_shouldSaturateQuietly() {
    let mut simulator = ProgressSimulator::new(0, 0.0);
    for step in 0..50 {
        let state = simulator.tick(step as f64);
        assert!(state.progress <= 95);
        assert_eq!(state.current, 0);
        assert_eq!(state.total, 0);
        assert!(state.estimated_time_remaining >= 0.0);
    }
}

/// Test that degenerate elapsed values do not panic or regress
#[test]
fn test_tick_withDegenerateElapsed_shouldStayWellFormed() {
    let mut simulator = ProgressSimulator::new(100, 5.0);
    let before = simulator.tick(2.0).progress;

    for elapsed in [-1.0, f64::NAN, f64::INFINITY, 0.0] {
        let state = simulator.tick(elapsed);
        assert!(state.progress >= before);
        assert!(state.progress <= 95);
    }
}

/// Test the terminal emission shape
#[test]
fn test_terminal_state_shouldBeCompleteAtFullProgress() {
    let simulator = ProgressSimulator::new(500, 6.0);
    let terminal = simulator.terminal_state();

    assert_eq!(terminal.progress, 100);
    assert_eq!(terminal.current, 500);
    assert_eq!(terminal.total, 500);
    assert_eq!(terminal.estimated_time_remaining, 0.0);
    assert!(terminal.complete);
}
