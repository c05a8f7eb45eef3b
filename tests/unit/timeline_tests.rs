/*!
 * Tests for the timeline engine stages and their cross-stage properties
 */

use subweave::app_config::{MergeConfig, SegmentConfig, TimingConfig};
use subweave::timeline::{
    PunctuationSegmenter, SentenceMerger, TimeDistributor, TimingReconciler,
};

use crate::common;

fn reconciler() -> TimingReconciler {
    TimingReconciler::new(TimingConfig::default())
}

fn merger() -> SentenceMerger {
    SentenceMerger::new(MergeConfig::default())
}

/// Test that an already-valid store passes through byte-identical
#[test]
fn test_reconcile_withValidStore_shouldBeIdentity() {
    let slots = [(0, 1000, "a."), (1200, 2400, "b."), (2600, 4000, "c.")];
    let store = reconciler().reconcile(common::store_of(&slots)).unwrap();

    for (cue, &(start, end, _)) in store.cues.iter().zip(&slots) {
        assert_eq!(cue.start_ms, start);
        assert_eq!(cue.end_ms, end);
    }
}

/// Test that reconciliation is idempotent
#[test]
fn test_reconcile_appliedTwice_shouldChangeNothingFurther() {
    let slots = [
        (0, 4560, "one"),
        (2639, 6560, "two"),
        (6500, 6900, "three"),
        (6900, 6900, "four"),
    ];
    let once = reconciler().reconcile(common::store_of(&slots)).unwrap();
    let snapshot: Vec<(u64, u64)> = once.cues.iter().map(|c| (c.start_ms, c.end_ms)).collect();

    let twice = reconciler().reconcile(once).unwrap();
    let again: Vec<(u64, u64)> = twice.cues.iter().map(|c| (c.start_ms, c.end_ms)).collect();

    assert_eq!(snapshot, again);
}

/// Test the shrink repair on a plain overlap
#[test]
fn test_reconcile_withOverlap_shouldShrinkPreviousCue() {
    let store = reconciler()
        .reconcile(common::store_of(&[
            (0, 4560, "so I was thinking"),
            (2639, 6560, "that maybe"),
        ]))
        .unwrap();

    assert_eq!(store.cues[0].end_ms, 2539);
    assert_eq!(store.cues[1].start_ms, 2639);
    common::assert_invariants(&store, 100, 500);
}

/// Test invariants on a deliberately messy schedule
#[test]
fn test_reconcile_withMessySchedule_shouldRestoreAllInvariants() {
    let slots = [
        (0, 0, "zero duration"),
        (50, 900, "overlapping"),
        (860, 940, "tiny and late"),
        (900, 5000, "long one"),
        (4800, 5100, "crammed at the end"),
    ];
    let store = reconciler().reconcile(common::store_of(&slots)).unwrap();

    assert_eq!(store.len(), 5);
    common::assert_invariants(&store, 100, 500);
}

/// Test that merging covers every cue exactly once, in order
#[test]
fn test_merge_shouldCoverEveryCueExactlyOnce() {
    let store = common::store_of(&[
        (0, 1000, "this goes"),
        (1200, 2200, "on and on"),
        (2400, 3400, "until it stops."),
        (3600, 4600, "Then restarts"),
        (4800, 5800, "again!"),
    ]);
    let units = merger().merge(&store);

    let mut covered: Vec<usize> = units
        .iter()
        .flat_map(|u| u.member_indices.iter().copied())
        .collect();
    let sorted = {
        let mut c = covered.clone();
        c.sort_unstable();
        c
    };
    assert_eq!(covered, sorted, "units must cover cues in order");
    covered.dedup();
    assert_eq!(covered.len(), store.len());
}

/// Test the member cap boundary: exactly four fragments close a unit
#[test]
fn test_merge_withFourUnterminatedFragments_shouldCloseAtCap() {
    let store = common::store_of(&[
        (0, 1000, "one"),
        (1200, 2200, "two"),
        (2400, 3400, "three"),
        (3600, 4600, "four"),
    ]);
    let units = merger().merge(&store);

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].len(), 4);
}

/// Test that a terminator on the very first cue closes the unit early
#[test]
fn test_merge_withTerminatedFirstCue_shouldCloseImmediately() {
    let store = common::store_of(&[(0, 1000, "Done."), (1200, 2200, "next")]);
    let units = merger().merge(&store);

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].concatenated_source, "Done.");
}

/// Test the duration-proportional split on CJK text
#[test]
fn test_distribute_withUnevenDurations_shouldFollowShares() {
    let text: String = "译".repeat(40);
    let slices = TimeDistributor::split_proportionally(&text, &[1000, 3000]);

    assert_eq!(slices[0].chars().count(), 10);
    assert_eq!(slices[1].chars().count(), 30);
}

/// Test that distribute followed by refine stays lossless
#[test]
fn test_distribute_thenRefine_shouldStayLossless() {
    let text = "第一句说完了，第二句紧跟着来，第三句收尾。";
    let slices = TimeDistributor::split_proportionally(text, &[900, 1400, 2100]);
    let refined = PunctuationSegmenter::new(SegmentConfig::default()).refine(slices);

    assert_eq!(refined.concat(), text);
}

/// Test that refinement lands splits on clause boundaries when close enough
#[test]
fn test_refine_withNearbyComma_shouldSplitAfterIt() {
    let slices = vec!["前半句说完了，多两".to_string(), "个字后半句".to_string()];
    let refined = PunctuationSegmenter::new(SegmentConfig::default()).refine(slices);

    assert_eq!(refined[0], "前半句说完了，");
    assert_eq!(refined[1], "多两个字后半句");
}
