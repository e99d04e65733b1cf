use crate::{
    BasicIdGenerator, Error, GraupelId, IdGenerator, IdStatus, LockIdGenerator, MonotonicClock,
    PackedId, TimeSource,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::scope;

#[derive(Clone)]
struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

#[derive(Debug)]
struct FixedTime;
impl TimeSource for FixedTime {
    fn current_millis(&self) -> u64 {
        0
    }
}

struct MockStepTime {
    values: Vec<u64>,
    index: Cell<usize>,
}

#[derive(Clone)]
struct SharedMockStepTime {
    clock: Rc<MockStepTime>,
}

impl TimeSource for SharedMockStepTime {
    fn current_millis(&self) -> u64 {
        self.clock.values[self.clock.index.get()]
    }
}

fn stepped(values: Vec<u64>) -> SharedMockStepTime {
    SharedMockStepTime {
        clock: Rc::new(MockStepTime {
            values,
            index: Cell::new(0),
        }),
    }
}

trait IdStatusExt<ID>
where
    ID: PackedId,
{
    fn unwrap_ready(self) -> ID;
    fn unwrap_pending(self) -> u64;
}

impl<ID> IdStatusExt<ID> for IdStatus<ID>
where
    ID: PackedId,
{
    fn unwrap_ready(self) -> ID {
        match self {
            Self::Ready { id } => id,
            Self::Pending { yield_for } => {
                panic!("unexpected pending (yield for: {yield_for})")
            }
        }
    }

    fn unwrap_pending(self) -> u64 {
        match self {
            Self::Ready { id } => panic!("unexpected ready ({id})"),
            Self::Pending { yield_for } => yield_for,
        }
    }
}

fn run_sequence_increments_within_same_tick<G, ID, T>(generator: &G)
where
    G: IdGenerator<ID, T>,
    ID: PackedId,
    T: TimeSource,
{
    let id1 = generator.try_poll_id().unwrap().unwrap_ready();
    let id2 = generator.try_poll_id().unwrap().unwrap_ready();
    let id3 = generator.try_poll_id().unwrap().unwrap_ready();

    assert_eq!(id1.timestamp(), 42);
    assert_eq!(id2.timestamp(), 42);
    assert_eq!(id3.timestamp(), 42);
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
    assert_eq!(id3.sequence(), 2);
    assert!(id1 < id2 && id2 < id3);
}

fn run_pending_when_sequence_exhausted<G, ID, T>(generator: &G)
where
    G: IdGenerator<ID, T>,
    ID: PackedId,
    T: TimeSource,
{
    let yield_for = generator.try_poll_id().unwrap().unwrap_pending();
    assert_eq!(yield_for, 1);
}

fn run_rollover_into_next_tick<G, ID, T>(generator: &G, time: &SharedMockStepTime)
where
    G: IdGenerator<ID, T>,
    ID: PackedId,
    T: TimeSource,
{
    // Drain the full sequence space for one millisecond.
    for i in 0..=ID::max_sequence() {
        let id = generator.try_poll_id().unwrap().unwrap_ready();
        assert_eq!(id.sequence(), i);
        assert_eq!(id.timestamp(), 42);
    }

    // One more request in the same millisecond must throttle, not
    // duplicate.
    let yield_for = generator.try_poll_id().unwrap().unwrap_pending();
    assert_eq!(yield_for, 1);

    time.clock.index.set(1);

    let id = generator.try_poll_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
}

fn run_backward_jump_withholds_ids<G, ID, T>(generator: &G, time: &SharedMockStepTime)
where
    G: IdGenerator<ID, T>,
    ID: PackedId,
    T: TimeSource,
{
    let id = generator.try_poll_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), 42);

    // Clock regresses by 5ms: the generator must report how far behind
    // it is rather than issue a non-increasing ID.
    time.clock.index.set(1);
    let yield_for = generator.try_poll_id().unwrap().unwrap_pending();
    assert_eq!(yield_for, 5);

    // Clock catches up: generation resumes on the new millisecond.
    time.clock.index.set(2);
    let id = generator.try_poll_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
}

fn run_strictly_increasing<G, ID, T>(generator: &G)
where
    G: IdGenerator<ID, T>,
    ID: PackedId,
    T: TimeSource,
{
    const TOTAL_IDS: usize = 256 * 32;

    let mut last: Option<ID> = None;
    for _ in 0..TOTAL_IDS {
        let id = generator.next_id().unwrap();
        if let Some(prev) = last {
            assert!(id > prev, "IDs must be strictly increasing");
        }
        last = Some(id);
    }
}

#[test]
fn basic_generator_sequence_test() {
    let generator: BasicIdGenerator<GraupelId, _> =
        BasicIdGenerator::new(0, MockTime { millis: 42 }).unwrap();
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn lock_generator_sequence_test() {
    let generator: LockIdGenerator<GraupelId, _> =
        LockIdGenerator::new(0, MockTime { millis: 42 }).unwrap();
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn basic_generator_pending_test() {
    let generator: BasicIdGenerator<GraupelId, _> =
        BasicIdGenerator::from_components(0, 0, GraupelId::max_sequence(), FixedTime);
    run_pending_when_sequence_exhausted(&generator);
}

#[test]
fn lock_generator_pending_test() {
    let generator: LockIdGenerator<GraupelId, _> =
        LockIdGenerator::from_components(0, 0, GraupelId::max_sequence(), FixedTime);
    run_pending_when_sequence_exhausted(&generator);
}

#[test]
fn basic_generator_rollover_test() {
    let time = stepped(vec![42, 43]);
    let generator: BasicIdGenerator<GraupelId, _> =
        BasicIdGenerator::new(1, time.clone()).unwrap();
    run_rollover_into_next_tick(&generator, &time);
}

#[test]
fn lock_generator_rollover_test() {
    let time = stepped(vec![42, 43]);
    let generator: LockIdGenerator<GraupelId, _> = LockIdGenerator::new(1, time.clone()).unwrap();
    run_rollover_into_next_tick(&generator, &time);
}

#[test]
fn basic_generator_backward_jump_test() {
    let time = stepped(vec![42, 37, 43]);
    let generator: BasicIdGenerator<GraupelId, _> =
        BasicIdGenerator::new(1, time.clone()).unwrap();
    run_backward_jump_withholds_ids(&generator, &time);
}

#[test]
fn lock_generator_backward_jump_test() {
    let time = stepped(vec![42, 37, 43]);
    let generator: LockIdGenerator<GraupelId, _> = LockIdGenerator::new(1, time.clone()).unwrap();
    run_backward_jump_withholds_ids(&generator, &time);
}

#[test]
fn basic_generator_strictly_increasing() {
    let generator: BasicIdGenerator<GraupelId, _> =
        BasicIdGenerator::new(1, MonotonicClock::default()).unwrap();
    run_strictly_increasing(&generator);
}

#[test]
fn lock_generator_strictly_increasing() {
    let generator: LockIdGenerator<GraupelId, _> =
        LockIdGenerator::new(1, MonotonicClock::default()).unwrap();
    run_strictly_increasing(&generator);
}

#[test]
fn worker_id_range_is_enforced() {
    let max = GraupelId::max_worker();

    for worker_id in [0, 1, max / 2, max] {
        assert!(
            LockIdGenerator::<GraupelId, _>::new(worker_id, FixedTime).is_ok(),
            "worker id {worker_id} should be accepted"
        );
    }

    for worker_id in [max + 1, max + 2, u64::MAX] {
        let err = LockIdGenerator::<GraupelId, _>::new(worker_id, FixedTime).unwrap_err();
        assert!(matches!(
            err,
            Error::WorkerIdOutOfRange { worker_id: w, max: m } if w == worker_id && m == max
        ));
    }
}

#[test]
fn for_pid_derives_in_range_worker() {
    let generator: LockIdGenerator<GraupelId, _> = LockIdGenerator::for_pid(MockTime { millis: 1 });
    let id = generator.try_poll_id().unwrap().unwrap_ready();
    let expected = u64::from(std::process::id()) % (GraupelId::max_worker() + 1);
    assert_eq!(id.worker(), expected);
}

#[test]
fn decoded_fields_match_inputs() {
    let clock = MonotonicClock::default();
    let worker_id = 1234;
    let generator: LockIdGenerator<GraupelId, _> =
        LockIdGenerator::new(worker_id, clock).unwrap();

    let before = clock.current_millis();
    let id = generator.next_id().unwrap();
    let after = clock.current_millis();

    assert_eq!(id.worker(), worker_id);
    assert!(id.timestamp() >= before && id.timestamp() <= after);
}

#[test]
fn next_id_reports_stall_on_frozen_clock() {
    // A frozen clock with the sequence already exhausted can never make
    // progress; the blocking facade must give up rather than spin.
    let generator: LockIdGenerator<GraupelId, _> =
        LockIdGenerator::from_components(0, 0, GraupelId::max_sequence(), FixedTime);

    let err = generator.next_id().unwrap_err();
    assert!(matches!(err, Error::ClockStalled { .. }));
}

#[test]
fn next_id_rolls_over_under_real_clock() {
    let generator: LockIdGenerator<GraupelId, _> =
        LockIdGenerator::new(0, MonotonicClock::default()).unwrap();

    // More requests than one millisecond can hold; the blocking facade
    // must absorb the rollover waits.
    for _ in 0..(GraupelId::max_sequence() as usize + 2) * 2 {
        generator.next_id().unwrap();
    }
}

#[test]
fn lock_generator_threaded_unique_ids() {
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 2048;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;

    let clock = MonotonicClock::default();
    let generator: Arc<LockIdGenerator<GraupelId, _>> =
        Arc::new(LockIdGenerator::new(0, clock).unwrap());
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                for _ in 0..IDS_PER_THREAD {
                    let id = generator.next_id().unwrap();
                    assert!(seen_ids.lock().unwrap().insert(id));
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
}

#[test]
fn clones_share_allocator_state() {
    let generator: LockIdGenerator<GraupelId, _> =
        LockIdGenerator::new(0, MockTime { millis: 42 }).unwrap();
    let clone = generator.clone();

    let id1 = generator.try_poll_id().unwrap().unwrap_ready();
    let id2 = clone.try_poll_id().unwrap().unwrap_ready();
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
}
