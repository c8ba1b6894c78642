use bytes::Bytes;
use std::time::Duration;
use vessel_uploader::core::config::UploadConfig;
use vessel_uploader::core::engine::UploadEngine;
use vessel_uploader::core::errors::{AssignError, InvalidFileError};
use vessel_uploader::core::events::UploadEvent;
use vessel_uploader::core::model::{FileDescriptor, Placeholder, SlotKey, UploadStatus};
use vessel_uploader::core::planner::ticks_to_complete;
use vessel_uploader::core::scheduler::DriverState;
use vessel_uploader::core::store::PlaceholderStore;

const MB: u64 = 1024 * 1024;

fn jpeg(name: &str, size: u64) -> FileDescriptor {
    FileDescriptor::placeholder(name, "image/jpeg", size)
}

fn run_to_stop(engine: &mut UploadEngine) -> u64 {
    let mut ticks = 0;
    while engine.is_ticking() {
        engine.tick();
        ticks += 1;
        assert!(ticks < 10_000, "driver never stopped");
    }
    ticks
}

#[test]
fn three_jpegs_upload_to_completion() {
    let mut engine = UploadEngine::with_seed(UploadConfig::default(), 42).unwrap();
    engine.assign(SlotKey::First, jpeg("a.jpg", MB)).unwrap();
    engine.assign(SlotKey::Second, jpeg("b.jpg", 2 * MB)).unwrap();
    engine.assign(SlotKey::Third, jpeg("c.jpg", 19 * MB)).unwrap();

    let agg = engine.aggregate();
    assert!(agg.show_start_button);
    for v in engine.snapshot().filled() {
        assert_eq!(v.status, UploadStatus::Pending);
        assert_eq!(v.progress, 0.0);
    }

    assert_eq!(engine.start_upload(), 3);
    assert!(!engine.aggregate().show_start_button);

    let ticks = run_to_stop(&mut engine);
    // 15 s at 120 ms is the longest possible task
    assert!(ticks <= ticks_to_complete(Duration::from_secs(15), Duration::from_millis(120)));

    let agg = engine.aggregate();
    assert!(agg.all_completed);
    assert_eq!(agg.overall_progress, 100);
    assert_eq!(agg.total_time_left, 0);
    assert!(!agg.show_start_button);
    assert_eq!(engine.driver().state(), DriverState::Stopped);
    assert!(!engine.is_uploading());
    for v in engine.snapshot().filled() {
        assert_eq!(v.status, UploadStatus::Completed);
        assert_eq!(v.progress, 100.0);
    }
}

#[test]
fn zero_second_uploads_finish_on_first_tick() {
    let cfg = UploadConfig { tick_ms: 120, min_seconds: 0.0, max_seconds: 0.0 };
    let mut engine = UploadEngine::with_seed(cfg, 8).unwrap();
    for slot in SlotKey::ALL {
        engine.assign(slot, jpeg("z.jpg", MB)).unwrap();
    }
    engine.start_upload();

    assert_eq!(engine.tick(), 3);
    assert!(!engine.is_ticking());
    assert_eq!(engine.driver().state(), DriverState::Stopped);
    for v in engine.snapshot().filled() {
        assert_eq!(v.status, UploadStatus::Completed);
        assert_eq!(v.progress, 100.0);
    }
    assert!(engine.aggregate().complete_badge);
}

#[test]
fn oversized_file_leaves_slot_empty() {
    let mut engine = UploadEngine::with_seed(UploadConfig::default(), 1).unwrap();
    let err = engine.assign(SlotKey::Second, jpeg("big.jpg", 21 * MB)).unwrap_err();
    assert!(matches!(err, AssignError::InvalidFile(InvalidFileError::TooLarge { .. })));
    assert!(engine.snapshot().get(SlotKey::Second).is_none());
    assert_eq!(engine.outstanding_previews(), 0);

    let err = engine
        .assign(SlotKey::Second, FileDescriptor::new("x.gif", "image/gif", Bytes::from_static(b"GIF89a")))
        .unwrap_err();
    assert!(matches!(err, AssignError::InvalidFile(InvalidFileError::UnsupportedType { .. })));
}

#[test]
fn fixed_duration_completes_within_ceil_ticks() {
    for (secs, tick_ms) in [(1.2, 120), (10.0, 120), (2.5, 40)] {
        let cfg = UploadConfig { tick_ms, min_seconds: secs, max_seconds: secs };
        let mut engine = UploadEngine::with_seed(cfg, 3).unwrap();
        for slot in SlotKey::ALL {
            engine.assign(slot, jpeg("f.png", 10)).unwrap();
        }
        engine.start_upload();

        let budget = ticks_to_complete(Duration::from_secs_f64(secs), Duration::from_millis(tick_ms));
        for _ in 0..budget {
            engine.tick();
        }
        let snap = engine.snapshot();
        for v in snap.filled() {
            assert_eq!(v.status, UploadStatus::Completed, "{}s @ {}ms", secs, tick_ms);
            assert_eq!(v.progress, 100.0);
        }
        assert!(!engine.is_ticking());
    }
}

#[test]
fn pause_and_resume_preserve_progress() {
    let cfg = UploadConfig { tick_ms: 100, min_seconds: 5.0, max_seconds: 5.0 };
    let mut engine = UploadEngine::with_seed(cfg, 9).unwrap();
    for slot in SlotKey::ALL {
        engine.assign(slot, jpeg("p.webp", 100)).unwrap();
    }
    engine.start_upload();
    for _ in 0..10 {
        engine.tick();
    }
    let before = engine.snapshot();

    engine.pause_all();
    assert!(!engine.is_ticking());
    assert!(engine.aggregate().any_uploading);
    assert!(!engine.aggregate().show_start_button);
    // ticks while paused change nothing
    assert_eq!(engine.tick(), 0);

    assert!(engine.resume_all());
    let after = engine.snapshot();
    for (a, b) in before.filled().zip(after.filled()) {
        assert_eq!(a.progress, b.progress);
        assert_eq!(b.status, UploadStatus::Uploading);
    }

    run_to_stop(&mut engine);
    assert!(engine.aggregate().all_completed);
}

#[test]
fn preview_handles_balance_after_churn() {
    let mut engine = UploadEngine::with_seed(UploadConfig::default(), 5).unwrap();
    for round in 0..20u64 {
        for slot in SlotKey::ALL {
            engine.assign(slot, jpeg("a.jpg", round + 1)).unwrap();
            engine.assign(slot, jpeg("b.jpg", round + 2)).unwrap();
        }
        assert_eq!(engine.outstanding_previews(), 3);
        match round % 3 {
            0 => engine.clear(SlotKey::Second),
            1 => {
                engine.start_upload();
                engine.tick();
            }
            _ => {}
        }
        engine.clear_all();
        assert_eq!(engine.outstanding_previews(), 0);
        assert!(!engine.is_ticking());
    }
}

#[test]
fn events_follow_the_lifecycle() {
    let cfg = UploadConfig { tick_ms: 100, min_seconds: 0.2, max_seconds: 0.2 };
    let mut engine = UploadEngine::with_seed(cfg, 11).unwrap();
    let mut rx = engine.subscribe();
    for slot in SlotKey::ALL {
        engine.assign(slot, jpeg("e.jpg", 1)).unwrap();
    }
    engine.start_upload();
    run_to_stop(&mut engine);

    let mut events = vec![];
    while let Ok(e) = rx.try_recv() {
        events.push(e);
    }
    let started = events.iter().position(|e| *e == UploadEvent::DriverStarted).unwrap();
    let stopped = events.iter().position(|e| *e == UploadEvent::DriverStopped).unwrap();
    assert!(started < stopped);
    let completed = events
        .iter()
        .filter(|e| matches!(e, UploadEvent::StatusChanged { status: UploadStatus::Completed, .. }))
        .count();
    assert_eq!(completed, 3);
}

#[tokio::test]
async fn restored_placeholders_count_as_completed() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("state").join("uploads.db");
    let store = PlaceholderStore::open(&db).await.unwrap();
    store
        .put_placeholder(&Placeholder { slot: SlotKey::First, name: "old.png".into(), size: 4096 })
        .await
        .unwrap();
    store
        .put_placeholder(&Placeholder { slot: SlotKey::Third, name: "../../etc/passwd.jpg".into(), size: 1 })
        .await
        .unwrap();

    let mut engine = UploadEngine::with_seed(UploadConfig::default(), 2).unwrap();
    let placeholders = store.load_placeholders().await.unwrap();
    assert_eq!(engine.import_completed(&placeholders), 2);

    let snap = engine.snapshot();
    let first = snap.get(SlotKey::First).unwrap();
    assert_eq!(first.status, UploadStatus::Completed);
    assert_eq!(first.progress, 100.0);
    assert_eq!(first.mime, "image/png");
    assert!(!snap.get(SlotKey::Third).unwrap().name.contains('/'));
    assert!(!engine.is_ticking());

    // the remaining slot is what an upload run would start
    engine.assign(SlotKey::Second, jpeg("new.jpg", 10)).unwrap();
    assert!(engine.aggregate().show_start_button);
    assert_eq!(engine.start_upload(), 1);
}
