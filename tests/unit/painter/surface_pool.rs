use super::*;

#[test]
fn per_size_limit_discards_extras() {
    let mut p = SurfacePool::new(SurfacePoolOpts {
        byte_budget: 1 << 30,
        per_size: 1,
    });

    let a = p.take(8, 8).unwrap();
    let b = p.take(8, 8).unwrap();
    p.give_back(a);
    p.give_back(b);

    let c = p.counters();
    assert_eq!(c.kept, 1);
    assert_eq!(c.created, 2);
    assert_eq!(c.discarded, 1);
}

#[test]
fn byte_budget_spans_all_sizes() {
    let mut p = SurfacePool::new(SurfacePoolOpts {
        byte_budget: pixmap_bytes(8, 8),
        per_size: 8,
    });

    let a = p.take(8, 8).unwrap();
    let b = p.take(2, 2).unwrap();
    p.give_back(a);
    p.give_back(b);

    let c = p.counters();
    assert_eq!(c.kept_bytes, pixmap_bytes(8, 8));
    assert_eq!(c.kept, 1);
    assert_eq!(c.discarded, 1);
}

#[test]
fn returned_pixmap_is_reused() {
    let mut p = SurfacePool::new(SurfacePoolOpts::default());
    let a = p.take(4, 2).unwrap();
    p.give_back(a);
    let b = p.take(4, 2).unwrap();
    assert_eq!((b.width(), b.height()), (4, 2));
    assert_eq!(
        p.counters(),
        PoolCounters {
            created: 1,
            ..PoolCounters::default()
        }
    );
}

#[test]
fn zero_budget_keeps_nothing() {
    let mut p = SurfacePool::new(SurfacePoolOpts {
        byte_budget: 0,
        per_size: 4,
    });
    let a = p.take(1, 1).unwrap();
    p.give_back(a);
    assert_eq!(p.counters().kept, 0);
}

#[test]
fn oversized_surface_is_a_fallback_error() {
    let mut p = SurfacePool::new(SurfacePoolOpts::default());
    let err = p.take(70_000, 1).unwrap_err();
    assert!(matches!(err, GfxError::Fallback(_)));
}

#[test]
fn discarded_and_drained_sizes_leave_no_entries() {
    let mut p = SurfacePool::new(SurfacePoolOpts {
        byte_budget: 0,
        per_size: 4,
    });
    for side in 1..=200 {
        let pixmap = p.take(side, 1).unwrap();
        p.give_back(pixmap);
    }
    let c = p.counters();
    assert_eq!((c.kept, c.discarded), (0, 200));
    assert_eq!(p.sizes_held(), 0);

    let mut p = SurfacePool::new(SurfacePoolOpts::default());
    let a = p.take(3, 3).unwrap();
    p.give_back(a);
    assert_eq!(p.sizes_held(), 1);
    let _a = p.take(3, 3).unwrap();
    assert_eq!(p.sizes_held(), 0);
}
