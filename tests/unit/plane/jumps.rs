use super::*;

#[test]
fn equal_extents_step_by_one() {
    assert_eq!(make_jumps_table(5, 5), vec![1, 1, 1, 1, 0]);
}

#[test]
fn upscale_and_downscale_shapes() {
    assert_eq!(make_jumps_table(2, 4), vec![0, 0, 1, 0]);
    assert_eq!(make_jumps_table(4, 2), vec![1, 2]);
    assert_eq!(make_jumps_table(1, 3), vec![0, 0, 0]);
}

#[test]
fn degenerate_extents() {
    assert!(make_jumps_table(3, 0).is_empty());
    assert_eq!(make_jumps_table(0, 3), vec![0, 0, 0]);
}

#[test]
fn sums_never_walk_off_the_source() {
    for from in 1..48 {
        for to in 1..48 {
            let t = make_jumps_table(from, to);
            assert_eq!(t.len(), to as usize);
            assert!(t.iter().all(|s| *s >= 0));
            let sum: i32 = t.iter().sum();
            assert!(sum <= from - 1, "from {from} to {to}: sum {sum}");
            if from <= to {
                assert!(t.iter().all(|s| *s <= 1), "from {from} to {to}: {t:?}");
            }
        }
    }
}

#[test]
fn downscale_covers_most_of_the_source() {
    let t = make_jumps_table(100, 10);
    let sum: i32 = t.iter().sum();
    assert!(sum >= 80, "sum {sum}");
}
