use super::*;

#[test]
fn aligned_rounds_edges_outward_to_multiples() {
    let r = aligned(IntRect::new(3, 5, 10, 6), 4);
    assert_eq!(r, IntRect::from_coords(4, 8, 15, 11));
    assert_eq!(r.width % 4, 0);
    assert_eq!(r.height % 4, 0);
}

#[test]
fn aligned_with_one_is_identity() {
    let r = IntRect::new(3, 5, 10, 6);
    assert_eq!(aligned(r, 1), r);
    assert_eq!(aligned(r, 0), r);
}

#[test]
fn disjoint_rects_clip_to_empty() {
    let (s, d) = clip_rects(
        IntRect::new(0, 0, 4, 4),
        IntRect::new(10, 10, 4, 4),
        IntRect::new(0, 0, 4, 4),
        IntRect::new(0, 0, 4, 4),
        Rotation::Rotate0,
    );
    assert!(s.is_empty() && d.is_empty());
}

#[test]
fn direct_cut_moves_paired_start() {
    let (s, d) = clip_rects(
        IntRect::new(0, 0, 10, 10),
        IntRect::new(0, 0, 10, 10),
        IntRect::new(-5, 0, 10, 10),
        IntRect::new(0, 0, 20, 20),
        Rotation::Rotate0,
    );
    assert_eq!(s, IntRect::from_coords(5, 0, 9, 9));
    assert_eq!(d, IntRect::from_coords(0, 0, 4, 9));
}

#[test]
fn mirrored_cut_moves_paired_end() {
    let (s, d) = clip_rects(
        IntRect::new(0, 0, 10, 10),
        IntRect::new(0, 0, 10, 10),
        IntRect::new(-5, 0, 10, 10),
        IntRect::new(0, 0, 20, 20),
        Rotation::Rotate180,
    );
    assert_eq!(s, IntRect::from_coords(0, 0, 4, 9));
    assert_eq!(d, IntRect::from_coords(0, 0, 4, 9));
}

#[test]
fn quarter_turn_cuts_the_crossed_axis() {
    // Columns on the right of the destination come from the top rows of the source.
    let (s, d) = clip_rects(
        IntRect::new(0, 0, 10, 20),
        IntRect::new(0, 0, 10, 20),
        IntRect::new(0, 0, 20, 10),
        IntRect::new(0, 0, 15, 10),
        Rotation::Rotate90,
    );
    assert_eq!(s, IntRect::from_coords(0, 5, 9, 19));
    assert_eq!(d, IntRect::from_coords(0, 0, 14, 9));

    let (s, d) = clip_rects(
        IntRect::new(0, 0, 10, 20),
        IntRect::new(0, 0, 10, 20),
        IntRect::new(0, 0, 20, 10),
        IntRect::new(0, 0, 15, 10),
        Rotation::Rotate270,
    );
    assert_eq!(s, IntRect::from_coords(0, 0, 9, 14));
    assert_eq!(d, IntRect::from_coords(0, 0, 14, 9));
}
