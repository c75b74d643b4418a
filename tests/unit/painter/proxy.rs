use super::*;
use crate::foundation::core::IntRect;

#[test]
fn owner_thread_applies_inline() {
    let (proxy, rx) = MainThreadProxy::<IntRect>::new();
    let mut seen = None;
    let out = proxy.request(IntRect::new(1, 2, 3, 4), |r| seen = Some(r));
    assert_eq!(out, ProxyOutcome::Applied);
    assert_eq!(seen, Some(IntRect::new(1, 2, 3, 4)));
    assert_eq!(rx.drain(|_| panic!("nothing should be queued")), 0);
}

#[test]
fn second_request_in_flight_is_coalesced() {
    let (proxy, rx) = MainThreadProxy::<i32>::new();
    let remote = proxy.clone();
    let outcomes = std::thread::spawn(move || {
        let a = remote.request(1, |_| unreachable!());
        let b = remote.request(2, |_| unreachable!());
        (a, b)
    })
    .join()
    .unwrap();
    assert_eq!(outcomes, (ProxyOutcome::Posted, ProxyOutcome::Coalesced));
    assert!(proxy.is_pending());

    let mut got = Vec::new();
    assert_eq!(rx.drain(|v| got.push(v)), 1);
    assert_eq!(got, vec![1]);
    assert!(!proxy.is_pending());

    let remote = proxy.clone();
    let again = std::thread::spawn(move || remote.request(3, |_| unreachable!()))
        .join()
        .unwrap();
    assert_eq!(again, ProxyOutcome::Posted);
    rx.drain(|v| got.push(v));
    assert_eq!(got, vec![1, 3]);
}

#[test]
fn dropped_receiver_discards_requests() {
    let (proxy, rx) = MainThreadProxy::<u8>::new();
    drop(rx);
    let out = std::thread::spawn(move || proxy.request(9, |_| unreachable!()))
        .join()
        .unwrap();
    assert_eq!(out, ProxyOutcome::Coalesced);
}
