//! Convergence and monotonicity properties of the outer loop.

use bytegrad::{Observer, Optimizer};

/// Observer that records the value reached after every epoch.
struct History(std::sync::mpsc::Sender<i64>);

impl Observer for History {
    fn epoch_completed(&mut self, _epoch: usize, value: i64) {
        self.0.send(value).expect("receiver alive for the whole run");
    }
}

impl History {
    fn channel() -> (Self, std::sync::mpsc::Receiver<i64>) {
        let (tx, rx) = std::sync::mpsc::channel();
        (Self(tx), rx)
    }
}

#[test]
fn single_dimension_minimize_reaches_the_target() {
    let mut optimizer = Optimizer::new().unwrap();
    let (x, value) = optimizer
        .minimize(|x: &[u8]| (i64::from(x[0]) - 137).pow(2), &[0])
        .unwrap();
    assert_eq!(x, vec![137]);
    assert_eq!(value, 0);
}

#[test]
fn single_dimension_maximize_reaches_the_target() {
    let mut optimizer = Optimizer::new().unwrap();
    let (x, value) = optimizer
        .maximize(|x: &[u8]| -(i64::from(x[0]) - 137).pow(2), &[50])
        .unwrap();
    assert_eq!(x, vec![137]);
    assert_eq!(value, 0);
}

#[test]
fn multi_dimension_minimize_reaches_the_target() {
    let objective = |x: &[u8]| {
        i64::from(x[0].abs_diff(10)) + i64::from(x[1].abs_diff(200)) + i64::from(x[2].abs_diff(5))
    };
    let mut optimizer = Optimizer::new().unwrap();
    let (x, value) = optimizer.minimize(objective, &[0, 0, 0]).unwrap();
    assert_eq!(x, vec![10, 200, 5]);
    assert_eq!(value, 0);
}

#[test]
fn wraparound_lets_the_search_cross_the_byte_boundary() {
    // Circular distance to 200: from 0 the short way round is downward
    // through 255.
    let objective = |x: &[u8]| {
        let direct = i64::from(x[0].abs_diff(200));
        direct.min(256 - direct)
    };
    let mut optimizer = Optimizer::new().unwrap();
    let (x, value) = optimizer.minimize(objective, &[0]).unwrap();
    assert_eq!(x, vec![200]);
    assert_eq!(value, 0);
}

#[test]
fn minimize_values_never_increase_across_epochs() {
    let objective = |x: &[u8]| {
        i64::from(x[0].abs_diff(10)) + i64::from(x[1].abs_diff(200)) + i64::from(x[2].abs_diff(5))
    };
    let (history, values) = History::channel();
    let mut optimizer = Optimizer::builder().observer(history).build().unwrap();
    optimizer.minimize(objective, &[0, 0, 0]).unwrap();

    let values: Vec<i64> = values.try_iter().collect();
    assert!(!values.is_empty());
    assert!(
        values.windows(2).all(|pair| pair[1] <= pair[0]),
        "epoch values increased: {values:?}"
    );
}

#[test]
fn maximize_values_never_decrease_across_epochs() {
    let (history, values) = History::channel();
    let mut optimizer = Optimizer::builder().observer(history).build().unwrap();
    optimizer
        .maximize(|x: &[u8]| -(i64::from(x[0]) - 137).pow(2), &[50])
        .unwrap();

    let values: Vec<i64> = values.try_iter().collect();
    assert!(!values.is_empty());
    assert!(
        values.windows(2).all(|pair| pair[1] >= pair[0]),
        "epoch values decreased: {values:?}"
    );
}

#[test]
fn already_extremal_point_is_returned_unchanged() {
    let objective = |x: &[u8]| (i64::from(x[0]) - 137).pow(2);
    let mut optimizer = Optimizer::new().unwrap();
    let (x, value) = optimizer.minimize(objective, &[137]).unwrap();
    assert_eq!(x, vec![137]);
    assert_eq!(value, 0);

    // Multi-dimensional extremum behaves the same.
    let objective = |x: &[u8]| {
        i64::from(x[0].abs_diff(10)) + i64::from(x[1].abs_diff(200)) + i64::from(x[2].abs_diff(5))
    };
    let (x, value) = optimizer.minimize(objective, &[10, 200, 5]).unwrap();
    assert_eq!(x, vec![10, 200, 5]);
    assert_eq!(value, 0);
}

#[test]
fn result_is_never_worse_than_the_start() {
    // A rough landscape with no structure the search can rely on; the
    // guarantee that matters is "no worse than the input".
    let objective = |x: &[u8]| (i64::from(x[0]) * 31 + i64::from(x[1]) * 17) % 101;
    let mut optimizer = Optimizer::new().unwrap();
    for start in [[0u8, 0u8], [13, 77], [255, 1], [128, 128], [200, 3]] {
        let f0 = objective(&start);
        let (_, min_value) = optimizer.minimize(objective, &start).unwrap();
        assert!(min_value <= f0, "minimize worsened {start:?}");
        let (_, max_value) = optimizer.maximize(objective, &start).unwrap();
        assert!(max_value >= f0, "maximize worsened {start:?}");
    }
}

#[test]
fn flat_start_reports_a_flat_region_event() {
    struct FlatFlag(std::sync::mpsc::Sender<(usize, bool)>);

    impl Observer for FlatFlag {
        fn flat_region(&mut self, _epoch: usize, attempts: usize, escaped: bool) {
            self.0.send((attempts, escaped)).unwrap();
        }
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let mut optimizer = Optimizer::builder().observer(FlatFlag(tx)).build().unwrap();
    let (x, value) = optimizer.minimize(|_: &[u8]| 42i64, &[7, 7]).unwrap();
    assert_eq!(x, vec![7, 7]);
    assert_eq!(value, 42);

    // Default escape budget is zero: the flat region is accepted without
    // any perturbation attempts.
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![(0, false)]);
}
