use corr_core::momentum::{GevpBlock, Momentum};
use corr_core::qn::SubducedQn;
use corr_subduce::{
    average_momenta, average_rows, CellKey, IrrepLayout, RowKey, SubducedCorrelator, SubducedSet,
};
use ndarray::{ArrayD, IxDyn};

fn qn(k1: Momentum, k2: Momentum, class: &str) -> SubducedQn {
    SubducedQn {
        source: [k1, k2],
        sink: Momentum::ZERO,
        block: GevpBlock::new(k1.abs2(), k2.abs2()),
        p_total: 0,
        polarization: "g5".to_string(),
        gamma_class: class.to_string(),
        irrep: "T1".to_string(),
    }
}

fn correlator(value: f64, k1: Momentum, class: &str) -> SubducedCorrelator {
    SubducedCorrelator {
        qn: qn(k1, -k1, class),
        data: ArrayD::from_elem(IxDyn(&[4, 6]), value),
    }
}

fn empty_set(rows: usize) -> SubducedSet {
    let mut set = SubducedSet::new(
        0,
        vec!["gi".to_string(), "g0gi".to_string(), "g5g0gi".to_string()],
    );
    set.push_irrep(IrrepLayout {
        name: "T1".to_string(),
        blocks: vec![GevpBlock::new(1, 1)],
        rows,
    });
    set
}

fn key(gamma: usize, row: usize) -> CellKey {
    CellKey {
        irrep: 0,
        block: 0,
        gamma,
        row,
    }
}

#[test]
fn uniform_input_survives_both_levels() {
    let value = 0.7;
    let mut set = empty_set(3);
    let momenta = [
        Momentum::new(1, 0, 0),
        Momentum::new(0, 1, 0),
        Momentum::new(0, 0, 1),
    ];
    for gamma in 0..3 {
        for row in 0..3 {
            for k in momenta.iter().take(row + 1) {
                set.push(key(gamma, row), correlator(value, *k, "gi")).unwrap();
            }
        }
    }
    let by_momenta = average_momenta(&set).unwrap();
    assert_eq!(by_momenta.cells.len(), 9);
    let by_rows = average_rows(&by_momenta).unwrap();
    assert_eq!(by_rows.cells.len(), 3);
    for cell in by_rows.cells.values() {
        assert_eq!(cell.data.shape(), &[4, 6]);
        assert!(cell.data.iter().all(|v| (*v - value).abs() < 1e-12));
    }
}

#[test]
fn momentum_level_takes_the_mean() {
    let mut set = empty_set(1);
    set.push(key(0, 0), correlator(1.0, Momentum::new(1, 0, 0), "gi"))
        .unwrap();
    set.push(key(0, 0), correlator(3.0, Momentum::new(0, 1, 0), "gi"))
        .unwrap();
    let averaged = average_momenta(&set).unwrap();
    let cell = &averaged.cells[&key(0, 0)];
    assert_eq!(cell.count, 2);
    assert!(cell.data.iter().all(|v| *v == 2.0));
    assert_eq!(cell.qn.k1_sq, 1);
    assert_eq!(cell.qn.k2_sq, 1);
    assert_eq!(cell.qn.p_total, 0);
    assert_eq!(cell.qn.gamma_class, "gi");
}

#[test]
fn row_level_keeps_first_row_metadata() {
    let mut set = empty_set(2);
    set.push(key(1, 0), correlator(2.0, Momentum::new(1, 0, 0), "g0gi"))
        .unwrap();
    set.push(key(1, 1), correlator(4.0, Momentum::new(0, 0, 1), "g0gi"))
        .unwrap();
    let rows = average_rows(&average_momenta(&set).unwrap()).unwrap();
    let cell = &rows.cells[&RowKey {
        irrep: 0,
        block: 0,
        gamma: 1,
    }];
    assert_eq!(cell.count, 2);
    assert!(cell.data.iter().all(|v| *v == 3.0));
    assert_eq!(cell.qn.gamma_class, "g0gi");
}

#[test]
fn averaged_parts_stay_aligned() {
    let mut set = empty_set(2);
    set.push(key(0, 0), correlator(1.0, Momentum::new(1, 0, 0), "gi"))
        .unwrap();
    set.push(key(2, 1), correlator(1.0, Momentum::new(1, 0, 0), "g5g0gi"))
        .unwrap();
    let by_momenta = average_momenta(&set).unwrap();
    let (data, index) = by_momenta.to_parts();
    assert_eq!(data.len(), index.keys.len());
    assert_eq!(data.len(), index.qn.len());
    let (row_data, row_index) = average_rows(&by_momenta).unwrap().to_parts();
    assert_eq!(row_data.len(), 2);
    assert_eq!(row_index.qn.len(), 2);
}

#[test]
fn out_of_layout_keys_are_rejected() {
    let mut set = empty_set(1);
    let err = set
        .push(key(0, 1), correlator(1.0, Momentum::new(1, 0, 0), "gi"))
        .unwrap_err();
    assert!(err.is_consistency());
}
