use std::collections::BTreeMap;

use corr_core::config::SubductionConfig;
use corr_core::errors::CorrError;
use corr_core::momentum::{GevpBlock, Momentum};
use corr_core::qn::OperatorQn;
use corr_subduce::{
    CellKey, CoefficientProvider, IrrepCoefficients, RawCorrelators, SinkCoefficient,
    SourceCoefficient, SubducedSet, Subducer, TableProvider,
};
use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;

const T: usize = 2;
const CONFIGS: usize = 3;

fn combo_a() -> [Momentum; 2] {
    [Momentum::new(1, 0, 0), Momentum::new(-1, 0, 0)]
}

fn combo_b() -> [Momentum; 2] {
    [Momentum::new(0, 1, 0), Momentum::new(0, -1, 0)]
}

fn operator(source: [Momentum; 2], gamma: i32, name: &str) -> OperatorQn {
    OperatorQn {
        source,
        sink: Momentum::ZERO,
        gamma,
        name: name.to_string(),
    }
}

/// Four operators: two momentum combinations times two gamma labels.
fn raw_operators() -> (ArrayD<Complex64>, Vec<OperatorQn>) {
    let qn = vec![
        operator(combo_a(), 1, "a_g1"),
        operator(combo_a(), 2, "a_g2"),
        operator(combo_b(), 1, "b_g1"),
        operator(combo_b(), 2, "b_g2"),
    ];
    let per_op = [
        Complex64::new(0.0, 1.0),
        Complex64::new(5.0, 5.0),
        Complex64::new(7.0, 7.0),
        Complex64::new(3.0, 0.0),
    ];
    let mut values = Vec::with_capacity(4 * T * CONFIGS);
    for value in per_op {
        values.extend(std::iter::repeat(value).take(T * CONFIGS));
    }
    let data = ArrayD::from_shape_vec(IxDyn(&[4, T, CONFIGS]), values).unwrap();
    (data, qn)
}

fn sink(components: [f64; 3]) -> SinkCoefficient {
    SinkCoefficient {
        momentum: Momentum::ZERO,
        components: components.map(|c| Complex64::new(c, 0.0)),
    }
}

fn config(p_max: i32) -> SubductionConfig {
    let mut irreps = BTreeMap::new();
    irreps.insert(0, vec!["T1".to_string()]);
    SubductionConfig {
        p_max,
        irreps,
        ..SubductionConfig::default()
    }
}

fn two_row_table() -> TableProvider {
    let table = IrrepCoefficients {
        source: vec![
            vec![SourceCoefficient {
                momenta: combo_a(),
                coefficient: Complex64::new(1.0, 0.0),
            }],
            vec![SourceCoefficient {
                momenta: combo_b(),
                coefficient: Complex64::new(1.0, 0.0),
            }],
        ],
        sink: vec![vec![sink([1.0, 0.0, 0.0])], vec![sink([0.0, 1.0, 0.0])]],
    };
    TableProvider::new().with_irrep("T1", table)
}

fn subduce(p_max: i32) -> SubducedSet {
    let (data, qn) = raw_operators();
    let config = config(p_max);
    let provider = two_row_table();
    let raw = RawCorrelators::new(&data, &qn).unwrap();
    Subducer::new(&config, &provider).subduce(0, raw).unwrap()
}

#[test]
fn row_zero_has_single_entry_and_zero_row_is_omitted() {
    let set = subduce(1);
    assert_eq!(set.len(), 1);
    assert_eq!(set.irreps()[0].blocks, vec![GevpBlock::new(1, 1)]);

    let row0 = CellKey {
        irrep: 0,
        block: 0,
        gamma: 0,
        row: 0,
    };
    let entries = set.cell(&row0);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].data.shape(), &[T, CONFIGS]);
    // 2 * Im(i), negated for row 0.
    assert!(entries[0].data.iter().all(|value| *value == -2.0));
    assert_eq!(entries[0].qn.gamma_class, "gi");
    assert_eq!(entries[0].qn.polarization, "g5");
    assert_eq!(entries[0].qn.irrep, "T1");
    assert_eq!(entries[0].qn.source, combo_a());

    let row1 = CellKey { row: 1, ..row0 };
    assert!(set.cell(&row1).is_empty());
}

#[test]
fn empty_blocks_are_dropped_from_the_layout() {
    let set = subduce(4);
    assert_eq!(set.irreps()[0].blocks, vec![GevpBlock::new(1, 1)]);
    assert_eq!(set.len(), 1);
}

#[test]
fn time_like_class_selects_real_part() {
    let qn = vec![OperatorQn {
        source: combo_a(),
        sink: Momentum::ZERO,
        gamma: 10,
        name: "a_g10".to_string(),
    }];
    let data = ArrayD::from_elem(IxDyn(&[1, T, CONFIGS]), Complex64::new(1.0, 2.0));
    let table = IrrepCoefficients {
        source: vec![
            Vec::new(),
            vec![SourceCoefficient {
                momenta: combo_a(),
                coefficient: Complex64::new(0.0, 1.0),
            }],
        ],
        sink: vec![Vec::new(), vec![sink([1.0, 0.0, 0.0])]],
    };
    let provider = TableProvider::new().with_irrep("T1", table);
    let config = config(1);
    let raw = RawCorrelators::new(&data, &qn).unwrap();
    let set = Subducer::new(&config, &provider).subduce(0, raw).unwrap();

    let key = CellKey {
        irrep: 0,
        block: 0,
        gamma: 1,
        row: 1,
    };
    let entries = set.cell(&key);
    assert_eq!(entries.len(), 1);
    // 2 * Re(i * (1 + 2i)) = -4, row 1 keeps its sign.
    assert!(entries[0].data.iter().all(|value| *value == -4.0));
    assert_eq!(entries[0].qn.gamma_class, "g0gi");
}

#[test]
fn misaligned_quantum_numbers_are_fatal() {
    let (data, mut qn) = raw_operators();
    qn.pop();
    let err = RawCorrelators::new(&data, &qn).unwrap_err();
    assert!(err.is_consistency());
    assert_eq!(err.info().code, "qn-count");
}

#[test]
fn momentum_without_irreps_yields_empty_set() {
    let (data, qn) = raw_operators();
    let config = config(1);
    let provider = two_row_table();
    let raw = RawCorrelators::new(&data, &qn).unwrap();
    let set = Subducer::new(&config, &provider).subduce(2, raw).unwrap();
    assert!(set.is_empty());
    assert!(set.irreps().is_empty());
}

#[test]
fn missing_table_is_reported() {
    let (data, qn) = raw_operators();
    let config = config(1);
    let provider = TableProvider::new();
    let raw = RawCorrelators::new(&data, &qn).unwrap();
    let err = Subducer::new(&config, &provider).subduce(0, raw).unwrap_err();
    assert_eq!(err.info().code, "unknown-irrep");
}

#[test]
fn flattened_parts_stay_aligned() {
    let set = subduce(1);
    let (data, index) = set.to_parts();
    assert_eq!(data.len(), index.records.len());
    let restored = SubducedSet::from_parts(data.clone(), index.clone()).unwrap();
    assert_eq!(restored, set);

    let mut short = data;
    short.clear();
    let err = SubducedSet::from_parts(short, index).unwrap_err();
    assert_eq!(err.info().code, "subduced-count");
}

/// Provider with an extra, empty source row that has no sink counterpart.
struct RaggedProvider;

impl CoefficientProvider for RaggedProvider {
    fn source_rows(&self, _irrep: &str) -> Result<Vec<Vec<SourceCoefficient>>, CorrError> {
        Ok(vec![
            vec![SourceCoefficient {
                momenta: combo_a(),
                coefficient: Complex64::new(1.0, 0.0),
            }],
            Vec::new(),
            Vec::new(),
        ])
    }

    fn sink_rows(&self, _irrep: &str) -> Result<Vec<Vec<SinkCoefficient>>, CorrError> {
        Ok(vec![vec![sink([1.0, 0.0, 0.0])], Vec::new()])
    }
}

#[test]
fn ragged_tables_process_common_rows() {
    let (data, qn) = raw_operators();
    let config = config(1);
    let raw = RawCorrelators::new(&data, &qn).unwrap();
    let set = Subducer::new(&config, &RaggedProvider).subduce(0, raw).unwrap();
    assert_eq!(set.irreps()[0].rows, 2);
    assert_eq!(set.len(), 1);
}

fn moving_frame_inputs() -> (ArrayD<Complex64>, Vec<OperatorQn>, TableProvider) {
    let up = Momentum::new(0, 0, 1);
    let forward = [up, Momentum::ZERO];
    let backward = [Momentum::ZERO, up];
    let qn = vec![
        OperatorQn {
            source: forward,
            sink: -up,
            gamma: 1,
            name: "fwd".to_string(),
        },
        OperatorQn {
            source: backward,
            sink: -up,
            gamma: 1,
            name: "bwd".to_string(),
        },
        // Sink with the sign of the coefficient momentum; never matched.
        OperatorQn {
            source: forward,
            sink: up,
            gamma: 1,
            name: "wrong_sink".to_string(),
        },
    ];
    let per_op = [
        Complex64::new(0.0, 1.0),
        Complex64::new(0.0, 3.0),
        Complex64::new(0.0, 100.0),
    ];
    let mut values = Vec::new();
    for value in per_op {
        values.extend(std::iter::repeat(value).take(T * CONFIGS));
    }
    let data = ArrayD::from_shape_vec(IxDyn(&[3, T, CONFIGS]), values).unwrap();

    let source_row = vec![
        SourceCoefficient {
            momenta: forward,
            coefficient: Complex64::new(1.0, 0.0),
        },
        SourceCoefficient {
            momenta: backward,
            coefficient: Complex64::new(1.0, 0.0),
        },
    ];
    let sink_row = vec![SinkCoefficient {
        momentum: up,
        components: [
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
        ],
    }];
    let table = IrrepCoefficients {
        source: vec![source_row; 4],
        sink: vec![sink_row; 4],
    };
    (data, qn, TableProvider::new().with_irrep("A1", table))
}

#[test]
fn moving_frame_matches_negated_sink_and_either_source_order() {
    let (data, qn, provider) = moving_frame_inputs();
    let mut irreps = BTreeMap::new();
    irreps.insert(1, vec!["A1".to_string()]);
    let config = SubductionConfig {
        p_max: 1,
        irreps,
        ..SubductionConfig::default()
    };
    let raw = RawCorrelators::new(&data, &qn).unwrap();
    let set = Subducer::new(&config, &provider).subduce(1, raw).unwrap();

    assert_eq!(set.irreps()[0].blocks, vec![GevpBlock::new(1, 0)]);
    assert_eq!(set.irreps()[0].rows, 4);
    assert_eq!(set.len(), 8);

    let up = Momentum::new(0, 0, 1);
    for row in 0..4 {
        let key = CellKey {
            irrep: 0,
            block: 0,
            gamma: 0,
            row,
        };
        let entries = set.cell(&key);
        assert_eq!(entries.len(), 2, "row {row}");
        assert_eq!(entries[0].qn.source, [up, Momentum::ZERO]);
        assert_eq!(entries[1].qn.source, [Momentum::ZERO, up]);
        assert_eq!(entries[0].qn.sink, up);
    }
}

#[test]
fn rows_zero_and_two_are_negated() {
    let (data, qn, provider) = moving_frame_inputs();
    let mut irreps = BTreeMap::new();
    irreps.insert(1, vec!["A1".to_string()]);
    let config = SubductionConfig {
        p_max: 1,
        irreps,
        ..SubductionConfig::default()
    };
    let raw = RawCorrelators::new(&data, &qn).unwrap();
    let set = Subducer::new(&config, &provider).subduce(1, raw).unwrap();

    let expected = [[-2.0, -6.0], [2.0, 6.0], [-2.0, -6.0], [2.0, 6.0]];
    for (row, values) in expected.iter().enumerate() {
        let key = CellKey {
            irrep: 0,
            block: 0,
            gamma: 0,
            row,
        };
        let entries = set.cell(&key);
        assert_eq!(entries.len(), 2);
        for (entry, value) in entries.iter().zip(values) {
            assert!(
                entry.data.iter().all(|x| x == value),
                "row {row}: expected {value}"
            );
        }
    }
}
