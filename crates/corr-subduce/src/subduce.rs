use corr_core::config::{GammaClass, ProjectedPart, SubductionConfig};
use corr_core::errors::{CorrError, ErrorInfo};
use corr_core::momentum::GevpBlock;
use corr_core::qn::{OperatorQn, SubducedQn};
use ndarray::{ArrayD, Axis};
use num_complex::Complex64;

use crate::coefficients::{
    CoefficientProvider, IrrepCoefficients, SinkCoefficient, SourceCoefficient,
};
use crate::lookup::gevp_blocks;
use crate::set::{CellKey, IrrepLayout, SubducedCorrelator, SubducedSet};

/// Raw correlators of one total momentum with their aligned quantum numbers.
#[derive(Debug, Clone, Copy)]
pub struct RawCorrelators<'a> {
    /// Complex correlators; axis 0 runs over operators.
    pub data: &'a ArrayD<Complex64>,
    /// One record per operator.
    pub qn: &'a [OperatorQn],
}

impl<'a> RawCorrelators<'a> {
    /// Pairs data with quantum numbers, rejecting misaligned inputs.
    pub fn new(data: &'a ArrayD<Complex64>, qn: &'a [OperatorQn]) -> Result<Self, CorrError> {
        if data.ndim() == 0 || data.len_of(Axis(0)) != qn.len() {
            let operators = if data.ndim() == 0 { 0 } else { data.len_of(Axis(0)) };
            return Err(CorrError::Consistency(
                ErrorInfo::new(
                    "qn-count",
                    "read operators do not agree with expected operators",
                )
                .with_context("operators", operators)
                .with_context("records", qn.len()),
            ));
        }
        Ok(Self { data, qn })
    }

    fn trailing_shape(&self) -> Vec<usize> {
        self.data.shape()[1..].to_vec()
    }
}

/// Projects raw correlators onto irrep rows.
pub struct Subducer<'a> {
    config: &'a SubductionConfig,
    provider: &'a dyn CoefficientProvider,
}

impl<'a> Subducer<'a> {
    /// Creates a subducer for the given configuration and coefficient source.
    pub fn new(config: &'a SubductionConfig, provider: &'a dyn CoefficientProvider) -> Self {
        Self { config, provider }
    }

    /// Subduces every irrep configured for total momentum `p`.
    pub fn subduce(&self, p: i32, raw: RawCorrelators<'_>) -> Result<SubducedSet, CorrError> {
        let class_names = self
            .config
            .gamma_classes
            .iter()
            .map(|class| class.name.clone())
            .collect();
        let mut set = SubducedSet::new(p, class_names);
        let irreps = self.config.irreps_for(p);
        if irreps.is_empty() {
            log::info!("no irreps configured for p = {p}");
            return Ok(set);
        }
        let blocks = gevp_blocks(p, self.config.p_max);
        log::debug!("p = {p}: {} GEVP blocks", blocks.len());
        for irrep in irreps {
            log::info!("subducing Lambda = {irrep}");
            let table = self.provider.coefficients(irrep)?;
            self.subduce_irrep(&mut set, irrep, &table, &blocks, raw)?;
        }
        log::info!(
            "p = {p}: {} subduced correlators in {} cells",
            set.len(),
            set.cell_count()
        );
        Ok(set)
    }

    fn subduce_irrep(
        &self,
        set: &mut SubducedSet,
        irrep: &str,
        table: &IrrepCoefficients,
        blocks: &[GevpBlock],
        raw: RawCorrelators<'_>,
    ) -> Result<(), CorrError> {
        let rows = table.common_rows(irrep);
        let p = set.p_total();

        let mut retained = Vec::new();
        let mut entries = Vec::new();
        for block in blocks {
            let mut block_entries = Vec::new();
            for (gamma, class) in self.config.gamma_classes.iter().enumerate() {
                for row in 0..rows {
                    for source in &table.source[row] {
                        for sink in &table.sink[row] {
                            if !contributes(block, source, sink, p) {
                                continue;
                            }
                            let subduced = accumulate(source, sink, row, class, raw);
                            if subduced.iter().all(|value| *value == 0.0) {
                                continue;
                            }
                            let qn = SubducedQn {
                                source: source.momenta,
                                sink: sink.momentum,
                                block: *block,
                                p_total: p,
                                polarization: self.config.polarization.clone(),
                                gamma_class: class.name.clone(),
                                irrep: irrep.to_string(),
                            };
                            let entry = SubducedCorrelator { qn, data: subduced };
                            block_entries.push((gamma, row, entry));
                        }
                    }
                }
            }
            if block_entries.is_empty() {
                log::debug!("{irrep}: block {block} has no contributions");
                continue;
            }
            let block_index = retained.len();
            retained.push(*block);
            entries.extend(
                block_entries
                    .into_iter()
                    .map(|(gamma, row, entry)| (block_index, gamma, row, entry)),
            );
        }

        let irrep_index = set.push_irrep(IrrepLayout {
            name: irrep.to_string(),
            blocks: retained,
            rows,
        });
        for (block, gamma, row, entry) in entries {
            let key = CellKey {
                irrep: irrep_index,
                block,
                gamma,
                row,
            };
            set.push(key, entry)?;
        }
        Ok(())
    }
}

/// A coefficient pair contributes to `block` when its source magnitudes match
/// the block (either order) and the sink sits at the total momentum.
fn contributes(
    block: &GevpBlock,
    source: &SourceCoefficient,
    sink: &SinkCoefficient,
    p: i32,
) -> bool {
    block.matches(source.momenta[0].abs2(), source.momenta[1].abs2()) && sink.momentum.abs2() == p
}

/// Sums the projected contributions of every raw operator matching the
/// coefficient pair.
///
/// Rows 0 and 2 enter with a negative sign.
fn accumulate(
    source: &SourceCoefficient,
    sink: &SinkCoefficient,
    row: usize,
    class: &GammaClass,
    raw: RawCorrelators<'_>,
) -> ArrayD<f64> {
    let mut subduced = ArrayD::<f64>::zeros(raw.trailing_shape());
    let sign = if row == 0 || row == 2 { -1.0 } else { 1.0 };
    let sink_momentum = -sink.momentum;

    for (op, record) in raw.qn.iter().enumerate() {
        if record.source != source.momenta
            || record.sink != sink_momentum
            || !class.contains(record.gamma)
        {
            continue;
        }
        let correlator = raw.data.index_axis(Axis(0), op);
        for (component, label) in class.labels.iter().enumerate() {
            let factor = source.coefficient * sink.components[component].conj();
            if factor.re == 0.0 && factor.im == 0.0 {
                continue;
            }
            if *label != record.gamma {
                continue;
            }
            let projected = match class.part {
                ProjectedPart::Real => correlator.mapv(|z| 2.0 * (factor * z).re),
                ProjectedPart::Imag => correlator.mapv(|z| 2.0 * (factor * z).im),
            };
            subduced.scaled_add(sign, &projected);
        }
    }
    subduced
}
