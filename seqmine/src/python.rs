use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::seq::{Algorithm, Item, MiningError, MiningSettings, RuleGenerator, SequenceDatabase, Support};

type PyPattern = (Vec<Vec<Item>>, Support);
type PyRule = (Vec<Vec<Item>>, Vec<Vec<Item>>, f64);

fn value_error(error: MiningError) -> PyErr {
    PyValueError::new_err(error.to_string())
}

fn mine_with(
    py: Python<'_>,
    algorithm: Algorithm,
    sequences: Vec<Vec<Vec<Item>>>,
    min_support: f64,
    parallel: bool,
) -> PyResult<Vec<PyPattern>> {
    let database = SequenceDatabase::from_unsorted(sequences).map_err(value_error)?;
    let settings = MiningSettings::new(min_support).with_parallel(parallel);
    let outcome = py
        .allow_threads(|| algorithm.mine(&database, &settings))
        .map_err(value_error)?;
    Ok(outcome
        .into_iter()
        .map(|pattern| (pattern.to_vecs(), pattern.support()))
        .collect())
}

/// Mines with the algorithm named `algorithm` ("prefixspan", "bide", "spam" or "lapin-spam").
#[pyfunction]
#[pyo3(signature = (sequences, min_support, algorithm = "prefixspan", parallel = false))]
fn mine(
    py: Python<'_>,
    sequences: Vec<Vec<Vec<Item>>>,
    min_support: f64,
    algorithm: &str,
    parallel: bool,
) -> PyResult<Vec<PyPattern>> {
    let algorithm: Algorithm = algorithm.parse().map_err(value_error)?;
    mine_with(py, algorithm, sequences, min_support, parallel)
}

#[pyfunction]
#[pyo3(signature = (sequences, min_support, parallel = false))]
fn prefixspan(
    py: Python<'_>,
    sequences: Vec<Vec<Vec<Item>>>,
    min_support: f64,
    parallel: bool,
) -> PyResult<Vec<PyPattern>> {
    mine_with(py, Algorithm::PrefixSpan, sequences, min_support, parallel)
}

#[pyfunction]
#[pyo3(signature = (sequences, min_support, parallel = false))]
fn bide(py: Python<'_>, sequences: Vec<Vec<Vec<Item>>>, min_support: f64, parallel: bool) -> PyResult<Vec<PyPattern>> {
    mine_with(py, Algorithm::Bide, sequences, min_support, parallel)
}

#[pyfunction]
#[pyo3(signature = (sequences, min_support, parallel = false))]
fn spam(py: Python<'_>, sequences: Vec<Vec<Vec<Item>>>, min_support: f64, parallel: bool) -> PyResult<Vec<PyPattern>> {
    mine_with(py, Algorithm::Spam, sequences, min_support, parallel)
}

#[pyfunction]
#[pyo3(signature = (sequences, min_support, parallel = false))]
fn lapin_spam(
    py: Python<'_>,
    sequences: Vec<Vec<Vec<Item>>>,
    min_support: f64,
    parallel: bool,
) -> PyResult<Vec<PyPattern>> {
    mine_with(py, Algorithm::LapinSpam, sequences, min_support, parallel)
}

/// Mines every frequent pattern and returns `(antecedent, pattern, confidence)` rules.
#[pyfunction]
fn sequential_rules(
    py: Python<'_>,
    sequences: Vec<Vec<Vec<Item>>>,
    min_support: f64,
    min_confidence: f64,
) -> PyResult<Vec<PyRule>> {
    let database = SequenceDatabase::from_unsorted(sequences).map_err(value_error)?;
    let settings = MiningSettings::new(min_support);
    let outcome = py
        .allow_threads(|| Algorithm::PrefixSpan.mine(&database, &settings))
        .map_err(value_error)?;
    let rules = RuleGenerator::new(&outcome.patterns)
        .generate(min_confidence)
        .map_err(value_error)?;
    Ok(rules
        .into_iter()
        .map(|rule| (rule.antecedent.to_vecs(), rule.pattern.to_vecs(), rule.confidence))
        .collect())
}

#[pymodule]
fn seqmine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(mine, m)?)?;
    m.add_function(wrap_pyfunction!(prefixspan, m)?)?;
    m.add_function(wrap_pyfunction!(bide, m)?)?;
    m.add_function(wrap_pyfunction!(spam, m)?)?;
    m.add_function(wrap_pyfunction!(lapin_spam, m)?)?;
    m.add_function(wrap_pyfunction!(sequential_rules, m)?)?;
    Ok(())
}
