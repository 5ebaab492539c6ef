//! PyO3 bindings exposing [`Regex`] to Python.

use crate::regex::{Regex, RegexBuilder};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

/// A compiled regular expression.
#[pyclass(name = "Regex", module = "regexfa", frozen)]
pub struct PyRegex {
    /// The underlying Rust regex
    regex: Regex,
}

#[pymethods]
impl PyRegex {
    #[new]
    #[pyo3(signature = (pattern, ignore_whitespace = false))]
    fn new(pattern: &str, ignore_whitespace: bool) -> PyResult<Self> {
        let regex = RegexBuilder::new()
            .ignore_whitespace(ignore_whitespace)
            .build(pattern)
            .map_err(|err| PyValueError::new_err(err.to_string()))?;
        Ok(Self { regex })
    }

    fn __repr__(&self) -> String {
        format!("Regex({:?})", self.regex.pattern())
    }

    /// Check if the whole string matches, using the minimal DFA.
    fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Check if the whole string matches, using the NFA.
    fn is_match_nfa(&self, input: &str) -> bool {
        self.regex.is_match_nfa(input)
    }

    #[getter]
    fn pattern(&self) -> &str {
        self.regex.pattern()
    }

    #[getter]
    fn normalized(&self) -> &str {
        self.regex.normalized()
    }

    #[getter]
    fn postfix(&self) -> &str {
        self.regex.postfix()
    }

    #[getter]
    fn nfa_states(&self) -> u32 {
        self.regex.nfa().num_states()
    }

    #[getter]
    fn dfa_states(&self) -> u32 {
        self.regex.dfa().num_states()
    }

    #[getter]
    fn min_dfa_states(&self) -> u32 {
        self.regex.matching_dfa().num_states()
    }

    /// Convert the matching DFA to a NetworkX MultiDiGraph.
    fn to_networkx<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        let nx = py.import("networkx")?;
        let graph = nx.call_method0("MultiDiGraph")?;
        let dfa = self.regex.matching_dfa();

        for state in 0..dfa.num_states() {
            let kwargs = PyDict::new(py);
            kwargs.set_item("start", dfa.start_state() == Some(state))?;
            kwargs.set_item("final", dfa.is_final(state))?;
            graph.call_method("add_node", (state,), Some(&kwargs))?;
        }

        let (_, edges) = dfa.to_graph();
        for (src, dst, label) in edges {
            let kwargs = PyDict::new(py);
            kwargs.set_item("label", label)?;
            graph.call_method("add_edge", (src, dst), Some(&kwargs))?;
        }

        Ok(graph)
    }
}

/// The `regexfa` extension module.
#[pymodule]
fn regexfa(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRegex>()?;
    Ok(())
}
