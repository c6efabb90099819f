//! A minimal execution host for cell scripts.
//!
//! The kernel owns the namespace and the magic handler, executes cells in
//! order, and keeps notebook-style history variables up to date:
//!
//! - `In`: sequence of executed cell sources (index 0 is empty)
//! - `Out`: mapping of execution count to the cell's result
//! - `_iN`, `_i`, `_ii`, `_iii`: recent inputs
//! - `_N`, `_`, `__`, `___`: recent results

use super::{Cell, CellKind, Invocation};
use crate::config::MagicConfig;
use crate::error::{MagicError, Result};
use crate::magics::{MagicHandler, Output};
use crate::namespace::{Mapping, Namespace, UserNamespace, Value};
use tracing::debug;

const HOST_NAMES: [&str; 2] = ["In", "Out"];

/// Executes cells against one namespace.
#[derive(Debug)]
pub struct Kernel {
    handler: MagicHandler,
    ns: UserNamespace,
    execution_count: usize,
}

impl Kernel {
    pub fn new(config: MagicConfig) -> Result<Self> {
        let mut ns = UserNamespace::new();
        ns.set("In", Value::Sequence(vec![Value::String(String::new())]));
        ns.set("Out", Value::Mapping(Mapping::new()));
        for name in HOST_NAMES {
            ns.hide(name);
        }

        let handler = MagicHandler::register(config, &mut ns)?;
        Ok(Self {
            handler,
            ns,
            execution_count: 0,
        })
    }

    pub fn namespace(&self) -> &UserNamespace {
        &self.ns
    }

    pub fn namespace_mut(&mut self) -> &mut UserNamespace {
        &mut self.ns
    }

    pub fn handler(&self) -> &MagicHandler {
        &self.handler
    }

    /// Execution count of the most recently executed cell.
    pub fn execution_count(&self) -> usize {
        self.execution_count
    }

    /// Execute one cell and return its outputs in order.
    ///
    /// Markdown cells are skipped and do not advance the execution count.
    /// A failing magic stops the cell; outputs of earlier magics in the same
    /// cell are discarded along with the error.
    pub fn execute(&mut self, cell: &Cell) -> Result<Vec<Output>> {
        self.execute_with(cell, |_, _| {})
    }

    /// Like [`Kernel::execute`], calling `observe` after each magic with its
    /// outcome.
    pub fn execute_with<F>(&mut self, cell: &Cell, mut observe: F) -> Result<Vec<Output>>
    where
        F: FnMut(&Invocation, std::result::Result<&Output, &MagicError>),
    {
        let calls: Vec<&Invocation> = match &cell.kind {
            CellKind::Markdown => return Ok(Vec::new()),
            CellKind::CellMagic(call) => vec![call],
            CellKind::LineMagics(calls) => calls.iter().collect(),
        };

        self.execution_count += 1;
        let count = self.execution_count;
        self.record_input(count, &cell.source);
        debug!(count, line = cell.line, magics = calls.len(), "executing cell");

        let mut outputs = Vec::new();
        for call in calls {
            let result = self.handler.invoke(
                &mut self.ns,
                call.magic,
                &call.args,
                call.body.as_deref(),
            );
            match result {
                Ok(output) => {
                    observe(call, Ok(&output));
                    outputs.push(output);
                }
                Err(err) => {
                    observe(call, Err(&err));
                    return Err(err);
                }
            }
        }

        if let Some(result) = outputs.iter().rev().find_map(result_value) {
            self.record_output(count, result);
        }

        Ok(outputs)
    }

    fn record_input(&mut self, count: usize, source: &str) {
        let source = Value::String(source.to_string());

        if let Some(Value::Sequence(inputs)) = self.ns.get_mut("In") {
            inputs.push(source.clone());
        }

        let previous_ii = self.ns.get("_ii").cloned();
        let previous_i = self.ns.get("_i").cloned();
        if let Some(v) = previous_ii {
            self.ns.set("_iii", v);
        }
        if let Some(v) = previous_i {
            self.ns.set("_ii", v);
        }
        self.ns.set("_i", source.clone());
        self.ns.set(&format!("_i{}", count), source);
    }

    fn record_output(&mut self, count: usize, result: Value) {
        if let Some(Value::Mapping(outputs)) = self.ns.get_mut("Out") {
            outputs.insert(Value::from(count as u64), result.clone());
        }

        let previous_2 = self.ns.get("__").cloned();
        let previous_1 = self.ns.get("_").cloned();
        if let Some(v) = previous_2 {
            self.ns.set("___", v);
        }
        if let Some(v) = previous_1 {
            self.ns.set("__", v);
        }
        self.ns.set("_", result.clone());
        self.ns.set(&format!("_{}", count), result);
    }
}

/// The value a cell's output contributes to `Out`.
fn result_value(output: &Output) -> Option<Value> {
    match output {
        Output::Display(rendered) => Some(Value::String(rendered.text.clone())),
        Output::Value(value) => Some(value.clone()),
        Output::None | Output::Text(_) | Output::Diagnostic(_) => None,
    }
}
