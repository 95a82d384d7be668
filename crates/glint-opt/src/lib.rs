//! AST optimization passes for glint.
//!
//! Provides a [`Pass`] trait, a [`PassManager`] with fixed-point iteration,
//! and the built-in rewrite passes (constant folding, algebraic
//! simplification, dead code elimination).

mod algebraic;
mod const_fold;
mod dce;

pub use algebraic::AlgebraicSimplification;
pub use const_fold::ConstantFolding;
pub use dce::DeadCodeElimination;

use std::fmt::Debug;

use glint_ast::Program;

/// Absolute tolerance used when comparing literal values against pattern
/// constants, and below which a divisor refuses to fold.
pub(crate) const LITERAL_TOLERANCE: f32 = 1e-4;

/// Maximum number of fixed-point iterations before giving up. Reaching the
/// cap is not an error; the tree is still well formed, just not a proven
/// fixed point.
const MAX_ITERATIONS: usize = 10;

/// Counters accumulated over one optimization run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PassStats {
    pub constants_folded: usize,
    pub algebraic_simplifications: usize,
    pub dead_code_removed: usize,
    /// Fixed-point iterations executed, the final no-change one included.
    pub total_passes: usize,
}

/// A rewrite pass over a whole program.
pub trait Pass: Debug {
    /// Human-readable name of the pass.
    fn name(&self) -> &str;

    /// Run the pass. Returns `true` if anything was rewritten.
    fn run(&self, program: &mut Program, stats: &mut PassStats) -> bool;
}

/// Runs passes in sequence with fixed-point iteration.
///
/// Passes traverse the tree in document order, so repeated runs over the
/// same input rewrite it identically.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PassManager {
    /// Creates an empty pass manager with no passes.
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// The standard pipeline: fold, simplify, eliminate.
    pub fn with_default_passes() -> Self {
        let mut pm = Self::new();
        pm.add_pass(Box::new(ConstantFolding));
        pm.add_pass(Box::new(AlgebraicSimplification));
        pm.add_pass(Box::new(DeadCodeElimination));
        pm
    }

    /// Adds a pass to the pipeline.
    pub fn add_pass(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    /// Runs all passes until a fixed point is reached or the iteration cap.
    pub fn run(&self, program: &mut Program) -> PassStats {
        let mut stats = PassStats::default();
        for _ in 0..MAX_ITERATIONS {
            stats.total_passes += 1;
            let mut changed = false;
            for pass in &self.passes {
                let pass_changed = pass.run(program, &mut stats);
                if pass_changed {
                    log::debug!("pass '{}' rewrote the tree", pass.name());
                }
                changed |= pass_changed;
            }
            if !changed {
                break;
            }
        }
        stats
    }
}

/// Convenience function: runs the standard pipeline on a program.
pub fn optimize(program: &mut Program) -> PassStats {
    PassManager::with_default_passes().run(program)
}
