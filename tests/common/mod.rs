//! Test doubles for the portfolio coordinator.
//!
//! Two engine implementations: `UnitEngine`, a genuine unit-clause engine
//! (conflict detection among assumptions and asserted units, real models
//! and cores), and `ScriptedInstance`, which plays back a per-worker script
//! of round outcomes while recording every call the coordinator makes.

#![allow(dead_code)]

use cubist::{
    CancelToken, CaseSplitOracle, CheckResult, EngineError, Literal, Model, SolverInstance,
    TermId, UniverseId, UniverseTranslator,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Positive literal over atom `i`.
pub fn lit(i: u32) -> Literal {
    Literal::positive(TermId::new(i))
}

/// Negative literal over atom `i`.
pub fn neg(i: u32) -> Literal {
    Literal::negative(TermId::new(i))
}

/// Terms carry the same id in every universe.
pub struct IdentityTranslator;

impl UniverseTranslator for IdentityTranslator {
    fn translate_term(&self, term: TermId, _from: UniverseId, _to: UniverseId) -> TermId {
        term
    }
}

/// Oracle that never proposes a cube.
pub struct NoCube;

impl CaseSplitOracle for NoCube {
    fn choose(&self, _instance: &mut dyn SolverInstance) -> Option<Literal> {
        None
    }
}

/// Oracle that always proposes the same cube literal.
pub struct AlwaysCube(pub Literal);

impl CaseSplitOracle for AlwaysCube {
    fn choose(&self, _instance: &mut dyn SolverInstance) -> Option<Literal> {
        Some(self.0)
    }
}

// ---------------------------------------------------------------------------
// UnitEngine
// ---------------------------------------------------------------------------

/// A real, if tiny, solving engine over unit facts only.
///
/// `check` reports unsat when an assumption contradicts another assumption,
/// an asserted unit, or completes the falsification of an asserted clause;
/// otherwise it reports sat with a model over every mentioned atom.
pub struct UnitEngine {
    universe: UniverseId,
    units: Vec<Literal>,
    clauses: Vec<Vec<Literal>>,
    budget: u64,
    conflicts: u64,
    model: Option<Model>,
    core: Vec<Literal>,
    token: CancelToken,
    universes: Arc<AtomicU32>,
    seed: u64,
}

impl UnitEngine {
    pub fn new() -> Self {
        Self::with_units(Vec::new())
    }

    pub fn with_units(units: Vec<Literal>) -> Self {
        Self {
            universe: UniverseId::new(0),
            units,
            clauses: Vec::new(),
            budget: 0,
            conflicts: 0,
            model: None,
            core: Vec::new(),
            token: CancelToken::new(),
            universes: Arc::new(AtomicU32::new(1)),
            seed: 0,
        }
    }
}

impl SolverInstance for UnitEngine {
    fn universe(&self) -> UniverseId {
        self.universe
    }

    fn fork(&self, seed: u64) -> Box<dyn SolverInstance> {
        Box::new(Self {
            universe: UniverseId::new(self.universes.fetch_add(1, Ordering::Relaxed)),
            units: self.units.clone(),
            clauses: self.clauses.clone(),
            budget: 0,
            conflicts: 0,
            model: None,
            core: Vec::new(),
            token: CancelToken::new(),
            universes: Arc::clone(&self.universes),
            seed,
        })
    }

    fn set_conflict_budget(&mut self, budget: u64) {
        self.budget = budget;
    }

    fn check(&mut self, assumptions: &[Literal]) -> Result<CheckResult, EngineError> {
        self.conflicts = 0;
        self.model = None;
        if self.token.is_cancelled() {
            return Ok(CheckResult::Unknown);
        }

        for (i, &a) in assumptions.iter().enumerate() {
            if assumptions[i + 1..].contains(&a.negate()) {
                self.core = vec![a, a.negate()];
                return Ok(CheckResult::Unsat);
            }
        }
        for &a in assumptions {
            if self.units.contains(&a.negate()) {
                self.core = vec![a];
                return Ok(CheckResult::Unsat);
            }
        }
        'clauses: for clause in &self.clauses {
            let mut core = Vec::new();
            for &l in clause {
                if assumptions.contains(&l.negate()) {
                    core.push(l.negate());
                } else if !self.units.contains(&l.negate()) {
                    continue 'clauses;
                }
            }
            self.core = core;
            return Ok(CheckResult::Unsat);
        }

        let mut model = Model::new();
        for &l in self.units.iter().chain(assumptions.iter()) {
            if model.value(l.atom()).is_none() {
                model.assign(l.atom(), l.is_positive());
            }
        }
        self.model = Some(model);
        Ok(CheckResult::Sat)
    }

    fn conflicts(&self) -> u64 {
        self.conflicts
    }

    fn model(&self) -> Option<Model> {
        self.model.clone()
    }

    fn unsat_core(&self) -> Vec<Literal> {
        self.core.clone()
    }

    fn assert_unit(&mut self, fact: Literal) {
        if !self.units.contains(&fact) {
            self.units.push(fact);
        }
    }

    fn assert_clause(&mut self, clause: &[Literal]) {
        self.clauses.push(clause.to_vec());
    }

    fn pop_to_base(&mut self) {}

    fn assigned_literals(&self) -> Vec<Literal> {
        self.units.clone()
    }

    fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }
}

// ---------------------------------------------------------------------------
// ScriptedInstance
// ---------------------------------------------------------------------------

/// Outcome of one scripted `check` call.
pub enum RoundScript {
    Sat(Model),
    /// Reports sat but then produces no model (internal-consistency case).
    SatWithoutModel,
    Unsat(Vec<Literal>),
    Exhausted,
    Fail(EngineError),
}

/// One scripted round: the outcome plus base-level literals the instance
/// "deduces" during the search.
pub struct ScriptedStep {
    pub outcome: RoundScript,
    pub deduce: Vec<Literal>,
}

/// Script step with no deductions.
pub fn step(outcome: RoundScript) -> ScriptedStep {
    ScriptedStep {
        outcome,
        deduce: Vec::new(),
    }
}

/// Script step that also deduces the given literals.
pub fn step_deducing(outcome: RoundScript, deduce: Vec<Literal>) -> ScriptedStep {
    ScriptedStep { outcome, deduce }
}

/// Everything the coordinator did to one scripted worker.
#[derive(Default)]
pub struct Recorder {
    pub budgets: Vec<u64>,
    pub checks: Vec<Vec<Literal>>,
    pub asserted_units: Vec<Literal>,
    pub asserted_clauses: Vec<Vec<Literal>>,
    pub pops: u64,
}

/// Factory for scripted workers. Fork `i` receives script `i`.
pub struct ScriptedRoot {
    scripts: Mutex<VecDeque<Vec<ScriptedStep>>>,
    recorders: Mutex<Vec<Arc<Mutex<Recorder>>>>,
    tokens: Mutex<Vec<CancelToken>>,
    universes: AtomicU32,
}

impl ScriptedRoot {
    pub fn new(scripts: Vec<Vec<ScriptedStep>>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            recorders: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            universes: AtomicU32::new(1),
        })
    }

    /// The root instance workers are forked from. Lives in universe 0.
    pub fn instance(self: &Arc<Self>) -> ScriptedInstance {
        ScriptedInstance {
            root: Arc::clone(self),
            universe: UniverseId::new(0),
            script: VecDeque::new(),
            recorder: Arc::new(Mutex::new(Recorder::default())),
            trail: Vec::new(),
            budget: 0,
            conflicts: 0,
            model: None,
            core: Vec::new(),
            token: CancelToken::new(),
        }
    }

    /// What the coordinator did to fork `worker`.
    pub fn recorder(&self, worker: usize) -> Arc<Mutex<Recorder>> {
        Arc::clone(&self.recorders.lock().unwrap()[worker])
    }

    /// Cancellation token handed out by fork `worker`.
    pub fn token(&self, worker: usize) -> CancelToken {
        self.tokens.lock().unwrap()[worker].clone()
    }
}

pub struct ScriptedInstance {
    root: Arc<ScriptedRoot>,
    universe: UniverseId,
    script: VecDeque<ScriptedStep>,
    recorder: Arc<Mutex<Recorder>>,
    trail: Vec<Literal>,
    budget: u64,
    conflicts: u64,
    model: Option<Model>,
    core: Vec<Literal>,
    token: CancelToken,
}

impl SolverInstance for ScriptedInstance {
    fn universe(&self) -> UniverseId {
        self.universe
    }

    fn fork(&self, _seed: u64) -> Box<dyn SolverInstance> {
        let script = self
            .root
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let token = CancelToken::new();
        self.root.recorders.lock().unwrap().push(Arc::clone(&recorder));
        self.root.tokens.lock().unwrap().push(token.clone());
        Box::new(ScriptedInstance {
            root: Arc::clone(&self.root),
            universe: UniverseId::new(self.root.universes.fetch_add(1, Ordering::Relaxed)),
            script: script.into_iter().collect(),
            recorder,
            trail: Vec::new(),
            budget: 0,
            conflicts: 0,
            model: None,
            core: Vec::new(),
            token,
        })
    }

    fn set_conflict_budget(&mut self, budget: u64) {
        self.budget = budget;
        self.recorder.lock().unwrap().budgets.push(budget);
    }

    fn check(&mut self, assumptions: &[Literal]) -> Result<CheckResult, EngineError> {
        self.recorder.lock().unwrap().checks.push(assumptions.to_vec());
        let Some(step) = self.script.pop_front() else {
            self.conflicts = self.budget;
            return Ok(CheckResult::Unknown);
        };
        for l in step.deduce {
            if !self.trail.contains(&l) {
                self.trail.push(l);
            }
        }
        match step.outcome {
            RoundScript::Sat(m) => {
                self.model = Some(m);
                Ok(CheckResult::Sat)
            }
            RoundScript::SatWithoutModel => {
                self.model = None;
                Ok(CheckResult::Sat)
            }
            RoundScript::Unsat(core) => {
                self.core = core;
                Ok(CheckResult::Unsat)
            }
            RoundScript::Exhausted => {
                self.conflicts = self.budget;
                Ok(CheckResult::Unknown)
            }
            RoundScript::Fail(err) => Err(err),
        }
    }

    fn conflicts(&self) -> u64 {
        self.conflicts
    }

    fn model(&self) -> Option<Model> {
        self.model.clone()
    }

    fn unsat_core(&self) -> Vec<Literal> {
        self.core.clone()
    }

    fn assert_unit(&mut self, fact: Literal) {
        self.recorder.lock().unwrap().asserted_units.push(fact);
        if !self.trail.contains(&fact) {
            self.trail.push(fact);
        }
    }

    fn assert_clause(&mut self, clause: &[Literal]) {
        self.recorder
            .lock()
            .unwrap()
            .asserted_clauses
            .push(clause.to_vec());
    }

    fn pop_to_base(&mut self) {
        self.recorder.lock().unwrap().pops += 1;
    }

    fn assigned_literals(&self) -> Vec<Literal> {
        self.trail.clone()
    }

    fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }
}
