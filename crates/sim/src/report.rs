//! Fight reports collected through an [`EncounterObserver`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use encounter_core::{
    ActivationOutcome, AnchorId, EncounterContext, EncounterObserver, MechanicIndex,
    ThresholdCrossing,
};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhaseEntry {
    pub index: usize,
    pub name: String,
    /// Encounter time of the entry, in seconds.
    pub at: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrossingEntry {
    pub phase: String,
    pub label: Option<String>,
    pub boundary: f32,
    pub value: f32,
    pub direction: &'static str,
    pub activated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToggleEntry {
    pub phase: String,
    pub active: bool,
}

/// Everything observed during one simulated fight.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub encounter: String,
    pub seed: u64,
    pub ticks: u64,
    pub elapsed: f32,
    pub final_phase: Option<String>,
    pub phases: Vec<PhaseEntry>,
    pub activations: BTreeMap<String, u64>,
    pub crossings: Vec<CrossingEntry>,
    pub toggles: Vec<ToggleEntry>,
    pub effects: BTreeMap<String, u64>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} (seed {}): {} ticks, {:.1}s, ended in {}",
            self.encounter,
            self.seed,
            self.ticks,
            self.elapsed,
            self.final_phase.as_deref().unwrap_or("-")
        )?;

        writeln!(f, "phases:")?;
        for phase in &self.phases {
            writeln!(f, "  {:>7.2}s  #{} {}", phase.at, phase.index, phase.name)?;
        }

        writeln!(f, "activations:")?;
        for (mechanic, count) in &self.activations {
            writeln!(f, "  {:<12} {}", mechanic, count)?;
        }

        if !self.crossings.is_empty() {
            writeln!(f, "thresholds:")?;
            for crossing in &self.crossings {
                writeln!(
                    f,
                    "  {} {:.2} {} at {:.3}{}{}",
                    crossing.phase,
                    crossing.boundary,
                    crossing.direction,
                    crossing.value,
                    if crossing.activated { "" } else { " (skipped)" },
                    crossing
                        .label
                        .as_deref()
                        .map(|label| format!(": {}", label))
                        .unwrap_or_default()
                )?;
            }
        }

        writeln!(f, "effects:")?;
        for (effect, count) in &self.effects {
            writeln!(f, "  {:<24} {}", effect, count)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Recorded {
    phases: Vec<PhaseEntry>,
    activations: BTreeMap<String, u64>,
    crossings: Vec<CrossingEntry>,
    toggles: Vec<ToggleEntry>,
}

/// Read side of a [`ReportObserver`], kept by the driver after the observer
/// moves into the controller.
#[derive(Clone, Debug, Default)]
pub struct ReportLog(Arc<Mutex<Recorded>>);

impl ReportLog {
    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn finish(
        &self,
        encounter: &str,
        seed: u64,
        ticks: u64,
        elapsed: f32,
        final_phase: Option<&str>,
        effects: BTreeMap<String, u64>,
    ) -> Report {
        let recorded = self.lock();
        Report {
            encounter: encounter.to_owned(),
            seed,
            ticks,
            elapsed,
            final_phase: final_phase.map(str::to_owned),
            phases: recorded.phases.clone(),
            activations: recorded.activations.clone(),
            crossings: recorded.crossings.clone(),
            toggles: recorded.toggles.clone(),
            effects,
        }
    }
}

#[derive(Debug, Default)]
pub struct ReportObserver {
    log: ReportLog,
}

impl ReportObserver {
    pub fn log(&self) -> ReportLog {
        self.log.clone()
    }
}

impl EncounterObserver for ReportObserver {
    fn on_phase_changed(
        &mut self,
        _from: Option<usize>,
        to: usize,
        name: &str,
        ctx: &EncounterContext,
    ) {
        self.log.lock().phases.push(PhaseEntry {
            index: to,
            name: name.to_owned(),
            at: ctx.now(),
        });
    }

    fn on_mechanic_activated(
        &mut self,
        _mechanic: MechanicIndex,
        name: &str,
        _holders: &[AnchorId],
        _ctx: &EncounterContext,
    ) {
        *self.log.lock().activations.entry(name.to_owned()).or_default() += 1;
    }

    fn on_threshold_crossed(
        &mut self,
        phase: &str,
        crossing: &ThresholdCrossing,
        outcome: &ActivationOutcome,
    ) {
        if let ActivationOutcome::Skipped(reason) = outcome {
            tracing::info!(
                "'{}' crossing at {:.2} skipped: {}",
                phase,
                crossing.boundary,
                <&'static str>::from(*reason)
            );
        }
        self.log.lock().crossings.push(CrossingEntry {
            phase: phase.to_owned(),
            label: crossing.label.clone(),
            boundary: crossing.boundary,
            value: crossing.value,
            direction: crossing.direction.into(),
            activated: outcome.is_activated(),
        });
    }

    fn on_always_active_toggled(&mut self, phase: &str, active: bool) {
        self.log.lock().toggles.push(ToggleEntry {
            phase: phase.to_owned(),
            active,
        });
    }
}
