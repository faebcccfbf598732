//! Driving loop for a full simulation run.

use crate::engine::SimulationEngine;
use crate::grid::GridState;
use plague_core::{GenerationStats, PopulationSeries, Result, RunId, SimulationConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub struct Simulation {
    run_id: RunId,
    grid: GridState,
    engine: SimulationEngine,
    config: SimulationConfig,
    seed: u64,
    series: PopulationSeries,
}

impl Simulation {
    /// Build the grid and seed the initial population
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut engine = SimulationEngine::new(seed);
        let mut grid = GridState::new(config.grid.width, config.grid.height)?;
        engine.seed(
            &mut grid,
            config.population.healthy,
            config.population.infected,
        )?;

        let mut series = PopulationSeries::new();
        series.push(GenerationStats {
            generation: grid.generation(),
            counts: grid.counts(),
        });

        let run_id = RunId::new();
        info!(
            %run_id,
            seed,
            width = grid.width(),
            height = grid.height(),
            healthy = config.population.healthy,
            infected = config.population.infected,
            "Simulation created"
        );

        Ok(Self {
            run_id,
            grid,
            engine,
            config,
            seed,
            series,
        })
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn series(&self) -> &PopulationSeries {
        &self.series
    }

    /// Whether the configured generation limit has been reached
    pub fn is_finished(&self) -> bool {
        self.grid.generation() >= self.config.num_generations
    }

    /// Advance one generation and record its counts
    pub fn step(&mut self) -> Result<GenerationStats> {
        self.engine.step(&mut self.grid)?;

        let stats = GenerationStats {
            generation: self.grid.generation(),
            counts: self.grid.counts(),
        };
        self.series.push(stats);

        debug!(
            generation = stats.generation,
            healthy = stats.counts.healthy,
            infected = stats.counts.infected,
            "Generation complete"
        );
        Ok(stats)
    }

    /// Run until the generation limit
    pub fn run(&mut self) -> Result<SimulationResult> {
        self.run_with(|_, _| {})
    }

    /// Run until the generation limit, handing every completed generation to `observer`
    #[instrument(skip(self, observer), fields(run_id = %self.run_id, num_generations = self.config.num_generations))]
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<SimulationResult>
    where
        F: FnMut(&GridState, &GenerationStats),
    {
        info!("Starting simulation for {} generations", self.config.num_generations);

        while !self.is_finished() {
            let stats = self.step()?;
            observer(&self.grid, &stats);

            if stats.generation % 10 == 0 {
                info!(
                    "Generation {}/{}: {} healthy, {} infected",
                    stats.generation,
                    self.config.num_generations,
                    stats.counts.healthy,
                    stats.counts.infected
                );
            }
        }

        self.emit_summary();
        Ok(self.result())
    }

    fn emit_summary(&self) {
        let final_counts = self.series.final_counts().unwrap_or_default();
        let peak = self.series.peak_infected();

        info!(
            event = "run_summary",
            run_id = %self.run_id,
            generations = self.grid.generation(),
            final_healthy = final_counts.healthy,
            final_infected = final_counts.infected,
            final_infection_rate = format!("{:.2}%", final_counts.infection_rate() * 100.0),
            peak_infected = peak.map(|p| p.counts.infected).unwrap_or(0),
            peak_generation = peak.map(|p| p.generation).unwrap_or(0),
            extinct_at = ?self.series.extinct_generation(),
            "Simulation complete"
        );
    }

    /// Snapshot of the run so far
    pub fn result(&self) -> SimulationResult {
        SimulationResult {
            run_id: self.run_id,
            seed: self.seed,
            config: self.config.clone(),
            generations: self.grid.generation(),
            series: self.series.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub run_id: RunId,
    pub seed: u64,
    pub config: SimulationConfig,
    pub generations: u64,
    pub series: PopulationSeries,
}
