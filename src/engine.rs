use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::{
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    world::World,
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    /// Advance the world by `ticks` months. After each tick the ownership
    /// invariant is checked; a violation aborts the run.
    pub fn run(&mut self, world: &mut World, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            let current_tick = world.tick();
            if current_tick % 12 == 0 {
                info!(year = current_tick / 12, "simulating year");
            }
            for system in &mut self.systems {
                let mut rng_stream = self.rng.stream(system.name());
                let ctx = SystemContext {
                    tick: current_tick,
                    scenario_name: &self.settings.scenario_name,
                };
                system.run(&ctx, world, &mut rng_stream)?;
            }
            world.advance_tick();
            world.verify_ownership()?;
            self.snapshot_writer
                .maybe_write(world, &self.settings.scenario_name)?;
        }
        Ok(())
    }

    /// Write the final world snapshot regardless of the interval setting.
    pub fn write_final_snapshot(&self, world: &World) -> Result<PathBuf> {
        self.snapshot_writer
            .write(world, &self.settings.scenario_name)
    }
}

pub struct SystemContext<'a> {
    pub tick: u64,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}
