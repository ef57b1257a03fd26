use crate::core::bottle::{self, Bottle};
use crate::core::environment::{self, LaunchTarget};
use crate::core::terminator::{terminate_matching, TerminationPolicy};
use crate::models::error::SError;
use crate::models::launch_options::LaunchOptions;
use crate::models::library::GameMeta;
use crate::utils::process::ProcessTable;
use crate::utils::shell::ShellSpawner;
use camino::Utf8PathBuf;
use derive_more::Display;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum LaunchState {
    #[display("idle")]
    Idle,
    #[display("configuring bottle")]
    ConfiguringBottle,
    #[display("terminating prior client")]
    TerminatingPrior,
    #[display("spawning")]
    Spawning,
    #[display("running (pid {pid})")]
    Running { pid: u32 },
    #[display("failed: {_0}")]
    Failed(String),
}

/// Host-side locations the launcher needs.
#[derive(Debug, Clone)]
pub struct LaunchEnvironment {
    pub crossover_app: Utf8PathBuf,
    pub native_client: Utf8PathBuf,
    /// Bottle used for Windows titles.
    pub bottle: Option<Bottle>,
}

impl LaunchEnvironment {
    fn target_for(&self, meta: &GameMeta) -> Result<LaunchTarget, SError> {
        if meta.is_native {
            return Ok(LaunchTarget::Native {
                client: self.native_client.clone(),
            });
        }

        let bottle = self.bottle.clone().ok_or(SError::NoBottleSelected)?;
        Ok(LaunchTarget::Bottle {
            crossover_app: self.crossover_app.clone(),
            bottle,
        })
    }
}

pub struct LaunchOrchestrator<P, S> {
    table: P,
    spawner: S,
    policy: TerminationPolicy,
    environment: LaunchEnvironment,
    state: LaunchState,
}

impl<P: ProcessTable, S: ShellSpawner> LaunchOrchestrator<P, S> {
    pub fn new(table: P, spawner: S, environment: LaunchEnvironment) -> Self {
        Self {
            table,
            spawner,
            policy: TerminationPolicy::default(),
            environment,
            state: LaunchState::Idle,
        }
    }

    pub fn with_policy(mut self, policy: TerminationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> &LaunchState {
        &self.state
    }

    pub fn table(&self) -> &P {
        &self.table
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    fn enter(&mut self, state: LaunchState) {
        debug!("Launch state: {} -> {}", self.state, state);
        self.state = state;
    }

    fn fail(&mut self, err: SError) -> SError {
        error!("Launch failed: {err}");
        self.enter(LaunchState::Failed(err.to_string()));
        err
    }

    /// Launches `meta` through the client and returns the spawned pid.
    ///
    /// With `options`, a Windows title's bottle config is rewritten first; a
    /// failed rewrite aborts before any process is touched. Prior client
    /// processes are always torn down before spawning.
    #[instrument(skip_all, fields(app_id = %meta.app_id))]
    pub async fn launch(
        &mut self,
        meta: &GameMeta,
        options: Option<&LaunchOptions>,
    ) -> Result<u32, SError> {
        self.enter(LaunchState::Idle);

        let target = match self.environment.target_for(meta) {
            Ok(target) => target,
            Err(e) => return Err(self.fail(e)),
        };

        // 1. Bottle configuration
        if let (Some(opts), LaunchTarget::Bottle { bottle, .. }) = (options, &target) {
            self.enter(LaunchState::ConfiguringBottle);
            let config = bottle.paths().config;
            if let Err(e) = bottle::rewrite_config(&config, &bottle::tracked_values(opts)) {
                return Err(self.fail(e));
            }
        }

        // 2. Tear down a running client
        self.enter(LaunchState::TerminatingPrior);
        let suffixes = target.prior_process_suffixes();
        let suffixes: Vec<&str> = suffixes.iter().map(String::as_str).collect();
        let report = terminate_matching(&mut self.table, &suffixes, self.policy).await;
        if !report.stragglers.is_empty() {
            warn!(
                "Launching with {} prior processes still alive",
                report.stragglers.len()
            );
        }

        // 3. Spawn
        self.enter(LaunchState::Spawning);
        let defaults = LaunchOptions::default();
        let command = environment::build_command(&target, &meta.app_id, options.unwrap_or(&defaults));
        match self.spawner.spawn(&command) {
            Ok(pid) => {
                info!("Launched {} as pid {pid}", meta.app_id);
                self.enter(LaunchState::Running { pid });
                Ok(pid)
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}
