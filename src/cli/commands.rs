use std::sync::Arc;

use action_flow::Controller;
use agent_core::AgentLoop;
use anyhow::{Context, Result};
use browser_session::{BrowserSession, SessionConfig};
use model_manager::ModelManager;
use plugin_manager::PluginManager;

use crate::cli::args::{Cli, Command, ConfigCommand};
use crate::config::AppConfig;
use crate::driver::NullDriver;

pub async fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Run { task, headless, max_steps, json } => run_task(cli, task, *headless, *max_steps, *json).await,
        Command::Config { command } => match command {
            ConfigCommand::Schema => print_schema(),
            ConfigCommand::Check => check_config(cli),
        },
    }
}

async fn run_task(cli: &Cli, task: &str, headless: bool, max_steps: Option<u32>, json: bool) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if headless {
        config.browser.headless = true;
    }
    if let Some(max_steps) = max_steps {
        config.agent.max_steps = max_steps;
    }

    let model = Arc::new(ModelManager::new(config.model.into_manager_config()));
    model.start_health_check_timer().await;

    let driver: Arc<dyn cdp_adapter::Driver> = Arc::new(NullDriver);
    let session = Arc::new(BrowserSession::new(driver, SessionConfig::default()));
    let plugins = Arc::new(PluginManager::new());
    let controller = Controller::new(Arc::clone(&session), plugins);

    let agent = AgentLoop::new(config.agent.into_loop_config(), session, controller, model);
    let result = agent.run(task).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("task: {}", result.task);
        println!("completed: {} success: {}", result.completed, result.success);
        println!("steps: {}", result.steps.len());
        println!("termination: {:?}", result.metadata.termination_reason);
        if let Some(url) = &result.metadata.final_url {
            println!("final url: {url}");
        }
    }

    if result.success {
        Ok(())
    } else {
        anyhow::bail!("task did not complete successfully ({:?})", result.metadata.termination_reason);
    }
}

fn print_schema() -> Result<()> {
    let schema = schemars::schema_for!(AppConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn check_config(cli: &Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    println!("configuration is valid");
    println!("endpoints configured: {}", config.model.endpoints.len());
    println!("max_steps: {}", config.agent.max_steps);
    Ok(())
}
