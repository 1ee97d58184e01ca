use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use crate::config::{Config, OutputFormat};
use crate::list;
use crate::output;
use crate::plan::PlanDocument;

#[derive(Parser)]
#[command(name = "planlens")]
#[command(author, version, about = "Execution plan lister", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    #[arg(short, long, global = true, env = "PLANLENS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the jobs of an execution plan
    List {
        /// Plan document (YAML or JSON)
        #[arg(env = "PLANLENS_PLAN")]
        plan: Option<PathBuf>,

        /// Output the listing as JSON
        #[arg(short, long, default_value_t = false)]
        json: bool,

        /// Only list runs from this workflow file
        #[arg(short = 'W', long = "workflow")]
        workflows: Vec<String>,
    },
}

impl Cli {
    fn execute_list(&self, plan: Option<&Path>, json: bool, workflows: &[String]) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        let plan_path = plan
            .map(Path::to_path_buf)
            .or_else(|| config.plan.path.clone())
            .ok_or_else(|| anyhow!("no plan document given"))?;
        info!("Listing execution plan: {}", plan_path.display());

        let plan = PlanDocument::load(&plan_path)?.into_plan(workflows)?;

        let format = if json {
            OutputFormat::Json
        } else {
            config.output.format
        };
        let pretty = self.pretty || config.output.pretty;

        let (document, row_set) = list::list_plan(&plan, &format, pretty)?;
        output::write_document(&document, self.output.as_deref())?;
        output::print_listing_summary(&row_set, plan.stages().len());

        Ok(())
    }

    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::List {
                plan,
                json,
                workflows,
            } => self.execute_list(plan.as_deref(), *json, workflows),
        }
    }
}
