//! Config command - print the effective configuration

use crate::config::ApibumpConfig;
use crate::output::{Output, OutputConfig, TableDisplay};

impl TableDisplay for ApibumpConfig {
    fn to_table(&self) -> String {
        self.to_toml()
            .unwrap_or_else(|e| format!("# Failed to render configuration: {:#}", e))
    }
}

/// Run the config command
pub fn run(config: ApibumpConfig, output: OutputConfig) -> anyhow::Result<()> {
    Output::with_config(config, output).render()
}
