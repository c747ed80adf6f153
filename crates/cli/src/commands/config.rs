use std::io::{self, Write};
use std::path::Path;

use eyre::Result;
use tracing::info;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub async fn handle_config_command(cmd: ConfigCommands, config_path: &Path) -> Result<()> {
    if let ConfigCommands::Reset { force } = cmd {
        if force || confirm_reset()? {
            Config::reset_at(config_path).await?;
            println!("Configuration reset to defaults");
        }
        return Ok(());
    }

    let mut config = Config::load_from(config_path).await?;
    match cmd {
        ConfigCommands::Set { key, value } => {
            config.set_value(&key, &value)?;
            config.save_to(config_path).await?;
            info!(%key, %value, path = %config_path.display(), "Configuration updated");
            println!("{key} = {value}");
        }
        ConfigCommands::Get { key } => println!("{}", config.get_value(&key)?),
        ConfigCommands::Show => {
            println!("{}", config.show_all());
            println!("(from {})", config_path.display());
        }
        ConfigCommands::Reset { .. } => {}
    }

    Ok(())
}

fn confirm_reset() -> Result<bool> {
    print!("Reset every configuration value to its default? (y/N): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y") || answer.trim().eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_persists_and_reset_restores() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let set = ConfigCommands::Set {
            key: "registry.pending_policy".to_string(),
            value: "queue".to_string(),
        };
        handle_config_command(set, &path).await.unwrap();
        let config = Config::load_from(&path).await.unwrap();
        assert_eq!(config.get_value("registry.pending_policy").unwrap(), "queue");

        let bad = ConfigCommands::Set {
            key: "output.colour".to_string(),
            value: "on".to_string(),
        };
        assert!(handle_config_command(bad, &path).await.is_err());

        handle_config_command(ConfigCommands::Reset { force: true }, &path)
            .await
            .unwrap();
        assert_eq!(Config::load_from(&path).await.unwrap(), Config::default());
    }
}
