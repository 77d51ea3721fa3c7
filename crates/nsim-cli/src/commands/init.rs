use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use nsim_record::{write_log, RunLayout};
use tracing::info;

use crate::config::SweepConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// YAML sweep configuration.
    #[arg(long)]
    pub config: PathBuf,
}

pub fn run(args: &InitArgs) -> Result<(), Box<dyn Error>> {
    let config = SweepConfig::load(&args.config)?;
    for path in write_logs(&config)? {
        println!("{}", path.display());
    }
    Ok(())
}

/// Writes one `log.txt` per configured manifold and returns their paths.
pub fn write_logs(config: &SweepConfig) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let manifolds = config.manifolds();
    for manifold in &manifolds {
        manifold.kind()?;
    }
    let run_label = config.run_label();
    let mut written = Vec::with_capacity(manifolds.len());
    for manifold in &manifolds {
        let layout = RunLayout::for_record(
            &config.results_root,
            manifold.manifold_id.as_str(),
            run_label,
            &config.record,
        );
        let path = write_log(&layout, &config.record)?;
        info!(manifold = layout.manifold_id(), path = %path.display(), "initialised run");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsim_record::{read_log, ExperimentRecord};

    #[test]
    fn writes_one_log_per_default_manifold() {
        let dir = tempfile::tempdir().unwrap();
        let config = SweepConfig {
            results_root: dir.path().to_path_buf(),
            run_label: Some("run_3".into()),
            manifolds: None,
            record: ExperimentRecord::runner_default(),
        };
        let paths = write_logs(&config).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[2], dir.path().join("helix/nsim/run_3/log.txt"));
        for path in &paths {
            assert_eq!(read_log(path).unwrap(), config.record);
        }
    }

    #[test]
    fn unknown_manifold_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = SweepConfig {
            results_root: dir.path().to_path_buf(),
            run_label: None,
            manifolds: Some(vec![
                nsim_synth::ManifoldSpec::new("identity", 0.0, 1.0),
                nsim_synth::ManifoldSpec::new("torus", 0.0, 1.0),
            ]),
            record: ExperimentRecord::runner_default(),
        };
        assert!(write_logs(&config).is_err());
        assert!(!dir.path().join("identity").exists());
    }
}
