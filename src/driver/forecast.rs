//! FV3 (atmosphere-only) forecast driver.

use crate::cli::SetConfigArgs;
use crate::config::{Config, FileType};
use crate::error::{ConfigError, Result};
use crate::fs::{ExistAction, handle_existing};
use crate::pipeline::create_config_obj;
use std::path::Path;
use tracing::{info, instrument};

const RUN_SUBDIRS: [&str; 2] = ["INPUT", "RESTART"];

/// Prepares the inputs of a UFS short-range weather forecast in FV3 mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fv3Forecast;

impl Fv3Forecast {
    pub fn new() -> Self {
        Self
    }

    /// Write the model config.
    ///
    /// With a base file, values from `config_file` are merged onto it and
    /// references are resolved. Without one, `config_file` is copied through
    /// its own format.
    #[instrument(level = "debug", skip(self))]
    pub fn create_model_config(
        &self,
        config_file: &Path,
        outconfig_file: &Path,
        base_file: Option<&Path>,
    ) -> Result<()> {
        match base_file {
            Some(base_file) => {
                let args = SetConfigArgs::new(base_file)
                    .with_config_file(config_file)
                    .with_outfile(outconfig_file);
                args.validate()?;
                create_config_obj(&args, &mut std::io::sink())?;
            }
            None => Config::load(config_file, None)?.dump_file(outconfig_file)?,
        }
        info!("config file {} created", outconfig_file.display());
        Ok(())
    }

    /// Write a namelist from `update`, optionally layered over a base namelist.
    #[instrument(level = "debug", skip(self, update))]
    pub fn create_namelist(
        &self,
        update: &Config,
        outnml_file: &Path,
        base_file: Option<&Path>,
    ) -> Result<()> {
        match base_file {
            Some(base_file) => {
                let mut config = Config::f90(base_file)?;
                config.update_values(update);
                config.dereference_all()?;
                config.dump_file(outnml_file)?;
            }
            None => update.clone().dump_file(outnml_file)?,
        }
        info!("namelist file {} created", outnml_file.display());
        Ok(())
    }

    /// Write a field table from `update`, optionally layered over a base
    /// field table description.
    #[instrument(level = "debug", skip(self, update))]
    pub fn create_field_table(
        &self,
        update: &Config,
        outfldtab_file: &Path,
        base_file: Option<&Path>,
    ) -> Result<()> {
        let config = match base_file {
            Some(base_file) => {
                let mut config = Config::field_table(base_file)?;
                config.update_values(update);
                config.dereference_all()?;
                config
            }
            None => {
                let mut config = Config::new(FileType::FieldTable);
                config.update_values(update);
                config
            }
        };
        config.dump_file(outfldtab_file)?;
        info!("field table {} created", outfldtab_file.display());
        Ok(())
    }

    /// Create `run_directory` with its `INPUT/` and `RESTART/` subdirectories.
    ///
    /// An existing directory is handled according to `exist_act` first.
    #[instrument(level = "debug", skip(self))]
    pub fn create_directory_structure(
        &self,
        run_directory: &Path,
        exist_act: ExistAction,
    ) -> Result<()> {
        handle_existing(run_directory, exist_act)?;

        for subdir in RUN_SUBDIRS {
            let path = run_directory.join(subdir);
            std::fs::create_dir_all(&path).map_err(|e| {
                ConfigError::UserError(format!(
                    "could not create directory {} with subdirectories: {}",
                    run_directory.display(),
                    e
                ))
            })?;
            if !path.is_dir() {
                return Err(ConfigError::UserError(format!(
                    "directory {} with {} not created",
                    run_directory.display(),
                    subdir
                )));
            }
        }

        info!("directory {} created with subdirectories", run_directory.display());
        Ok(())
    }
}
