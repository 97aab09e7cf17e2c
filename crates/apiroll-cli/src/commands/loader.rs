//! Reading models and config files, and writing outputs.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use log::{debug, info};

use apiroll_core::RawPackage;
use apiroll_lib::{ConfigFile, Extractor, ExtractorConfig};

use super::CliError;

/// Read a file, or stdin when `path` is `-`.
pub fn read_text(path: &Path) -> Result<String, CliError> {
    let read_err = |source| CliError::Read {
        path: path.to_path_buf(),
        source,
    };
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(read_err)?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(read_err)
}

pub fn load_model(path: &Path) -> Result<RawPackage, CliError> {
    let text = read_text(path)?;
    let package: RawPackage = serde_json::from_str(&text).map_err(|source| CliError::Model {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        package = package.name.as_str(),
        modules = package.modules.len();
        "loaded declaration model"
    );
    Ok(package)
}

/// Load a config file; relative output paths resolve against its directory.
pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    let text = read_text(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(ConfigFile::parse(&text)?.resolve_paths(base))
}

/// Extractor settings from an optional config file, with `--strict` on top.
pub fn extractor_config(config: Option<&Path>, strict: bool) -> Result<ExtractorConfig, CliError> {
    let config = match config {
        Some(path) => load_config(path)?.to_extractor_config()?,
        None => ExtractorConfig::default(),
    };
    Ok(if strict { config.strict(true) } else { config })
}

pub fn analyze(model: &Path, config: ExtractorConfig) -> Result<Extractor, CliError> {
    let package = load_model(model)?;
    Ok(Extractor::from_package(&package, config)?)
}

/// Print diagnostics to stderr; in strict mode any of them fails the command
/// before outputs are written.
pub fn report_diagnostics(extractor: &Extractor, color: bool) -> Result<(), CliError> {
    let diagnostics = extractor.diagnostics();
    if !diagnostics.is_empty() {
        let sources = extractor.sources();
        eprintln!(
            "{}",
            diagnostics.printer().sources(&sources).colored(color).render()
        );
    }
    extractor.check_strict()?;
    Ok(())
}

/// Errors fail the command once outputs are written.
pub fn finish(extractor: &Extractor) -> Result<(), CliError> {
    let diagnostics = extractor.diagnostics();
    if diagnostics.has_errors() {
        return Err(CliError::Failed(diagnostics.error_count()));
    }
    Ok(())
}

/// Write `text` to `output`, creating parent directories, or print it.
pub fn write_output(output: Option<&Path>, text: &str) -> Result<(), CliError> {
    let Some(path) = output else {
        print!("{text}");
        return Ok(());
    };
    let write_err = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(write_err)?;
    }
    fs::write(path, text).map_err(write_err)?;
    info!(path:? = path, bytes = text.len(); "wrote output");
    Ok(())
}
