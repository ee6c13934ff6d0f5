//! Filesystem infrastructure: implements `RulesFileWriter`.

use std::any::Any;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::RulesFileWriter;

/// Writes security-group rules to a named temp file that is deleted when the
/// returned guard drops.
pub struct TempRulesWriter;

impl RulesFileWriter for TempRulesWriter {
    fn write_rules(&self, contents: &str) -> Result<(PathBuf, Box<dyn Any>)> {
        let mut file = tempfile::Builder::new()
            .prefix("CATS-sg-rules")
            .suffix(".json")
            .tempfile()
            .context("creating security group rules file")?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.flush())
            .with_context(|| format!("writing {}", file.path().display()))?;
        let path = file.path().to_path_buf();
        Ok((path, Box::new(file)))
    }
}
