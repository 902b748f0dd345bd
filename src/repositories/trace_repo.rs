use std::path::{Path, PathBuf};
use anyhow::anyhow;
use crate::models::trace::TraceDocument;
use crate::repositories::json_file::{read_json, write_json};

pub struct TraceRepo {
    path: PathBuf,
}

impl TraceRepo {
    pub fn new(
        path: &Path,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn store(
        &self,
        trace: &TraceDocument,
    ) -> anyhow::Result<()> {
        write_json(&self.path, trace)
    }

    pub fn load(&self) -> anyhow::Result<TraceDocument> {
        read_json(&self.path)?
            .ok_or_else(|| anyhow!("No trace file at {}, run a session first", self.path.display()))
    }
}
