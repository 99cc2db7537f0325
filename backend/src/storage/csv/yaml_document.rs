//! Single YAML document stored in the data directory (`settings.yaml`,
//! `media.yaml`). Writes go through a temp file and rename.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;

use super::connection::CsvConnection;
use crate::storage::traits::DocumentStorage;

pub struct YamlDocument<D> {
    connection: CsvConnection,
    file_name: &'static str,
    _document: PhantomData<fn() -> D>,
}

impl<D> YamlDocument<D> {
    pub fn new(connection: CsvConnection, file_name: &'static str) -> Self {
        Self {
            connection,
            file_name,
            _document: PhantomData,
        }
    }

    fn path(&self) -> PathBuf {
        self.connection.file_path(self.file_name)
    }
}

#[async_trait]
impl<D> DocumentStorage<D> for YamlDocument<D>
where
    D: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Option<D>> {
        let path = self.path();
        if !path.exists() {
            debug!("No document at {:?}", path);
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let document = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", self.file_name, e))?;
        Ok(Some(document))
    }

    async fn save(&self, document: &D) -> Result<()> {
        let path = self.path();
        let yaml_content = serde_yaml::to_string(document)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &path)?;

        debug!("Saved {} to {:?}", self.file_name, path);
        Ok(())
    }
}
