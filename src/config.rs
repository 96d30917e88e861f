//! Dataset layout: which columns the core reads and writes, and which years
//! the snapshot covers. Defaults describe the published registry export; a
//! YAML file may override any subset of fields.

use std::{fs::File, io::BufReader, ops::RangeInclusive, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub transaction_type_column: String,
    pub transaction_id_column: String,
    pub date_column: String,
    pub year_column: String,
    pub month_column: String,
    pub brand_column: String,
    pub model_column: String,
    pub origin_column: String,
    pub person_type_column: String,
    pub gender_column: String,
    pub registry_office_column: String,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            transaction_type_column: "tramite_tipo".to_string(),
            transaction_id_column: "tramite_id".to_string(),
            date_column: "tramite_fecha".to_string(),
            year_column: "Anio_tramite".to_string(),
            month_column: "Mes_tramite".to_string(),
            brand_column: "automotor_marca_descripcion".to_string(),
            model_column: "automotor_modelo_descripcion".to_string(),
            origin_column: "automotor_origen".to_string(),
            person_type_column: "titular_tipo_persona".to_string(),
            gender_column: "titular_genero".to_string(),
            registry_office_column: "registro_seccional_descripcion".to_string(),
            min_year: 2018,
            max_year: 2022,
        }
    }
}

impl DatasetConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: Self = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.min_year <= self.max_year,
            "Year range {}-{} is empty",
            self.min_year,
            self.max_year
        );
        ensure!(
            self.year_column != self.month_column,
            "Year and month columns must differ"
        );
        Ok(())
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.min_year..=self.max_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_cover_2018_to_2022() {
        let config = DatasetConfig::default();
        assert_eq!(config.years(), 2018..=2022);
        assert_eq!(config.year_column, "Anio_tramite");
        config.validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("dataset.yml");
        fs::write(&path, "max_year: 2023\nbrand_column: marca\n").expect("write config");
        let config = DatasetConfig::load(&path).expect("load config");
        assert_eq!(config.max_year, 2023);
        assert_eq!(config.brand_column, "marca");
        assert_eq!(config.model_column, "automotor_modelo_descripcion");
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("dataset.yml");
        fs::write(&path, "min_year: 2022\nmax_year: 2018\n").expect("write config");
        let err = DatasetConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("2022-2018"));
    }
}
