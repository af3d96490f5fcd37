use crate::core::ConfigProvider;
use crate::domain::model::{ColumnNames, SanitizerRules, DEFAULT_CELL_SIZE_DEG};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_distinct, validate_path, validate_positive_float, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: Option<PipelineConfig>,
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub sanitizer: SanitizerRules,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    #[serde(default)]
    pub columns: ColumnNames,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub facilities_file: String,
    pub index_file: String,
    pub dropped_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: ".".to_string(),
            facilities_file: "facilities.json".to_string(),
            index_file: "facilities_index.json".to_string(),
            dropped_file: "dropped_rows.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cell_size_deg: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size_deg: DEFAULT_CELL_SIZE_DEG,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn pipeline_name(&self) -> &str {
        self.pipeline
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("facility-grid")
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_file(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn facilities_file(&self) -> &str {
        &self.output.facilities_file
    }

    fn index_file(&self) -> &str {
        &self.output.index_file
    }

    fn dropped_file(&self) -> &str {
        &self.output.dropped_file
    }

    fn columns(&self) -> &ColumnNames {
        &self.input.columns
    }

    fn cell_size_deg(&self) -> f64 {
        self.grid.cell_size_deg
    }

    fn sanitizer_rules(&self) -> &SanitizerRules {
        &self.sanitizer
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input.path", &self.input.path)?;
        validate_path("output.path", &self.output.path)?;
        validate_path("output.facilities_file", &self.output.facilities_file)?;
        validate_path("output.index_file", &self.output.index_file)?;
        validate_path("output.dropped_file", &self.output.dropped_file)?;
        validate_distinct(
            "output",
            &[
                self.output.facilities_file.as_str(),
                self.output.index_file.as_str(),
                self.output.dropped_file.as_str(),
            ],
        )?;
        validate_positive_float("grid.cell_size_deg", self.grid.cell_size_deg)?;
        self.input.columns.validate()?;
        self.sanitizer.validate()
    }
}
