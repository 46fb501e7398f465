use crate::adapters::delimited::DEFAULT_DELIMITER;
use crate::core::aggregation::UNCLASSIFIED_GROUP;
use crate::core::ConfigProvider;
use crate::domain::model::{GroupLayout, OutputFormat};
use crate::utils::error::{PayrollError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub job: JobInfo,
    pub input: InputConfig,
    pub substitution: SubstitutionConfig,
    pub aggregation: AggregationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub delimiter: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ";".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstitutionConfig {
    pub catalog: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub groups: Option<String>,
    pub payroll: Option<String>,
    pub group_layout: GroupLayout,
    pub fallback_group: String,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            groups: None,
            payroll: None,
            group_layout: GroupLayout::Rows,
            fallback_group: UNCLASSIFIED_GROUP.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            formats: vec![OutputFormat::Txt, OutputFormat::Json],
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PayrollError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PayrollError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_delimiter("input.delimiter", &self.input.delimiter)?;

        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_non_empty_string(
            "aggregation.fallback_group",
            &self.aggregation.fallback_group,
        )?;

        if self.output.formats.is_empty() {
            return Err(PayrollError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: "[]".to_string(),
                reason: "At least one output format is required".to_string(),
            });
        }

        let inputs = [
            ("substitution.catalog", &self.substitution.catalog),
            ("substitution.text", &self.substitution.text),
            ("aggregation.groups", &self.aggregation.groups),
            ("aggregation.payroll", &self.aggregation.payroll),
        ];
        for (field, path) in inputs {
            if let Some(path) = path {
                validation::validate_input_file(field, path)?;
            }
        }

        Ok(())
    }

    pub fn catalog_path(&self) -> Result<&String> {
        validation::validate_required_field("substitution.catalog", &self.substitution.catalog)
    }

    pub fn text_path(&self) -> Result<&String> {
        validation::validate_required_field("substitution.text", &self.substitution.text)
    }

    pub fn groups_path(&self) -> Result<&String> {
        validation::validate_required_field("aggregation.groups", &self.aggregation.groups)
    }

    pub fn payroll_path(&self) -> Result<&String> {
        validation::validate_required_field("aggregation.payroll", &self.aggregation.payroll)
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn delimiter(&self) -> u8 {
        self.input
            .delimiter
            .bytes()
            .next()
            .unwrap_or(DEFAULT_DELIMITER)
    }

    fn fallback_group(&self) -> &str {
        &self.aggregation.fallback_group
    }

    fn group_layout(&self) -> GroupLayout {
        self.aggregation.group_layout
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output.formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[job]
name = "folha-marco"
description = "Folha de março"

[input]
delimiter = "\t"

[substitution]
catalog = "data/folha_exemplo.csv"
text = "data/texto_exemplo.txt"

[aggregation]
groups = "data/grupos_colunas_exemplo.csv"
payroll = "data/lancamentos_exemplo.csv"
group_layout = "columns"
fallback_group = "Sem grupo"

[output]
output_path = "./relatorios"
formats = ["txt", "csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        config.validate().unwrap();

        assert_eq!(config.job.name, "folha-marco");
        assert_eq!(config.delimiter(), b'\t');
        assert_eq!(config.group_layout(), GroupLayout::Columns);
        assert_eq!(config.fallback_group(), "Sem grupo");
        assert_eq!(config.output_formats(), &[OutputFormat::Txt, OutputFormat::Csv]);
        assert_eq!(config.catalog_path().unwrap(), "data/folha_exemplo.csv");
    }

    #[test]
    fn test_defaults_for_empty_file() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.delimiter(), b';');
        assert_eq!(config.fallback_group(), "Unclassified");
        assert_eq!(config.group_layout(), GroupLayout::Rows);
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.output_formats(), &[OutputFormat::Txt, OutputFormat::Json]);
        assert!(matches!(
            config.catalog_path(),
            Err(PayrollError::MissingConfigError { .. })
        ));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PAYROLL_TEST_OUTPUT_DIR", "/tmp/relatorios");

        let toml_content = r#"
[output]
output_path = "${PAYROLL_TEST_OUTPUT_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output.output_path, "/tmp/relatorios");

        std::env::remove_var("PAYROLL_TEST_OUTPUT_DIR");
    }

    #[test]
    fn test_config_validation() {
        let bad_delimiter = TomlConfig::from_toml_str("[input]\ndelimiter = \",\"\n").unwrap();
        assert!(bad_delimiter.validate().is_err());

        let bad_input = TomlConfig::from_toml_str("[substitution]\ncatalog = \"folha.xlsx\"\n").unwrap();
        assert!(bad_input.validate().is_err());

        let no_formats = TomlConfig::from_toml_str("[output]\nformats = []\n").unwrap();
        assert!(no_formats.validate().is_err());

        let blank_group = TomlConfig::from_toml_str("[aggregation]\nfallback_group = \" \"\n").unwrap();
        assert!(blank_group.validate().is_err());
    }

    #[test]
    fn test_unknown_format_is_a_parse_error() {
        let result = TomlConfig::from_toml_str("[output]\nformats = [\"pdf\"]\n");
        assert!(matches!(
            result,
            Err(PayrollError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[job]
name = "file-test"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "file-test");
    }
}
