pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use crate::core::ConfigProvider;
    use crate::domain::model::{ColumnNames, SanitizerRules, DEFAULT_CELL_SIZE_DEG};
    use crate::utils::error::Result;
    use crate::utils::logger::LogFormat;
    use crate::utils::validation::{validate_distinct, validate_path, validate_positive_float, Validate};
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "facility-grid")]
    #[command(about = "Clean a facility list and build a lat/lng grid index for proximity lookups")]
    pub struct CliConfig {
        /// CSV with Name, Description, Latitude and Longitude columns
        #[arg(long, default_value = "Facility list.csv")]
        pub input: String,

        #[arg(long, default_value = ".")]
        pub output_path: String,

        #[arg(long, default_value = "facilities.json")]
        pub facilities_file: String,

        #[arg(long, default_value = "facilities_index.json")]
        pub index_file: String,

        #[arg(long, default_value = "dropped_rows.csv")]
        pub dropped_file: String,

        /// Grid cell size in degrees (0.01° ≈ 1.1 km)
        #[arg(long, default_value_t = DEFAULT_CELL_SIZE_DEG)]
        pub cell_size_deg: f64,

        /// TOML configuration file; replaces all other pipeline options
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, help = "Sanitize and index without writing any file")]
        pub dry_run: bool,

        #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
        pub log_format: LogFormat,

        #[arg(skip)]
        pub columns: ColumnNames,

        #[arg(skip)]
        pub sanitizer: SanitizerRules,
    }

    impl ConfigProvider for CliConfig {
        fn input_file(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn facilities_file(&self) -> &str {
            &self.facilities_file
        }

        fn index_file(&self) -> &str {
            &self.index_file
        }

        fn dropped_file(&self) -> &str {
            &self.dropped_file
        }

        fn columns(&self) -> &ColumnNames {
            &self.columns
        }

        fn cell_size_deg(&self) -> f64 {
            self.cell_size_deg
        }

        fn sanitizer_rules(&self) -> &SanitizerRules {
            &self.sanitizer
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("input", &self.input)?;
            validate_path("output_path", &self.output_path)?;
            validate_path("facilities_file", &self.facilities_file)?;
            validate_path("index_file", &self.index_file)?;
            validate_path("dropped_file", &self.dropped_file)?;
            validate_distinct(
                "output files",
                &[
                    self.facilities_file.as_str(),
                    self.index_file.as_str(),
                    self.dropped_file.as_str(),
                ],
            )?;
            validate_positive_float("cell_size_deg", self.cell_size_deg)?;
            self.columns.validate()?;
            self.sanitizer.validate()
        }
    }

}
