// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

macro_rules! fill {
    ($args:ident, $config:ident, $($field:ident),+ $(,)?) => {
        $(
            if $args.$field.is_none() {
                $args.$field = $config.$field;
            }
        )+
    };
}

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Mode (only override the default, not an explicit CLI value)
        if self.mode == "binary" {
            if let Some(mode) = config.mode {
                self.mode = mode;
            }
        }

        fill!(self, config, recording, candidate, reference, output, report);
        fill!(self, config, native_rate, num_leads, header_size, marker_divisor);
        fill!(
            self,
            config,
            marker_index,
            lead,
            target_rate,
            candidate_rate,
            candidate_scale,
            lowpad,
            highpad,
            plotrange,
            blanking_width,
            blanking,
            offset_correction,
        );
        fill!(self, config, threads);

        // Flags (config only sets if not explicitly set)
        if !self.allow_partial_tail && config.allow_partial_tail.unwrap_or(false) {
            self.allow_partial_tail = true;
        }
        if !self.progress && config.progress.unwrap_or(false) {
            self.progress = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(argv: &[&str]) -> Args {
        Args::from_args(&["wavealign"], argv).unwrap()
    }

    #[test]
    fn test_cli_wins_over_config() {
        let args = parse(&["--lowpad", "10", "--mode", "delimited"]);
        let config = Config {
            lowpad: Some(500),
            highpad: Some(900),
            mode: Some("binary".to_string()),
            ..Config::new()
        };
        let merged = args.merge_with_config(config);
        assert_eq!(merged.lowpad, Some(10));
        assert_eq!(merged.highpad, Some(900));
        assert_eq!(merged.mode, "delimited");
    }

    #[test]
    fn test_config_fills_flags() {
        let config = Config {
            mode: Some("delimited".to_string()),
            progress: Some(true),
            allow_partial_tail: Some(true),
            ..Config::new()
        };
        let merged = parse(&[]).merge_with_config(config);
        assert_eq!(merged.mode, "delimited");
        assert!(merged.progress);
        assert!(merged.allow_partial_tail);
    }
}
