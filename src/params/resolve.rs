//! Ordered value resolution: flag, config file, prompt, default

use super::{Field, ParamError};
use crate::config::FileConfig;
use dialoguer::Input;
use std::fmt;
use tracing::debug;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Flag,
    ConfigFile,
    Prompt,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Flag => write!(f, "command line"),
            ValueSource::ConfigFile => write!(f, "config file"),
            ValueSource::Prompt => write!(f, "prompt"),
        }
    }
}

/// Asks for values that neither the command line nor a config file supplied.
pub trait Prompter {
    /// Obtain a raw value for `field`. `validate` lets interactive
    /// implementations re-ask until the answer parses.
    fn prompt(
        &mut self,
        field: &Field,
        default: Option<&str>,
        validate: &dyn Fn(&str) -> Result<(), String>,
    ) -> Result<String, ParamError>;
}

/// Prompts on the terminal with dialoguer.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(
        &mut self,
        field: &Field,
        default: Option<&str>,
        validate: &dyn Fn(&str) -> Result<(), String>,
    ) -> Result<String, ParamError> {
        let mut input = Input::<String>::new()
            .with_prompt(format!("Please enter {}", field.description))
            .validate_with(|value: &String| validate(value.trim()));
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .map_err(|source| ParamError::Prompt {
                key: field.key,
                source,
            })
    }
}

/// Never prompts: takes the default, or fails when there is none.
#[derive(Debug, Default)]
pub struct DefaultsOnly;

impl Prompter for DefaultsOnly {
    fn prompt(
        &mut self,
        field: &Field,
        default: Option<&str>,
        _validate: &dyn Fn(&str) -> Result<(), String>,
    ) -> Result<String, ParamError> {
        default
            .map(str::to_string)
            .ok_or(ParamError::Missing { key: field.key })
    }
}

/// Resolves one field at a time against a fixed config and prompter.
pub struct Resolver<'a> {
    config: &'a FileConfig,
    prompter: &'a mut dyn Prompter,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a FileConfig, prompter: &'a mut dyn Prompter) -> Self {
        Self { config, prompter }
    }

    /// Resolve `field`, trying in order:
    /// 1. `flag` (the command-line value)
    /// 2. the config files
    /// 3. the prompter, offering `default`
    ///
    /// The chosen raw value is then run through `parse`.
    pub fn resolve<T>(
        &mut self,
        field: &Field,
        flag: Option<&str>,
        default: Option<String>,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Result<T, ParamError> {
        let (raw, source) = if let Some(value) = flag {
            (value.to_string(), ValueSource::Flag)
        } else if let Some(value) = self.config.get_raw(field.key) {
            (value, ValueSource::ConfigFile)
        } else {
            let validate = |value: &str| parse(value).map(|_| ());
            let value = self
                .prompter
                .prompt(field, default.as_deref(), &validate)?;
            (value, ValueSource::Prompt)
        };

        debug!("Resolved {} from {}", field.key, source);
        parse(raw.trim()).map_err(|reason| ParamError::Invalid {
            key: field.key,
            value: raw.clone(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{parsers, MIN_PER_DAY, NAME};
    use std::collections::VecDeque;

    /// Replays canned answers and records what was asked.
    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<String>,
        asked: Vec<(&'static str, Option<String>)>,
    }

    impl Prompter for Scripted {
        fn prompt(
            &mut self,
            field: &Field,
            default: Option<&str>,
            _validate: &dyn Fn(&str) -> Result<(), String>,
        ) -> Result<String, ParamError> {
            self.asked.push((field.key, default.map(str::to_string)));
            self.answers
                .pop_front()
                .ok_or(ParamError::Missing { key: field.key })
        }
    }

    fn per_day(value: &str) -> Result<u32, String> {
        parsers::parse_int(value, 1, 1000)
    }

    #[test]
    fn test_flag_wins_over_config() {
        let config: FileConfig = "min_per_day = 4".parse().unwrap();
        let mut prompter = Scripted::default();
        let mut resolver = Resolver::new(&config, &mut prompter);
        let value = resolver
            .resolve(&MIN_PER_DAY, Some("2"), Some("1".into()), per_day)
            .unwrap();
        assert_eq!(value, 2);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn test_config_wins_over_prompt() {
        let config: FileConfig = "min_per_day = 4".parse().unwrap();
        let mut prompter = Scripted::default();
        let mut resolver = Resolver::new(&config, &mut prompter);
        let value = resolver
            .resolve(&MIN_PER_DAY, None, Some("1".into()), per_day)
            .unwrap();
        assert_eq!(value, 4);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn test_prompt_offers_default() {
        let config = FileConfig::default();
        let mut prompter = Scripted {
            answers: VecDeque::from(vec![" 9 ".to_string()]),
            ..Default::default()
        };
        let mut resolver = Resolver::new(&config, &mut prompter);
        let value = resolver
            .resolve(&MIN_PER_DAY, None, Some("1".into()), per_day)
            .unwrap();
        assert_eq!(value, 9);
        assert_eq!(prompter.asked, vec![("min_per_day", Some("1".to_string()))]);
    }

    #[test]
    fn test_defaults_only_uses_default() {
        let config = FileConfig::default();
        let mut prompter = DefaultsOnly;
        let mut resolver = Resolver::new(&config, &mut prompter);
        let value = resolver
            .resolve(&MIN_PER_DAY, None, Some("3".into()), per_day)
            .unwrap();
        assert_eq!(value, 3);

        let err = resolver
            .resolve(&NAME, None, None, parsers::parse_name)
            .unwrap_err();
        assert!(matches!(err, ParamError::Missing { key: "name" }));
    }

    #[test]
    fn test_invalid_value_names_field() {
        let config: FileConfig = "min_per_day = 0".parse().unwrap();
        let mut prompter = DefaultsOnly;
        let mut resolver = Resolver::new(&config, &mut prompter);
        let err = resolver
            .resolve(&MIN_PER_DAY, None, None, per_day)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value '0' for min_per_day: value must be between 1 and 1000"
        );
    }
}
