use clap::{Parser, Subcommand};
use todo_core::config::{Config, ConfigOverrides, canonical_key, check_column_width};
use todo_core::error::AppError;

#[derive(Parser, Debug)]
#[command(name = "todo", author, version, about = "A simple in-memory todo list", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: todo add "Buy milk" "2 liters, semi-skimmed"
    Add {
        /// Task title (1-100 characters)
        title: String,
        /// Optional task description
        description: Option<String>,
    },
    /// List all tasks
    ///
    /// Example: todo list
    List,
    /// Update the title and/or description of a task
    ///
    /// Example: todo update 1 --title "Buy oat milk"
    /// Example: todo update 1 --description "from the corner shop"
    Update {
        id: u64,
        /// New task title (1-100 characters)
        #[arg(long)]
        title: Option<String>,
        /// New task description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a task
    ///
    /// Example: todo delete 1
    Delete { id: u64 },
    /// Mark a task as complete
    ///
    /// Example: todo complete 1
    Complete { id: u64 },
    /// Mark a task as incomplete
    ///
    /// Example: todo incomplete 1
    Incomplete { id: u64 },
}

/// Flag name used to identify config override arguments before clap runs.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";
const JSON_FLAG: &str = "--json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Alias(String),
    TitleWidth,
    DescriptionWidth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, AppError> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| AppError::invalid_input("override must be in KEY=VALUE format"))?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field = canonical_key(field)
        .ok_or_else(|| AppError::invalid_input("override key cannot be empty"))?;

    let target = match canonical_field.as_str() {
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| AppError::invalid_input("alias override requires an alias name"))?;
            return Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value,
            });
        }
        "theme" => ConfigOverrideTarget::Theme,
        "title_width" => ConfigOverrideTarget::TitleWidth,
        "description_width" => ConfigOverrideTarget::DescriptionWidth,
        other => {
            return Err(AppError::invalid_input(format!(
                "unknown config field '{other}'"
            )));
        }
    };

    if remainder.is_some() {
        return Err(AppError::invalid_input(format!(
            "{canonical_field} override cannot have subfields"
        )));
    }

    Ok(ParsedConfigOverride { target, value })
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
            ConfigOverrideTarget::TitleWidth => {
                overrides.title_width = Some(parse_width("title_width", &parsed.value)?);
            }
            ConfigOverrideTarget::DescriptionWidth => {
                overrides.description_width =
                    Some(parse_width("description_width", &parsed.value)?);
            }
        }
    }

    Ok(overrides)
}

fn parse_width(field: &str, value: &str) -> Result<usize, AppError> {
    let width = value
        .parse::<usize>()
        .map_err(|_| AppError::invalid_input(format!("{field} must be a number")))?;
    check_column_width(field, width).map_err(|err| AppError::invalid_input(err.message()))?;
    Ok(width)
}

/// Pulls the values of every `--config-override` flag out of raw arguments.
///
/// Overrides can redefine aliases, so they are needed before the arguments
/// are handed to clap.
pub fn extract_config_overrides(args: &[String]) -> Vec<String> {
    let mut values = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == CONFIG_OVERRIDE_FLAG {
            if let Some(value) = iter.next() {
                values.push(value.clone());
            }
        } else if let Some(value) = arg
            .strip_prefix(CONFIG_OVERRIDE_FLAG)
            .and_then(|rest| rest.strip_prefix('='))
        {
            values.push(value.to_string());
        }
    }

    values
}

/// Replaces the command word with its configured alias expansion, if any.
pub fn expand_alias(args: Vec<String>, config: &Config) -> Result<Vec<String>, AppError> {
    let mut index = 0;
    while index < args.len() {
        let arg = args[index].as_str();
        if arg == CONFIG_OVERRIDE_FLAG {
            index += 2;
        } else if arg == JSON_FLAG || arg.starts_with(CONFIG_OVERRIDE_FLAG) {
            index += 1;
        } else {
            break;
        }
    }

    let Some((word, expansion)) = args
        .get(index)
        .and_then(|word| config.alias(word).map(|expansion| (word, expansion)))
    else {
        return Ok(args);
    };

    let replacement = split_command_line(expansion)?;
    if replacement.is_empty() {
        return Err(AppError::invalid_input(format!(
            "alias '{word}' expands to nothing"
        )));
    }
    let mut expanded = Vec::with_capacity(args.len() + replacement.len());
    expanded.extend_from_slice(&args[..index]);
    expanded.extend(replacement);
    expanded.extend_from_slice(&args[index + 1..]);
    Ok(expanded)
}

/// Splits a command line on whitespace, honouring double quotes and `\"`.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in alias"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::{
        Cli, Command, ConfigOverrideTarget, collect_overrides, expand_alias,
        extract_config_overrides, parse_config_override, split_command_line,
    };
    use clap::Parser;
    use todo_core::config::Config;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    fn alias_config(name: &str, value: &str) -> Config {
        Config {
            aliases: [(name.to_string(), value.to_string())].into_iter().collect(),
            ..Config::default()
        }
    }

    #[test]
    fn parse_update_with_both_flags() {
        let cli = Cli::try_parse_from([
            "todo",
            "update",
            "3",
            "--title",
            "new",
            "--description",
            "desc",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Update {
                id,
                title,
                description,
            }) => {
                assert_eq!(id, 3);
                assert_eq!(title.as_deref(), Some("new"));
                assert_eq!(description.as_deref(), Some("desc"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_add_with_optional_description() {
        let cli = Cli::try_parse_from(["todo", "add", "title"]).unwrap();
        match cli.command {
            Some(Command::Add { title, description }) => {
                assert_eq!(title, "title");
                assert!(description.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_without_command_selects_menu() {
        let cli = Cli::try_parse_from(["todo", "--json"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.json);
    }

    #[test]
    fn parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["todo", "delete", "abc"]).is_err());
    }

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" THEME = Midnight ").unwrap();

        assert_eq!(parsed.target, ConfigOverrideTarget::Theme);
        assert_eq!(parsed.value, "Midnight");

        let parsed = parse_config_override("Title-Width=12").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::TitleWidth);
    }

    #[test]
    fn parse_config_override_rejects_empty_alias_name() {
        let err = parse_config_override("aliases. = foo").unwrap_err();
        assert!(err.message().contains("requires an alias name"));
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("unknown.field=value").unwrap_err();
        assert!(err.message().contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("aliasesls").unwrap_err();
        assert!(err.message().contains("KEY=VALUE"));
    }

    #[test]
    fn parse_config_override_rejects_theme_subfield() {
        let err = parse_config_override("theme.accent=red").unwrap_err();
        assert!(err.message().contains("cannot have subfields"));
    }

    #[test]
    fn collect_overrides_builds_all_targets() {
        let overrides = collect_overrides(&strings(&[
            "theme=noir",
            "alias.ls=list",
            "title_width=10",
            "description_width=5",
        ]))
        .unwrap();

        assert_eq!(overrides.theme.as_deref(), Some("noir"));
        assert_eq!(overrides.aliases.get("ls").map(String::as_str), Some("list"));
        assert_eq!(overrides.title_width, Some(10));
        assert_eq!(overrides.description_width, Some(5));
    }

    #[test]
    fn collect_overrides_rejects_bad_width() {
        let err = collect_overrides(&strings(&["title_width=wide"])).unwrap_err();
        assert_eq!(err.code(), "invalid_input");

        let err = collect_overrides(&strings(&["title_width=1"])).unwrap_err();
        assert!(err.message().contains("at least"));
    }

    #[test]
    fn extract_config_overrides_handles_both_forms() {
        let args = strings(&[
            "--config-override",
            "theme=noir",
            "list",
            "--config-override=alias.ls=list",
        ]);

        assert_eq!(
            extract_config_overrides(&args),
            strings(&["theme=noir", "alias.ls=list"])
        );
    }

    #[test]
    fn expand_alias_replaces_command_word() {
        let config = alias_config("done", "complete");
        let args = strings(&["--json", "done", "4"]);

        let expanded = expand_alias(args, &config).unwrap();
        assert_eq!(expanded, strings(&["--json", "complete", "4"]));
    }

    #[test]
    fn expand_alias_splits_quoted_expansion() {
        let config = alias_config("milk", "add \"Buy milk\"");
        let args = strings(&["--config-override", "theme=noir", "milk", "dairy"]);

        let expanded = expand_alias(args, &config).unwrap();
        assert_eq!(
            expanded,
            strings(&["--config-override", "theme=noir", "add", "Buy milk", "dairy"])
        );
    }

    #[test]
    fn expand_alias_rejects_empty_expansion() {
        let config = alias_config("x", "  ");
        let err = expand_alias(strings(&["x"]), &config).unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.message(), "alias 'x' expands to nothing");
    }

    #[test]
    fn expand_alias_leaves_unknown_words() {
        let config = alias_config("ls", "list");
        let args = strings(&["add", "ls"]);

        assert_eq!(expand_alias(args.clone(), &config).unwrap(), args);
    }

    #[test]
    fn split_command_line_handles_quotes_and_escapes() {
        let parts = split_command_line(r#"add "say \"hi\"" plain"#).unwrap();
        assert_eq!(parts, strings(&["add", "say \"hi\"", "plain"]));

        let err = split_command_line("add \"open").unwrap_err();
        assert!(err.message().contains("unterminated quote"));
    }
}
