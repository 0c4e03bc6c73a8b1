use std::{fmt::Display, fs, path::Path, str::FromStr};

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{utils::canonicalize_path, PawianError, PawianResult};

/// A configuration file in the subset of Boost `program_options` syntax that Pawian reads and
/// writes.
///
/// ```text
/// # comment
/// errLogMode = debug
/// decay = ...        # options may repeat
/// decay = ...
/// [mnr]
/// useCommonProductionParams = true
/// ```
///
/// Keys below a `[section]` header are stored as `section.key`. Repeated keys keep every value in
/// file order, and keys are iterated in the order they first appear.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    entries: IndexMap<String, Vec<String>>,
}

impl ConfigFile {
    /// Create an empty [`ConfigFile`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a configuration file. `~` and environment variables in the path are
    /// expanded.
    pub fn open<P: AsRef<Path>>(file_path: P) -> PawianResult<Self> {
        let path = canonicalize_path(file_path.as_ref())?;
        let config = Self::parse(&fs::read_to_string(&path)?)?;
        info!("Read {} option(s) from {}", config.len(), path.display());
        Ok(config)
    }

    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`PawianError::ConfigSyntax`] for a line which is neither a section header nor a
    /// `key = value` pair, or which has an empty key or section name.
    pub fn parse(text: &str) -> PawianResult<Self> {
        let mut config = Self::new();
        let mut section: Option<String> = None;
        for (index, raw) in text.lines().enumerate() {
            let syntax_error = || PawianError::ConfigSyntax {
                line: index + 1,
                content: raw.to_string(),
            };
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(syntax_error)?;
                debug!("entering config section [{name}]");
                section = Some(name.to_string());
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(syntax_error)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(syntax_error());
            }
            let key = match &section {
                Some(section) => format!("{section}.{key}"),
                None => key.to_string(),
            };
            config.push(key, value.trim());
        }
        Ok(config)
    }

    /// Append a value to `key`, after any values it already has.
    pub fn push<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// The last value given for `key`, which is the one Pawian uses for single-valued options.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Every value given for `key`, in file order. Empty if the key is absent.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Parse the last value of `key` into `T`.
    ///
    /// Returns `Ok(None)` if the key is absent and [`PawianError::ParseError`] if the value does
    /// not parse.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> PawianResult<Option<T>> {
        self.get(key)
            .map(|value| {
                value.parse().map_err(|_| PawianError::ParseError {
                    name: value.to_string(),
                    object: std::any::type_name::<T>().to_string(),
                })
            })
            .transpose()
    }

    /// Check if `key` was given at least once.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in the order they first appear.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no options were given.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys and all of their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(content, _)| content)
}

impl FromStr for ConfigFile {
    type Err = PawianError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for ConfigFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, values) in self.iter() {
            for value in values {
                writeln!(f, "{key} = {value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::init_logger;
    use std::env;

    const PAWIAN_CONFIG: &str = "\
# Pawian configuration for pbar p -> pi+ D0 D-
errLogMode = debug   # trailing comment
name = ppbarToD0DmPip

pdgTableFile = /data/pdtNew.table
decay = D0D-->D0 D-
decay = pi+D0->pi+ D0
mass = D0 1.86484
mass = D- 1.86966
noFit =

[mnr]
useCommonProductionParams = true
[ fitParams ]
startValue = 0.5
";

    #[test]
    fn test_parse_pawian_config() {
        init_logger();
        let config = ConfigFile::parse(PAWIAN_CONFIG).unwrap();
        assert_eq!(config.get("errLogMode"), Some("debug"));
        assert_eq!(config.get("name"), Some("ppbarToD0DmPip"));
        assert_eq!(config.get("noFit"), Some(""));
        assert_eq!(config.get("mnr.useCommonProductionParams"), Some("true"));
        assert_eq!(config.get("fitParams.startValue"), Some("0.5"));
        assert!(!config.contains_key("startValue"));
        assert_eq!(config.len(), 8);
        assert!(!config.is_empty());
    }

    #[test]
    fn test_repeated_keys() {
        let config = ConfigFile::parse(PAWIAN_CONFIG).unwrap();
        assert_eq!(
            config.get_all("decay"),
            ["D0D-->D0 D-", "pi+D0->pi+ D0"]
        );
        assert_eq!(config.get("mass"), Some("D- 1.86966"));
        assert!(config.get_all("missing").is_empty());
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn test_key_order() {
        let config = ConfigFile::parse(PAWIAN_CONFIG).unwrap();
        let keys: Vec<&str> = config.keys().collect();
        assert_eq!(
            keys,
            [
                "errLogMode",
                "name",
                "pdgTableFile",
                "decay",
                "mass",
                "noFit",
                "mnr.useCommonProductionParams",
                "fitParams.startValue",
            ]
        );
        let (key, values) = config.iter().nth(3).unwrap();
        assert_eq!(key, "decay");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_get_parsed() {
        let config = ConfigFile::parse(PAWIAN_CONFIG).unwrap();
        assert_eq!(
            config.get_parsed::<bool>("mnr.useCommonProductionParams").unwrap(),
            Some(true)
        );
        assert_eq!(config.get_parsed::<f64>("fitParams.startValue").unwrap(), Some(0.5));
        assert_eq!(config.get_parsed::<u32>("missing").unwrap(), None);
        assert!(matches!(
            config.get_parsed::<f64>("name"),
            Err(PawianError::ParseError { name, .. }) if name == "ppbarToD0DmPip"
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            ConfigFile::parse("a = 1\njust some words\n"),
            Err(PawianError::ConfigSyntax { line: 2, content }) if content == "just some words"
        ));
        assert!(matches!(
            ConfigFile::parse(" = 1"),
            Err(PawianError::ConfigSyntax { line: 1, .. })
        ));
        assert!(matches!(
            ConfigFile::parse("# header\n[section\nkey = 1"),
            Err(PawianError::ConfigSyntax { line: 2, .. })
        ));
        assert!(matches!(
            ConfigFile::parse("[]"),
            Err(PawianError::ConfigSyntax { line: 1, .. })
        ));
    }

    #[test]
    fn test_empty_config() {
        let config: ConfigFile = "# nothing here\n\n   \n".parse().unwrap();
        assert!(config.is_empty());
        assert_eq!(config.to_string(), "");
    }

    #[test]
    fn test_display_round_trip() {
        let config = ConfigFile::parse(PAWIAN_CONFIG).unwrap();
        let text = config.to_string();
        assert!(text.starts_with("errLogMode = debug\nname = ppbarToD0DmPip\n"));
        assert!(text.contains("mnr.useCommonProductionParams = true\n"));
        let reparsed: ConfigFile = text.parse().unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_push() {
        let mut config = ConfigFile::new();
        config.push("decay", "a->b c");
        config.push("decay", "b->d e");
        config.push(String::from("name"), "test");
        assert_eq!(config.len(), 2);
        assert_eq!(config.get("decay"), Some("b->d e"));
        assert_eq!(config.to_string(), "decay = a->b c\ndecay = b->d e\nname = test\n");
    }

    #[test]
    fn test_open() {
        let dir = env::temp_dir().join(format!("pawian_test_{}", fastrand::u64(..)));
        fs::create_dir(&dir).unwrap();
        let path = dir.join("pawian.cfg");
        fs::write(&path, PAWIAN_CONFIG).unwrap();
        let config = ConfigFile::open(&path).unwrap();
        assert_eq!(config, ConfigFile::parse(PAWIAN_CONFIG).unwrap());
        assert!(matches!(
            ConfigFile::open(dir.join("missing.cfg")),
            Err(PawianError::IOError(_))
        ));
        fs::remove_dir_all(&dir).unwrap();
    }
}
