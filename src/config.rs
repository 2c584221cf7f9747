use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown sort key '{0}' (expected descendants, children or generations, optionally suffixed with Desc)")]
    UnknownSortKey(String),
    #[error("invalid padding '{0}': expected one to four numbers")]
    InvalidPadding(String),
    #[error("invalid node spacing '{0}': expected one or two numbers")]
    InvalidSpacing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortStat {
    Descendants,
    Children,
    Generations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One pass of the multi-key sibling sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortKey {
    pub stat: SortStat,
    pub order: SortOrder,
}

impl SortKey {
    pub const DESCENDANTS: Self = Self::asc(SortStat::Descendants);
    pub const DESCENDANTS_DESC: Self = Self::desc(SortStat::Descendants);
    pub const CHILDREN: Self = Self::asc(SortStat::Children);
    pub const CHILDREN_DESC: Self = Self::desc(SortStat::Children);
    pub const GENERATIONS: Self = Self::asc(SortStat::Generations);
    pub const GENERATIONS_DESC: Self = Self::desc(SortStat::Generations);

    pub const fn asc(stat: SortStat) -> Self {
        Self {
            stat,
            order: SortOrder::Ascending,
        }
    }

    pub const fn desc(stat: SortStat) -> Self {
        Self {
            stat,
            order: SortOrder::Descending,
        }
    }

    pub fn token(&self) -> &'static str {
        match (self.stat, self.order) {
            (SortStat::Descendants, SortOrder::Ascending) => "descendants",
            (SortStat::Descendants, SortOrder::Descending) => "descendantsDesc",
            (SortStat::Children, SortOrder::Ascending) => "children",
            (SortStat::Children, SortOrder::Descending) => "childrenDesc",
            (SortStat::Generations, SortOrder::Ascending) => "generations",
            (SortStat::Generations, SortOrder::Descending) => "generationsDesc",
        }
    }
}

impl FromStr for SortKey {
    type Err = ConfigError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim() {
            "descendants" => Ok(Self::DESCENDANTS),
            "descendantsDesc" => Ok(Self::DESCENDANTS_DESC),
            "children" => Ok(Self::CHILDREN),
            "childrenDesc" => Ok(Self::CHILDREN_DESC),
            "generations" => Ok(Self::GENERATIONS),
            "generationsDesc" => Ok(Self::GENERATIONS_DESC),
            other => Err(ConfigError::UnknownSortKey(other.to_string())),
        }
    }
}

impl TryFrom<String> for SortKey {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.token().to_string()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Parses a comma or whitespace separated list of sort key tokens.
pub fn parse_sort_keys(input: &str) -> Result<Vec<SortKey>, ConfigError> {
    input
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<SortKey>())
        .collect()
}

/// Tree padding, clockwise from the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// CSS shorthand: one value for all sides, further values fill
    /// top/right/bottom/left with the last supplied value repeating.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() || values.len() > 4 {
            return None;
        }
        let pick = |idx: usize| values[idx.min(values.len() - 1)];
        Some(Self {
            top: pick(0),
            right: pick(1),
            bottom: pick(2),
            left: pick(3),
        })
    }

    pub fn from_shorthand(input: &str) -> Result<Self, ConfigError> {
        let values = parse_numbers(input).ok_or_else(|| ConfigError::InvalidPadding(input.to_string()))?;
        Self::from_values(&values).ok_or_else(|| ConfigError::InvalidPadding(input.to_string()))
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.top, self.right, self.bottom, self.left]
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(50.0)
    }
}

/// Parses `x,y` spacing. A single value applies to both axes.
pub fn parse_spacing(input: &str) -> Result<(f64, f64), ConfigError> {
    match parse_numbers(input).as_deref() {
        Some([both]) => Ok((*both, *both)),
        Some([x, y]) => Ok((*x, *y)),
        _ => Err(ConfigError::InvalidSpacing(input.to_string())),
    }
}

fn parse_numbers(input: &str) -> Option<Vec<f64>> {
    input
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>().ok())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_spacing_x: f64,
    pub node_spacing_y: f64,
    pub node_width: f64,
    pub node_height: f64,
    pub padding: Padding,
    pub sort_keys: Vec<SortKey>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing_x: 100.0,
            node_spacing_y: 100.0,
            node_width: 100.0,
            node_height: 100.0,
            padding: Padding::default(),
            sort_keys: vec![SortKey::DESCENDANTS_DESC],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Numbers(Vec<f64>),
    String(String),
}

impl NumberOrString {
    fn padding(&self) -> Result<Padding, ConfigError> {
        match self {
            NumberOrString::Number(val) => Ok(Padding::uniform(*val)),
            NumberOrString::Numbers(vals) => {
                Padding::from_values(vals).ok_or_else(|| ConfigError::InvalidPadding(format!("{vals:?}")))
            }
            NumberOrString::String(val) => Padding::from_shorthand(val),
        }
    }

    fn spacing(&self) -> Result<(f64, f64), ConfigError> {
        match self {
            NumberOrString::Number(val) => Ok((*val, *val)),
            NumberOrString::Numbers(vals) => match vals.as_slice() {
                [both] => Ok((*both, *both)),
                [x, y] => Ok((*x, *y)),
                _ => Err(ConfigError::InvalidSpacing(format!("{vals:?}"))),
            },
            NumberOrString::String(val) => parse_spacing(val),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SortKeyList {
    Tokens(Vec<String>),
    Joined(String),
}

impl SortKeyList {
    fn keys(&self) -> Result<Vec<SortKey>, ConfigError> {
        match self {
            SortKeyList::Tokens(tokens) => tokens.iter().map(|token| token.parse()).collect(),
            SortKeyList::Joined(joined) => parse_sort_keys(joined),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    node_spacing: Option<NumberOrString>,
    node_size: Option<NumberOrString>,
    padding: Option<NumberOrString>,
    order_by: Option<SortKeyList>,
}

fn parse_config_file(contents: &str) -> anyhow::Result<ConfigFile> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        Err(json_err) => json5::from_str::<ConfigFile>(contents)
            .map_err(|_| anyhow::anyhow!("invalid config file: {json_err}")),
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed = parse_config_file(&contents)?;
    apply_config_file(&mut config, parsed)?;
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) -> Result<(), ConfigError> {
    if let Some(spacing) = parsed.node_spacing {
        let (x, y) = spacing.spacing()?;
        config.layout.node_spacing_x = x;
        config.layout.node_spacing_y = y;
    }
    if let Some(size) = parsed.node_size {
        let (width, height) = size.spacing()?;
        config.layout.node_width = width;
        config.layout.node_height = height;
    }
    if let Some(padding) = parsed.padding {
        config.layout.padding = padding.padding()?;
    }
    if let Some(order_by) = parsed.order_by {
        config.layout.sort_keys = order_by.keys()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_follows_css_shorthand() {
        assert_eq!(Padding::from_shorthand("10").unwrap(), Padding::uniform(10.0));
        assert_eq!(
            Padding::from_shorthand("10, 20").unwrap().as_array(),
            [10.0, 20.0, 20.0, 20.0]
        );
        assert_eq!(
            Padding::from_shorthand("1 2 3").unwrap().as_array(),
            [1.0, 2.0, 3.0, 3.0]
        );
        assert_eq!(
            Padding::from_shorthand("1,2,3,4").unwrap().as_array(),
            [1.0, 2.0, 3.0, 4.0]
        );
        assert!(Padding::from_shorthand("").is_err());
        assert!(Padding::from_shorthand("1,2,3,4,5").is_err());
        assert!(Padding::from_shorthand("wide").is_err());
    }

    #[test]
    fn parses_sort_key_lists() {
        let keys = parse_sort_keys("descendants, childrenDesc generationsDesc").unwrap();
        assert_eq!(
            keys,
            vec![
                SortKey::DESCENDANTS,
                SortKey::CHILDREN_DESC,
                SortKey::GENERATIONS_DESC
            ]
        );
        assert_eq!(
            parse_sort_keys("depth"),
            Err(ConfigError::UnknownSortKey("depth".to_string()))
        );
        assert!(parse_sort_keys("").unwrap().is_empty());
    }

    #[test]
    fn parses_spacing() {
        assert_eq!(parse_spacing("100.0,50").unwrap(), (100.0, 50.0));
        assert_eq!(parse_spacing("30").unwrap(), (30.0, 30.0));
        assert!(parse_spacing("1,2,3").is_err());
    }

    #[test]
    fn config_file_overlays_defaults() {
        let parsed = parse_config_file(
            r#"{"nodeSpacing": [40, 20], "padding": "5, 10", "orderBy": ["children", "generationsDesc"]}"#,
        )
        .unwrap();
        let mut config = Config::default();
        apply_config_file(&mut config, parsed).unwrap();
        assert_eq!(config.layout.node_spacing_x, 40.0);
        assert_eq!(config.layout.node_spacing_y, 20.0);
        assert_eq!(config.layout.node_width, 100.0);
        assert_eq!(config.layout.padding.as_array(), [5.0, 10.0, 10.0, 10.0]);
        assert_eq!(
            config.layout.sort_keys,
            vec![SortKey::CHILDREN, SortKey::GENERATIONS_DESC]
        );
    }

    #[test]
    fn config_file_accepts_json5() {
        let parsed = parse_config_file("{ padding: 8, orderBy: 'descendants', }").unwrap();
        let mut config = Config::default();
        apply_config_file(&mut config, parsed).unwrap();
        assert_eq!(config.layout.padding, Padding::uniform(8.0));
        assert_eq!(config.layout.sort_keys, vec![SortKey::DESCENDANTS]);
    }
}
