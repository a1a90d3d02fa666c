use crate::csv::records;
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const BUNDLED_CATALOG: &str = include_str!("../assets/flags.csv");

/// Geographic grouping a flag belongs to.
///
/// The storage key (`North_America`) is what gets written into the
/// preferences; the display name is what the player sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionId {
    Africa,
    Asia,
    Europe,
    NorthAmerica,
    Oceania,
    SouthAmerica,
}

impl RegionId {
    pub const ALL: [RegionId; 6] = [
        RegionId::Africa,
        RegionId::Asia,
        RegionId::Europe,
        RegionId::NorthAmerica,
        RegionId::Oceania,
        RegionId::SouthAmerica,
    ];

    /// Region used when the player deselects every region.
    pub const DEFAULT: RegionId = RegionId::NorthAmerica;

    pub fn key(self) -> &'static str {
        match self {
            RegionId::Africa => "Africa",
            RegionId::Asia => "Asia",
            RegionId::Europe => "Europe",
            RegionId::NorthAmerica => "North_America",
            RegionId::Oceania => "Oceania",
            RegionId::SouthAmerica => "South_America",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RegionId::NorthAmerica => "North America",
            RegionId::SouthAmerica => "South America",
            other => other.key(),
        }
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for RegionId {
    type Err = String;

    /// Accepts either the storage key or the display name, ignoring case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().replace(' ', "_");
        RegionId::ALL
            .into_iter()
            .find(|region| region.key().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown region '{}'", s.trim()))
    }
}

/// Handle to a flag's picture: its ISO 3166-1 alpha-2 code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagImage(String);

impl FlagImage {
    pub fn new(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(FlagImage(code.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// The flag as a pair of regional indicator symbols.
    pub fn emoji(&self) -> String {
        self.0
            .chars()
            .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagAsset {
    pub id: String,
    pub region: RegionId,
    pub label: String,
    pub image: FlagImage,
}

impl FlagAsset {
    pub fn new(region: RegionId, code: &str, label: &str) -> Option<Self> {
        let image = FlagImage::new(code)?;
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        Some(FlagAsset {
            id: image.code().to_string(),
            region,
            label: label.to_string(),
            image,
        })
    }
}

/// Immutable set of flags the quiz draws from.
#[derive(Debug, Clone)]
pub struct Catalog {
    flags: Vec<FlagAsset>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses `region,code,label` lines.
    pub fn parse(content: &str) -> Result<Self> {
        let mut flags = Vec::new();

        for (line, fields) in records(content) {
            let [region, code, label] = fields.as_slice() else {
                return Err(Error::Catalog {
                    line,
                    message: format!("expected 3 fields, found {}", fields.len()),
                });
            };
            let region = region
                .parse::<RegionId>()
                .map_err(|message| Error::Catalog { line, message })?;
            let flag = FlagAsset::new(region, code, label).ok_or_else(|| Error::Catalog {
                line,
                message: format!("invalid flag entry '{}','{}'", code.trim(), label.trim()),
            })?;
            if flags.iter().any(|f: &FlagAsset| f.id == flag.id) {
                return Err(Error::Catalog {
                    line,
                    message: format!("duplicate flag code '{}'", flag.id),
                });
            }
            flags.push(flag);
        }

        Self::from_flags(flags)
    }

    pub fn from_flags(flags: Vec<FlagAsset>) -> Result<Self> {
        if flags.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        Ok(Catalog { flags })
    }

    pub fn flags(&self) -> &[FlagAsset] {
        &self.flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flags of the given regions, in catalog order.
    pub fn in_regions(&self, regions: &BTreeSet<RegionId>) -> Vec<FlagAsset> {
        self.flags
            .iter()
            .filter(|flag| regions.contains(&flag.region))
            .cloned()
            .collect()
    }

    pub fn count_in(&self, region: RegionId) -> usize {
        self.flags.iter().filter(|flag| flag.region == region).count()
    }

    /// Number of different answer labels; the upper bound for choices.
    pub fn distinct_labels(&self) -> usize {
        self.flags
            .iter()
            .map(|flag| flag.label.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}
