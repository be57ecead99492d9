//! Record → entity conversion.
//!
//! Conversion only fills scalar fields and raw codes. Every cross-entity
//! reference stays unresolved until the graph's linking stage.

use crate::records::{
    CensusRecord, LanguageRecord, LocaleRow, TerritoryRecord, VariantTagRecord,
    WritingSystemRecord, LOCALE_ROW_FIELDS,
};
use crate::IngestError;
use lingograph_model::{
    Census, CensusId, CollectorType, Language, LanguageSource, LanguageSourceRecord, Locale,
    LocaleCode, Territory, TerritoryScope, VariantTag, WritingSystem,
};
use regex::Regex;
use std::sync::OnceLock;

/// Soft problems found while converting a row that was still kept.
pub type Warnings = Vec<IngestError>;

fn subtitle_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<name>.*?)\s*\((?P<subtitle>[^()]*)\)\s*$").expect("static regex")
    })
}

/// Split `"Sindarin (Grey-elven)"` into `("Sindarin", Some("Grey-elven"))`.
pub fn split_subtitle(name: &str) -> (String, Option<String>) {
    let name = name.trim();
    match subtitle_pattern().captures(name) {
        Some(caps) if !caps["name"].is_empty() => {
            let subtitle = caps["subtitle"].trim();
            (
                caps["name"].to_string(),
                (!subtitle.is_empty()).then(|| subtitle.to_string()),
            )
        }
        _ => (name.to_string(), None),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a population column: blank is `None`, thousands separators allowed.
pub fn parse_population(field: &'static str, raw: &str) -> Result<Option<u64>, IngestError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned
        .parse::<u64>()
        .map(Some)
        .map_err(|_| IngestError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

pub fn language_from_record(record: &LanguageRecord) -> Result<(Language, Warnings), IngestError> {
    let code = record.code.trim();
    if code.is_empty() {
        return Err(IngestError::MissingField("code"));
    }
    let mut warnings = Warnings::new();
    let (display, subtitle) = split_subtitle(&record.name);
    let display = if display.is_empty() {
        code.to_string()
    } else {
        display
    };

    let mut language = Language::new(code, display.clone());
    language.name_subtitle = subtitle;
    language.name_endonym = non_empty(&record.endonym);
    if let Some(endonym) = &language.name_endonym {
        lingograph_model::push_unique_name(&mut language.names, endonym);
    }
    language.modality = match non_empty(&record.modality) {
        Some(raw) => match raw.parse() {
            Ok(modality) => Some(modality),
            Err(err) => {
                warnings.push(IngestError::from(err));
                None
            }
        },
        None => None,
    };
    language.primary_script_code = non_empty(&record.primary_script);
    language.vitality_iso = non_empty(&record.vitality_iso);
    language.vitality_eth2013 = non_empty(&record.vitality_eth2013);
    language.vitality_eth2025 = non_empty(&record.vitality_eth2025);
    language.digital_support = non_empty(&record.digital_support);
    language.population_adjusted = record.population_adjusted;
    language.population_cited = record.population_cited;

    let iso_parent = non_empty(&record.iso_parent);
    let glottolog_parent = non_empty(&record.glottolog_parent);

    // Combined follows the registry grouping, falling back to genealogy; the
    // linker resolves a glottocode here through the Glottolog dictionary.
    language.sources.combined.parent_code = iso_parent.clone().or(glottolog_parent.clone());
    *language.source_mut(LanguageSource::Iso) = LanguageSourceRecord {
        code: Some(code.to_string()),
        name: Some(display.clone()),
        parent_code: iso_parent,
        ..LanguageSourceRecord::default()
    };
    *language.source_mut(LanguageSource::Bcp) = LanguageSourceRecord {
        code: Some(code.to_string()),
        name: Some(display.clone()),
        ..LanguageSourceRecord::default()
    };
    if let Some(glottocode) = non_empty(&record.alt_code) {
        *language.source_mut(LanguageSource::Glottolog) = LanguageSourceRecord {
            code: Some(glottocode),
            name: Some(display),
            parent_code: glottolog_parent,
            ..LanguageSourceRecord::default()
        };
    } else if glottolog_parent.is_some() {
        // No genealogical code of its own, but the row still places it in
        // the genealogical tree.
        language.source_mut(LanguageSource::Glottolog).parent_code = glottolog_parent;
    }

    Ok((language, warnings))
}

pub fn locale_from_row(row: &LocaleRow) -> Result<(Locale, Warnings), IngestError> {
    if row.len() != LOCALE_ROW_FIELDS.len() {
        return Err(IngestError::FieldCount {
            expected: LOCALE_ROW_FIELDS.len(),
            found: row.len(),
        });
    }
    let code = LocaleCode::parse(&row[0]).ok_or_else(|| IngestError::InvalidCode {
        value: row[0].clone(),
    })?;
    let mut warnings = Warnings::new();

    let mut locale = Locale::from_code(&code, row[1].trim());
    let endonym = row[2].trim();
    if !endonym.is_empty() {
        locale.name_endonym = Some(endonym.to_string());
        lingograph_model::push_unique_name(&mut locale.names, endonym);
    }
    locale.population_source = row[3].parse().unwrap_or_else(|err| {
        warnings.push(IngestError::from(err));
        Default::default()
    });
    locale.population_cited = parse_population("population_speaking", &row[4])
        .unwrap_or_else(|err| {
            warnings.push(err);
            None
        });
    locale.population_speaking = locale.population_cited;
    let status = row[5].trim();
    if !status.is_empty() {
        match status.parse() {
            Ok(parsed) => locale.official_status = Some(parsed),
            Err(err) => warnings.push(IngestError::from(err)),
        }
    }
    Ok((locale, warnings))
}

pub fn territory_from_record(record: &TerritoryRecord) -> Result<Territory, IngestError> {
    let code = record.code.trim();
    if code.is_empty() {
        return Err(IngestError::MissingField("code"));
    }
    let scope: TerritoryScope = record.scope.parse()?;
    let name = if record.name.trim().is_empty() {
        code
    } else {
        record.name.trim()
    };
    let mut territory = Territory::new(code, name, scope, record.population.unwrap_or(0));
    for alias in &record.names {
        lingograph_model::push_unique_name(&mut territory.names, alias);
    }
    territory.literacy_percent = record
        .literacy_percent
        .map(lingograph_model::population::clamp_percent);
    territory.contains_codes = record
        .contains
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    territory.sovereign_code = non_empty(&record.sovereign);
    Ok(territory)
}

pub fn writing_system_from_record(
    record: &WritingSystemRecord,
) -> Result<WritingSystem, IngestError> {
    let code = record.code.trim();
    if code.is_empty() {
        return Err(IngestError::MissingField("code"));
    }
    let name = if record.name.trim().is_empty() {
        code
    } else {
        record.name.trim()
    };
    let mut system = WritingSystem::new(code, name);
    system.name_full = non_empty(&record.name_full);
    if let Some(full) = &system.name_full {
        lingograph_model::push_unique_name(&mut system.names, full);
    }
    system.name_endonym = non_empty(&record.endonym);
    system.unicode_version = record.unicode_version;
    system.sample = non_empty(&record.sample);
    system.right_to_left = record.right_to_left;
    system.primary_language_code = non_empty(&record.primary_language);
    system.territory_of_origin_code = non_empty(&record.territory_of_origin);
    system.parent_code = non_empty(&record.parent);
    system.contains_codes = record
        .contains
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    Ok(system)
}

pub fn variant_tag_from_record(record: &VariantTagRecord) -> Result<VariantTag, IngestError> {
    let code = record.code.trim().to_ascii_lowercase();
    if code.is_empty() {
        return Err(IngestError::MissingField("code"));
    }
    let name = if record.name.trim().is_empty() {
        code.clone()
    } else {
        record.name.trim().to_string()
    };
    let mut tag = VariantTag::new(code, name);
    tag.prefixes = record.prefixes.clone();
    Ok(tag)
}

pub fn census_from_record(record: &CensusRecord) -> Result<(Census, Warnings), IngestError> {
    let id = record.id.trim();
    if id.is_empty() {
        return Err(IngestError::MissingField("id"));
    }
    let territory = record.territory.trim();
    if territory.is_empty() {
        return Err(IngestError::MissingField("territory"));
    }
    let mut warnings = Warnings::new();
    let collector_type: CollectorType = match record.collector_type.as_deref() {
        Some(raw) => raw.parse().unwrap_or_else(|err| {
            warnings.push(IngestError::from(err));
            CollectorType::Other
        }),
        None => CollectorType::Other,
    };
    let name = if record.name.trim().is_empty() {
        id.to_string()
    } else {
        record.name.trim().to_string()
    };
    let census = Census {
        id: CensusId::from(id),
        names: vec![name.clone()],
        name_display: name,
        territory_code: territory.to_string(),
        territory: None,
        languages: record
            .languages
            .iter()
            .map(|(code, estimate)| (code.trim().to_string(), *estimate))
            .filter(|(code, _)| !code.is_empty())
            .collect(),
        eligible_population: record.eligible_population,
        responding_population: record.responding_population,
        collector_type,
        collector_name: non_empty(&record.collector_name),
        year: record.year,
        url: non_empty(&record.url),
    };
    Ok((census, warnings))
}
