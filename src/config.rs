//! Configuration: the flat key→value settings map and its typed accessors.
//!
//! Settings come from a settings file (see [`Settings::load`]) or from an
//! in-memory map. The file format is line-oriented: one `key<TAB>value` pair
//! per line, `#` comments and empty lines skipped, and a line starting with a
//! tab continues the previous key's value (joined with `\n`) — which is how
//! multi-line templates are written.
//!
//! An empty value is equivalent to an unset key: defaults apply to both.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{GenerationError, GenerationResult};
use crate::ids::IdPolicy;

/// Settings file used when the command line does not name one.
pub const DEFAULT_SETTINGS_FILE: &str = "taxogen.settings";

pub const INPUT_FILE: &str = "inputFile";
pub const SEPARATOR_CHARACTER: &str = "separatorCharacter";
pub const QUOTE_CHARACTER: &str = "quoteCharacter";
pub const FILLDOWN: &str = "filldown";
pub const OUTPUT_FILE: &str = "outputFile";
pub const HIERARCHY_COLUMNS: &str = "hierarchyColumns";
pub const PROPERTY_COLUMNS: &str = "propertyColumns";
pub const ID_TYPE: &str = "idType";
pub const NUMERIC_START_ID: &str = "numericStartId";
pub const HEADER_FILE: &str = "headerFile";
pub const FOOTER_FILE: &str = "footerFile";
pub const FIRST_ROW_AS_COLUMN_NAMES: &str = "firstRowAsColumnNames";
pub const SHOW_BROADER_REFERENCE: &str = "showBroaderReference";
pub const SHOW_NARROWER_REFERENCE: &str = "showNarrowerReference";

/// The four template kinds a run can configure.
///
/// Each kind has a global default key (`default<Kind>`) and optional
/// per-column overrides (`column<N><Kind>`); see [`Settings::template`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Per-node element block; placeholders `<id>`, `<name>`, `<relations>`,
    /// `<properties>`.
    Element,
    /// One reference to the parent node; placeholder `<parent>`.
    BroaderReference,
    /// One reference per child node; placeholder `<child>`.
    NarrowerReference,
    /// One line per property column; placeholders `<property>`, `<value>`.
    Property,
}

impl TemplateKind {
    /// Settings-key suffix for this kind.
    pub fn key_suffix(self) -> &'static str {
        match self {
            TemplateKind::Element => "ElementTemplate",
            TemplateKind::BroaderReference => "BroaderReferenceTemplate",
            TemplateKind::NarrowerReference => "NarrowerReferenceTemplate",
            TemplateKind::Property => "PropertyTemplate",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_suffix())
    }
}

/// Flat key→value configuration with built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Wrap an already-loaded key→value map.
    pub fn from_map(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Load a settings file from disk.
    ///
    /// Malformed lines are skipped with a warning to `sink`; only I/O
    /// failures are fatal.
    pub fn load(path: impl AsRef<Path>, sink: &dyn DiagnosticSink) -> GenerationResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text, sink))
    }

    /// Parse settings-file text. See the module docs for the format.
    pub fn parse(text: &str, sink: &dyn DiagnosticSink) -> Self {
        let mut values: BTreeMap<String, String> = BTreeMap::new();
        let mut previous_key: Option<String> = None;

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.find('\t') {
                None => {
                    sink.report(&Diagnostic::SettingsLineWithoutTab { line: line_number });
                }
                Some(0) => match &previous_key {
                    Some(key) => {
                        if let Some(existing) = values.get_mut(key) {
                            existing.push('\n');
                            existing.push_str(&line[1..]);
                        }
                    }
                    None => {
                        sink.report(&Diagnostic::SettingsContinuationWithoutKey {
                            line: line_number,
                        });
                    }
                },
                Some(tab) => {
                    let key = &line[..tab];
                    let value = &line[tab + 1..];
                    values.insert(key.to_string(), value.to_string());
                    previous_key = Some(key.to_string());
                }
            }
        }

        Self { values }
    }

    /// Raw lookup with defaults applied. Unset and empty keys both fall
    /// back to the default; keys without a default yield `""`.
    pub fn get(&self, key: &str) -> &str {
        match self.values.get(key) {
            Some(value) if !value.is_empty() => value,
            _ => default_for(key),
        }
    }

    /// Boolean settings accept `true` or `1`.
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.get(key), "true" | "1")
    }

    /// The required input file path.
    pub fn input_file(&self) -> GenerationResult<PathBuf> {
        let value = self.get(INPUT_FILE);
        if value.is_empty() {
            return Err(GenerationError::MissingSetting { key: INPUT_FILE });
        }
        Ok(PathBuf::from(value))
    }

    /// Output path, defaulting to `output.xml`.
    pub fn output_file(&self) -> PathBuf {
        PathBuf::from(self.get(OUTPUT_FILE))
    }

    /// Header file to copy verbatim before the body, if configured.
    pub fn header_file(&self) -> Option<PathBuf> {
        let value = self.get(HEADER_FILE);
        (!value.is_empty()).then(|| PathBuf::from(value))
    }

    /// Footer file to copy verbatim after the body, if configured.
    pub fn footer_file(&self) -> Option<PathBuf> {
        let value = self.get(FOOTER_FILE);
        (!value.is_empty()).then(|| PathBuf::from(value))
    }

    /// CSV field separator, default `,`.
    pub fn separator(&self) -> GenerationResult<u8> {
        single_ascii(SEPARATOR_CHARACTER, self.get(SEPARATOR_CHARACTER))
    }

    /// CSV quote character, default `"`.
    pub fn quote(&self) -> GenerationResult<u8> {
        single_ascii(QUOTE_CHARACTER, self.get(QUOTE_CHARACTER))
    }

    /// Whether fill-down normalization runs. Default true.
    pub fn filldown(&self) -> bool {
        self.get_bool(FILLDOWN)
    }

    /// Whether the first row is promoted to column names.
    pub fn first_row_as_column_names(&self) -> bool {
        self.get_bool(FIRST_ROW_AS_COLUMN_NAMES)
    }

    /// Whether broader references are rendered.
    pub fn show_broader_reference(&self) -> bool {
        self.get_bool(SHOW_BROADER_REFERENCE)
    }

    /// Whether narrower references are rendered.
    pub fn show_narrower_reference(&self) -> bool {
        self.get_bool(SHOW_NARROWER_REFERENCE)
    }

    /// The ordered hierarchy-column list. Required; malformed values and
    /// duplicate columns are fatal.
    pub fn hierarchy_columns(&self) -> GenerationResult<Vec<usize>> {
        let value = self.get(HIERARCHY_COLUMNS);
        if value.is_empty() {
            return Err(GenerationError::MissingSetting {
                key: HIERARCHY_COLUMNS,
            });
        }
        let columns =
            parse_column_list(value).ok_or_else(|| GenerationError::InvalidSetting {
                key: HIERARCHY_COLUMNS,
                value: value.to_string(),
                reason: "must be comma separated integers larger than 0".to_string(),
            })?;
        let mut seen = columns.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != columns.len() {
            return Err(GenerationError::InvalidSetting {
                key: HIERARCHY_COLUMNS,
                value: value.to_string(),
                reason: "contains duplicate column numbers".to_string(),
            });
        }
        Ok(columns)
    }

    /// The property-column list. Optional; a malformed value is reported to
    /// `sink` and ignored.
    pub fn property_columns(&self, sink: &dyn DiagnosticSink) -> Vec<usize> {
        let value = self.get(PROPERTY_COLUMNS);
        if value.is_empty() {
            return Vec::new();
        }
        match parse_column_list(value) {
            Some(columns) => columns,
            None => {
                sink.report(&Diagnostic::InvalidPropertyColumns {
                    value: value.to_string(),
                });
                Vec::new()
            }
        }
    }

    /// Identifier policy. An unrecognized `idType` falls back to name-based
    /// allocation; a malformed `numericStartId` is reported to `sink` and the
    /// counter starts at 0.
    pub fn id_policy(&self, sink: &dyn DiagnosticSink) -> IdPolicy {
        match self.get(ID_TYPE) {
            "numeric" => {
                let raw = self.get(NUMERIC_START_ID);
                match parse_unsigned(raw) {
                    Some(start) => IdPolicy::Numeric { start },
                    None => {
                        sink.report(&Diagnostic::InvalidNumericStartId {
                            value: raw.to_string(),
                        });
                        IdPolicy::Numeric { start: 0 }
                    }
                }
            }
            "ordered_numeric" => IdPolicy::OrderedNumeric,
            _ => IdPolicy::NameBased,
        }
    }

    /// Raw template lookup: the per-column override when `column` is given,
    /// the global default otherwise. `""` means not configured; the fallback
    /// chain lives in the renderer.
    pub fn template(&self, column: Option<usize>, kind: TemplateKind) -> &str {
        let key = match column {
            Some(column) => format!("column{column}{}", kind.key_suffix()),
            None => format!("default{}", kind.key_suffix()),
        };
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Warn about template gaps that will degrade output later: a missing
    /// default element or property template, and a missing default reference
    /// template while its `show*Reference` flag is on.
    pub fn report_template_gaps(&self, sink: &dyn DiagnosticSink) {
        for kind in [TemplateKind::Element, TemplateKind::Property] {
            if self.template(None, kind).is_empty() {
                sink.report(&Diagnostic::MissingDefaultTemplate { kind });
            }
        }
        if self.show_broader_reference()
            && self.template(None, TemplateKind::BroaderReference).is_empty()
        {
            sink.report(&Diagnostic::MissingDefaultTemplate {
                kind: TemplateKind::BroaderReference,
            });
        }
        if self.show_narrower_reference()
            && self.template(None, TemplateKind::NarrowerReference).is_empty()
        {
            sink.report(&Diagnostic::MissingDefaultTemplate {
                kind: TemplateKind::NarrowerReference,
            });
        }
    }
}

fn default_for(key: &str) -> &'static str {
    match key {
        OUTPUT_FILE => "output.xml",
        SEPARATOR_CHARACTER => ",",
        QUOTE_CHARACTER => "\"",
        FILLDOWN => "true",
        ID_TYPE => "nameBased",
        NUMERIC_START_ID => "1",
        _ => "",
    }
}

fn single_ascii(key: &'static str, value: &str) -> GenerationResult<u8> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(GenerationError::InvalidSetting {
            key,
            value: value.to_string(),
            reason: "must be a single ASCII character".to_string(),
        }),
    }
}

/// Parses a comma-separated list of positive integers with no leading zeros.
/// Returns `None` on any violation.
fn parse_column_list(text: &str) -> Option<Vec<usize>> {
    text.split(',')
        .map(|segment| {
            if segment.is_empty()
                || segment.starts_with('0')
                || !segment.bytes().all(|b| b.is_ascii_digit())
            {
                return None;
            }
            segment.parse::<usize>().ok()
        })
        .collect()
}

/// Parses a plain digit string (0 allowed) into a counter start value.
fn parse_unsigned(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u64>().ok()
}
