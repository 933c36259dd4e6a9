use serde::{Deserialize, Serialize};

/// Prefixed scalar reports emitted by the mount controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportTag {
    /// `FB:O` report.
    Fb,
    /// `MC:O` report.
    Mc,
    /// `MR:O` report.
    Mr,
    /// `RF:` report.
    Rf,
}

impl ReportTag {
    const ALL: [ReportTag; 4] = [Self::Fb, Self::Mc, Self::Mr, Self::Rf];

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Fb => "FB:O",
            Self::Mc => "MC:O",
            Self::Mr => "MR:O",
            Self::Rf => "RF:",
        }
    }
}

impl std::fmt::Display for ReportTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix().trim_end_matches(['O', ':']))
    }
}

/// One parsed inbound line. Display only; never used for control.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TelemetryRecord {
    /// Colon-delimited status line, split into its fields.
    Status(Vec<String>),
    /// Prefixed scalar report.
    Report { tag: ReportTag, value: String },
    /// Anything else, kept verbatim.
    Other(String),
}

impl TelemetryRecord {
    /// Numeric value of a scalar report, if it parses.
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Self::Report { value, .. } => value.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Parse one inbound line. Blank lines yield `None`.
pub fn parse_telemetry_line(line: &str) -> Option<TelemetryRecord> {
    let line = line.trim_matches(|c: char| c.is_whitespace() || c == '#' || c == '\0');
    if line.is_empty() {
        return None;
    }

    for tag in ReportTag::ALL {
        if let Some(rest) = line.strip_prefix(tag.prefix()) {
            return Some(TelemetryRecord::Report {
                tag,
                value: rest.trim().to_string(),
            });
        }
    }

    if line.contains(':') {
        let fields = line
            .split(':')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        return Some(TelemetryRecord::Status(fields));
    }

    Some(TelemetryRecord::Other(line.to_string()))
}
