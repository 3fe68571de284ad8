use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Directory sentinel for a professor pinned by the operator
pub const FORCED_LABEL: &str = "Asignación forzada";
/// Directory sentinel for an assignment without group affinity
pub const AUTOMATIC_LABEL: &str = "Asignación automática";
/// Label the directory uses for ordinary lectures
pub const REGULAR_LABEL: &str = "Clase teórica";

/// Duration assumed for a session entry that does not state one
pub const DEFAULT_SESSION_MINUTES: u32 = 90;
/// Weekly minutes assumed for an assignment that does not state them
pub const DEFAULT_SUBJECT_MINUTES: u32 = 270;

/// Canonical form of a subject or professor name used for every comparison.
pub fn canonical(value: &str) -> String {
    value.trim().to_lowercase()
}

// Helper functions for HH:MM serialization
pub(crate) fn serialize_hhmm<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.format("%H:%M").to_string())
}

pub(crate) fn deserialize_hhmm<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_clock(&s).map_err(serde::de::Error::custom)
}

/// Parse a wall-clock time written as `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(value: &str) -> Result<NaiveTime, String> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|e| format!("invalid time '{}': {}", value, e))
}

/// Minutes since midnight.
pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

// ============================================================================
// Calendar
// ============================================================================

/// Day of the week as reported by the directory.
///
/// Labels the directory uses are Spanish; English names and three-letter
/// abbreviations are accepted too. Anything unrecognised is kept verbatim
/// in `Other` and sorts after every known weekday.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Other(String),
}

impl Day {
    /// Sort rank: Monday=1 through Friday=5, everything else 6.
    pub fn rank(&self) -> u8 {
        match self {
            Day::Monday => 1,
            Day::Tuesday => 2,
            Day::Wednesday => 3,
            Day::Thursday => 4,
            Day::Friday => 5,
            _ => 6,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Day::Monday => "Lunes",
            Day::Tuesday => "Martes",
            Day::Wednesday => "Miércoles",
            Day::Thursday => "Jueves",
            Day::Friday => "Viernes",
            Day::Saturday => "Sábado",
            Day::Sunday => "Domingo",
            Day::Other(raw) => raw,
        }
    }

    pub fn parse(value: &str) -> Self {
        match canonical(value).as_str() {
            "lunes" | "monday" | "mon" | "lun" => Day::Monday,
            "martes" | "tuesday" | "tue" | "mar" => Day::Tuesday,
            "miércoles" | "miercoles" | "wednesday" | "wed" | "mié" | "mie" => Day::Wednesday,
            "jueves" | "thursday" | "thu" | "jue" => Day::Thursday,
            "viernes" | "friday" | "fri" | "vie" => Day::Friday,
            "sábado" | "sabado" | "saturday" | "sat" | "sáb" | "sab" => Day::Saturday,
            "domingo" | "sunday" | "sun" | "dom" => Day::Sunday,
            _ => Day::Other(value.to_string()),
        }
    }
}

impl From<String> for Day {
    fn from(value: String) -> Self {
        Day::parse(&value)
    }
}

impl From<Day> for String {
    fn from(day: Day) -> Self {
        day.label().to_string()
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Assignments
// ============================================================================

/// Where an assignment came from, and therefore how its sessions are found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssignmentOrigin {
    /// No group affinity
    #[default]
    Automatic,
    /// Professor pinned regardless of which group normally teaches the subject
    Forced,
    /// Inherited unchanged from an existing group
    FromGroup(String),
}

impl AssignmentOrigin {
    pub fn is_forced(&self) -> bool {
        matches!(self, AssignmentOrigin::Forced)
    }
}

impl From<String> for AssignmentOrigin {
    fn from(value: String) -> Self {
        let key = canonical(&value);
        if key.is_empty() || key == canonical(AUTOMATIC_LABEL) || key == "automatic" {
            AssignmentOrigin::Automatic
        } else if key == canonical(FORCED_LABEL) || key == "forced" {
            AssignmentOrigin::Forced
        } else {
            AssignmentOrigin::FromGroup(value.trim().to_string())
        }
    }
}

impl From<AssignmentOrigin> for String {
    fn from(origin: AssignmentOrigin) -> Self {
        match origin {
            AssignmentOrigin::Automatic => AUTOMATIC_LABEL.to_string(),
            AssignmentOrigin::Forced => FORCED_LABEL.to_string(),
            AssignmentOrigin::FromGroup(name) => name,
        }
    }
}

fn default_subject_minutes() -> u32 {
    DEFAULT_SUBJECT_MINUTES
}

/// A desired subject/professor pairing handed to the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAssignment {
    subject: String,
    professor: String,
    #[serde(default)]
    rating: f64,
    #[serde(
        rename = "minutes",
        alias = "durationMinutes",
        default = "default_subject_minutes"
    )]
    duration_minutes: u32,
    #[serde(default)]
    origin: AssignmentOrigin,
}

impl SubjectAssignment {
    pub fn new(
        subject: impl Into<String>,
        professor: impl Into<String>,
        rating: f64,
        duration_minutes: u32,
        origin: AssignmentOrigin,
    ) -> Self {
        Self {
            subject: subject.into(),
            professor: professor.into(),
            rating,
            duration_minutes,
            origin,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn professor(&self) -> &str {
        &self.professor
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn origin(&self) -> &AssignmentOrigin {
        &self.origin
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// Whether a session came from a regular group timetable or was pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionKind {
    #[default]
    Regular,
    Forced,
}

impl From<String> for SessionKind {
    fn from(value: String) -> Self {
        let key = canonical(&value);
        if key == canonical(FORCED_LABEL) || key == "forced" {
            SessionKind::Forced
        } else {
            SessionKind::Regular
        }
    }
}

impl From<SessionKind> for String {
    fn from(kind: SessionKind) -> Self {
        match kind {
            SessionKind::Regular => REGULAR_LABEL.to_string(),
            SessionKind::Forced => FORCED_LABEL.to_string(),
        }
    }
}

fn default_session_minutes() -> u32 {
    DEFAULT_SESSION_MINUTES
}

/// One weekly occurrence of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSlot {
    #[serde(rename = "materia", alias = "subject")]
    pub subject: String,
    #[serde(rename = "profesor", alias = "professor")]
    pub professor: String,
    #[serde(rename = "dia", alias = "day")]
    pub day: Day,
    #[serde(
        rename = "horaInicio",
        alias = "startTime",
        serialize_with = "serialize_hhmm",
        deserialize_with = "deserialize_hhmm"
    )]
    pub start_time: NaiveTime,
    #[serde(
        rename = "horaFin",
        alias = "endTime",
        serialize_with = "serialize_hhmm",
        deserialize_with = "deserialize_hhmm"
    )]
    pub end_time: NaiveTime,
    #[serde(rename = "calificacion", alias = "rating", default)]
    pub rating: f64,
    #[serde(
        rename = "duracionMinutos",
        alias = "durationMinutes",
        alias = "minutes",
        default = "default_session_minutes"
    )]
    pub duration_minutes: u32,
    #[serde(rename = "tipo", alias = "type", default)]
    pub kind: SessionKind,
    #[serde(
        rename = "grupo",
        alias = "group",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub group: Option<String>,
    #[serde(
        rename = "salon",
        alias = "room",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub room: Option<String>,
}

impl SessionSlot {
    pub fn start_minutes(&self) -> u32 {
        minutes_of_day(self.start_time)
    }

    pub fn end_minutes(&self) -> u32 {
        minutes_of_day(self.end_time)
    }

    /// Whether this session teaches `subject` (canonical form expected).
    pub fn teaches(&self, subject_key: &str) -> bool {
        canonical(&self.subject) == subject_key
    }

    /// Whether this session is taught by `professor` (canonical form expected).
    pub fn taught_by(&self, professor_key: &str) -> bool {
        canonical(&self.professor) == professor_key
    }
}

/// Immutable snapshot of one group's sessions
pub type GroupSchedule = Arc<Vec<SessionSlot>>;

/// Resolver output, canonically sorted
pub type WeeklySchedule = Vec<SessionSlot>;

// ============================================================================
// Group directory listing
// ============================================================================

/// One subject entry of the group directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSubject {
    pub subject: String,
    pub professor: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<AssignmentOrigin>,
}

impl From<&SubjectAssignment> for GroupSubject {
    fn from(assignment: &SubjectAssignment) -> Self {
        Self {
            subject: assignment.subject().to_string(),
            professor: assignment.professor().to_string(),
            rating: assignment.rating(),
            minutes: Some(assignment.duration_minutes()),
            origin: Some(assignment.origin().clone()),
        }
    }
}

/// Group name to its subject listing, ordered by group name
pub type GroupListing = BTreeMap<String, Vec<GroupSubject>>;
