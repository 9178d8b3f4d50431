//! Askama templates for the web frontend.

use askama::Template;
use chrono::NaiveDate;

use crate::domain::{
    Location, Route, RouteStep, Transportation, TransportType, ValidationErrors,
};
use crate::listing::{SortConfig, SortDirection, SortKey};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Location list with filter and create form.
#[derive(Template)]
#[template(path = "locations.html")]
pub struct LocationsTemplate {
    pub notice: Option<Notice>,
    pub query: String,
    pub locations: Vec<LocationView>,
    /// Number of locations before filtering
    pub total: usize,
    pub form: LocationFormView,
    pub errors: FormErrors,
}

/// Location edit form.
#[derive(Template)]
#[template(path = "location_edit.html")]
pub struct LocationEditTemplate {
    pub location_id: i64,
    pub form: LocationFormView,
    pub errors: FormErrors,
}

/// Transportation table with create form.
#[derive(Template)]
#[template(path = "transportations.html")]
pub struct TransportationsTemplate {
    pub notice: Option<Notice>,
    pub headers: Vec<SortHeaderView>,
    pub transportations: Vec<TransportationView>,
    pub form: TransportationFormView,
    pub errors: FormErrors,
}

/// Transportation edit form.
#[derive(Template)]
#[template(path = "transportation_edit.html")]
pub struct TransportationEditTemplate {
    pub transportation_id: i64,
    pub version: i64,
    pub form: TransportationFormView,
    pub errors: FormErrors,
}

/// Route finder: two pick lists and, once both ends are picked, results.
#[derive(Template)]
#[template(path = "routes.html")]
pub struct RoutesTemplate {
    pub origin_q: String,
    pub destination_q: String,
    pub origin_options: Vec<LocationOption>,
    pub destination_options: Vec<LocationOption>,
    pub date: String,
    pub direct_only: bool,
    /// Validation message for the current picks
    pub error: Option<String>,
    /// `None` until a search has run
    pub routes: Option<Vec<RouteView>>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

// ============================================================================
// Notices
// ============================================================================

/// One-shot message shown after a redirect, carried as `?notice=<code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LocationCreated,
    LocationCreateFailed,
    LocationUpdated,
    LocationUpdateFailed,
    LocationDeleted,
    LocationDeleteFailed,
    TransportationCreated,
    TransportationCreateFailed,
    TransportationUpdated,
    TransportationUpdateFailed,
    TransportationConflict,
    TransportationDeleted,
    TransportationDeleteFailed,
}

const NOTICES: &[(Notice, &str)] = &[
    (Notice::LocationCreated, "location-created"),
    (Notice::LocationCreateFailed, "location-create-failed"),
    (Notice::LocationUpdated, "location-updated"),
    (Notice::LocationUpdateFailed, "location-update-failed"),
    (Notice::LocationDeleted, "location-deleted"),
    (Notice::LocationDeleteFailed, "location-delete-failed"),
    (Notice::TransportationCreated, "transportation-created"),
    (Notice::TransportationCreateFailed, "transportation-create-failed"),
    (Notice::TransportationUpdated, "transportation-updated"),
    (Notice::TransportationUpdateFailed, "transportation-update-failed"),
    (Notice::TransportationConflict, "transportation-conflict"),
    (Notice::TransportationDeleted, "transportation-deleted"),
    (Notice::TransportationDeleteFailed, "transportation-delete-failed"),
];

impl Notice {
    /// Code used in the `notice` query parameter.
    pub fn code(&self) -> &'static str {
        NOTICES
            .iter()
            .find(|(n, _)| n == self)
            .map(|(_, code)| *code)
            .unwrap_or_default()
    }

    /// Unknown codes are ignored rather than shown.
    pub fn from_code(code: &str) -> Option<Self> {
        NOTICES.iter().find(|(_, c)| *c == code).map(|(n, _)| *n)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::LocationCreated => "Lokasyon başarıyla eklendi!",
            Notice::LocationCreateFailed => "Lokasyon eklenirken bir hata oluştu.",
            Notice::LocationUpdated => "Lokasyon başarıyla güncellendi!",
            Notice::LocationUpdateFailed => "Lokasyon güncellenirken bir hata oluştu.",
            Notice::LocationDeleted => "Lokasyon başarıyla silindi!",
            Notice::LocationDeleteFailed => "Lokasyon silinirken bir hata oluştu.",
            Notice::TransportationCreated => "Ulaşım başarıyla eklendi!",
            Notice::TransportationCreateFailed => "Ulaşım eklenirken bir hata oluştu.",
            Notice::TransportationUpdated => "Ulaşım başarıyla güncellendi!",
            Notice::TransportationUpdateFailed => "Ulaşım güncellenirken bir hata oluştu.",
            Notice::TransportationConflict => {
                "Ulaşım başka biri tarafından değiştirildi. Lütfen tekrar deneyin."
            }
            Notice::TransportationDeleted => "Ulaşım başarıyla silindi!",
            Notice::TransportationDeleteFailed => "Ulaşım silinirken bir hata oluştu.",
        }
    }

    /// Toast style: `success`, `warning` or `error`.
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::LocationCreated
            | Notice::LocationUpdated
            | Notice::LocationDeleted
            | Notice::TransportationCreated
            | Notice::TransportationUpdated
            | Notice::TransportationDeleted => "success",
            Notice::TransportationConflict => "warning",
            _ => "error",
        }
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Field errors keyed by form field name.
#[derive(Debug, Clone, Default)]
pub struct FormErrors(Vec<(String, String)>);

impl FormErrors {
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|(f, _)| f == field)
    }

    /// First message for `field`, or empty.
    pub fn message(&self, field: &str) -> &str {
        self.0
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        Self(
            errors
                .iter()
                .map(|e| (e.field.to_string(), e.message.clone()))
                .collect(),
        )
    }
}

/// `"Istanbul Airport (IST)"`, or just the name when there is no code.
pub fn location_label(location: &Location) -> String {
    match &location.code {
        Some(code) => format!("{} ({})", location.name, code),
        None => location.name.clone(),
    }
}

/// Location row.
#[derive(Debug, Clone)]
pub struct LocationView {
    pub id: i64,
    /// Empty when the location has no code
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl LocationView {
    pub fn from_location(location: &Location) -> Self {
        Self {
            id: location.id.0,
            code: location.code_str().to_string(),
            name: location.name.clone(),
            city: location.city.clone(),
            country: location.country.clone(),
        }
    }
}

/// Values to pre-fill the location form with.
#[derive(Debug, Clone, Default)]
pub struct LocationFormView {
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl LocationFormView {
    pub fn from_location(location: &Location) -> Self {
        Self {
            code: location.code_str().to_string(),
            name: location.name.clone(),
            city: location.city.clone(),
            country: location.country.clone(),
        }
    }
}

/// An entry in a location `<select>` or pick list.
#[derive(Debug, Clone)]
pub struct LocationOption {
    pub id: i64,
    pub label: String,
    pub city: String,
    pub selected: bool,
}

impl LocationOption {
    pub fn new(location: &Location, selected: Option<i64>) -> Self {
        Self {
            id: location.id.0,
            label: location_label(location),
            city: location.city.clone(),
            selected: selected == Some(location.id.0),
        }
    }
}

/// An entry in the transport type `<select>`.
#[derive(Debug, Clone)]
pub struct TypeOption {
    pub name: String,
    pub selected: bool,
}

/// Values to pre-fill the transportation form with.
#[derive(Debug, Clone, Default)]
pub struct TransportationFormView {
    pub types: Vec<TypeOption>,
    pub origins: Vec<LocationOption>,
    pub destinations: Vec<LocationOption>,
    /// Day list as typed, e.g. `"Pzt, Çar"`
    pub operating_days: String,
}

impl TransportationFormView {
    pub fn new(
        types: &[TransportType],
        locations: &[Location],
        selected_type: &str,
        origin: Option<i64>,
        destination: Option<i64>,
        operating_days: String,
    ) -> Self {
        Self {
            types: types
                .iter()
                .map(|t| TypeOption {
                    name: t.to_string(),
                    selected: t.as_str() == selected_type,
                })
                .collect(),
            origins: locations
                .iter()
                .map(|l| LocationOption::new(l, origin))
                .collect(),
            destinations: locations
                .iter()
                .map(|l| LocationOption::new(l, destination))
                .collect(),
            operating_days,
        }
    }
}

/// Transportation table row.
#[derive(Debug, Clone)]
pub struct TransportationView {
    pub id: i64,
    pub type_name: String,
    pub icon: &'static str,
    pub palette: &'static str,
    pub origin: String,
    pub destination: String,
    /// e.g. `"Pzt, Çar"` or `"All Days"`
    pub days: String,
}

impl TransportationView {
    pub fn from_transportation(t: &Transportation) -> Self {
        Self {
            id: t.id.0,
            type_name: t.transport_type.to_string(),
            icon: t.transport_type.icon(),
            palette: t.transport_type.palette(),
            origin: location_label(&t.origin),
            destination: location_label(&t.destination),
            days: t.operating_days.display(),
        }
    }
}

/// A sortable column header.
#[derive(Debug, Clone)]
pub struct SortHeaderView {
    pub label: &'static str,
    /// Link that applies (or flips) this column's sort
    pub href: String,
    /// `▲`, `▼`, or empty when the column is not the active sort
    pub arrow: &'static str,
}

pub fn sort_headers(current: SortConfig) -> Vec<SortHeaderView> {
    [
        (SortKey::Id, "ID"),
        (SortKey::Type, "Type"),
        (SortKey::Origin, "Origin"),
        (SortKey::Destination, "Destination"),
    ]
    .into_iter()
    .map(|(key, label)| SortHeaderView {
        label,
        href: format!("/transportations?{}", current.toggled(key).query()),
        arrow: match (current.key == key, current.direction) {
            (false, _) => "",
            (true, SortDirection::Ascending) => "▲",
            (true, SortDirection::Descending) => "▼",
        },
    })
    .collect()
}

/// Transport type badge.
#[derive(Debug, Clone)]
pub struct TypeBadge {
    pub name: String,
    pub icon: &'static str,
    pub palette: &'static str,
}

impl TypeBadge {
    fn new(ty: &TransportType) -> Self {
        Self {
            name: ty.to_string(),
            icon: ty.icon(),
            palette: ty.palette(),
        }
    }
}

/// One leg in the route timeline.
#[derive(Debug, Clone)]
pub struct StepView {
    pub badge: TypeBadge,
    pub origin: String,
    pub destination: String,
    pub days: String,
    /// False when a date was picked and this leg does not run that day
    pub runs_on_date: bool,
}

impl StepView {
    fn new(step: &RouteStep, date: Option<NaiveDate>) -> Self {
        Self {
            badge: TypeBadge::new(&step.transport_type),
            origin: location_label(&step.origin),
            destination: location_label(&step.destination),
            days: step.operating_days.display(),
            runs_on_date: date.is_none_or(|d| step.operating_days.runs_on(d)),
        }
    }
}

/// A route card: summary line plus timeline.
#[derive(Debug, Clone)]
pub struct RouteView {
    /// 1-based position in the result list
    pub number: usize,
    pub origin: String,
    pub destination: String,
    pub total_steps: usize,
    pub transfers: usize,
    pub is_direct: bool,
    /// Distinct types, first occurrence first
    pub badges: Vec<TypeBadge>,
    /// Origin, then each leg's destination
    pub stops: Vec<String>,
    pub steps: Vec<StepView>,
    /// False when some leg does not start where the previous one ended
    pub contiguous: bool,
}

impl RouteView {
    pub fn new(number: usize, route: &Route, date: Option<NaiveDate>) -> Self {
        let summary = route.summary();
        Self {
            number,
            origin: location_label(&summary.origin),
            destination: location_label(&summary.destination),
            total_steps: summary.total_steps,
            transfers: summary.transfers(),
            is_direct: summary.is_direct,
            badges: summary.distinct_types().iter().map(TypeBadge::new).collect(),
            stops: route.stops().into_iter().map(location_label).collect(),
            steps: route.steps().iter().map(|s| StepView::new(s, date)).collect(),
            contiguous: route.is_contiguous(),
        }
    }

    /// Whether every leg runs on the picked date (true when no date).
    pub fn runs_on_date(&self) -> bool {
        self.steps.iter().all(|s| s.runs_on_date)
    }
}
